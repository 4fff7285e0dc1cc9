use super::{App, Navigation, Screen, centered_rect};
use crate::error::Error;
use crate::models::transaction::{TransactionType, format_money};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub async fn handle_key(app: &mut App, key: KeyEvent) -> Result<Navigation, Error> {
    if app.statement.state().pending_delete().is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.statement.on_delete_confirm().await?;
                app.clamp_statement_selection();
            }
            KeyCode::Char('n') | KeyCode::Esc => app.statement.on_delete_cancel(),
            _ => {}
        }
        return Ok(Navigation::Stay);
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => {
            return Ok(Navigation::GoTo(Screen::Transaction));
        }
        KeyCode::Up => move_selection(app, -1),
        KeyCode::Down => move_selection(app, 1),
        KeyCode::Char('r') => {
            app.statement.refresh().await?;
            app.clamp_statement_selection();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let selected = app
                .statement_table
                .selected()
                .and_then(|i| app.statement.state().transactions.get(i))
                .cloned();
            if let Some(transaction) = selected {
                app.statement.on_delete_request(transaction);
            }
        }
        _ => {}
    }

    Ok(Navigation::Stay)
}

fn move_selection(app: &mut App, delta: i32) {
    let len = app.statement.state().transactions.len();
    if len == 0 {
        app.statement_table.select(None);
        return;
    }

    let current = app.statement_table.selected().unwrap_or(0) as i32;
    let next = (current + delta).clamp(0, len as i32 - 1) as usize;
    app.statement_table.select(Some(next));
}

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    render_summary(frame, layout[0], app);
    render_table(frame, layout[1], app);

    let hint = "↑/↓ move  d delete  r reload  Esc/b back";
    frame.render_widget(
        Paragraph::new(hint)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true }),
        layout[2],
    );

    if app.statement.state().pending_delete().is_some() {
        render_confirm_modal(frame, area, app);
    }
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.statement.state();
    let net_color = if state.net_balance < 0.0 {
        Color::Red
    } else {
        Color::Green
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{:<10}", "Credits")),
            Span::styled(format_money(state.total_credits), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::raw(format!("{:<10}", "Debits")),
            Span::styled(format_money(state.total_debits), Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{:<10}", "Balance"),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format_money(state.net_balance),
                Style::default().fg(net_color).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let block = Block::default().title("Financial summary").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default().title("Transaction history").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let transactions = &app.statement.state().transactions;
    if transactions.is_empty() {
        let empty = Paragraph::new("No transactions found")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new([
        Cell::from("Created").style(bold),
        Cell::from("Date").style(bold),
        Cell::from("Description").style(bold),
        Cell::from("Category").style(bold),
        Cell::from("Amount").style(bold),
    ]);

    let rows = transactions.iter().map(|tx| {
        let mut description = tx.description.clone();
        if description.chars().count() > 40 {
            description = description.chars().take(37).collect::<String>() + "...";
        }
        let amount_color = match tx.transaction_type {
            TransactionType::Credit => Color::Green,
            TransactionType::Debit => Color::Red,
        };

        Row::new([
            Cell::from(tx.display_created_at()),
            Cell::from(tx.date.clone()),
            Cell::from(description),
            Cell::from(tx.detail_label()),
            Cell::from(tx.signed_amount()).style(Style::default().fg(amount_color)),
        ])
    });

    let widths = [
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Percentage(40),
        Constraint::Length(10),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut app.statement_table);
}

fn render_confirm_modal(frame: &mut Frame, area: Rect, app: &App) {
    let Some(transaction) = app.statement.state().pending_delete() else {
        return;
    };

    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            "Delete this transaction?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("{}  {}", transaction.description, transaction.signed_amount())),
        Line::from(""),
        Line::from(Span::styled(
            "y/Enter delete   n/Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL).title("Confirm");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}
