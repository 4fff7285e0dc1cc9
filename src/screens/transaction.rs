use super::{App, Navigation, Screen};
use crate::error::Error;
use crate::models::transaction::{TransactionDetail, TransactionType};
use crate::viewmodel::transaction_form::TransactionFormState;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Type,
    Category,
    Amount,
    Description,
    Date,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Type,
        FormField::Category,
        FormField::Amount,
        FormField::Description,
        FormField::Date,
    ];

    fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn is_text(self) -> bool {
        matches!(self, FormField::Amount | FormField::Description | FormField::Date)
    }
}

pub async fn handle_key(app: &mut App, key: KeyEvent) -> Result<Navigation, Error> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('t') {
            app.form.on_date_selected(Some(Local::now().date_naive()));
        }
        return Ok(Navigation::Stay);
    }

    match key.code {
        KeyCode::Esc => return Ok(Navigation::Quit),
        KeyCode::F(2) => return Ok(Navigation::GoTo(Screen::Statement)),
        KeyCode::F(3) => app.show_net_balance().await?,
        KeyCode::Enter => {
            if !app.form.save().await? {
                app.show_toast(
                    super::toast::ToastLevel::Error,
                    "Fill in a positive amount, a description and a date",
                );
            }
        }
        KeyCode::Tab | KeyCode::Down => app.focus = app.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.focus = app.focus.previous(),
        KeyCode::Left | KeyCode::Right => match app.focus {
            FormField::Type => {
                let toggled = app.form.state().selected_type.toggle();
                app.form.on_type_change(toggled);
            }
            FormField::Category => app.form.on_cycle_detail(key.code == KeyCode::Right),
            _ => {}
        },
        KeyCode::Backspace if app.focus.is_text() => {
            let mut text = focused_text(app.form.state(), app.focus).to_string();
            text.pop();
            set_focused_text(app, &text);
        }
        KeyCode::Char(c) if app.focus.is_text() => {
            let mut text = focused_text(app.form.state(), app.focus).to_string();
            text.push(c);
            set_focused_text(app, &text);
        }
        _ => {}
    }

    Ok(Navigation::Stay)
}

fn focused_text(state: &TransactionFormState, focus: FormField) -> &str {
    match focus {
        FormField::Amount => &state.amount,
        FormField::Description => &state.description,
        FormField::Date => &state.date,
        FormField::Type | FormField::Category => "",
    }
}

fn set_focused_text(app: &mut App, text: &str) {
    match app.focus {
        FormField::Amount => app.form.on_amount_change(text),
        FormField::Description => app.form.on_description_change(text),
        FormField::Date => app.form.on_date_change(text),
        FormField::Type | FormField::Category => {}
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "New transaction",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Left);
    frame.render_widget(title, layout[0]);

    render_fields(frame, layout[1], app);

    let hint = concat!(
        "Tab/↑/↓ move  ←/→ change  Ctrl+T today  Enter save  ",
        "F2 statement  F3 balance  Esc quit"
    );
    frame.render_widget(
        Paragraph::new(hint)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true }),
        layout[2],
    );
}

fn render_fields(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.form.state();

    let type_value = match state.selected_type {
        TransactionType::Credit => "[credit]  debit ",
        TransactionType::Debit => " credit  [debit]",
    };
    let category_value = state.detail.map(TransactionDetail::label).unwrap_or("(none)");

    let lines = vec![
        field_line("Type", type_value, app.focus == FormField::Type, true),
        field_line("Category", category_value, app.focus == FormField::Category, true),
        field_line(
            "Amount",
            &state.amount,
            app.focus == FormField::Amount,
            state.is_amount_valid(),
        ),
        field_line(
            "Description",
            &state.description,
            app.focus == FormField::Description,
            state.is_description_valid(),
        ),
        field_line(
            "Date",
            &state.date,
            app.focus == FormField::Date,
            state.is_date_valid(),
        ),
    ];

    let block = Block::default().title("Form").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool, valid: bool) -> Line<'a> {
    let marker = if focused { "➤ " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(format!("{:<12}", label), label_style),
        Span::raw(value),
    ];
    if !valid {
        spans.push(Span::styled("  *", Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}
