//! Terminal screens: the transaction form and the statement.
pub mod statement;
pub mod toast;
pub mod transaction;

use crate::error::Error;
use crate::models::transaction::format_money;
use crate::repository::TransactionRepository;
use crate::viewmodel::statement::StatementViewModel;
use crate::viewmodel::transaction_form::TransactionFormViewModel;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame,
    prelude::{Constraint, Direction, Layout, Rect},
    widgets::TableState,
};
use std::io;
use std::time::Duration;
use toast::{Toast, ToastLevel};
use transaction::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Transaction,
    Statement,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    GoTo(Screen),
    Quit,
}

pub struct App {
    pub screen: Screen,
    pub form: TransactionFormViewModel,
    pub statement: StatementViewModel,
    pub focus: FormField,
    pub statement_table: TableState,
    pub toast: Option<Toast>,
}

impl App {
    pub fn new(repository: TransactionRepository) -> Self {
        Self {
            screen: Screen::Transaction,
            form: TransactionFormViewModel::new(repository.clone()),
            statement: StatementViewModel::new(repository),
            focus: FormField::Amount,
            statement_table: TableState::default(),
            toast: None,
        }
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast::new(level, message));
    }

    /// Applies a key press and returns `true` when the application should exit.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool, Error> {
        // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
        if key.kind == KeyEventKind::Release {
            return Ok(false);
        }

        let navigation = match self.screen {
            Screen::Transaction => transaction::handle_key(self, key).await,
            Screen::Statement => statement::handle_key(self, key).await,
        };

        let navigation = match navigation {
            Ok(navigation) => navigation,
            Err(e) => {
                tracing::error!("Action failed: {}", e);
                self.show_toast(ToastLevel::Error, format!("Error: {}", e));
                Navigation::Stay
            }
        };

        match navigation {
            Navigation::Stay => {}
            Navigation::Quit => return Ok(true),
            Navigation::GoTo(screen) => self.navigate(screen).await,
        }

        self.consume_saved_notice();
        Ok(false)
    }

    async fn navigate(&mut self, screen: Screen) {
        tracing::debug!("Navigating to {:?}", screen);
        self.screen = screen;

        if screen == Screen::Statement {
            if let Err(e) = self.statement.refresh().await {
                tracing::error!("Failed to load statement: {}", e);
                self.show_toast(ToastLevel::Error, format!("Error: {}", e));
            }
            self.clamp_statement_selection();
        }
    }

    /// Turns the form's one-shot saved flag into a toast.
    fn consume_saved_notice(&mut self) {
        if self.form.state().is_transaction_saved {
            self.show_toast(ToastLevel::Success, "Transaction saved");
            self.form.on_transaction_saved_handled();
        }
    }

    pub async fn show_net_balance(&mut self) -> Result<(), Error> {
        let net = self.form.net_balance().await?;
        self.show_toast(ToastLevel::Info, format!("Net balance: {}", format_money(net)));
        Ok(())
    }

    pub fn clamp_statement_selection(&mut self) {
        let len = self.statement.state().transactions.len();
        if len == 0 {
            self.statement_table.select(None);
        } else {
            let selected = self.statement_table.selected().unwrap_or(0).min(len - 1);
            self.statement_table.select(Some(selected));
        }
    }

    fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    match app.screen {
        Screen::Transaction => transaction::render(frame, area, app),
        Screen::Statement => statement::render(frame, area, app),
    }
    toast::render(frame, area, app.toast.as_ref());
}

pub async fn run_app(repository: TransactionRepository) -> Result<(), Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = event_loop(App::new(repository)).await;

    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;

    result
}

async fn event_loop(mut app: App) -> Result<(), Error> {
    let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;
    tracing::info!("Terminal UI started");

    loop {
        app.expire_toast();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key).await? {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    tracing::info!("Terminal UI stopped");
    Ok(())
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    pub fn test_app() -> (App, TransactionRepository) {
        let repository = TransactionRepository::new(establish_test_connection().unwrap());
        (App::new(repository.clone()), repository)
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    /// Draws the app on an in-memory terminal and returns the screen text.
    pub fn render_to_string(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crossterm::event::KeyCode;

    #[tokio::test]
    async fn test_starts_on_transaction_screen() {
        let (app, _) = test_app();
        assert_eq!(app.screen, Screen::Transaction);
        assert!(app.toast.is_none());
    }

    #[tokio::test]
    async fn test_release_events_are_ignored() {
        let (mut app, _) = test_app();
        let mut release = key(KeyCode::Esc);
        release.kind = KeyEventKind::Release;

        assert!(!app.handle_key(release).await.unwrap());
    }

    #[tokio::test]
    async fn test_navigation_round_trip() {
        let (mut app, repository) = test_app();
        repository
            .add(10.0, "Coffee", "01/01/2025", crate::models::transaction::TransactionType::Debit)
            .unwrap();

        app.handle_key(key(KeyCode::F(2))).await.unwrap();
        assert_eq!(app.screen, Screen::Statement);
        assert_eq!(app.statement.state().transactions.len(), 1);
        assert_eq!(app.statement_table.selected(), Some(0));

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.screen, Screen::Transaction);
    }

    #[tokio::test]
    async fn test_escape_on_form_quits() {
        let (mut app, _) = test_app();
        assert!(app.handle_key(key(KeyCode::Esc)).await.unwrap());
    }

    #[test]
    fn test_toast_is_drawn() {
        let (mut app, _) = test_app();
        app.show_toast(ToastLevel::Info, "Hello there");

        let screen = render_to_string(&mut app);
        assert!(screen.contains("Hello there"));
    }
}
