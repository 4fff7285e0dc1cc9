use ratatui::{
    Frame,
    layout::Rect,
    prelude::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// A short message drawn in the bottom-right corner until it expires.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_LIFETIME
    }
}

pub fn render(frame: &mut Frame, area: Rect, toast: Option<&Toast>) {
    let Some(toast) = toast else {
        return;
    };

    let width = (toast.message.chars().count() + 4).min(area.width as usize) as u16;
    let height = 3u16.min(area.height);
    let x = area.x + area.width.saturating_sub(width);
    let y = area.y + area.height.saturating_sub(height + 1);
    let rect = Rect {
        x,
        y,
        width,
        height,
    };

    let style = match toast.level {
        ToastLevel::Info => Style::default().fg(Color::White),
        ToastLevel::Success => Style::default().fg(Color::Green),
        ToastLevel::Error => Style::default().fg(Color::Red),
    };

    frame.render_widget(Clear, rect);
    let block = Block::default().borders(Borders::ALL).border_style(style);
    let content = Paragraph::new(Line::from(toast.message.as_str())).style(style);
    frame.render_widget(content.block(block), rect);
}
