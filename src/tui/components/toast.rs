//! Toast notification component
//!
//! A non-blocking overlay that auto-dismisses. Renders in the bottom-right
//! corner on top of all other content. Errors stay up longer and use the
//! theme's error color.

use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

pub struct Toast {
    pub message: String,
    created_at: Instant,
    duration: Duration,
    error: bool,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
            error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            duration: Duration::from_secs(6),
            error: true,
            ..Self::new(message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let max_width = area.width.saturating_sub(4).max(10);
        let text_width = self.message.width() as u16 + 4;
        let width = text_width.min(max_width);
        // Long messages wrap onto extra lines instead of being cut
        let inner = width.saturating_sub(4).max(1);
        let lines = (self.message.width() as u16).div_ceil(inner).clamp(1, 4);
        let height = lines + 2;

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height).intersection(area);

        let accent = if self.is_error() { theme.error } else { theme.highlight };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(if self.is_error() {
                theme.error
            } else {
                theme.foreground
            }))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_outlive_info() {
        let info = Toast::new("Saved.");
        let error = Toast::error("HTTP 500");
        assert!(!info.is_error());
        assert!(error.is_error());
        assert!(error.duration > info.duration);
        assert!(!info.is_expired());
    }
}
