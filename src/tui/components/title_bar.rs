//! # TitleBar Component
//!
//! Top status bar showing which story is mounted and the latest status.
//!
//! ## Conditional Formatting
//!
//! 1. **Story + status**: `"Storydeck | Demo / counter | No binding for 'x'"`
//! 2. **Story only**: `"Storydeck | Demo / counter"`
//! 3. **Nothing mounted**: `"Storydeck | no stories registered"`
//!
//! TitleBar is purely presentational: it receives everything as props.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Top status bar component.
pub struct TitleBar {
    /// `collection / story` of the mounted entry, if any
    pub location: Option<String>,
    /// Transient status (e.g. "Reloaded counter")
    pub status_message: String,
    /// Keyboard hints, right after the status
    pub help: &'static str,
}

impl TitleBar {
    pub fn new(location: Option<String>, status_message: String) -> Self {
        Self {
            location,
            status_message,
            help: "^R Reload  ^E Ping  Esc Quit",
        }
    }

    fn title_text(&self) -> String {
        let location = self
            .location
            .as_deref()
            .unwrap_or("no stories registered");
        if self.status_message.is_empty() {
            format!("Storydeck | {location}")
        } else {
            format!("Storydeck | {location} | {}", self.status_message)
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                self.title_text(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(self.help, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(line, area);
    }
}
