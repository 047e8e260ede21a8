//! # Actions Panel Component
//!
//! Bottom panel listing values stories sent on the `actions` port, newest
//! last. Only the most recent entries that fit are drawn.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::core::ports::SentValue;
use crate::tui::component::Component;

pub struct ActionsPanel<'a> {
    pub actions: &'a [SentValue],
}

impl<'a> ActionsPanel<'a> {
    pub fn new(actions: &'a [SentValue]) -> Self {
        Self { actions }
    }
}

impl Component for ActionsPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.actions.len().saturating_sub(visible);
        let lines: Vec<Line> = if self.actions.is_empty() {
            vec![Line::from(Span::styled(
                "Nothing sent yet",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.actions[start..]
                .iter()
                .map(|sent| {
                    Line::from(vec![
                        Span::styled(
                            sent.at.format("%H:%M:%S ").to_string(),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(sent.value.to_string()),
                    ])
                })
                .collect()
        };

        let paragraph = Paragraph::new(lines).block(
            Block::bordered()
                .title(" Actions ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, area);
    }
}
