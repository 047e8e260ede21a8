//! # Preview Component
//!
//! Draws the mounted story's render tree.
//!
//! ## Tag Mapping
//!
//! | Tag        | Drawn as                                  |
//! |------------|-------------------------------------------|
//! | `h1`       | bold, underlined line followed by a blank |
//! | `button`   | `[k] label` in cyan                       |
//! | `p`/`span` | plain text lines                          |
//! | other      | children, in order                        |
//!
//! Bare text nodes are drawn as-is, one line per `\n`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::view::Node;
use crate::tui::component::Component;

pub struct Preview<'a> {
    /// Startup flag of the mounted instance
    pub flag: &'a str,
    pub tree: &'a Node<()>,
}

impl<'a> Preview<'a> {
    pub fn new(flag: &'a str, tree: &'a Node<()>) -> Self {
        Self { flag, tree }
    }
}

impl Component for Preview<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(node_lines(self.tree))
            .block(
                Block::bordered()
                    .title(format!(" {} ", self.flag))
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

/// Flatten a render tree into styled lines.
pub fn node_lines(tree: &Node<()>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_node(tree, &mut lines);
    lines
}

fn push_node(node: &Node<()>, lines: &mut Vec<Line<'static>>) {
    match node {
        Node::Text(content) => {
            lines.extend(content.lines().map(|l| Line::from(l.to_string())));
        }
        Node::Element {
            tag,
            children,
            keys,
        } => match tag.as_str() {
            "h1" => {
                lines.push(Line::from(Span::styled(
                    node.text_content(),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )));
                lines.push(Line::default());
            }
            "button" => {
                let hint: String = keys.iter().map(|(k, _)| format!("[{k}]")).collect();
                lines.push(Line::from(vec![
                    Span::styled(hint, Style::default().fg(Color::Cyan)),
                    Span::raw(" "),
                    Span::raw(node.text_content()),
                ]));
            }
            _ => {
                for child in children {
                    push_node(child, lines);
                }
            }
        },
    }
}
