//! # Story List Component
//!
//! Sidebar listing every registered story, grouped under its collection.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `StoryListState` lives in `TuiState`
//! - `StoryList` is created each frame with borrowed state
//!
//! Collection headers are display-only rows, so the list widget's selected
//! row is derived from the selected entry at render time.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding};
use unicode_width::UnicodeWidthChar;

use crate::core::registry::StoryBook;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// One selectable row: a registered story.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRow {
    pub collection: String,
    pub name: String,
}

/// Persistent state for the sidebar.
pub struct StoryListState {
    pub rows: Vec<StoryRow>,
    pub selected: usize,
    pub list_state: ListState,
}

impl StoryListState {
    pub fn new(book: &StoryBook) -> Self {
        let rows = book
            .entries()
            .iter()
            .map(|entry| StoryRow {
                collection: entry.collection.clone(),
                name: entry.name.clone(),
            })
            .collect();
        Self {
            rows,
            selected: 0,
            list_state: ListState::default(),
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.rows.len() {
            self.selected = index;
        }
    }

    pub fn selected_row(&self) -> Option<&StoryRow> {
        self.rows.get(self.selected)
    }

    /// Display rows: a header per collection, then its stories.
    /// Returns the rows and the display index of the selected story.
    fn display_rows(&self) -> (Vec<DisplayRow<'_>>, Option<usize>) {
        let mut out = Vec::new();
        let mut selected_at = None;
        let mut current: Option<&str> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if current != Some(row.collection.as_str()) {
                current = Some(row.collection.as_str());
                out.push(DisplayRow::Header(&row.collection));
            }
            if i == self.selected {
                selected_at = Some(out.len());
            }
            out.push(DisplayRow::Story(&row.name));
        }
        (out, selected_at)
    }
}

/// Events emitted by the story list.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryListEvent {
    /// The selection moved to this entry index.
    Select(usize),
}

impl EventHandler for StoryListState {
    type Event = StoryListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<StoryListEvent> {
        if self.rows.is_empty() {
            return None;
        }
        let before = self.selected;
        match event {
            TuiEvent::CursorUp => self.selected = self.selected.saturating_sub(1),
            TuiEvent::CursorDown => self.selected = (self.selected + 1).min(self.rows.len() - 1),
            _ => return None,
        }
        (self.selected != before).then_some(StoryListEvent::Select(self.selected))
    }
}

enum DisplayRow<'a> {
    Header(&'a str),
    Story(&'a str),
}

/// Transient render wrapper for the sidebar.
pub struct StoryList<'a> {
    state: &'a mut StoryListState,
}

impl<'a> StoryList<'a> {
    pub fn new(state: &'a mut StoryListState) -> Self {
        Self { state }
    }
}

impl Component for StoryList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Stories ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" ↑↓ Select ").centered())
            .padding(Padding::horizontal(1));

        let inner_width = area.width.saturating_sub(4) as usize; // borders + padding
        let (rows, selected_at) = self.state.display_rows();
        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row {
                DisplayRow::Header(collection) => ListItem::new(Line::from(Span::styled(
                    truncate_to_width(&collection.to_uppercase(), inner_width),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ))),
                DisplayRow::Story(name) => {
                    let style = if Some(i) == selected_at {
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    let label = truncate_to_width(&format!("  {name}"), inner_width);
                    ListItem::new(Line::from(Span::styled(label, style)))
                }
            })
            .collect();
        drop(rows);

        self.state.list_state.select(selected_at);
        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Truncate to `max_width` terminal columns, adding "..." if needed.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn state(rows: &[(&str, &str)]) -> StoryListState {
        StoryListState {
            rows: rows
                .iter()
                .map(|(c, n)| StoryRow {
                    collection: c.to_string(),
                    name: n.to_string(),
                })
                .collect(),
            selected: 0,
            list_state: ListState::default(),
        }
    }

    #[test]
    fn test_cursor_moves_and_clamps() {
        let mut list = state(&[("Demo", "a"), ("Demo", "b")]);
        assert_eq!(list.handle_event(&TuiEvent::CursorUp), None);
        assert_eq!(
            list.handle_event(&TuiEvent::CursorDown),
            Some(StoryListEvent::Select(1))
        );
        assert_eq!(list.handle_event(&TuiEvent::CursorDown), None);
        assert_eq!(list.selected_row().map(|r| r.name.as_str()), Some("b"));
    }

    #[test]
    fn test_other_events_are_ignored() {
        let mut list = state(&[("Demo", "a"), ("Demo", "b")]);
        assert_eq!(list.handle_event(&TuiEvent::Key('j')), None);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_empty_list_ignores_cursor() {
        let mut list = state(&[]);
        assert_eq!(list.handle_event(&TuiEvent::CursorDown), None);
        assert!(list.selected_row().is_none());
    }

    #[test]
    fn test_display_rows_insert_headers() {
        let mut list = state(&[("A", "one"), ("A", "two"), ("B", "three")]);
        list.select(2);
        let (rows, selected_at) = list.display_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(selected_at, Some(4));
    }

    #[test]
    fn test_render_shows_collections_and_names() {
        let backend = TestBackend::new(30, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut list = state(&[("Demo", "counter"), ("Demo", "clock")]);

        terminal
            .draw(|f| StoryList::new(&mut list).render(f, f.area()))
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Stories"));
        assert!(text.contains("DEMO"));
        assert!(text.contains("counter"));
        assert!(text.contains("clock"));
        assert_eq!(list.list_state.selected(), Some(1));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a long story name", 8), "a lon...");
        assert_eq!(truncate_to_width("abcdef", 2), "..");
    }
}
