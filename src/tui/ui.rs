use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ActionsPanel, Preview, StoryList, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};

/// Sidebar width in columns.
const SIDEBAR_WIDTH: u16 = 28;
/// Actions panel height, borders included.
const ACTIONS_HEIGHT: u16 = 6;

pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState, show_actions: bool) {
    use Constraint::{Length, Min};
    let actions_height = if show_actions { ACTIONS_HEIGHT } else { 0 };
    let layout = Layout::vertical([Length(1), Min(0), Length(actions_height)]);
    let [title_area, body_area, actions_area] = layout.areas(frame.area());

    let [sidebar_area, preview_area] =
        Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(body_area);

    TitleBar::new(tui.location(), tui.status_message.clone()).render(frame, title_area);
    StoryList::new(&mut tui.story_list).render(frame, sidebar_area);

    match &tui.mounted {
        Some(mounted) => {
            let tree = mounted.render();
            Preview::new(mounted.flag(), &tree).render(frame, preview_area);
        }
        None => draw_empty_view(frame, preview_area),
    }

    if show_actions {
        ActionsPanel::new(&tui.actions).render(frame, actions_area);
    }
}

fn draw_empty_view(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("No stories registered")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)))
        .centered();
    frame.render_widget(paragraph, area);
}
