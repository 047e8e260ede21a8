use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something the explorer draws into a region of the frame.
///
/// Data arrives as struct fields set by the caller (the story list borrows
/// its persistent state, the preview borrows the mounted instance's tree).
/// `render` takes `&mut self` so stateful widgets like the sidebar's
/// `ListState` can be updated while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Persistent component state that reacts to explorer input.
pub trait EventHandler {
    /// What the component reports back to the loop, e.g. a new selection.
    type Event;

    /// `None` when the event was ignored or changed nothing.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
