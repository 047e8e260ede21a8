//! # TUI Components
//!
//! UI components for the story explorer.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: Top status bar showing the mounted story and status
//! - `Preview`: The mounted story's render tree
//! - `ActionsPanel`: Values stories sent on the `actions` port
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `StoryList`: Sidebar of registered stories, grouped by collection
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props, never by reaching into
//! `TuiState` themselves:
//!
//! ```rust,ignore
//! Preview::new(mounted.flag(), &tree).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs      (Top status bar)
//! ├── story_list.rs     (Sidebar with collection headers)
//! ├── preview.rs        (Render tree to styled lines)
//! └── actions_panel.rs  (Outbound port log)
//! ```

mod actions_panel;
mod preview;
pub mod story_list;
mod title_bar;

pub use actions_panel::ActionsPanel;
pub use preview::{Preview, node_lines};
pub use story_list::{StoryList, StoryListEvent, StoryListState};
pub use title_bar::TitleBar;
