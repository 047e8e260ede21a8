//! # TUI Adapter
//!
//! The ratatui-specific host. Lists registered stories, mounts the selected
//! one, draws its render tree and forwards key presses to it.
//!
//! This is the only module that knows about ratatui and crossterm. The
//! core runtime sees nothing but `Mounted::press` and `Mounted::tick`.
//!
//! ## Loop
//!
//! Each iteration draws, waits up to `tick_ms` for one event, handles it,
//! then ticks the mounted instance so timers, intervals and inbound port
//! values make progress even when no key is pressed.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use serde_json::json;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::core::config::ResolvedConfig;
use crate::core::ports::{ChannelPort, SentValue};
use crate::core::registry::StoryBook;
use crate::core::runtime::Mounted;
use crate::tui::component::EventHandler;
use crate::tui::components::{StoryListEvent, StoryListState};
use crate::tui::event::{TuiEvent, poll_event_timeout};

/// Most recent outbound values kept for the actions panel.
const MAX_ACTIONS: usize = 50;

/// TUI-specific presentation state
pub struct TuiState {
    pub story_list: StoryListState,
    /// Instance of the selected story. `None` only when the book is empty.
    pub mounted: Option<Box<dyn Mounted>>,
    pub status_message: String,
    pub actions: Vec<SentValue>,
    ping_seq: u64,
}

impl TuiState {
    /// Select `initial_story` (by name, in any collection) or the first entry,
    /// and mount it.
    pub fn new(book: &StoryBook, initial_story: Option<&str>) -> Self {
        let mut story_list = StoryListState::new(book);
        let start = initial_story
            .and_then(|name| book.position_by_name(name))
            .unwrap_or(0);
        story_list.select(start);

        let status_message = match initial_story {
            Some(name) if book.position_by_name(name).is_none() => {
                format!("Story {name} not registered")
            }
            _ => String::new(),
        };

        let mut tui = Self {
            story_list,
            mounted: None,
            status_message,
            actions: Vec::new(),
            ping_seq: 0,
        };
        tui.mount(book, start);
        tui
    }

    /// Replace the mounted instance with a fresh one for entry `index`.
    pub fn mount(&mut self, book: &StoryBook, index: usize) {
        self.mounted = book.mount(index);
        if let Some(mounted) = &self.mounted {
            info!(
                "Mounted {} (instance {})",
                mounted.flag(),
                mounted.instance_id()
            );
        }
    }

    /// `collection / story` of the selected entry.
    pub fn location(&self) -> Option<String> {
        self.story_list
            .selected_row()
            .map(|row| format!("{} / {}", row.collection, row.name))
    }

    /// Apply one event. Returns `true` when the explorer should quit.
    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        book: &StoryBook,
        inbound: &ChannelPort,
    ) -> bool {
        match event {
            TuiEvent::Quit => return true,
            TuiEvent::Resize => {}
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                if let Some(StoryListEvent::Select(index)) = self.story_list.handle_event(event) {
                    self.mount(book, index);
                    self.status_message.clear();
                }
            }
            TuiEvent::Reload => {
                self.mount(book, self.story_list.selected);
                if let Some(mounted) = &self.mounted {
                    self.status_message = format!("Reloaded {}", mounted.flag());
                }
            }
            TuiEvent::EmitPing => {
                self.ping_seq += 1;
                let delivered = inbound.emit(json!({ "ping": self.ping_seq }));
                self.status_message = format!("Ping {} delivered to {delivered}", self.ping_seq);
            }
            TuiEvent::Key(c) => {
                if let Some(mounted) = self.mounted.as_mut() {
                    if mounted.press(*c) {
                        self.status_message.clear();
                    } else {
                        debug!("No binding for {c:?} in {}", mounted.flag());
                        self.status_message = format!("No binding for '{c}'");
                    }
                }
            }
        }
        false
    }

    /// Advance the mounted instance and collect what it sent on `actions`.
    pub fn tick(&mut self, now: Instant, actions: &ChannelPort) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.tick(now);
        }
        self.actions.extend(actions.take_sent());
        if self.actions.len() > MAX_ACTIONS {
            let excess = self.actions.len() - MAX_ACTIONS;
            self.actions.drain(..excess);
        }
    }
}

pub fn run(
    config: &ResolvedConfig,
    book: &StoryBook,
    actions: Rc<ChannelPort>,
    inbound: Rc<ChannelPort>,
) -> std::io::Result<()> {
    let mut tui = TuiState::new(book, config.initial_story.as_deref());
    let timeout = Duration::from_millis(config.tick_ms);

    let mut terminal = ratatui::init();
    info!("Explorer started with {} stories", book.len());

    let result = (|| -> std::io::Result<()> {
        loop {
            terminal.draw(|f| ui::draw_ui(f, &mut tui, config.show_actions))?;

            if let Some(event) = poll_event_timeout(timeout)
                && tui.handle_event(&event, book, &inbound)
            {
                break;
            }
            tui.tick(Instant::now(), &actions);
        }
        Ok(())
    })();

    ratatui::restore();
    info!("Explorer stopped");
    result
}
