//! # Core
//!
//! The story picker and everything needed to run it. It knows nothing about
//! any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Program (contract)   │
//!                    │  • StoryPicker          │
//!                    │  • Runtime (scheduler)  │
//!                    │  • register_stories()   │
//!                    └───────────┬─────────────┘
//!                                │ Box<dyn Mounted>
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │   Tests    │      │   Other    │
//!     │  Explorer  │      │ (StoryBook)│      │ Explorers  │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`program`]: the `Program` trait every runnable program implements
//! - [`effect`]: `Cmd` and `Sub`, descriptions of work and signal sources
//! - [`view`]: the `Node` render tree
//! - [`story`]: story definitions and the stateful/stateless builders
//! - [`picker`]: `StoryPicker`, one program over many stories
//! - [`runtime`]: drives a program instance and interprets its effects
//! - [`ports`]: named side channels between programs and their host
//! - [`registry`]: registers stories into an explorer
//! - [`config`]: settings for the explorer binary

pub mod config;
pub mod effect;
pub mod picker;
pub mod ports;
pub mod program;
pub mod registry;
pub mod runtime;
pub mod story;
pub mod view;
