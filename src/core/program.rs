//! # Program Model
//!
//! The contract every interactive program exposes to a host runtime:
//!
//! ```text
//! Flags ──► init ──► (Model, Cmd)
//!                       │
//!     Msg ──► update(msg, model) ──► (Model, Cmd)
//!                       │
//!            view(&model) ──► Node<Msg>
//!   subscriptions(&model) ──► Sub<Msg>
//! ```
//!
//! `Flags` are supplied once, at startup. Everything after that is driven by
//! messages. None of these callbacks perform I/O.

use crate::core::effect::{Cmd, Sub};
use crate::core::view::Node;

pub trait Program {
    /// Startup parameter handed over by the host.
    type Flags;
    type Model;
    type Msg;

    fn init(&self, flags: Self::Flags) -> (Self::Model, Cmd<Self::Msg>);

    fn update(&self, msg: Self::Msg, model: Self::Model) -> (Self::Model, Cmd<Self::Msg>);

    fn view(&self, model: &Self::Model) -> Node<Self::Msg>;

    fn subscriptions(&self, model: &Self::Model) -> Sub<Self::Msg>;
}
