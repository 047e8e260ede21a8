//! # Effects and Event Sources
//!
//! Programs never do I/O themselves. `update` returns a [`Cmd`] describing
//! work it wants done, and `subscriptions` returns a [`Sub`] describing
//! signals it wants to hear about. The runtime (`core::runtime`) is the only
//! thing that interprets either.
//!
//! ```text
//! update(msg, model) ──► (model, Cmd) ──► runtime drains effects
//!                                           │
//! subscriptions(model) ──► Sub ──► runtime watches sources
//!                                           │
//!                     message re-enters ◄───┘
//! ```

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde_json::Value;

/// One unit of requested work.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<Msg> {
    /// Feed a message back through `update` on the next drain.
    Dispatch(Msg),
    /// Feed a message back once `after` has elapsed.
    Delay { after: Duration, msg: Msg },
    /// Send a value out through the named side port.
    Port { name: String, value: Value },
}

/// An ordered batch of effects. `Cmd::none()` is the empty batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Cmd<Msg> {
    effects: Vec<Effect<Msg>>,
}

impl<Msg> Cmd<Msg> {
    pub fn none() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    pub fn msg(msg: Msg) -> Self {
        Self {
            effects: vec![Effect::Dispatch(msg)],
        }
    }

    pub fn after(after: Duration, msg: Msg) -> Self {
        Self {
            effects: vec![Effect::Delay { after, msg }],
        }
    }

    pub fn port(name: impl Into<String>, value: Value) -> Self {
        Self {
            effects: vec![Effect::Port {
                name: name.into(),
                value,
            }],
        }
    }

    pub fn batch(cmds: impl IntoIterator<Item = Cmd<Msg>>) -> Self {
        Self {
            effects: cmds.into_iter().flat_map(|c| c.effects).collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn effects(&self) -> &[Effect<Msg>] {
        &self.effects
    }

    pub fn into_effects(self) -> Vec<Effect<Msg>> {
        self.effects
    }
}

impl<Msg> Default for Cmd<Msg> {
    fn default() -> Self {
        Self::none()
    }
}

/// Turns a raw signal payload into a program message.
pub type Tagger<T, Msg> = Rc<dyn Fn(T) -> Msg>;

/// One external signal source the runtime watches on the program's behalf.
pub enum EventSource<Msg> {
    /// Fires every `interval` with the current local time.
    Every {
        interval: Duration,
        tagger: Tagger<DateTime<Local>, Msg>,
    },
    /// Fires whenever the host pushes a value into the named side port.
    Port {
        name: String,
        tagger: Tagger<Value, Msg>,
    },
}

impl<Msg> Clone for EventSource<Msg> {
    fn clone(&self) -> Self {
        match self {
            EventSource::Every { interval, tagger } => EventSource::Every {
                interval: *interval,
                tagger: Rc::clone(tagger),
            },
            EventSource::Port { name, tagger } => EventSource::Port {
                name: name.clone(),
                tagger: Rc::clone(tagger),
            },
        }
    }
}

impl<Msg> fmt::Debug for EventSource<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Every { interval, .. } => {
                f.debug_struct("Every").field("interval", interval).finish()
            }
            EventSource::Port { name, .. } => f.debug_struct("Port").field("name", name).finish(),
        }
    }
}

/// The set of event sources a model is currently interested in.
#[derive(Debug, Clone)]
pub struct Sub<Msg> {
    sources: Vec<EventSource<Msg>>,
}

impl<Msg> Sub<Msg> {
    pub fn none() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn every(interval: Duration, tagger: impl Fn(DateTime<Local>) -> Msg + 'static) -> Self {
        Self {
            sources: vec![EventSource::Every {
                interval,
                tagger: Rc::new(tagger),
            }],
        }
    }

    pub fn port(name: impl Into<String>, tagger: impl Fn(Value) -> Msg + 'static) -> Self {
        Self {
            sources: vec![EventSource::Port {
                name: name.into(),
                tagger: Rc::new(tagger),
            }],
        }
    }

    pub fn batch(subs: impl IntoIterator<Item = Sub<Msg>>) -> Self {
        Self {
            sources: subs.into_iter().flat_map(|s| s.sources).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn sources(&self) -> &[EventSource<Msg>] {
        &self.sources
    }
}

impl<Msg> Default for Sub<Msg> {
    fn default() -> Self {
        Self::none()
    }
}
