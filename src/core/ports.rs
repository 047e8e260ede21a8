//! # Side Ports
//!
//! Named two-way channels between a running program and its host, outside
//! the normal message loop.
//!
//! ```text
//!   program ── Cmd::port("actions", v) ──► SidePort::send(v) ──► host
//!   host ── ChannelPort::emit(v) ──► PortInbox ──► Sub::port("inbound", ..) ──► program
//! ```
//!
//! A port learns where to deliver host values when the runtime calls
//! `subscribe` with an inbox for the instance being mounted.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::mpsc;

use chrono::{DateTime, Local};
use log::debug;
use serde_json::Value;

/// A value pushed by the host into one named port.
#[derive(Debug, Clone, PartialEq)]
pub struct PortMessage {
    pub port: String,
    pub value: Value,
}

/// Delivery handle for one port of one running instance.
///
/// `alive` stays upgradable only while the instance exists, so ports can drop
/// stale inboxes without pushing anything through them.
#[derive(Debug, Clone)]
pub struct PortInbox {
    port: String,
    tx: mpsc::Sender<PortMessage>,
    alive: Weak<()>,
}

impl PortInbox {
    pub fn new(port: impl Into<String>, tx: mpsc::Sender<PortMessage>, alive: Weak<()>) -> Self {
        Self {
            port: port.into(),
            tx,
            alive,
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn is_live(&self) -> bool {
        self.alive.strong_count() > 0
    }

    /// Queue a value for the instance. Returns false once the instance is gone.
    pub fn push(&self, value: Value) -> bool {
        self.tx
            .send(PortMessage {
                port: self.port.clone(),
                value,
            })
            .is_ok()
    }
}

pub trait SidePort {
    /// Hand the port a way to reach a newly mounted instance.
    fn subscribe(&self, inbox: PortInbox);

    /// Receive a value the program sent out.
    fn send(&self, value: Value);
}

/// Ports wired into an instance, keyed by port name.
pub type SidePorts = HashMap<String, Rc<dyn SidePort>>;

/// A value a program sent out, stamped on arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct SentValue {
    pub at: DateTime<Local>,
    pub value: Value,
}

/// In-memory port: records what programs send and broadcasts what the host emits.
#[derive(Default)]
pub struct ChannelPort {
    sent: RefCell<Vec<SentValue>>,
    inboxes: RefCell<Vec<PortInbox>>,
}

impl ChannelPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentValue> {
        self.sent.borrow().clone()
    }

    pub fn take_sent(&self) -> Vec<SentValue> {
        self.sent.borrow_mut().drain(..).collect()
    }

    /// Deliver `value` to every live subscriber. Returns how many received it.
    pub fn emit(&self, value: Value) -> usize {
        let mut inboxes = self.inboxes.borrow_mut();
        inboxes.retain(|inbox| inbox.is_live() && inbox.push(value.clone()));
        inboxes.len()
    }

    /// Instances currently mounted with this port wired in.
    pub fn subscriber_count(&self) -> usize {
        self.inboxes.borrow().iter().filter(|inbox| inbox.is_live()).count()
    }
}

impl SidePort for ChannelPort {
    fn subscribe(&self, inbox: PortInbox) {
        debug!("Port {:?} gained a subscriber", inbox.port());
        let mut inboxes = self.inboxes.borrow_mut();
        inboxes.retain(PortInbox::is_live);
        inboxes.push(inbox);
    }

    fn send(&self, value: Value) {
        self.sent.borrow_mut().push(SentValue {
            at: Local::now(),
            value,
        });
    }
}
