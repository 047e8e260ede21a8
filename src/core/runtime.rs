//! # Runtime
//!
//! Drives one [`Program`] instance: runs `init`, feeds messages through
//! `update`, and interprets the [`Cmd`] and [`Sub`] values the program
//! hands back. Single-threaded; the host calls [`Runtime::tick`] from its
//! own loop.
//!
//! ```text
//! Runtime
//! ├── model              // current program model
//! ├── queue              // messages waiting for update()
//! ├── timers             // (due, msg) from Cmd::after
//! ├── intervals          // next due time per Sub::every interval (None = never)
//! ├── ports              // side ports wired at mount time
//! └── inbox              // host → program port values
//! ```
//!
//! [`Mounted`] erases the program's types so a host can hold instances of
//! any program side by side.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::effect::{Cmd, Effect, EventSource, Sub};
use crate::core::ports::{PortInbox, PortMessage, SidePorts};
use crate::core::program::Program;
use crate::core::view::Node;

/// Upper bound on messages processed in one drain. Guards against programs
/// that answer every message with another `Cmd::msg`.
pub const MAX_DISPATCH_PER_DRAIN: usize = 1000;

/// A running program instance as seen by a host that only draws and forwards keys.
pub trait Mounted {
    fn instance_id(&self) -> Uuid;

    /// The startup flag this instance was created with.
    fn flag(&self) -> &str;

    fn render(&self) -> Node<()>;

    /// Dispatch the message bound to `key` in the current view, if any.
    fn press(&mut self, key: char) -> bool;

    /// Fire due timers and intervals, then deliver inbound port values.
    fn tick(&mut self, now: Instant);
}

pub struct Runtime<P: Program> {
    program: P,
    flag: String,
    instance_id: Uuid,
    model: Option<P::Model>,
    queue: VecDeque<P::Msg>,
    timers: Vec<(Instant, P::Msg)>,
    intervals: HashMap<Duration, Option<Instant>>,
    ports: SidePorts,
    inbox: mpsc::Receiver<PortMessage>,
    /// Inboxes handed to ports stay live only while this is held.
    _alive: Rc<()>,
}

impl<P: Program> Runtime<P> {
    /// Start an instance: run `init`, connect `ports`, drain the initial commands.
    pub fn new(program: P, flags: P::Flags, ports: SidePorts) -> Self
    where
        P::Flags: fmt::Display,
    {
        let flag = flags.to_string();
        let instance_id = Uuid::new_v4();
        info!("Mounting instance {} with flag {:?}", instance_id, flag);

        let (tx, inbox) = mpsc::channel();
        let alive = Rc::new(());
        for (name, port) in &ports {
            port.subscribe(PortInbox::new(name.clone(), tx.clone(), Rc::downgrade(&alive)));
        }

        let (model, cmd) = program.init(flags);
        let mut runtime = Self {
            program,
            flag,
            instance_id,
            model: Some(model),
            queue: VecDeque::new(),
            timers: Vec::new(),
            intervals: HashMap::new(),
            ports,
            inbox,
            _alive: alive,
        };
        let now = Instant::now();
        runtime.perform(cmd, now);
        runtime.drain();
        runtime.sync_intervals(now);
        runtime
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn model(&self) -> Option<&P::Model> {
        self.model.as_ref()
    }

    pub fn view(&self) -> Node<P::Msg> {
        match &self.model {
            Some(model) => self.program.view(model),
            None => Node::Text(String::new()),
        }
    }

    pub fn subscriptions(&self) -> Sub<P::Msg> {
        match &self.model {
            Some(model) => self.program.subscriptions(model),
            None => Sub::none(),
        }
    }

    /// Timers scheduled by `Cmd::after` that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Run `msg` through `update` and everything it triggers.
    pub fn dispatch(&mut self, msg: P::Msg) {
        self.queue.push_back(msg);
        self.drain();
    }

    pub fn press(&mut self, key: char) -> bool
    where
        P::Msg: Clone,
    {
        match self.view().find_key(key).cloned() {
            Some(msg) => {
                debug!("Instance {}: key {:?} bound", self.instance_id, key);
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.fire_timers(now);
        self.fire_intervals(now);
        self.deliver_port_values();
    }

    fn fire_timers(&mut self, now: Instant) {
        if self.timers.is_empty() {
            return;
        }
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(at, _)| *at <= now);
        self.timers = pending;
        due.sort_by_key(|(at, _)| *at);
        for (_, msg) in due {
            self.dispatch(msg);
        }
    }

    fn fire_intervals(&mut self, now: Instant) {
        self.sync_intervals(now);
        let due: Vec<Duration> = self
            .intervals
            .iter()
            .filter(|(_, at)| at.is_some_and(|at| at <= now))
            .map(|(interval, _)| *interval)
            .collect();
        if due.is_empty() {
            return;
        }

        let fired_at = Local::now();
        let msgs: Vec<P::Msg> = self
            .subscriptions()
            .sources()
            .iter()
            .filter_map(|source| match source {
                EventSource::Every { interval, tagger } if due.contains(interval) => {
                    Some(tagger(fired_at))
                }
                _ => None,
            })
            .collect();
        for interval in due {
            self.intervals.insert(interval, now.checked_add(interval));
        }
        for msg in msgs {
            self.dispatch(msg);
        }
    }

    fn deliver_port_values(&mut self) {
        while let Ok(PortMessage { port, value }) = self.inbox.try_recv() {
            let msgs: Vec<P::Msg> = self
                .subscriptions()
                .sources()
                .iter()
                .filter_map(|source| match source {
                    EventSource::Port { name, tagger } if *name == port => {
                        Some(tagger(value.clone()))
                    }
                    _ => None,
                })
                .collect();
            if msgs.is_empty() {
                debug!(
                    "Instance {}: no subscriber for port {:?}, value dropped",
                    self.instance_id, port
                );
            }
            for msg in msgs {
                self.dispatch(msg);
            }
        }
    }

    /// Track the intervals the current model subscribes to. New intervals
    /// start counting from `now`; dropped ones are forgotten.
    fn sync_intervals(&mut self, now: Instant) {
        let wanted: Vec<Duration> = self
            .subscriptions()
            .sources()
            .iter()
            .filter_map(|source| match source {
                EventSource::Every { interval, .. } => Some(*interval),
                EventSource::Port { .. } => None,
            })
            .collect();
        self.intervals.retain(|interval, _| wanted.contains(interval));
        let instance_id = self.instance_id;
        for interval in wanted {
            self.intervals.entry(interval).or_insert_with(|| {
                let due = now.checked_add(interval);
                if due.is_none() {
                    warn!("Instance {}: interval {:?} never elapses", instance_id, interval);
                }
                due
            });
        }
    }

    fn drain(&mut self) {
        let mut processed = 0;
        while let Some(msg) = self.queue.pop_front() {
            if processed == MAX_DISPATCH_PER_DRAIN {
                warn!(
                    "Instance {}: dropped {} queued messages after {} dispatches",
                    self.instance_id,
                    self.queue.len() + 1,
                    MAX_DISPATCH_PER_DRAIN
                );
                self.queue.clear();
                break;
            }
            processed += 1;
            self.step(msg);
        }
    }

    fn step(&mut self, msg: P::Msg) {
        let Some(model) = self.model.take() else {
            return;
        };
        let (model, cmd) = self.program.update(msg, model);
        self.model = Some(model);
        self.perform(cmd, Instant::now());
    }

    fn perform(&mut self, cmd: Cmd<P::Msg>, now: Instant) {
        for effect in cmd.into_effects() {
            match effect {
                Effect::Dispatch(msg) => self.queue.push_back(msg),
                Effect::Delay { after, msg } => match now.checked_add(after) {
                    Some(due) => self.timers.push((due, msg)),
                    None => warn!(
                        "Instance {}: delay {:?} never elapses, message dropped",
                        self.instance_id, after
                    ),
                },
                Effect::Port { name, value } => match self.ports.get(&name) {
                    Some(port) => port.send(value),
                    None => warn!(
                        "Instance {}: no port named {:?}, value dropped",
                        self.instance_id, name
                    ),
                },
            }
        }
    }
}

impl<P> Mounted for Runtime<P>
where
    P: Program,
    P::Msg: Clone,
{
    fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    fn flag(&self) -> &str {
        &self.flag
    }

    fn render(&self) -> Node<()> {
        self.view().without_handlers()
    }

    fn press(&mut self, key: char) -> bool {
        Runtime::press(self, key)
    }

    fn tick(&mut self, now: Instant) {
        Runtime::tick(self, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::picker::StoryPicker;
    use crate::core::ports::ChannelPort;
    use crate::core::story::{StoryBehavior, stateful};
    use crate::core::view::text;
    use crate::test_support::{TestModel, TestMsg, busy_story, counter_story};
    use serde_json::json;
    use std::rc::Rc;

    fn picker() -> StoryPicker<TestModel, TestMsg> {
        StoryPicker::new([counter_story("counter", 0), busy_story("busy")])
    }

    fn count<P>(runtime: &Runtime<P>) -> Option<i64>
    where
        P: Program<Model = crate::core::picker::PickerState<TestModel, TestMsg>>,
    {
        runtime.model().and_then(|s| s.model()).map(|m| m.count)
    }

    #[test]
    fn test_init_commands_are_drained() {
        let out = Rc::new(ChannelPort::new());
        let mut ports = SidePorts::new();
        ports.insert("out".to_string(), out.clone());

        let runtime = Runtime::new(picker(), "busy".to_string(), ports);
        assert_eq!(count(&runtime), Some(1));
        let sent: Vec<_> = out.sent().into_iter().map(|s| s.value).collect();
        assert_eq!(sent, vec![json!("booted")]);
    }

    #[test]
    fn test_press_dispatches_bound_message() {
        let mut runtime = Runtime::new(picker(), "busy".to_string(), SidePorts::new());
        assert!(runtime.press('+'));
        assert!(runtime.press('+'));
        assert!(runtime.press('-'));
        assert!(!runtime.press('x'));
        assert_eq!(count(&runtime), Some(2));
        assert_eq!(runtime.view().text_content().lines().next(), Some("Count: 2"));
    }

    #[test]
    fn test_delayed_message_fires_on_tick() {
        let mut runtime = Runtime::new(picker(), "busy".to_string(), SidePorts::new());
        runtime.press('r');
        assert_eq!(runtime.pending_timers(), 1);

        runtime.tick(Instant::now());
        assert_eq!(count(&runtime), Some(1));

        runtime.tick(Instant::now() + Duration::from_secs(2));
        assert_eq!(count(&runtime), Some(0));
        assert_eq!(runtime.pending_timers(), 0);
    }

    #[test]
    fn test_interval_fires_once_per_due_tick() {
        let mut runtime = Runtime::new(picker(), "busy".to_string(), SidePorts::new());
        let base = Instant::now();
        runtime.tick(base + Duration::from_secs(2));
        runtime.tick(base + Duration::from_secs(2));
        runtime.tick(base + Duration::from_secs(4));
        let ticks = runtime.model().and_then(|s| s.model()).map(|m| m.ticks);
        assert_eq!(ticks, Some(2));
    }

    #[test]
    fn test_inbound_port_values_reach_subscribers() {
        let inbound = Rc::new(ChannelPort::new());
        let mut ports = SidePorts::new();
        ports.insert("in".to_string(), inbound.clone());

        let mut runtime = Runtime::new(picker(), "busy".to_string(), ports);
        assert_eq!(inbound.emit(json!({"ping": 7})), 1);
        runtime.tick(Instant::now());

        let received = runtime
            .model()
            .and_then(|s| s.model())
            .map(|m| m.received.clone());
        assert_eq!(received, Some(vec![json!({"ping": 7})]));
    }

    #[test]
    fn test_inbound_values_without_subscriber_are_dropped() {
        let inbound = Rc::new(ChannelPort::new());
        let mut ports = SidePorts::new();
        ports.insert("in".to_string(), inbound.clone());

        let mut runtime = Runtime::new(picker(), "counter".to_string(), ports);
        inbound.emit(json!(1));
        runtime.tick(Instant::now());
        assert_eq!(count(&runtime), Some(0));
    }

    #[test]
    fn test_outgoing_to_unknown_port_is_dropped() {
        let mut runtime = Runtime::new(picker(), "busy".to_string(), SidePorts::new());
        assert!(runtime.press('p'));
        assert_eq!(count(&runtime), Some(1));
    }

    #[test]
    fn test_unresolved_instance_renders_placeholder() {
        let mut runtime = Runtime::new(picker(), "ghost".to_string(), SidePorts::new());
        assert!(!runtime.press('+'));
        runtime.tick(Instant::now() + Duration::from_secs(5));
        let mounted: &dyn Mounted = &runtime;
        assert_eq!(mounted.flag(), "ghost");
        assert_eq!(mounted.render(), Node::Text("Story ghost not found".to_string()));
    }

    #[test]
    fn test_instances_get_distinct_ids() {
        let a = Runtime::new(picker(), "counter".to_string(), SidePorts::new());
        let b = Runtime::new(picker(), "counter".to_string(), SidePorts::new());
        assert_ne!(a.instance_id(), b.instance_id());
    }

    /// A single-story picker with the given init command and subscriptions.
    fn single(
        init_cmd: fn() -> Cmd<TestMsg>,
        subs: fn(&TestModel) -> Sub<TestMsg>,
        follow_up: fn() -> Cmd<TestMsg>,
    ) -> StoryPicker<TestModel, TestMsg> {
        let behavior = StoryBehavior::new(
            move || (TestModel::default(), init_cmd()),
            move |msg: TestMsg, mut model: TestModel| {
                match msg {
                    TestMsg::Increment => model.count += 1,
                    TestMsg::Tick => model.ticks += 1,
                    _ => {}
                }
                (model, follow_up())
            },
            subs,
        );
        StoryPicker::new([stateful("single", behavior, |m: &TestModel| {
            text(format!("{} {}", m.count, m.ticks))
        })])
    }

    #[test]
    fn test_endless_delay_never_fires() {
        let program = single(
            || Cmd::after(Duration::MAX, TestMsg::Increment),
            |_| Sub::none(),
            Cmd::none,
        );
        let mut runtime = Runtime::new(program, "single".to_string(), SidePorts::new());
        assert_eq!(runtime.pending_timers(), 0);

        runtime.tick(Instant::now() + Duration::from_secs(3600));
        assert_eq!(count(&runtime), Some(0));
    }

    #[test]
    fn test_endless_interval_never_fires() {
        let program = single(
            Cmd::none,
            |_| Sub::every(Duration::MAX, |_| TestMsg::Tick),
            Cmd::none,
        );
        let mut runtime = Runtime::new(program, "single".to_string(), SidePorts::new());
        runtime.tick(Instant::now() + Duration::from_secs(3600));
        runtime.tick(Instant::now() + Duration::from_secs(7200));

        let ticks = runtime.model().and_then(|s| s.model()).map(|m| m.ticks);
        assert_eq!(ticks, Some(0));
    }

    #[test]
    fn test_runaway_dispatch_is_capped_per_drain() {
        let program = single(
            || Cmd::msg(TestMsg::Increment),
            |_| Sub::none(),
            || Cmd::msg(TestMsg::Increment),
        );
        let mut runtime = Runtime::new(program, "single".to_string(), SidePorts::new());
        assert_eq!(count(&runtime), Some(MAX_DISPATCH_PER_DRAIN as i64));

        runtime.dispatch(TestMsg::Increment);
        assert_eq!(count(&runtime), Some(2 * MAX_DISPATCH_PER_DRAIN as i64));
    }

    #[test]
    fn test_dropped_instances_leave_no_inboxes() {
        let actions = Rc::new(ChannelPort::new());
        let mut ports = SidePorts::new();
        ports.insert("actions".to_string(), actions.clone());

        for _ in 0..100 {
            drop(Runtime::new(picker(), "counter".to_string(), ports.clone()));
        }
        assert_eq!(actions.subscriber_count(), 0);

        let _live = Runtime::new(picker(), "counter".to_string(), ports);
        assert_eq!(actions.subscriber_count(), 1);
    }
}
