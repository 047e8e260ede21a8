//! # Demo Stories
//!
//! The collection the `storydeck` binary ships with. All stories share
//! [`DemoModel`] and [`DemoMsg`], and run through one [`StoryPicker`].
//!
//! | Story       | Shows                                             |
//! |-------------|---------------------------------------------------|
//! | `h1`        | stateless render tree                             |
//! | `counter`   | sandbox state machine driven by keys              |
//! | `clock`     | `Sub::every` interval                             |
//! | `echo`      | outgoing `actions` port, inbound `inbound` port   |
//! | `countdown` | chained `Cmd::after` timers                       |

use std::time::Duration;

use chrono::{DateTime, Local};
use serde_json::{Value, json};

use crate::core::effect::{Cmd, Sub};
use crate::core::picker::StoryPicker;
use crate::core::ports::SidePorts;
use crate::core::registry::{
    CompiledApp, ENTRY_POINT, Explorer, RegistrationError, entry_point, register_stories,
};
use crate::core::story::{StoryBehavior, StoryDefinition, stateful, stateless};
use crate::core::view::{Node, button, div, h1, p};

/// Programs send on this port; the explorer shows what arrives.
pub const ACTIONS_PORT: &str = "actions";
/// The explorer pushes values into programs through this port.
pub const INBOUND_PORT: &str = "inbound";

const COUNTDOWN_FROM: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoModel {
    pub count: i64,
    pub last_tick: Option<String>,
    pub remaining: Option<u32>,
    pub received: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DemoMsg {
    Increment,
    Decrement,
    Reset,
    Tick(DateTime<Local>),
    Send,
    Received(Value),
    StartCountdown,
    CountdownStep,
}

fn heading() -> StoryDefinition<DemoModel, DemoMsg> {
    stateless("h1", h1("Hello from storydeck"))
}

fn counter() -> StoryDefinition<DemoModel, DemoMsg> {
    let update = |msg: DemoMsg, mut model: DemoModel| {
        match msg {
            DemoMsg::Increment => model.count += 1,
            DemoMsg::Decrement => model.count -= 1,
            DemoMsg::Reset => model.count = 0,
            _ => {}
        }
        model
    };
    let behavior = StoryBehavior::sandbox(DemoModel::default(), update);
    stateful("counter", behavior, |model| {
        div(vec![
            h1("Counter"),
            p(format!("Count: {}", model.count)),
            button("increment", '+', DemoMsg::Increment),
            button("decrement", '-', DemoMsg::Decrement),
            button("reset", '0', DemoMsg::Reset),
        ])
    })
}

fn clock() -> StoryDefinition<DemoModel, DemoMsg> {
    let behavior = StoryBehavior::new(
        || (DemoModel::default(), Cmd::none()),
        |msg: DemoMsg, mut model: DemoModel| {
            if let DemoMsg::Tick(at) = msg {
                model.last_tick = Some(at.format("%H:%M:%S").to_string());
            }
            (model, Cmd::none())
        },
        |_| Sub::every(Duration::from_secs(1), DemoMsg::Tick),
    );
    stateful("clock", behavior, |model| {
        let time = model
            .last_tick
            .clone()
            .unwrap_or_else(|| "waiting for first tick".to_string());
        div(vec![h1("Clock"), p(time)])
    })
}

fn echo() -> StoryDefinition<DemoModel, DemoMsg> {
    let behavior = StoryBehavior::new(
        || (DemoModel::default(), Cmd::none()),
        |msg: DemoMsg, mut model: DemoModel| match msg {
            DemoMsg::Increment => {
                model.count += 1;
                (model, Cmd::none())
            }
            DemoMsg::Send => {
                let cmd = Cmd::port(ACTIONS_PORT, json!({ "count": model.count }));
                (model, cmd)
            }
            DemoMsg::Received(value) => {
                model.received.push(value);
                (model, Cmd::none())
            }
            _ => (model, Cmd::none()),
        },
        |_| Sub::port(INBOUND_PORT, DemoMsg::Received),
    );
    stateful("echo", behavior, |model| {
        let mut children = vec![
            h1("Echo"),
            p(format!("Count: {}", model.count)),
            button("increment", '+', DemoMsg::Increment),
            button(format!("send to {ACTIONS_PORT}"), 's', DemoMsg::Send),
        ];
        if model.received.is_empty() {
            children.push(p(format!("Nothing received on {INBOUND_PORT} yet")));
        } else {
            children.extend(
                model
                    .received
                    .iter()
                    .map(|value| p(format!("received: {value}"))),
            );
        }
        div(children)
    })
}

fn countdown() -> StoryDefinition<DemoModel, DemoMsg> {
    let step = || Cmd::after(Duration::from_secs(1), DemoMsg::CountdownStep);
    let behavior = StoryBehavior::new(
        || (DemoModel::default(), Cmd::none()),
        move |msg: DemoMsg, mut model: DemoModel| match msg {
            DemoMsg::StartCountdown if model.remaining.is_none() => {
                model.remaining = Some(COUNTDOWN_FROM);
                (model, step())
            }
            DemoMsg::CountdownStep => match model.remaining {
                Some(n) if n > 1 => {
                    model.remaining = Some(n - 1);
                    (model, step())
                }
                _ => {
                    model.remaining = None;
                    model.count += 1;
                    (model, Cmd::none())
                }
            },
            _ => (model, Cmd::none()),
        },
        |_| Sub::none(),
    );
    stateful("countdown", behavior, |model| {
        let status: Node<DemoMsg> = match model.remaining {
            Some(n) => p(format!("T-minus {n}")),
            None => p(format!("Launches so far: {}", model.count)),
        };
        div(vec![h1("Countdown"), status, button("launch", 'g', DemoMsg::StartCountdown)])
    })
}

/// The demo picker, stories in display order.
pub fn picker() -> StoryPicker<DemoModel, DemoMsg> {
    StoryPicker::new([heading(), counter(), clock(), echo(), countdown()])
}

pub fn story_names() -> Vec<String> {
    picker().names().to_vec()
}

/// The demo picker exposed under [`ENTRY_POINT`].
pub fn compiled_app() -> CompiledApp {
    CompiledApp::new().with_entry(ENTRY_POINT, entry_point(picker()))
}

/// Register every demo story into `explorer` under `collection`.
pub fn register<E: Explorer + ?Sized>(
    explorer: &mut E,
    collection: &str,
    ports: SidePorts,
) -> Result<usize, RegistrationError> {
    register_stories(
        explorer,
        collection,
        module_path!(),
        &compiled_app(),
        &story_names(),
        Some(ports),
    )
}
