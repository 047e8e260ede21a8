//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::time::Duration;

use serde_json::{Value, json};

use crate::core::effect::{Cmd, Sub};
use crate::core::story::{StoryBehavior, StoryDefinition, stateful};
use crate::core::view::{Node, button, div, text};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestModel {
    pub count: i64,
    pub ticks: u64,
    pub received: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestMsg {
    Increment,
    Decrement,
    Reset,
    Tick,
    Received(Value),
    /// Sends the current count out through the `out` port.
    Publish,
    /// Schedules a `Reset` one second from now.
    ResetLater,
}

fn update_test_model(msg: TestMsg, mut model: TestModel) -> (TestModel, Cmd<TestMsg>) {
    match msg {
        TestMsg::Increment => model.count += 1,
        TestMsg::Decrement => model.count -= 1,
        TestMsg::Reset => model.count = 0,
        TestMsg::Tick => model.ticks += 1,
        TestMsg::Received(value) => model.received.push(value),
        TestMsg::Publish => {
            let cmd = Cmd::port("out", json!({ "count": model.count }));
            return (model, cmd);
        }
        TestMsg::ResetLater => {
            return (model, Cmd::after(Duration::from_secs(1), TestMsg::Reset));
        }
    }
    (model, Cmd::none())
}

fn count_view(model: &TestModel) -> Node<TestMsg> {
    text(format!("Count: {}", model.count))
}

/// A counter starting at `start`, with no effects on init and no subscriptions.
pub fn counter_story(name: &str, start: i64) -> StoryDefinition<TestModel, TestMsg> {
    stateful(
        name,
        StoryBehavior::new(
            move || {
                (
                    TestModel {
                        count: start,
                        ..Default::default()
                    },
                    Cmd::none(),
                )
            },
            update_test_model,
            |_| Sub::none(),
        ),
        count_view,
    )
}

/// A counter whose init emits a message and a port value, with a one-second
/// tick and an `in` port subscription.
pub fn busy_story(name: &str) -> StoryDefinition<TestModel, TestMsg> {
    stateful(
        name,
        StoryBehavior::new(
            || {
                (
                    TestModel::default(),
                    Cmd::batch([
                        Cmd::msg(TestMsg::Increment),
                        Cmd::port("out", json!("booted")),
                    ]),
                )
            },
            update_test_model,
            |_| {
                Sub::batch([
                    Sub::every(Duration::from_secs(1), |_| TestMsg::Tick),
                    Sub::port("in", TestMsg::Received),
                ])
            },
        ),
        |model| {
            div(vec![
                count_view(model),
                button("+", '+', TestMsg::Increment),
                button("-", '-', TestMsg::Decrement),
                button("publish", 'p', TestMsg::Publish),
                button("reset later", 'r', TestMsg::ResetLater),
            ])
        },
    )
}
