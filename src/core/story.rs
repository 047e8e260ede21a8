//! # Story Definitions
//!
//! A story is a name plus everything needed to run it standalone:
//!
//! ```text
//! StoryDefinition
//! ├── name: String
//! ├── behavior: StoryBehavior
//! │   ├── init()                  -> (Model, Cmd)
//! │   ├── update(msg, model)      -> (Model, Cmd)
//! │   └── subscriptions(&model)   -> Sub
//! └── view(&model)                -> Node<Msg>
//! ```
//!
//! Every story in one picker shares the same `Model` and `Msg` types, which
//! the type parameters enforce. Use [`stateful`] for stories with their own
//! state machine and [`stateless`] for a fixed render tree.

use std::fmt;

use crate::core::effect::{Cmd, Sub};
use crate::core::view::Node;

type InitFn<Model, Msg> = Box<dyn Fn() -> (Model, Cmd<Msg>)>;
type UpdateFn<Model, Msg> = Box<dyn Fn(Msg, Model) -> (Model, Cmd<Msg>)>;
type SubscriptionsFn<Model, Msg> = Box<dyn Fn(&Model) -> Sub<Msg>>;
type ViewFn<Model, Msg> = Box<dyn Fn(&Model) -> Node<Msg>>;

/// The full state-transition contract for one story.
pub struct StoryBehavior<Model, Msg> {
    init: InitFn<Model, Msg>,
    update: UpdateFn<Model, Msg>,
    subscriptions: SubscriptionsFn<Model, Msg>,
}

impl<Model: 'static, Msg: 'static> StoryBehavior<Model, Msg> {
    pub fn new(
        init: impl Fn() -> (Model, Cmd<Msg>) + 'static,
        update: impl Fn(Msg, Model) -> (Model, Cmd<Msg>) + 'static,
        subscriptions: impl Fn(&Model) -> Sub<Msg> + 'static,
    ) -> Self {
        Self {
            init: Box::new(init),
            update: Box::new(update),
            subscriptions: Box::new(subscriptions),
        }
    }

    /// A behavior with no effects and no event sources: just a model and a
    /// pure update.
    pub fn sandbox(initial: Model, update: impl Fn(Msg, Model) -> Model + 'static) -> Self
    where
        Model: Clone,
    {
        Self::new(
            move || (initial.clone(), Cmd::none()),
            move |msg, model| (update(msg, model), Cmd::none()),
            |_| Sub::none(),
        )
    }
}

impl<Model, Msg> StoryBehavior<Model, Msg> {
    pub fn init(&self) -> (Model, Cmd<Msg>) {
        (self.init)()
    }

    pub fn update(&self, msg: Msg, model: Model) -> (Model, Cmd<Msg>) {
        (self.update)(msg, model)
    }

    pub fn subscriptions(&self, model: &Model) -> Sub<Msg> {
        (self.subscriptions)(model)
    }
}

/// A named, independently viewable story. Immutable once built.
pub struct StoryDefinition<Model, Msg> {
    name: String,
    behavior: StoryBehavior<Model, Msg>,
    view: ViewFn<Model, Msg>,
}

impl<Model, Msg> StoryDefinition<Model, Msg> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn behavior(&self) -> &StoryBehavior<Model, Msg> {
        &self.behavior
    }

    pub fn view(&self, model: &Model) -> Node<Msg> {
        (self.view)(model)
    }
}

impl<Model, Msg> fmt::Debug for StoryDefinition<Model, Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A story with its own state machine. Everything is stored as given.
pub fn stateful<Model, Msg>(
    name: impl Into<String>,
    behavior: StoryBehavior<Model, Msg>,
    view: impl Fn(&Model) -> Node<Msg> + 'static,
) -> StoryDefinition<Model, Msg> {
    StoryDefinition {
        name: name.into(),
        behavior,
        view: Box::new(view),
    }
}

/// A story that always renders `tree`.
///
/// The model is `Model::default()` and never changes: messages are ignored,
/// no effects are produced and there are no event sources.
pub fn stateless<Model, Msg>(
    name: impl Into<String>,
    tree: Node<Msg>,
) -> StoryDefinition<Model, Msg>
where
    Model: Default + 'static,
    Msg: Clone + 'static,
{
    let behavior = StoryBehavior::new(
        || (Model::default(), Cmd::none()),
        |_msg, model| (model, Cmd::none()),
        |_| Sub::none(),
    );
    StoryDefinition {
        name: name.into(),
        behavior,
        view: Box::new(move |_| tree.clone()),
    }
}
