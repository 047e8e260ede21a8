//! # Story Picker
//!
//! Composes many stories into one program. The startup flag names the story
//! to run; from then on the picker behaves exactly like that story.
//!
//! ```text
//!                 init(flag)
//!                     │
//!         ┌───────────┴────────────┐
//!   flag found                flag missing
//!         ▼                         ▼
//!   ┌──────────┐             ┌────────────┐
//!   │ Resolved │             │ Unresolved │
//!   │ delegate │             │ placeholder│
//!   │ all calls│             │ drop msgs  │
//!   └──────────┘             └────────────┘
//! ```
//!
//! The choice is made once. There is no transition between the two states
//! afterwards: a host that wants another story starts a new program.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::core::effect::{Cmd, Sub};
use crate::core::program::Program;
use crate::core::story::StoryDefinition;
use crate::core::view::Node;

/// Picker state for the lifetime of one program instance.
///
/// `Resolved` always carries both the story and its model, so a model can
/// never exist without the story that owns it.
pub enum PickerState<Model, Msg> {
    Resolved {
        name: String,
        story: Rc<StoryDefinition<Model, Msg>>,
        model: Model,
    },
    Unresolved {
        name: String,
    },
}

impl<Model, Msg> PickerState<Model, Msg> {
    /// The startup flag, verbatim.
    pub fn active_name(&self) -> &str {
        match self {
            PickerState::Resolved { name, .. } | PickerState::Unresolved { name } => name,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PickerState::Resolved { .. })
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            PickerState::Resolved { model, .. } => Some(model),
            PickerState::Unresolved { .. } => None,
        }
    }
}

impl<Model: fmt::Debug, Msg> fmt::Debug for PickerState<Model, Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerState::Resolved { name, model, .. } => f
                .debug_struct("Resolved")
                .field("name", name)
                .field("model", model)
                .finish(),
            PickerState::Unresolved { name } => {
                f.debug_struct("Unresolved").field("name", name).finish()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// Two stories in one collection share a name.
    DuplicateStory(String),
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::DuplicateStory(name) => write!(f, "duplicate story name: {name}"),
        }
    }
}

impl std::error::Error for PickerError {}

/// A single program that can run any story of its collection.
///
/// Cloning is cheap: the story map is shared.
pub struct StoryPicker<Model, Msg> {
    stories: Rc<HashMap<String, Rc<StoryDefinition<Model, Msg>>>>,
    order: Rc<Vec<String>>,
}

impl<Model, Msg> Clone for StoryPicker<Model, Msg> {
    fn clone(&self) -> Self {
        Self {
            stories: Rc::clone(&self.stories),
            order: Rc::clone(&self.order),
        }
    }
}

impl<Model, Msg> StoryPicker<Model, Msg> {
    /// Build the picker. When two stories share a name the later one wins.
    pub fn new(stories: impl IntoIterator<Item = StoryDefinition<Model, Msg>>) -> Self {
        let mut map = HashMap::new();
        let mut order = Vec::new();
        for story in stories {
            let name = story.name().to_string();
            if map.insert(name.clone(), Rc::new(story)).is_none() {
                order.push(name);
            }
        }
        Self {
            stories: Rc::new(map),
            order: Rc::new(order),
        }
    }

    /// Like [`StoryPicker::new`], but a repeated name is an error.
    pub fn strict(
        stories: impl IntoIterator<Item = StoryDefinition<Model, Msg>>,
    ) -> Result<Self, PickerError> {
        let stories: Vec<_> = stories.into_iter().collect();
        let mut seen = std::collections::HashSet::new();
        for story in &stories {
            if !seen.insert(story.name()) {
                return Err(PickerError::DuplicateStory(story.name().to_string()));
            }
        }
        Ok(Self::new(stories))
    }

    /// Story names in the order they were first authored.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, name: &str) -> Option<&StoryDefinition<Model, Msg>> {
        self.stories.get(name).map(|story| story.as_ref())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<Model, Msg> Program for StoryPicker<Model, Msg> {
    type Flags = String;
    type Model = PickerState<Model, Msg>;
    type Msg = Msg;

    fn init(&self, flag: String) -> (Self::Model, Cmd<Msg>) {
        match self.stories.get(&flag) {
            Some(story) => {
                let (model, cmd) = story.behavior().init();
                let state = PickerState::Resolved {
                    name: flag,
                    story: Rc::clone(story),
                    model,
                };
                (state, cmd)
            }
            None => (PickerState::Unresolved { name: flag }, Cmd::none()),
        }
    }

    fn update(&self, msg: Msg, state: Self::Model) -> (Self::Model, Cmd<Msg>) {
        match state {
            PickerState::Resolved { name, story, model } => {
                let (model, cmd) = story.behavior().update(msg, model);
                (PickerState::Resolved { name, story, model }, cmd)
            }
            unresolved @ PickerState::Unresolved { .. } => (unresolved, Cmd::none()),
        }
    }

    fn view(&self, state: &Self::Model) -> Node<Msg> {
        match state {
            PickerState::Resolved { story, model, .. } => story.view(model),
            PickerState::Unresolved { name } => Node::Text(format!("Story {} not found", name)),
        }
    }

    fn subscriptions(&self, state: &Self::Model) -> Sub<Msg> {
        match state {
            PickerState::Resolved { story, model, .. } => story.behavior().subscriptions(model),
            PickerState::Unresolved { .. } => Sub::none(),
        }
    }
}
