use std::rc::Rc;
use std::time::{Duration, Instant};

use serde_json::json;
use storydeck::core::effect::{Cmd, Sub};
use storydeck::core::picker::{PickerError, PickerState, StoryPicker};
use storydeck::core::ports::{ChannelPort, SidePort, SidePorts};
use storydeck::core::program::Program;
use storydeck::core::registry::{
    CompiledApp, ENTRY_POINT, RegistrationError, StoryBook, entry_point, register_stories,
};
use storydeck::core::runtime::{Mounted, Runtime};
use storydeck::core::story::{StoryBehavior, StoryDefinition, stateful, stateless};
use storydeck::core::view::{Node, button, div, h1, p};

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Msg {
    Add(i64),
    Double,
    Announce,
}

type Story = StoryDefinition<i64, Msg>;

/// A counter starting at `start` whose view shows `label` and the value.
fn arithmetic(name: &str, start: i64, label: &'static str) -> Story {
    let behavior = StoryBehavior::new(
        move || (start, Cmd::none()),
        |msg: Msg, n: i64| match msg {
            Msg::Add(k) => (n + k, Cmd::none()),
            Msg::Double => (n * 2, Cmd::none()),
            Msg::Announce => (n, Cmd::port("out", json!(n))),
        },
        |_| Sub::none(),
    );
    stateful(name, behavior, move |n: &i64| {
        div(vec![
            h1(label),
            p(format!("value {n}")),
            button("double", 'd', Msg::Double),
            button("announce", 'a', Msg::Announce),
        ])
    })
}

fn collection() -> Vec<Story> {
    vec![
        arithmetic("small", 1, "Small"),
        arithmetic("large", 1000, "Large"),
        stateless("h1", h1("Static heading")),
    ]
}

/// Run a story's own behavior, without the picker in between.
fn standalone(story: &Story, msgs: &[Msg]) -> i64 {
    let (mut model, _) = story.behavior().init();
    for msg in msgs {
        model = story.behavior().update(msg.clone(), model).0;
    }
    model
}

// ============================================================================
// Picker Properties
// ============================================================================

#[test]
fn test_resolved_first_render_matches_standalone_story() {
    let picker = StoryPicker::new(collection());
    for story in collection() {
        let (state, _) = picker.init(story.name().to_string());
        let (model, _) = story.behavior().init();
        assert!(state.is_resolved());
        assert_eq!(picker.view(&state), story.view(&model), "{}", story.name());
    }
}

#[test]
fn test_unknown_flags_render_placeholder() {
    let picker = StoryPicker::new(collection());
    for flag in ["", "ghost", "Small", "small "] {
        let (state, cmd) = picker.init(flag.to_string());
        assert!(!state.is_resolved());
        assert!(cmd.is_none());
        assert_eq!(
            picker.view(&state).text_content(),
            format!("Story {flag} not found")
        );
    }
}

#[test]
fn test_delegation_matches_direct_update() {
    let picker = StoryPicker::new(collection());
    let msgs = [Msg::Add(3), Msg::Double, Msg::Add(-10), Msg::Announce, Msg::Double];

    for name in ["small", "large"] {
        let (mut state, _) = picker.init(name.to_string());
        for msg in &msgs {
            state = picker.update(msg.clone(), state).0;
        }
        let story = picker.get(name).unwrap();
        assert_eq!(state.model(), Some(&standalone(story, &msgs)));
    }
}

#[test]
fn test_unresolved_ignores_messages() {
    let picker = StoryPicker::new(collection());
    let (state, _) = picker.init("ghost".to_string());
    let before = picker.view(&state);

    let (state, cmd) = picker.update(Msg::Announce, state);
    assert!(cmd.is_none());
    assert_eq!(state.active_name(), "ghost");
    assert_eq!(picker.view(&state), before);
    assert!(picker.subscriptions(&state).is_empty());
}

#[test]
fn test_stateless_story_never_changes() {
    let picker = StoryPicker::new(collection());
    let (state, cmd) = picker.init("h1".to_string());
    assert!(cmd.is_none());
    assert_eq!(state.model(), Some(&0));

    let (state, cmd) = picker.update(Msg::Add(5), state);
    assert!(cmd.is_none());
    assert_eq!(state.model(), Some(&0));
    assert_eq!(picker.view(&state), h1("Static heading"));
    assert!(picker.subscriptions(&state).is_empty());
}

#[test]
fn test_duplicate_names_last_wins() {
    let picker = StoryPicker::new(vec![
        arithmetic("dup", 1, "First"),
        arithmetic("dup", 2, "Second"),
    ]);
    assert_eq!(picker.len(), 1);

    let (state, _) = picker.init("dup".to_string());
    assert!(matches!(state, PickerState::Resolved { model: 2, .. }));
    assert!(picker.view(&state).text_content().contains("Second"));
}

#[test]
fn test_strict_picker_rejects_duplicates() {
    let result = StoryPicker::strict(vec![
        arithmetic("dup", 1, "First"),
        arithmetic("dup", 2, "Second"),
    ]);
    assert!(matches!(result, Err(PickerError::DuplicateStory(name)) if name == "dup"));
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_missing_entry_point_registers_nothing() {
    let mut book = StoryBook::new();
    let app = CompiledApp::new().with_entry("Other", entry_point(StoryPicker::new(collection())));

    let err = register_stories(&mut book, "Demo", "tests", &app, &["small", "large"], None)
        .unwrap_err();

    assert!(book.is_empty());
    assert_eq!(
        err,
        RegistrationError::MissingEntryPoint {
            expected: ENTRY_POINT.to_string(),
            available: vec!["Other".to_string()],
        }
    );
}

#[test]
fn test_registered_entry_mounts_story_with_ports() {
    let out = Rc::new(ChannelPort::new());
    let mut ports = SidePorts::new();
    ports.insert("out".to_string(), out.clone() as Rc<dyn SidePort>);

    let app = CompiledApp::new()
        .with_entry(ENTRY_POINT, entry_point(StoryPicker::new(collection())));
    let mut book = StoryBook::new();
    let names = ["large", "missing"];
    let count = register_stories(&mut book, "Demo", "tests", &app, &names, Some(ports)).unwrap();
    assert_eq!(count, 2);

    let mut mounted = book.mount(0).unwrap();
    assert_eq!(mounted.flag(), "large");
    assert!(mounted.press('d'));
    assert!(mounted.render().text_content().contains("value 2000"));
    assert!(mounted.press('a'));
    assert_eq!(out.sent()[0].value, json!(2000));

    let missing = book.mount(1).unwrap();
    assert_eq!(missing.render(), Node::Text("Story missing not found".to_string()));
}

#[test]
fn test_runtime_fires_delayed_commands() {
    let behavior = StoryBehavior::new(
        || (0i64, Cmd::after(Duration::from_millis(50), Msg::Add(7))),
        |msg: Msg, n: i64| match msg {
            Msg::Add(k) => (n + k, Cmd::none()),
            _ => (n, Cmd::none()),
        },
        |_| Sub::none(),
    );
    let picker = StoryPicker::new(vec![stateful("later", behavior, |n: &i64| {
        p(format!("{n}"))
    })]);

    let mut runtime = Runtime::new(picker, "later".to_string(), SidePorts::new());
    assert_eq!(runtime.pending_timers(), 1);
    runtime.tick(Instant::now() + Duration::from_secs(1));
    assert_eq!(runtime.pending_timers(), 0);
    assert_eq!(runtime.model().and_then(PickerState::model), Some(&7));
}
