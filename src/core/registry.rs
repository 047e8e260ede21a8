//! # Story Registration
//!
//! Bridges a compiled program into an explorer. For each story name the
//! explorer receives a zero-argument render callback that mounts a fresh
//! instance of the program with that name as its startup flag.
//!
//! ```text
//! register_stories("Demo", module, app, ["h1", "counter"], ports)
//!     │
//!     ├── app.entry("Main")?              (missing → error, nothing registered)
//!     │
//!     ├── explorer.add("Demo", module, "h1",      || Main("h1", ports))
//!     └── explorer.add("Demo", module, "counter", || Main("counter", ports))
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::info;

use crate::core::ports::SidePorts;
use crate::core::program::Program;
use crate::core::runtime::{Mounted, Runtime};

/// Name of the entry point `register_stories` looks for.
pub const ENTRY_POINT: &str = "Main";

/// Creates a running instance from a startup flag and the ports to wire in.
pub type EntryPoint = Rc<dyn Fn(String, &SidePorts) -> Box<dyn Mounted>>;

/// Zero-argument callback an explorer invokes to show one story.
pub type RenderFn = Box<dyn Fn() -> Box<dyn Mounted>>;

/// Wrap a program so every call mounts a new [`Runtime`] for it.
pub fn entry_point<P>(program: P) -> EntryPoint
where
    P: Program<Flags = String> + Clone + 'static,
    P::Model: 'static,
    P::Msg: Clone + 'static,
{
    Rc::new(move |flag: String, ports: &SidePorts| {
        let runtime = Runtime::new(program.clone(), flag, ports.clone());
        Box::new(runtime) as Box<dyn Mounted>
    })
}

/// A build artifact exposing named entry points.
#[derive(Default, Clone)]
pub struct CompiledApp {
    entries: HashMap<String, EntryPoint>,
}

impl CompiledApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, name: impl Into<String>, entry: EntryPoint) -> Self {
        self.entries.insert(name.into(), entry);
        self
    }

    pub fn entry(&self, name: &str) -> Option<&EntryPoint> {
        self.entries.get(name)
    }

    /// Entry point names, sorted.
    pub fn entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for CompiledApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledApp")
            .field("entries", &self.entry_names())
            .finish()
    }
}

/// The host tool stories are registered into.
pub trait Explorer {
    fn add(&mut self, collection: &str, module: &str, name: &str, render: RenderFn);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The compiled app has no entry point with the expected name.
    MissingEntryPoint {
        expected: String,
        available: Vec<String>,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::MissingEntryPoint {
                expected,
                available,
            } => {
                if available.is_empty() {
                    write!(f, "compiled app has no entry point {expected:?}")
                } else {
                    write!(
                        f,
                        "compiled app has no entry point {expected:?} (found: {})",
                        available.join(", ")
                    )
                }
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Register one explorer entry per name. Returns how many were registered.
///
/// Fails before touching the explorer if `app` lacks [`ENTRY_POINT`].
pub fn register_stories<E, S>(
    explorer: &mut E,
    collection: &str,
    module: &str,
    app: &CompiledApp,
    names: &[S],
    ports: Option<SidePorts>,
) -> Result<usize, RegistrationError>
where
    E: Explorer + ?Sized,
    S: AsRef<str>,
{
    let entry = app
        .entry(ENTRY_POINT)
        .cloned()
        .ok_or_else(|| RegistrationError::MissingEntryPoint {
            expected: ENTRY_POINT.to_string(),
            available: app.entry_names(),
        })?;
    let ports = Rc::new(ports.unwrap_or_default());

    for name in names {
        let name = name.as_ref();
        let entry = Rc::clone(&entry);
        let ports = Rc::clone(&ports);
        let flag = name.to_string();
        explorer.add(
            collection,
            module,
            name,
            Box::new(move || entry(flag.clone(), &*ports)),
        );
    }

    info!(
        "Registered {} stories in collection {:?} ({} ports)",
        names.len(),
        collection,
        ports.len()
    );
    Ok(names.len())
}

/// One registered story.
pub struct BookEntry {
    pub collection: String,
    pub module: String,
    pub name: String,
    render: RenderFn,
}

impl BookEntry {
    pub fn mount(&self) -> Box<dyn Mounted> {
        (self.render)()
    }
}

impl fmt::Debug for BookEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookEntry")
            .field("collection", &self.collection)
            .field("module", &self.module)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// In-memory explorer. Entries keep registration order.
#[derive(Debug, Default)]
pub struct StoryBook {
    entries: Vec<BookEntry>,
}

impl StoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collection names in the order they first appeared.
    pub fn collections(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.collection.as_str()) {
                seen.push(&entry.collection);
            }
        }
        seen
    }

    pub fn position(&self, collection: &str, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.collection == collection && e.name == name)
    }

    /// First entry with this story name, in any collection.
    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn mount(&self, index: usize) -> Option<Box<dyn Mounted>> {
        self.entries.get(index).map(BookEntry::mount)
    }
}

impl Explorer for StoryBook {
    fn add(&mut self, collection: &str, module: &str, name: &str, render: RenderFn) {
        self.entries.push(BookEntry {
            collection: collection.to_string(),
            module: module.to_string(),
            name: name.to_string(),
            render,
        });
    }
}
