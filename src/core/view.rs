//! # Render Tree
//!
//! What a story's `view` returns. A tree of text and tagged elements,
//! where elements may carry key bindings that turn a key press into a
//! message for the owning program.
//!
//! ```text
//! Node::Element { tag: "div", keys: [('+', Increment)], children: [
//!     Node::Element { tag: "h1", children: [Node::Text("Counter")] },
//!     Node::Text("Count: 3"),
//! ]}
//! ```
//!
//! The tree is plain data. Hosts decide how to draw it (the TUI adapter
//! turns it into ratatui lines).

/// A render tree parameterized by the message type its key bindings produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<Msg> {
    Text(String),
    Element {
        tag: String,
        children: Vec<Node<Msg>>,
        /// Key bindings: pressing the char dispatches the message.
        keys: Vec<(char, Msg)>,
    },
}

pub fn text<Msg>(content: impl Into<String>) -> Node<Msg> {
    Node::Text(content.into())
}

pub fn element<Msg>(tag: impl Into<String>, children: Vec<Node<Msg>>) -> Node<Msg> {
    Node::Element {
        tag: tag.into(),
        children,
        keys: Vec::new(),
    }
}

pub fn h1<Msg>(content: impl Into<String>) -> Node<Msg> {
    element("h1", vec![Node::Text(content.into())])
}

pub fn p<Msg>(content: impl Into<String>) -> Node<Msg> {
    element("p", vec![Node::Text(content.into())])
}

pub fn div<Msg>(children: Vec<Node<Msg>>) -> Node<Msg> {
    element("div", children)
}

/// A labelled control bound to a single key.
pub fn button<Msg>(label: impl Into<String>, key: char, msg: Msg) -> Node<Msg> {
    Node::Element {
        tag: "button".to_string(),
        children: vec![Node::Text(label.into())],
        keys: vec![(key, msg)],
    }
}

impl<Msg> Node<Msg> {
    /// Attach a key binding to an element. Text nodes are wrapped in a `span`.
    pub fn on_key(self, key: char, msg: Msg) -> Self {
        match self {
            Node::Text(content) => Node::Element {
                tag: "span".to_string(),
                children: vec![Node::Text(content)],
                keys: vec![(key, msg)],
            },
            Node::Element {
                tag,
                children,
                mut keys,
            } => {
                keys.push((key, msg));
                Node::Element {
                    tag,
                    children,
                    keys,
                }
            }
        }
    }

    /// All visible text, depth-first, with element boundaries joined by newlines.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(content) => content.clone(),
            Node::Element { children, .. } => children
                .iter()
                .map(Node::text_content)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// First message bound to `key`, searching depth-first from the root.
    pub fn find_key(&self, key: char) -> Option<&Msg> {
        match self {
            Node::Text(_) => None,
            Node::Element { children, keys, .. } => keys
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, msg)| msg)
                .or_else(|| children.iter().find_map(|child| child.find_key(key))),
        }
    }

    /// Same tree shape with messages erased, for hosts that only draw.
    pub fn without_handlers(&self) -> Node<()> {
        match self {
            Node::Text(content) => Node::Text(content.clone()),
            Node::Element {
                tag,
                children,
                keys,
            } => Node::Element {
                tag: tag.clone(),
                children: children.iter().map(Node::without_handlers).collect(),
                keys: keys.iter().map(|(k, _)| (*k, ())).collect(),
            },
        }
    }
}
