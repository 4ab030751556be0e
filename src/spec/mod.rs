//! The declarative input tree.
//!
//! A [`SpecNode`] is an ordered mapping from labels to values. Order is
//! significant: suites and cases are registered in insertion order, and
//! entries inside a suite keep their encounter order within each category.
//!
//! ```
//! use specsuite::{Callable, Entry, SpecNode};
//!
//! let spec = SpecNode::new().suite(
//!     "Widget",
//!     vec![
//!         Entry::from("WidgetService"),
//!         Entry::from(Callable::new("function () { setup(); }")),
//!         Entry::from(SpecNode::new().case("should init", "function () {}")),
//!     ],
//! );
//! assert_eq!(spec.len(), 1);
//! ```

use indexmap::IndexMap;
use serde::Serialize;

pub mod callable;
pub mod label;
pub mod loader;
pub mod reference;

pub use callable::{Callable, CaseFailure, HookTag, TestContext};
pub use label::{is_case, is_suite, LabelKind, CASE_KEYWORD};
pub use reference::{Reference, ReferenceRole};

/// Ordered mapping from label to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpecNode {
    entries: IndexMap<String, SpecValue>,
}

/// The value bound to a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecValue {
    Callable(Callable),
    Sequence(Vec<Entry>),
    /// A mapping bound directly to a label. Only valid inside a sequence,
    /// so reaching one here is a format error.
    Node(SpecNode),
    /// A value of any other shape, described by its type name.
    Other(String),
}

impl SpecValue {
    /// Short description of the value's shape for diagnostics.
    pub fn shape(&self) -> &str {
        match self {
            SpecValue::Callable(_) => "callable",
            SpecValue::Sequence(_) => "sequence",
            SpecValue::Node(_) => "mapping",
            SpecValue::Other(kind) => kind,
        }
    }
}

/// One element of a suite's sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entry {
    /// A module and/or dependency reference, still encoded with its suffix.
    Ref(String),
    Hook(Callable),
    Suite(SpecNode),
    /// An entry of any other shape, described by its type name.
    Other(String),
}

impl Entry {
    pub fn shape(&self) -> &str {
        match self {
            Entry::Ref(_) => "string",
            Entry::Hook(_) => "callable",
            Entry::Suite(_) => "mapping",
            Entry::Other(kind) => kind,
        }
    }
}

impl From<&str> for Entry {
    fn from(raw: &str) -> Self {
        Entry::Ref(raw.to_string())
    }
}

impl From<String> for Entry {
    fn from(raw: String) -> Self {
        Entry::Ref(raw)
    }
}

impl From<Callable> for Entry {
    fn from(callable: Callable) -> Self {
        Entry::Hook(callable)
    }
}

impl From<SpecNode> for Entry {
    fn from(node: SpecNode) -> Self {
        Entry::Suite(node)
    }
}

impl From<Callable> for SpecValue {
    fn from(callable: Callable) -> Self {
        SpecValue::Callable(callable)
    }
}

impl From<Vec<Entry>> for SpecValue {
    fn from(entries: Vec<Entry>) -> Self {
        SpecValue::Sequence(entries)
    }
}

impl From<SpecNode> for SpecValue {
    fn from(node: SpecNode) -> Self {
        SpecValue::Node(node)
    }
}

impl SpecNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `label` to `value`. Rebinding an existing label replaces its
    /// value but keeps its original position.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<SpecValue>) {
        self.entries.insert(label.into(), value.into());
    }

    pub fn with(mut self, label: impl Into<String>, value: impl Into<SpecValue>) -> Self {
        self.insert(label, value);
        self
    }

    /// Binds a label to a sequence of entries.
    pub fn suite(self, label: impl Into<String>, entries: Vec<Entry>) -> Self {
        self.with(label, entries)
    }

    /// Binds a label to a callable built from `source`.
    pub fn case(self, label: impl Into<String>, source: &str) -> Self {
        self.with(label, Callable::new(source))
    }

    pub fn get(&self, label: &str) -> Option<&SpecValue> {
        self.entries.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecValue)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, V: Into<SpecValue>> FromIterator<(L, V)> for SpecNode {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut node = SpecNode::new();
        for (label, value) in iter {
            node.insert(label, value);
        }
        node
    }
}
