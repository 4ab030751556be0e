//! Code emission.
//!
//! [`assemble`] fixes the order of a suite body; [`script`] renders block
//! trees as program text for a script host.
//!
//! The body order is a hard contract, independent of how entries were
//! interleaved in the input: module loading, then dependency injection, then
//! before hooks, then after hooks, then nested suites and cases.

use std::fmt;

use serde::Serialize;

use crate::block::Item;
use crate::compiler::Partition;

pub mod script;

pub use script::ScriptEmitter;

/// Generated program text for one or more blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fragment(String);

impl Fragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment(text)
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lays a partition out as a suite body in emission order.
pub fn assemble(partition: Partition) -> Vec<Item> {
    let Partition {
        modules,
        dependencies,
        before,
        after,
        nested,
        ..
    } = partition;

    let mut items = Vec::with_capacity(2 + before.len() + after.len() + nested.len());
    if !modules.is_empty() {
        items.push(Item::ModuleHook(modules));
    }
    if !dependencies.is_empty() {
        items.push(Item::InjectHook(dependencies));
    }
    items.extend(before.into_iter().map(Item::BeforeHook));
    items.extend(after.into_iter().map(Item::AfterHook));
    items.extend(nested.into_iter().map(Item::Nested));
    items
}
