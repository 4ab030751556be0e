//! Callable values: hook and case bodies.
//!
//! A callable always has a textual source, which is what the script emitter
//! embeds into the generated program. It may also carry a live body that the
//! direct registrar hands to a [`Framework`](crate::exec::Framework), where it
//! runs against an explicit [`TestContext`] instead of hoisted variables.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Source prefix that marks an untagged callable as a before hook.
pub const BEFORE_PREFIX: &str = "function before";
/// Source prefix that marks an untagged callable as an after hook.
pub const AFTER_PREFIX: &str = "function after";

/// Explicit hook role of a callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookTag {
    Before,
    After,
    #[default]
    Unmarked,
}

impl HookTag {
    /// Derives a tag from a callable's source text.
    pub fn sniff(source: &str) -> Self {
        if source.starts_with(BEFORE_PREFIX) {
            HookTag::Before
        } else if source.starts_with(AFTER_PREFIX) {
            HookTag::After
        } else {
            HookTag::Unmarked
        }
    }
}

/// A failed case or hook body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseFailure {
    #[error("{0}")]
    Failed(String),
    #[error("dependency '{0}' is not bound in the test context")]
    Unbound(String),
    #[error("dependency '{name}' is not a {expected}")]
    WrongType { name: String, expected: &'static str },
    #[error("callable has no live body")]
    NoBody,
}

impl CaseFailure {
    pub fn failed(message: impl Into<String>) -> Self {
        CaseFailure::Failed(message.into())
    }
}

/// Dependency values resolved for one case run, keyed by dependency name.
#[derive(Default, Clone)]
pub struct TestContext {
    values: IndexMap<String, Arc<dyn Any + Send + Sync>>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Arc::new(value));
    }

    pub fn bind_shared(&mut self, name: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name)?.downcast_ref::<T>()
    }

    /// Like [`get`](Self::get) but reports why the lookup failed.
    pub fn require<T: Any>(&self, name: &str) -> Result<&T, CaseFailure> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| CaseFailure::Unbound(name.to_string()))?;
        value.downcast_ref::<T>().ok_or_else(|| CaseFailure::WrongType {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("bound", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub type Body = Arc<dyn Fn(&mut TestContext) -> Result<(), CaseFailure> + Send + Sync>;

/// A hook or case body.
#[derive(Clone)]
pub struct Callable {
    source: Arc<str>,
    tag: HookTag,
    body: Option<Body>,
}

impl Callable {
    /// A callable whose hook tag is sniffed from its source.
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        let source = source.into();
        let tag = HookTag::sniff(&source);
        Self {
            source,
            tag,
            body: None,
        }
    }

    pub fn before(source: impl Into<Arc<str>>) -> Self {
        Self::new(source).tagged(HookTag::Before)
    }

    pub fn after(source: impl Into<Arc<str>>) -> Self {
        Self::new(source).tagged(HookTag::After)
    }

    pub fn tagged(mut self, tag: HookTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut TestContext) -> Result<(), CaseFailure> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tag(&self) -> HookTag {
        self.tag
    }

    pub fn is_before(&self) -> bool {
        self.tag == HookTag::Before
    }

    pub fn is_after(&self) -> bool {
        self.tag == HookTag::After
    }

    pub fn invoke(&self, ctx: &mut TestContext) -> Result<(), CaseFailure> {
        match &self.body {
            Some(body) => body(ctx),
            None => Err(CaseFailure::NoBody),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("source", &self.source)
            .field("tag", &self.tag)
            .field("live", &self.body.is_some())
            .finish()
    }
}

// Live bodies are not comparable; two callables are equal when they would
// emit the same text under the same role.
impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.tag == other.tag
    }
}

impl Serialize for Callable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Callable", 2)?;
        state.serialize_field("source", &*self.source)?;
        state.serialize_field("tag", &self.tag)?;
        state.end()
    }
}
