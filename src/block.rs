//! Typed compiled form of a spec tree.
//!
//! The walker produces one [`Block`] per label. A suite compiled from a
//! sequence carries its body as [`Item`]s already in emission order, so
//! consumers never reorder anything: they walk the items front to back
//! through a [`Visitor`].

use serde::Serialize;

use crate::spec::{Callable, LabelKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub kind: LabelKind,
    pub label: String,
    pub body: BlockBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockBody {
    /// The label was bound directly to a callable.
    Callable(Callable),
    /// A suite compiled from a sequence of entries.
    Items(Vec<Item>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    /// One hook loading every listed module.
    ModuleHook(Vec<String>),
    /// One hook injecting every listed dependency.
    InjectHook(Vec<String>),
    BeforeHook(Callable),
    AfterHook(Callable),
    Nested(Block),
}

impl Block {
    pub fn callable(label: impl Into<String>, body: Callable) -> Self {
        let label = label.into();
        Self {
            kind: LabelKind::of(&label),
            label,
            body: BlockBody::Callable(body),
        }
    }

    pub fn suite(label: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            kind: LabelKind::Suite,
            label: label.into(),
            body: BlockBody::Items(items),
        }
    }

    pub fn items(&self) -> &[Item] {
        match &self.body {
            BlockBody::Items(items) => items,
            BlockBody::Callable(_) => &[],
        }
    }
}

/// Receives a block tree in emission order.
pub trait Visitor {
    /// A label bound directly to a callable, suite or case.
    fn callable_block(&mut self, kind: LabelKind, label: &str, body: &Callable);
    fn enter_suite(&mut self, label: &str);
    fn leave_suite(&mut self, label: &str);
    fn module_hook(&mut self, modules: &[String]);
    fn inject_hook(&mut self, dependencies: &[String]);
    fn before_hook(&mut self, hook: &Callable);
    fn after_hook(&mut self, hook: &Callable);
}

pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, block: &Block) {
    match &block.body {
        BlockBody::Callable(body) => visitor.callable_block(block.kind, &block.label, body),
        BlockBody::Items(items) => {
            visitor.enter_suite(&block.label);
            for item in items {
                match item {
                    Item::ModuleHook(modules) => visitor.module_hook(modules),
                    Item::InjectHook(dependencies) => visitor.inject_hook(dependencies),
                    Item::BeforeHook(hook) => visitor.before_hook(hook),
                    Item::AfterHook(hook) => visitor.after_hook(hook),
                    Item::Nested(nested) => walk(visitor, nested),
                }
            }
            visitor.leave_suite(&block.label);
        }
    }
}

pub fn walk_all<V: Visitor + ?Sized>(visitor: &mut V, blocks: &[Block]) {
    for block in blocks {
        walk(visitor, block);
    }
}
