//! Direct registration with first-class callables.
//!
//! Instead of assembling text, the compiled blocks are replayed against a
//! [`Framework`] in emission order. Dependency values reach case bodies
//! through the explicit [`TestContext`](crate::spec::TestContext) the
//! framework builds, not through shared variables.

use crate::block::{walk_all, Block, Visitor};
use crate::spec::{Callable, LabelKind};

/// The registration surface of an ambient test framework.
pub trait Framework {
    /// Opens a suite; everything until the matching `end_describe` belongs to it.
    fn describe(&mut self, name: &str);
    fn end_describe(&mut self, name: &str);
    /// A suite whose body is a single callable.
    fn describe_with(&mut self, name: &str, body: &Callable);
    fn it(&mut self, name: &str, body: &Callable);
    fn load_modules(&mut self, modules: &[String]);
    fn inject(&mut self, dependencies: &[String]);
    fn before_each(&mut self, hook: &Callable);
    fn after_each(&mut self, hook: &Callable);
}

struct Registrar<'f, F: ?Sized> {
    framework: &'f mut F,
}

impl<F: Framework + ?Sized> Visitor for Registrar<'_, F> {
    fn callable_block(&mut self, kind: LabelKind, label: &str, body: &Callable) {
        match kind {
            LabelKind::Suite => self.framework.describe_with(label, body),
            LabelKind::Case => self.framework.it(label, body),
        }
    }

    fn enter_suite(&mut self, label: &str) {
        self.framework.describe(label);
    }

    fn leave_suite(&mut self, label: &str) {
        self.framework.end_describe(label);
    }

    fn module_hook(&mut self, modules: &[String]) {
        self.framework.load_modules(modules);
    }

    fn inject_hook(&mut self, dependencies: &[String]) {
        self.framework.inject(dependencies);
    }

    fn before_hook(&mut self, hook: &Callable) {
        self.framework.before_each(hook);
    }

    fn after_hook(&mut self, hook: &Callable) {
        self.framework.after_each(hook);
    }
}

pub fn register<F: Framework + ?Sized>(framework: &mut F, blocks: &[Block]) {
    tracing::debug!(blocks = blocks.len(), "registering compiled blocks");
    walk_all(&mut Registrar { framework }, blocks);
}
