//! Renders block trees as program text.
//!
//! For the default dialect a suite compiles to
//!
//! ```text
//! describe('Widget', function() {beforeEach(function() {module('app');});var svc;beforeEach(inject(function(_svc_) {svc = _svc_;}));beforeEach(<before>);afterEach(<after>);it('should x', <body>);});
//! ```
//!
//! Callable sources are embedded verbatim; labels and module names are
//! embedded as single-quoted string literals.

use crate::block::{walk, walk_all, Block, Visitor};
use crate::config::Dialect;
use crate::emit::Fragment;
use crate::spec::{Callable, LabelKind};

pub struct ScriptEmitter<'d> {
    dialect: &'d Dialect,
    out: String,
}

impl<'d> ScriptEmitter<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            out: String::new(),
        }
    }

    /// Renders a single block.
    pub fn block(dialect: &Dialect, block: &Block) -> Fragment {
        let mut emitter = ScriptEmitter::new(dialect);
        walk(&mut emitter, block);
        emitter.finish()
    }

    /// Renders blocks back to back, in order.
    pub fn blocks(dialect: &Dialect, blocks: &[Block]) -> Fragment {
        let mut emitter = ScriptEmitter::new(dialect);
        walk_all(&mut emitter, blocks);
        emitter.finish()
    }

    pub fn finish(self) -> Fragment {
        Fragment::from(self.out)
    }

    fn kind_name(&self, kind: LabelKind) -> &str {
        match kind {
            LabelKind::Suite => &self.dialect.describe,
            LabelKind::Case => &self.dialect.it,
        }
    }

    fn marked(&self, name: &str) -> String {
        let marker = self.dialect.marker;
        format!("{marker}{name}{marker}")
    }
}

impl Visitor for ScriptEmitter<'_> {
    fn callable_block(&mut self, kind: LabelKind, label: &str, body: &Callable) {
        let call = self.kind_name(kind).to_string();
        self.out
            .push_str(&format!("{call}({}, {});", quote(label), body.source()));
    }

    fn enter_suite(&mut self, label: &str) {
        self.out.push_str(&format!(
            "{}({}, function() {{",
            self.dialect.describe,
            quote(label)
        ));
    }

    fn leave_suite(&mut self, _label: &str) {
        self.out.push_str("});");
    }

    fn module_hook(&mut self, modules: &[String]) {
        self.out
            .push_str(&format!("{}(function() {{", self.dialect.before_each));
        for module in modules {
            self.out
                .push_str(&format!("{}({});", self.dialect.module, quote(module)));
        }
        self.out.push_str("});");
    }

    fn inject_hook(&mut self, dependencies: &[String]) {
        let params: Vec<String> = dependencies.iter().map(|d| self.marked(d)).collect();
        let assignments: String = dependencies
            .iter()
            .zip(&params)
            .map(|(dep, param)| format!("{dep} = {param};"))
            .collect();
        self.out.push_str(&format!("var {};", dependencies.join(",")));
        self.out.push_str(&format!(
            "{}({}(function({}) {{{assignments}}}));",
            self.dialect.before_each,
            self.dialect.inject,
            params.join(",")
        ));
    }

    fn before_hook(&mut self, hook: &Callable) {
        self.out
            .push_str(&format!("{}({});", self.dialect.before_each, hook.source()));
    }

    fn after_hook(&mut self, hook: &Callable) {
        self.out
            .push_str(&format!("{}({});", self.dialect.after_each, hook.source()));
    }
}

/// Single-quoted string literal.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
