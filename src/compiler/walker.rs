//! Recursive descent over a spec tree.

use tracing::{debug, trace, warn};

use crate::block::Block;
use crate::compiler::partition::{partition, DroppedEntry, Partition};
use crate::config::CompileOptions;
use crate::debug::SharedSink;
use crate::emit::{assemble, ScriptEmitter};
use crate::spec::{Entry, LabelKind, SpecNode, SpecValue};
use crate::{err_msg, SpecError};

pub(crate) struct Walker<'a> {
    options: &'a CompileOptions,
    /// Present only while debugging.
    sink: Option<&'a SharedSink>,
    /// Labels of the suites being compiled, outermost first.
    path: Vec<String>,
    pub(crate) dropped: Vec<DroppedEntry>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(options: &'a CompileOptions, sink: Option<&'a SharedSink>) -> Self {
        Self {
            options,
            sink,
            path: Vec::new(),
            dropped: Vec::new(),
        }
    }

    /// Compiles every label of `spec`, in insertion order.
    ///
    /// `depth` is only reported; the nesting bound counts the suites entered
    /// by this walk, whatever depth it started at.
    pub(crate) fn walk(&mut self, spec: &SpecNode, depth: usize) -> Result<Vec<Block>, SpecError> {
        if self.path.len() > self.options.max_depth {
            return Err(err_msg!(
                Format,
                "spec nesting exceeds {} levels at '{}'",
                self.options.max_depth,
                self.path.join(" > ")
            )
            .with_help("raise max_depth in the compile options if this nesting is intended"));
        }

        let mut blocks = Vec::with_capacity(spec.len());
        for (label, value) in spec.iter() {
            let kind = LabelKind::of(label);
            trace!(label, %kind, depth, shape = value.shape(), "compiling label");
            let block = match value {
                SpecValue::Callable(body) => Block::callable(label, body.clone()),
                SpecValue::Sequence(entries) if kind.is_suite() => {
                    self.suite(label, entries, depth)?
                }
                other => return Err(self.format_error(label, kind, other)),
            };
            blocks.push(block);
        }
        Ok(blocks)
    }

    fn suite(&mut self, label: &str, entries: &[Entry], depth: usize) -> Result<Block, SpecError> {
        self.path.push(label.to_string());
        let result = self.compile_suite(label, entries, depth);
        self.path.pop();
        result
    }

    fn compile_suite(
        &mut self,
        label: &str,
        entries: &[Entry],
        depth: usize,
    ) -> Result<Block, SpecError> {
        let options = self.options;
        let suite_path = self.path.join(" > ");
        let mut partition = partition(&suite_path, entries, options, |node| {
            self.walk(node, depth + 1)
        })?;

        for dropped in partition.dropped.drain(..) {
            warn!(
                suite = %dropped.suite,
                index = dropped.index,
                shape = %dropped.shape,
                "dropping entry: {}",
                dropped.reason
            );
            self.note(|| {
                format!(
                    "dropped entry {} of '{}' ({}): {}",
                    dropped.index, dropped.suite, dropped.shape, dropped.reason
                )
            });
            self.dropped.push(dropped);
        }

        debug!(
            suite = %suite_path,
            depth,
            modules = partition.modules.len(),
            dependencies = partition.dependencies.len(),
            before = partition.before.len(),
            after = partition.after.len(),
            nested = partition.nested.len(),
            "partitioned suite"
        );
        self.note(|| describe_partition(&suite_path, depth, &partition, options));

        let block = Block::suite(label, assemble(partition));
        self.note(|| {
            format!(
                "fragment for '{suite_path}':\n  {}",
                ScriptEmitter::block(&options.dialect, &block)
            )
        });
        Ok(block)
    }

    fn format_error(&self, label: &str, kind: LabelKind, value: &SpecValue) -> SpecError {
        let mut path = self.path.clone();
        path.push(label.to_string());
        let help = match (kind, value) {
            (LabelKind::Case, SpecValue::Sequence(_)) => {
                "labels starting with 'should' are cases and take a callable; rename the label to make it a suite"
            }
            (_, SpecValue::Node(_)) => {
                "wrap nested suites in a sequence: `Label: [ { nested: ... } ]`"
            }
            _ => "bind the label to a callable, or a suite label to a sequence of entries",
        };
        err_msg!(
            Format,
            "expected sequence or callable for {} '{}', found {}",
            kind,
            path.join(" > "),
            value.shape()
        )
        .with_help(help)
    }

    /// Writes to the debug sink; `message` is only built when debugging.
    fn note(&self, message: impl FnOnce() -> String) {
        if let Some(sink) = self.sink {
            sink.borrow_mut().emit(&message());
        }
    }
}

fn describe_partition(
    path: &str,
    depth: usize,
    partition: &Partition,
    options: &CompileOptions,
) -> String {
    let sources = |hooks: &[crate::spec::Callable]| {
        hooks.iter().map(|h| h.source().to_string()).collect::<Vec<_>>()
    };
    let nested: Vec<String> = partition
        .nested
        .iter()
        .map(|block| ScriptEmitter::block(&options.dialect, block).into_string())
        .collect();
    format!(
        "suite '{path}' (depth {depth})\n  modules: {:?}\n  dependencies: {:?}\n  before: {:?}\n  after: {:?}\n  nested: {:?}",
        partition.modules,
        partition.dependencies,
        sources(&partition.before),
        sources(&partition.after),
        nested
    )
}
