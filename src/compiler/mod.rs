//! The spec compiler.
//!
//! Compilation is a single depth-first pass. Every suite owns its partition
//! and its block list; children hand finished blocks up to their parent.
//! Nothing reaches a script host or framework until the whole tree has
//! compiled, so a format error anywhere registers nothing at all.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::block::Block;
use crate::config::CompileOptions;
use crate::debug::{SharedSink, StderrSink};
use crate::emit::{Fragment, ScriptEmitter};
use crate::exec::{self, Framework, ScriptHost};
use crate::spec::SpecNode;
use crate::SpecError;

pub mod partition;
mod walker;

pub use partition::{partition, DroppedEntry, Partition};

use walker::Walker;

/// A fully compiled spec tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub text: Fragment,
    pub blocks: Vec<Block>,
    pub dropped: Vec<DroppedEntry>,
}

/// Result of [`Compiler::compile`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Depth 0: the program was compiled and invoked by the host.
    Executed(Program),
    /// Depth > 0: the fragment is returned to the caller.
    Fragment(Fragment),
}

pub struct Compiler {
    options: CompileOptions,
    sink: SharedSink,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            options,
            sink: Rc::new(RefCell::new(StderrSink)),
        }
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.options.debug = enabled;
        self
    }

    /// Replaces the debug sink. Has no effect unless debugging is enabled.
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles `spec` as if it sat `depth` levels deep, without executing.
    pub fn blocks(
        &self,
        spec: &SpecNode,
        depth: usize,
    ) -> Result<(Vec<Block>, Vec<DroppedEntry>), SpecError> {
        let sink = self.options.debug.then_some(&self.sink);
        let mut walker = Walker::new(&self.options, sink);
        let blocks = walker.walk(spec, depth)?;
        Ok((blocks, walker.dropped))
    }

    /// The fragment for `spec` at `depth`. Never executes, so compiling the
    /// same tree twice yields identical text.
    pub fn fragment(&self, spec: &SpecNode, depth: usize) -> Result<Fragment, SpecError> {
        let (blocks, _) = self.blocks(spec, depth)?;
        let fragment = ScriptEmitter::blocks(&self.options.dialect, &blocks);
        self.note(|| format!("returning fragment (depth {depth}):\n  {fragment}"));
        Ok(fragment)
    }

    /// The root program for `spec`, without executing it.
    pub fn program(&self, spec: &SpecNode) -> Result<Program, SpecError> {
        let (blocks, dropped) = self.blocks(spec, 0)?;
        let text = ScriptEmitter::blocks(&self.options.dialect, &blocks);
        self.note(|| format!("final program:\n  {text}"));
        Ok(Program {
            text,
            blocks,
            dropped,
        })
    }

    /// Compiles `spec` at `depth`. At depth 0 the program is handed to
    /// `host` and invoked once against `scope`; deeper calls only return
    /// their fragment.
    pub fn compile<H: ScriptHost + ?Sized>(
        &self,
        spec: &SpecNode,
        depth: usize,
        host: &mut H,
        scope: &mut H::Scope,
    ) -> Result<Outcome, SpecError> {
        if depth > 0 {
            return self.fragment(spec, depth).map(Outcome::Fragment);
        }
        self.run(spec, host, scope).map(Outcome::Executed)
    }

    /// Compiles the whole tree, then compiles and invokes it through `host`.
    pub fn run<H: ScriptHost + ?Sized>(
        &self,
        spec: &SpecNode,
        host: &mut H,
        scope: &mut H::Scope,
    ) -> Result<Program, SpecError> {
        let program = self.program(spec)?;
        exec::execute(host, &program.text, scope)?;
        Ok(program)
    }

    /// Compiles the whole tree, then registers it directly with `framework`.
    pub fn register<F: Framework + ?Sized>(
        &self,
        spec: &SpecNode,
        framework: &mut F,
    ) -> Result<Program, SpecError> {
        let program = self.program(spec)?;
        exec::register(framework, &program.blocks);
        Ok(program)
    }

    fn note(&self, message: impl FnOnce() -> String) {
        if self.options.debug {
            self.sink.borrow_mut().emit(&message());
        }
    }
}
