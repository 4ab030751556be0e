//! Specsuite compiles declarative, nested descriptions of test suites into
//! ordered registration code for an ambient test framework.
//!
//! A [`SpecNode`] maps labels to callables or to sequences of entries. Labels
//! starting with "should" are cases, everything else is a suite. Inside a
//! suite, strings name modules (`name:`), dependencies (`name`) or both
//! (`name+`), callables become before/after hooks, and mappings nest.
//!
//! ```
//! use specsuite::{Callable, Compiler, Entry, SpecNode};
//!
//! let spec = SpecNode::new().suite(
//!     "Widget",
//!     vec![
//!         Entry::from("WidgetService"),
//!         Entry::from(SpecNode::new().case("should init", "function () {}")),
//!     ],
//! );
//! let fragment = Compiler::new().fragment(&spec, 1).unwrap();
//! assert!(fragment.as_str().starts_with("describe('Widget', function() {var WidgetService;"));
//! ```

pub use crate::compiler::{Compiler, DroppedEntry, Outcome, Program};
pub use crate::config::{CompileOptions, Dialect, EntryPolicy};
pub use crate::diagnostics::{ErrorContext, ErrorType, SpecError};
pub use crate::emit::Fragment;
pub use crate::exec::{Framework, ScriptHost};
pub use crate::spec::{Callable, CaseFailure, Entry, HookTag, SpecNode, SpecValue, TestContext};

pub mod block;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod debug;
pub mod diagnostics;
pub mod emit;
pub mod exec;
pub mod spec;
