//! Compiler configuration.
//!
//! Every field has a default, so a config document only names what it
//! changes:
//!
//! ```yaml
//! debug: true
//! unknown_entries: reject
//! dialect:
//!   inject: angular.mock.inject
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{to_error_source, Span};
use crate::{err_ctx, err_msg, SpecError};

/// What the partitioner does with an entry it cannot place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPolicy {
    /// Drop the entry, log a warning, and count it in the report.
    #[default]
    Warn,
    /// Fail the whole compilation.
    Reject,
}

/// Names of the framework capabilities the generated program calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    pub describe: String,
    pub it: String,
    pub before_each: String,
    pub after_each: String,
    pub module: String,
    pub inject: String,
    /// Wraps each dependency name to form its injection parameter.
    pub marker: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            describe: "describe".to_string(),
            it: "it".to_string(),
            before_each: "beforeEach".to_string(),
            after_each: "afterEach".to_string(),
            module: "module".to_string(),
            inject: "inject".to_string(),
            marker: '_',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Write partitions and fragments to the debug sink.
    pub debug: bool,
    /// Deepest nesting accepted before compilation is aborted.
    pub max_depth: usize,
    pub unknown_entries: EntryPolicy,
    /// Require dependency names to be valid identifiers.
    pub validate_identifiers: bool,
    pub dialect: Dialect,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            debug: false,
            max_depth: 256,
            unknown_entries: EntryPolicy::Warn,
            validate_identifiers: true,
            dialect: Dialect::default(),
        }
    }
}

impl CompileOptions {
    pub fn from_yaml_str(name: &str, text: &str) -> Result<Self, SpecError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| {
            let source = to_error_source(name, text);
            let span = e
                .location()
                .map(|loc| Span::at(loc.index()))
                .unwrap_or_default();
            err_ctx!(Load, format!("invalid config: {e}"), &source, span).with_cause(e)
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Load, "failed to read config '{}'", path.display()).with_cause(e)
        })?;
        Self::from_yaml_str(&path.display().to_string(), &text)
    }
}
