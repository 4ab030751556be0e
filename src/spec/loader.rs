//! Loading spec trees from YAML (and JSON, read as YAML).
//!
//! Document shape:
//!
//! ```yaml
//! Widget:
//!   - "app.widgets:"              # module
//!   - WidgetService               # dependency
//!   - store+                      # module and dependency
//!   - !before "function () { reset(); }"
//!   - should init: "function () { expect(WidgetService).toBeDefined(); }"
//! should add: !fn "function () { expect(1 + 1).toBe(2); }"
//! ```
//!
//! Under a label a plain string is callable source. Inside a sequence a plain
//! string is a reference and callables must be tagged `!fn`, `!before` or
//! `!after`. Shapes the compiler has no use for are carried through as
//! `Other` values so the compiler reports them where they occur.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use walkdir::WalkDir;

use crate::diagnostics::{to_error_source, SourceArc, Span};
use crate::spec::{Callable, Entry, HookTag, SpecNode, SpecValue};
use crate::{err_ctx, err_msg, SpecError};

const SPEC_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Parses a spec document. `name` is used in diagnostics only.
pub fn from_yaml_str(name: &str, text: &str) -> Result<SpecNode, SpecError> {
    let source = to_error_source(name, text);
    let document: Value = serde_yaml::from_str(text).map_err(|e| parse_error(&source, e))?;
    match document {
        Value::Null => Ok(SpecNode::new()),
        Value::Mapping(mapping) => node_from_mapping(&mapping, &source),
        other => Err(err_ctx!(
            Load,
            format!("a spec document must be a mapping, found {}", kind_of(&other)),
            &source,
            Span::at(0)
        )),
    }
}

/// Reads and parses a spec document from disk.
pub fn from_file(path: impl AsRef<Path>) -> Result<SpecNode, SpecError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        err_msg!(Load, "failed to read '{}'", path.display()).with_cause(e)
    })?;
    from_yaml_str(&path.display().to_string(), &text)
}

/// Recursively collects spec documents below `root`, sorted for a
/// deterministic order.
pub fn discover_spec_files(root: impl AsRef<Path>) -> Result<Vec<PathBuf>, SpecError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry =
            entry.map_err(|e| err_msg!(Load, "failed to walk directory").with_cause(e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_spec_file(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

fn is_spec_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SPEC_EXTENSIONS.contains(&ext))
}

fn parse_error(source: &SourceArc, error: serde_yaml::Error) -> SpecError {
    let span = error
        .location()
        .map(|loc| Span::at(loc.index()))
        .unwrap_or_default();
    err_ctx!(Load, error.to_string(), source, span).with_cause(error)
}

fn node_from_mapping(mapping: &Mapping, source: &SourceArc) -> Result<SpecNode, SpecError> {
    let mut node = SpecNode::new();
    for (key, value) in mapping {
        let Value::String(label) = key else {
            return Err(load_error(
                source,
                format!("labels must be strings, found {}", kind_of(key)),
            ));
        };
        node.insert(label.clone(), spec_value(value, source)?);
    }
    Ok(node)
}

fn spec_value(value: &Value, source: &SourceArc) -> Result<SpecValue, SpecError> {
    Ok(match value {
        Value::String(text) => SpecValue::Callable(Callable::new(text.as_str())),
        Value::Sequence(items) => SpecValue::Sequence(
            items
                .iter()
                .map(|item| entry(item, source))
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(mapping) => SpecValue::Node(node_from_mapping(mapping, source)?),
        Value::Tagged(tagged) => match callable_from_tagged(tagged, source)? {
            Some(callable) => SpecValue::Callable(callable),
            None => SpecValue::Other(kind_of(value)),
        },
        other => SpecValue::Other(kind_of(other)),
    })
}

fn entry(value: &Value, source: &SourceArc) -> Result<Entry, SpecError> {
    Ok(match value {
        Value::String(raw) => Entry::Ref(raw.clone()),
        Value::Mapping(mapping) => Entry::Suite(node_from_mapping(mapping, source)?),
        Value::Tagged(tagged) => match callable_from_tagged(tagged, source)? {
            Some(callable) => Entry::Hook(callable),
            None => Entry::Other(kind_of(value)),
        },
        other => Entry::Other(kind_of(other)),
    })
}

/// Returns `None` for tags that do not name a callable.
fn callable_from_tagged(
    tagged: &serde_yaml::value::TaggedValue,
    source: &SourceArc,
) -> Result<Option<Callable>, SpecError> {
    let tag = tag_name(&tagged.tag);
    let role = match tag.as_str() {
        "fn" => None,
        "before" => Some(HookTag::Before),
        "after" => Some(HookTag::After),
        _ => return Ok(None),
    };
    let Value::String(text) = &tagged.value else {
        return Err(load_error(
            source,
            format!("!{tag} expects a string of source, found {}", kind_of(&tagged.value)),
        ));
    };
    let callable = Callable::new(text.as_str());
    Ok(Some(match role {
        Some(tag) => callable.tagged(tag),
        None => callable,
    }))
}

fn tag_name(tag: &serde_yaml::value::Tag) -> String {
    tag.to_string().trim_start_matches('!').to_string()
}

fn load_error(source: &SourceArc, message: String) -> SpecError {
    SpecError::Load {
        message,
        ctx: crate::ErrorContext {
            source: Some(SourceArc::clone(source)),
            span: None,
            help: Some("see the spec document format in the crate documentation".to_string()),
        },
        source: None,
    }
}

fn kind_of(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Sequence(_) => "sequence".to_string(),
        Value::Mapping(_) => "mapping".to_string(),
        Value::Tagged(tagged) => format!("!{} value", tag_name(&tagged.tag)),
    }
}
