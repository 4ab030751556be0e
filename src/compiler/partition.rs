//! Buckets a suite's entries by role.

use serde::Serialize;

use crate::block::Block;
use crate::config::{CompileOptions, EntryPolicy};
use crate::spec::{Callable, Entry, Reference, SpecNode};
use crate::{err_msg, SpecError};

/// A suite's entries sorted into their categories, each in encounter order.
#[derive(Debug, Default)]
pub struct Partition {
    pub modules: Vec<String>,
    pub dependencies: Vec<String>,
    pub before: Vec<Callable>,
    pub after: Vec<Callable>,
    pub nested: Vec<Block>,
    /// Entries that were dropped under [`EntryPolicy::Warn`].
    pub dropped: Vec<DroppedEntry>,
}

/// An entry the partitioner could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedEntry {
    /// Label path of the suite that held the entry.
    pub suite: String,
    /// Position of the entry in the suite's sequence.
    pub index: usize,
    pub shape: String,
    pub reason: String,
}

impl Partition {
    pub fn push_reference(&mut self, reference: Reference) {
        if reference.role.loads_module() {
            self.modules.push(reference.name.clone());
        }
        if reference.role.injects() {
            self.dependencies.push(reference.name);
        }
    }

    /// Places a hook by tag, falling back to position for unmarked hooks:
    /// the first unmarked hook runs before each case, the second after.
    /// Hands the hook back when neither rule applies.
    pub fn place_hook(&mut self, hook: Callable) -> Result<(), Callable> {
        let (is_before, is_after) = (hook.is_before(), hook.is_after());
        if is_before || (self.before.is_empty() && !is_after) {
            self.before.push(hook);
        } else if is_after || (self.after.is_empty() && !is_before) {
            self.after.push(hook);
        } else {
            return Err(hook);
        }
        Ok(())
    }

    fn drop_entry(
        &mut self,
        policy: EntryPolicy,
        suite: &str,
        index: usize,
        shape: &str,
        reason: &str,
    ) -> Result<(), SpecError> {
        match policy {
            EntryPolicy::Reject => Err(err_msg!(
                UnrecognizedEntry,
                "entry {} of '{}' ({}): {}",
                index,
                suite,
                shape,
                reason
            )
            .with_help("suite entries are reference strings, callables, or nested mappings")),
            EntryPolicy::Warn => {
                self.dropped.push(DroppedEntry {
                    suite: suite.to_string(),
                    index,
                    shape: shape.to_string(),
                    reason: reason.to_string(),
                });
                Ok(())
            }
        }
    }
}

/// Partitions `entries`, compiling nested mappings through `nested`.
pub fn partition<F>(
    suite: &str,
    entries: &[Entry],
    options: &CompileOptions,
    mut nested: F,
) -> Result<Partition, SpecError>
where
    F: FnMut(&SpecNode) -> Result<Vec<Block>, SpecError>,
{
    let mut partition = Partition::default();
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Entry::Ref(raw) => {
                let reference = Reference::decode(raw);
                reference.validate(options.validate_identifiers).map_err(|e| {
                    err_msg!(Reference, "entry {} of '{}' is not a usable reference", index, suite)
                        .with_cause(e)
                })?;
                partition.push_reference(reference);
            }
            Entry::Hook(hook) => {
                if partition.place_hook(hook.clone()).is_err() {
                    partition.drop_entry(
                        options.unknown_entries,
                        suite,
                        index,
                        entry.shape(),
                        "both hook slots are taken and the callable is not named before or after",
                    )?;
                }
            }
            Entry::Suite(node) => {
                let blocks = nested(node)?;
                partition.nested.extend(blocks);
            }
            Entry::Other(_) => {
                partition.drop_entry(
                    options.unknown_entries,
                    suite,
                    index,
                    entry.shape(),
                    "unsupported entry shape",
                )?;
            }
        }
    }
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorType;

    fn no_nesting(_: &SpecNode) -> Result<Vec<Block>, SpecError> {
        Ok(Vec::new())
    }

    fn run(entries: Vec<Entry>) -> Partition {
        partition("S", &entries, &CompileOptions::default(), no_nesting).unwrap()
    }

    #[test]
    fn test_references_fill_lists() {
        let p = run(vec!["a+".into(), "m:".into(), "d".into()]);
        assert_eq!(p.modules, ["a", "m"]);
        assert_eq!(p.dependencies, ["a", "d"]);
    }

    #[test]
    fn test_unmarked_hooks_alternate_before_then_after() {
        let p = run(vec![
            Callable::new("function () { 1; }").into(),
            Callable::new("function () { 2; }").into(),
        ]);
        assert_eq!(p.before.len(), 1);
        assert_eq!(p.before[0].source(), "function () { 1; }");
        assert_eq!(p.after[0].source(), "function () { 2; }");
    }

    #[test]
    fn test_named_after_is_after_even_first() {
        let p = run(vec![Callable::new("function after() {}").into()]);
        assert!(p.before.is_empty());
        assert_eq!(p.after.len(), 1);
    }

    #[test]
    fn test_named_hooks_override_position() {
        let p = run(vec![
            Callable::new("function before() { 1; }").into(),
            Callable::new("function before() { 2; }").into(),
            Callable::new("function () { 3; }").into(),
        ]);
        assert_eq!(p.before.len(), 2);
        assert_eq!(p.after[0].source(), "function () { 3; }");
    }

    #[test]
    fn test_unmarked_hook_after_before_named_after_goes_nowhere() {
        let p = run(vec![
            Callable::new("function after() {}").into(),
            Callable::new("function () { 1; }").into(),
            Callable::new("function () { 2; }").into(),
        ]);
        assert_eq!(p.before.len(), 1);
        assert_eq!(p.after.len(), 1);
        assert_eq!(p.dropped.len(), 1);
        assert_eq!(p.dropped[0].index, 2);
    }

    #[test]
    fn test_other_entries_warn_or_reject() {
        let entries = vec![Entry::Other("number".into()), "svc".into()];
        let p = partition("S", &entries, &CompileOptions::default(), no_nesting).unwrap();
        assert_eq!(p.dependencies, ["svc"]);
        assert_eq!(p.dropped[0].shape, "number");

        let strict = CompileOptions {
            unknown_entries: EntryPolicy::Reject,
            ..CompileOptions::default()
        };
        let err = partition("S", &entries, &strict, no_nesting).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::UnrecognizedEntry);
    }

    #[test]
    fn test_invalid_dependency_name_fails() {
        let entries = vec![Entry::from("not-an-ident")];
        let err = partition("S", &entries, &CompileOptions::default(), no_nesting).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Reference);
    }
}
