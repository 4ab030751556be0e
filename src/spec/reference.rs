//! Decoding of string entries into module and dependency references.
//!
//! A trailing `+` names both a module to load and a dependency to inject,
//! a trailing `:` names a module only, and a bare string names a
//! dependency. Only the final character is inspected and stripped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{err_msg, SpecError};

pub const MODULE_AND_DEPENDENCY_SUFFIX: char = '+';
pub const MODULE_SUFFIX: char = ':';

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{Nl}_$][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}_$]*$").expect("identifier pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceRole {
    Module,
    Dependency,
    ModuleAndDependency,
}

impl ReferenceRole {
    pub fn loads_module(self) -> bool {
        matches!(self, ReferenceRole::Module | ReferenceRole::ModuleAndDependency)
    }

    pub fn injects(self) -> bool {
        matches!(
            self,
            ReferenceRole::Dependency | ReferenceRole::ModuleAndDependency
        )
    }
}

/// A decoded string entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    pub role: ReferenceRole,
}

impl Reference {
    pub fn decode(raw: &str) -> Self {
        let (name, role) = if let Some(name) = raw.strip_suffix(MODULE_AND_DEPENDENCY_SUFFIX) {
            (name, ReferenceRole::ModuleAndDependency)
        } else if let Some(name) = raw.strip_suffix(MODULE_SUFFIX) {
            (name, ReferenceRole::Module)
        } else {
            (raw, ReferenceRole::Dependency)
        };
        Self {
            name: name.to_string(),
            role,
        }
    }

    /// Checks that the reference can be emitted.
    ///
    /// Dependency names become variable and parameter names, so they are
    /// never empty, and with `identifiers` set they must be valid identifiers.
    /// Module names are emitted as string literals and may be anything.
    pub fn validate(&self, identifiers: bool) -> Result<(), SpecError> {
        if self.role.injects() && self.name.is_empty() {
            return Err(err_msg!(Reference, "empty {} name", self.role_name())
                .with_help("a dependency needs a name, written before any '+' suffix"));
        }
        if identifiers && self.role.injects() && !is_identifier(&self.name) {
            return Err(err_msg!(
                Reference,
                "dependency '{}' is not a valid identifier",
                self.name
            )
            .with_help("dependency names become variable names in the generated suite"));
        }
        Ok(())
    }

    fn role_name(&self) -> &'static str {
        match self.role {
            ReferenceRole::Module => "module",
            ReferenceRole::Dependency => "dependency",
            ReferenceRole::ModuleAndDependency => "module and dependency",
        }
    }
}

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}
