//! Label classification.
//!
//! A label's role is never tagged explicitly: it is derived from its text.
//! Labels whose lowercase form starts with [`CASE_KEYWORD`] name a single
//! test case; every other label names a suite.

use serde::{Deserialize, Serialize};

/// Keyword that turns a label into a case.
pub const CASE_KEYWORD: &str = "should";

/// The role a label plays in the compiled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Suite,
    Case,
}

impl LabelKind {
    pub fn of(label: &str) -> Self {
        if is_case(label) {
            LabelKind::Case
        } else {
            LabelKind::Suite
        }
    }

    pub fn is_suite(self) -> bool {
        self == LabelKind::Suite
    }
}

impl std::fmt::Display for LabelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelKind::Suite => write!(f, "suite"),
            LabelKind::Case => write!(f, "case"),
        }
    }
}

pub fn is_case(label: &str) -> bool {
    label.to_lowercase().starts_with(CASE_KEYWORD)
}

pub fn is_suite(label: &str) -> bool {
    !is_case(label)
}
