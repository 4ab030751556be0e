//! Unified, `miette`-based diagnostics for the spec compiler.
//!
//! Every failure mode of loading, compiling, and executing a spec tree is a
//! [`SpecError`]. Construction goes through the `err_msg!` and `err_ctx!`
//! macros so call sites never build an [`ErrorContext`] by hand:
//!
//! - `err_msg!(Format, "expected sequence or callable for '{}'", path)`
//! - `err_ctx!(Load, message, source, span)`
//!
//! Errors raised while walking a tree built in Rust carry no source text;
//! errors raised while loading a document carry the document and a span.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

/// Byte range inside a loaded document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}

/// Type-safe error classification that mirrors the [`SpecError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A label is bound to something that is neither a callable nor a sequence.
    Format,
    /// An entry the compiler cannot place, rejected by policy.
    UnrecognizedEntry,
    /// A module or dependency name that cannot be emitted.
    Reference,
    /// A spec or config document could not be read or parsed.
    Load,
    /// The script host failed to compile or invoke the program.
    Host,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Format => "Format",
            ErrorType::UnrecognizedEntry => "UnrecognizedEntry",
            ErrorType::Reference => "Reference",
            ErrorType::Load => "Load",
            ErrorType::Host => "Host",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The document the error points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span inside `source` (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Unified error type for every spec compiler failure mode.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Spec format error: {message}")]
    Format {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Unrecognized entry: {message}")]
    UnrecognizedEntry {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Invalid reference: {message}")]
    Reference {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Load error: {message}")]
    Load {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Script host error: {message}")]
    Host {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl SpecError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            SpecError::Format { ctx, .. }
            | SpecError::UnrecognizedEntry { ctx, .. }
            | SpecError::Reference { ctx, .. }
            | SpecError::Load { ctx, .. }
            | SpecError::Host { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            SpecError::Format { message, .. }
            | SpecError::UnrecognizedEntry { message, .. }
            | SpecError::Reference { message, .. }
            | SpecError::Load { message, .. }
            | SpecError::Host { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            SpecError::Format { .. } => ErrorType::Format,
            SpecError::UnrecognizedEntry { .. } => ErrorType::UnrecognizedEntry,
            SpecError::Reference { .. } => ErrorType::Reference,
            SpecError::Load { .. } => ErrorType::Load,
            SpecError::Host { .. } => ErrorType::Host,
        }
    }

    /// Attaches an underlying cause to this error.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let slot = match &mut self {
            SpecError::Format { source, .. }
            | SpecError::UnrecognizedEntry { source, .. }
            | SpecError::Reference { source, .. }
            | SpecError::Load { source, .. }
            | SpecError::Host { source, .. } => source,
        };
        *slot = Some(Box::new(cause));
        self
    }

    /// Attaches a help message, replacing any existing one.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        let ctx = match &mut self {
            SpecError::Format { ctx, .. }
            | SpecError::UnrecognizedEntry { ctx, .. }
            | SpecError::Reference { ctx, .. }
            | SpecError::Load { ctx, .. }
            | SpecError::Host { ctx, .. } => ctx,
        };
        ctx.help = Some(help.into());
        self
    }
}

impl Diagnostic for SpecError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self.error_type() {
            ErrorType::Format => "specsuite::format",
            ErrorType::UnrecognizedEntry => "specsuite::unrecognized_entry",
            ErrorType::Reference => "specsuite::reference",
            ErrorType::Load => "specsuite::load",
            ErrorType::Host => "specsuite::host",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        // A span without a source has nothing to point into.
        ctx.source.as_ref()?;
        let span = ctx.span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts a document into an `Arc<NamedSource<String>>` for use in error contexts.
pub fn to_error_source(name: impl AsRef<str>, source: impl Into<String>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), source.into()))
}

/// Constructs a [`SpecError`] variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:literal $(, $arg:expr)* $(,)?) => {
        $crate::SpecError::$variant {
            message: format!($msg $(, $arg)*),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::SpecError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a [`SpecError`] variant pointing into a loaded document.
#[macro_export]
macro_rules! err_ctx {
    // Message, src, span, help
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::SpecError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    // Message, src, span
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::SpecError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: None,
            },
            source: None,
        }
    };
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn test_labelled_load_error_renders_source() {
        let src = to_error_source("suite.yaml", "Widget: 3\n");
        let err = crate::err_ctx!(
            Load,
            "unsupported value",
            &src,
            Span { start: 8, end: 9 },
            "use a sequence"
        );
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("unsupported value"));
        assert!(output.contains("use a sequence"));
        assert!(output.contains("suite.yaml"));
    }

    #[test]
    fn test_error_chaining() {
        let cause = crate::err_msg!(Format, "inner");
        let err = crate::err_msg!(Host, "outer").with_cause(cause);
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("outer"));
        assert!(output.contains("inner"));
    }

    #[test]
    fn test_source_is_none_until_a_cause_is_attached() {
        use std::error::Error as _;

        let bare = crate::err_msg!(Reference, "empty dependency name");
        assert!(bare.source().is_none());

        let wrapped = crate::err_msg!(Load, "failed to read 'a.yaml'")
            .with_cause(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let cause = wrapped.source().expect("cause is exposed");
        assert_eq!(cause.to_string(), "missing");
    }

    #[test]
    fn test_error_type_and_code() {
        let err = crate::err_msg!(Format, "expected sequence or callable for '{}'", "Widget");
        assert_eq!(err.error_type(), ErrorType::Format);
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("specsuite::format")
        );
        assert!(err.to_string().contains("'Widget'"));
        assert!(err.labels().is_none());
    }
}
