//! The root executor.

use crate::emit::Fragment;
use crate::{err_msg, SpecError};

/// A dynamic compilation facility: turns program text into an invokable unit
/// and invokes it against an ambient scope.
pub trait ScriptHost {
    /// The ambient scope the program is invoked against.
    type Scope: ?Sized;
    type Unit;
    type Error: std::error::Error + Send + Sync + 'static;

    fn compile(&mut self, program: &str) -> Result<Self::Unit, Self::Error>;

    fn invoke(&mut self, unit: Self::Unit, scope: &mut Self::Scope) -> Result<(), Self::Error>;
}

/// Compiles `program` once and invokes it once. Host failures are passed
/// through as the cause of a [`SpecError::Host`].
pub fn execute<H: ScriptHost + ?Sized>(
    host: &mut H,
    program: &Fragment,
    scope: &mut H::Scope,
) -> Result<(), SpecError> {
    tracing::debug!(bytes = program.as_str().len(), "compiling generated program");
    let unit = host
        .compile(program.as_str())
        .map_err(|e| err_msg!(Host, "the generated program failed to compile").with_cause(e))?;
    host.invoke(unit, scope)
        .map_err(|e| err_msg!(Host, "the generated program failed when invoked").with_cause(e))
}
