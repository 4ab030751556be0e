//! Executors: the only place compiled specs cause side effects.
//!
//! [`execute`] hands program text to a [`ScriptHost`]; [`register`] drives a
//! [`Framework`] with the compiled blocks and their live callables.

pub mod host;
pub mod register;

pub use host::{execute, ScriptHost};
pub use register::{register, Framework};
