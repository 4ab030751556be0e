//! The debug channel.
//!
//! When debugging is enabled the compiler writes every suite's partition and
//! the fragments it produced to a [`DebugSink`]. Sinks only observe; nothing
//! written here feeds back into the compiled output.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

pub trait DebugSink {
    fn emit(&mut self, text: &str);
}

/// Writes each message as a line on stderr.
pub struct StderrSink;

impl DebugSink for StderrSink {
    fn emit(&mut self, text: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{text}");
    }
}

/// Collects messages into a string for tests or programmatic capture.
#[derive(Debug, Default)]
pub struct DebugBuffer {
    pub buffer: String,
}

impl DebugBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl DebugSink for DebugBuffer {
    fn emit(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
    }
}

/// A sink the compiler and its caller can both hold.
pub type SharedSink = Rc<RefCell<dyn DebugSink>>;

pub fn shared<S: DebugSink + 'static>(sink: S) -> Rc<RefCell<S>> {
    Rc::new(RefCell::new(sink))
}
