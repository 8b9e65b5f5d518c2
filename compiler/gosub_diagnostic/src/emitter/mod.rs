//! Diagnostic output.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn flush(&mut self);

    /// Closing line, "aborting due to previous error" and the like.
    /// Writes nothing for a count of zero.
    fn emit_summary(&mut self, error_count: usize);
}
