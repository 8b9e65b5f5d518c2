//! Error reporting for the gosub compiler.
//!
//! A [`Diagnostic`] carries a stable [`ErrorCode`], a headline, labelled
//! source spans and trailing note and help lines. [`emitter::TerminalEmitter`]
//! renders one for people, with a source excerpt when the text is available.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{redefinition, type_mismatch, unknown_identifier, Diagnostic, Label, LabelKind};
pub use error_code::{ErrorCode, Phase};
