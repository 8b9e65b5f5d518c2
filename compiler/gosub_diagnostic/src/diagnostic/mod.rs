//! The [`Diagnostic`] record and the constructors shared by the parser and
//! the code generator.
//!
//! Compilation stops at the first error, so a diagnostic is always an error
//! report: one code, one headline, the spans it is about, then any number of
//! `note:` and `help:` lines.

use gosub_ir::Span;
use std::fmt;

use crate::ErrorCode;

/// Whether a span is the site of the error or context for it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LabelKind {
    Site,
    Context,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub kind: LabelKind,
    pub text: String,
}

impl Label {
    pub fn is_site(&self) -> bool {
        self.kind == LabelKind::Site
    }
}

#[must_use = "a diagnostic does nothing until it is emitted"]
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Vec<String>,
}

impl Diagnostic {
    /// A diagnostic whose headline is the code's description until
    /// [`with_message`](Self::with_message) replaces it.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: code.description().to_owned(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(self, span: Span, text: impl Into<String>) -> Self {
        self.push_label(span, LabelKind::Site, text.into())
    }

    pub fn with_secondary_label(self, span: Span, text: impl Into<String>) -> Self {
        self.push_label(span, LabelKind::Context, text.into())
    }

    fn push_label(mut self, span: Span, kind: LabelKind, text: String) -> Self {
        self.labels.push(Label { span, kind, text });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Where the error is: the first site label, if any.
    pub fn site(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_site()).map(|l| l.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        for label in &self.labels {
            let lead = if label.is_site() { "at" } else { "see" };
            write!(
                f,
                "\n  {lead} {}..{}: {}",
                label.span.start, label.span.end, label.text
            )?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        for help in &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

/// A value of type `found` used where `expected` is required.
///
/// `context` finishes the label, as in "expected `int` in argument 2".
#[cold]
pub fn type_mismatch(span: Span, expected: &str, found: &str, context: &str) -> Diagnostic {
    let label = if context.is_empty() {
        format!("expected `{expected}`")
    } else {
        format!("expected `{expected}` {context}")
    };
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("cannot use `{found}` as `{expected}`"))
        .with_label(span, label)
}

#[cold]
pub fn unknown_identifier(span: Span, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2003)
        .with_message(format!("undefined: `{name}`"))
        .with_label(span, "not declared in this module or scope")
}

/// A global or method defined twice in one module.
#[cold]
pub fn redefinition(span: Span, name: &str, previous: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2006)
        .with_message(format!("`{name}` is already defined in this module"))
        .with_label(span, "redefined here")
        .with_secondary_label(previous, "first defined here")
}

#[cfg(test)]
mod tests;
