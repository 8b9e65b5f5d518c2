//! Compilation errors.

use gosub_diagnostic::{redefinition, type_mismatch, unknown_identifier, Diagnostic, ErrorCode};
use gosub_ir::Span;
use gosub_parse::ParseError;

/// A user-facing compilation error. The first one aborts the run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct CompileError {
    /// Module whose source `span` points into.
    pub module: String,
    pub span: Span,
    pub kind: CompileErrorKind,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileErrorKind {
    #[error("{0}")]
    Parse(ParseError),
    #[error("module `{0}` not found")]
    ModuleNotFound(String),
    #[error("cannot read module `{name}`: {reason}")]
    ModuleRead { name: String, reason: String },
    #[error("redefined global name: {name}")]
    Redefined { name: String, previous: Span },
    #[error("unknown identifier `{0}`")]
    UnknownIdent(String),
    #[error("`{0}` is used before its definition is resolved")]
    NotYetResolved(String),
    #[error("expected a type, found {0}")]
    NotAType(String),
    #[error("expected a value, found {0}")]
    NotAValue(String),
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    Mismatch {
        expected: String,
        found: String,
        context: String,
    },
    #[error("{0}")]
    ArgCount(String),
    #[error("{0}")]
    ResultCount(String),
    #[error("cannot find member {member} in {container}")]
    UnknownMember { member: String, container: String },
    #[error("{0}")]
    BadType(String),
    #[error("cannot call a value of type `{0}`")]
    NotCallable(String),
    #[error("expected *STRUCT receiver, found `{0}`")]
    BadReceiver(String),
    #[error("{0}")]
    InvalidStatement(String),
    #[error("constant `{0}` cannot declare a type")]
    TypedConst(String),
    #[error("{0}")]
    InvalidTarget(String),
    #[error("cannot store a value of type `{0}` in a variable")]
    NotStorable(String),
}

impl CompileErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileErrorKind::Parse(err) => err.code,
            CompileErrorKind::ModuleNotFound(_) => ErrorCode::E3001,
            CompileErrorKind::ModuleRead { .. } => ErrorCode::E3002,
            CompileErrorKind::Redefined { .. } => ErrorCode::E2006,
            CompileErrorKind::UnknownIdent(_) => ErrorCode::E2003,
            CompileErrorKind::NotYetResolved(_) | CompileErrorKind::BadType(_) => ErrorCode::E2008,
            CompileErrorKind::NotAType(_) => ErrorCode::E2002,
            CompileErrorKind::NotAValue(_) => ErrorCode::E2014,
            CompileErrorKind::Mismatch { .. } => ErrorCode::E2001,
            CompileErrorKind::ArgCount(_) => ErrorCode::E2004,
            CompileErrorKind::ResultCount(_) => ErrorCode::E2005,
            CompileErrorKind::UnknownMember { .. } => ErrorCode::E2007,
            CompileErrorKind::NotCallable(_) => ErrorCode::E2009,
            CompileErrorKind::BadReceiver(_) => ErrorCode::E2010,
            CompileErrorKind::InvalidStatement(_) => ErrorCode::E2011,
            CompileErrorKind::TypedConst(_) => ErrorCode::E2012,
            CompileErrorKind::InvalidTarget(_) => ErrorCode::E2013,
            CompileErrorKind::NotStorable(_) => ErrorCode::E2015,
        }
    }
}

impl CompileError {
    pub fn new(module: impl Into<String>, span: Span, kind: CompileErrorKind) -> Self {
        CompileError {
            module: module.into(),
            span,
            kind,
        }
    }

    pub fn parse(module: impl Into<String>, err: ParseError) -> Self {
        let span = err.span;
        Self::new(module, span, CompileErrorKind::Parse(err))
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = match &self.kind {
            CompileErrorKind::Parse(err) => return err.to_diagnostic(),
            CompileErrorKind::UnknownIdent(name) => unknown_identifier(self.span, name),
            CompileErrorKind::Mismatch {
                expected,
                found,
                context,
            } => type_mismatch(self.span, expected, found, context),
            CompileErrorKind::Redefined { name, previous } => {
                redefinition(self.span, name, *previous)
            }
            CompileErrorKind::TypedConst(_) => Diagnostic::error(self.code())
                .with_message(self.kind.to_string())
                .with_label(self.span, "declared here")
                .with_suggestion("remove the type; constants take the type of their value"),
            kind => Diagnostic::error(self.code())
                .with_message(kind.to_string())
                .with_label(self.span, kind.code().description()),
        };
        diag.with_note(format!("in module `{}`", self.module))
    }
}
