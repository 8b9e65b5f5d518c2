//! Parse error type.

use gosub_diagnostic::{Diagnostic, ErrorCode, Phase};
use gosub_ir::{LexError, Span, TokenKind};

/// A syntax error. Parsing stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// What was being parsed, e.g. "function signature".
    pub context: Option<&'static str>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// `expected` was wanted but the current token is `found`.
    pub fn unexpected(expected: &str, found: TokenKind, span: Span) -> Self {
        if let TokenKind::Error(err) = found {
            return Self::lex(err, span);
        }
        let code = match found {
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
                if expected.starts_with('`') =>
            {
                ErrorCode::E1003
            }
            _ => ErrorCode::E1001,
        };
        Self::new(
            code,
            format!("expected {expected}, found {}", describe(found)),
            span,
        )
    }

    pub fn lex(err: LexError, span: Span) -> Self {
        let code = match err {
            LexError::InvalidCharacter => ErrorCode::E0001,
            LexError::OctalLiteral | LexError::IntegerOverflow => ErrorCode::E0002,
            LexError::BadCharLiteral => ErrorCode::E0003,
            LexError::BadEscape => ErrorCode::E0004,
        };
        Self::new(code, err.message(), span)
    }

    #[must_use]
    pub fn in_context(mut self, context: &'static str) -> Self {
        self.context.get_or_insert(context);
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.code {
            ErrorCode::E1003 => "unclosed here",
            code if code.phase() == Phase::Lex => "invalid token",
            _ => "unexpected token",
        };
        let diag = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, label);
        match self.context {
            Some(context) => diag.with_note(format!("while parsing {context}")),
            None => diag,
        }
    }
}

/// Token description for messages: keywords and punctuation in backticks.
pub(crate) fn describe(kind: TokenKind) -> String {
    match kind {
        TokenKind::Int(_)
        | TokenKind::Str(_)
        | TokenKind::Char(_)
        | TokenKind::Ident(_)
        | TokenKind::Newline
        | TokenKind::Eof
        | TokenKind::Error(_) => kind.display_name().to_string(),
        _ => format!("`{}`", kind.display_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unexpected_message() {
        let err = ParseError::unexpected("identifier", TokenKind::LParen, Span::new(3, 4));
        assert_eq!(err.code, ErrorCode::E1001);
        assert_eq!(err.message, "expected identifier, found `(`");
    }

    #[test]
    fn test_missing_closer_is_unclosed_delimiter() {
        let err = ParseError::unexpected("`)`", TokenKind::Newline, Span::new(9, 10));
        assert_eq!(err.code, ErrorCode::E1003);
        assert_eq!(err.message, "expected `)`, found end of line");
    }

    #[test]
    fn test_lex_error_passthrough() {
        let err = ParseError::unexpected(
            "expression",
            TokenKind::Error(LexError::OctalLiteral),
            Span::new(0, 4),
        );
        assert_eq!(err.code, ErrorCode::E0002);
        assert_eq!(err.message, "octal literals are not supported");
    }

    #[test]
    fn test_context_note() {
        let diag = ParseError::new(ErrorCode::E1005, "expected type", Span::DUMMY)
            .in_context("function signature")
            .in_context("module")
            .to_diagnostic();
        assert_eq!(diag.notes, vec!["while parsing function signature".to_string()]);
    }
}
