//! Parser for the gosub source language.
//!
//! Recursive descent over the lexer's [`TokenList`], producing a
//! [`ParsedModule`]: the module's declarations grouped by kind, with all
//! expression and statement trees stored in its arena.
//!
//! Grammar notes:
//! - Newlines terminate declarations and statements; inside `(...)` and
//!   `[...]` they are skipped.
//! - Type expressions are parsed as expressions (`*T`, `[]T`, `map[K]V`,
//!   `struct {...}`, `interface {...}`).
//! - A composite literal is only recognised after `&`, so `if x {` is never
//!   ambiguous.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use gosub_diagnostic::ErrorCode;
use gosub_ir::{
    Expr, ExprArena, ExprId, ExprKind, Name, ParsedModule, Span, StringInterner, TokenKind,
    TokenList,
};

/// Parse a token stream into a module's declaration set.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<ParsedModule, ParseError> {
    let mut parser = Parser::new(tokens, interner);
    parser.parse_module()?;
    Ok(parser.finish())
}

/// Parser state: token cursor plus the module being built.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
    module: ParsedModule,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            interner,
            module: ParsedModule::new(),
        }
    }

    pub fn finish(self) -> ParsedModule {
        self.module
    }

    #[inline]
    fn arena(&mut self) -> &mut ExprArena {
        &mut self.module.arena
    }

    fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena().alloc_expr(Expr::new(kind, span))
    }

    fn expr_span(&self, id: ExprId) -> Span {
        self.module.arena.get_expr(id).span
    }

    /// Consume `kind` or fail with "expected `kind`".
    fn expect(&mut self, kind: TokenKind) -> Result<Span, ParseError> {
        if self.cursor.check(kind) {
            Ok(self.cursor.advance().span)
        } else {
            Err(self.unexpected(&format!("`{}`", kind.display_name())))
        }
    }

    fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.cursor.advance().span;
                Ok((name, span))
            }
            found => Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected identifier, found {}", error::describe(found)),
                self.cursor.current_span(),
            )),
        }
    }

    /// A declaration or statement must be followed by end of line, `;`,
    /// end of file, or (inside a block) the closing `}`.
    fn expect_terminator(&mut self) -> Result<(), ParseError> {
        let kind = self.cursor.current_kind();
        if kind.is_terminator() || kind == TokenKind::RBrace {
            return Ok(());
        }
        if let TokenKind::Error(err) = kind {
            return Err(ParseError::lex(err, self.cursor.current_span()));
        }
        Err(ParseError::new(
            ErrorCode::E1006,
            format!("expected end of line, found {}", error::describe(kind)),
            self.cursor.current_span(),
        ))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(
            expected,
            self.cursor.current_kind(),
            self.cursor.current_span(),
        )
    }
}
