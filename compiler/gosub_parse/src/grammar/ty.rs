//! Type expressions.

use gosub_diagnostic::ErrorCode;
use gosub_ir::{ExprId, ExprKind, MethodSpec, Param, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Whether the current token can begin a type expression.
    pub(crate) fn starts_type(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Ident(_)
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::Map
                | TokenKind::Struct
                | TokenKind::Interface
        )
    }

    /// `T`, `pkg.T`, `*T`, `[]T`, `map[K]V`, `struct {...}`,
    /// `interface {...}`, `(T)`
    pub(crate) fn parse_type(&mut self) -> Result<ExprId, ParseError> {
        gosub_ir::ensure_sufficient_stack(|| self.parse_type_inner())
    }

    fn parse_type_inner(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                let mut ty = self.alloc_expr(ExprKind::Ident(name), start);
                if self.cursor.eat(TokenKind::Dot) {
                    let (member, span) = self.expect_ident()?;
                    ty = self.alloc_expr(
                        ExprKind::Dot {
                            receiver: ty,
                            member,
                        },
                        start.merge(span),
                    );
                }
                Ok(ty)
            }
            TokenKind::Star => {
                self.cursor.advance();
                let inner = self.parse_type()?;
                let span = start.merge(self.expr_span(inner));
                Ok(self.alloc_expr(ExprKind::PointerType(inner), span))
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                self.expect(TokenKind::RBracket)?;
                let elem = self.parse_type()?;
                let span = start.merge(self.expr_span(elem));
                Ok(self.alloc_expr(ExprKind::SliceType(elem), span))
            }
            TokenKind::Map => {
                self.cursor.advance();
                self.expect(TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.parse_type()?;
                let span = start.merge(self.expr_span(value));
                Ok(self.alloc_expr(ExprKind::MapType { key, value }, span))
            }
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Error(err) => Err(ParseError::lex(err, start)),
            found => Err(ParseError::new(
                ErrorCode::E1005,
                format!("expected type, found {}", crate::error::describe(found)),
                start,
            )),
        }
    }

    /// `struct { name type ... }`, fields separated by newlines or `;`.
    fn parse_struct_type(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::Struct)?;
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        loop {
            self.cursor.skip_terminators();
            if self.cursor.check(TokenKind::RBrace) {
                break;
            }
            let (name, span) = self.expect_ident()?;
            let ty = self.parse_type()?;
            fields.push(Param { name, ty, span });
            self.expect_terminator()?;
        }
        let end = self.expect(TokenKind::RBrace)?;
        let fields = self.arena().alloc_params(fields);
        Ok(self.alloc_expr(ExprKind::StructType(fields), start.merge(end)))
    }

    /// `interface { Meth(sig) ... }`
    fn parse_interface_type(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::Interface)?;
        self.expect(TokenKind::LBrace)?;
        let mut methods = Vec::new();
        loop {
            self.cursor.skip_terminators();
            if self.cursor.check(TokenKind::RBrace) {
                break;
            }
            let (name, span) = self.expect_ident()?;
            let sig = self.parse_signature()?;
            methods.push(MethodSpec {
                name,
                sig,
                span: span.merge(self.cursor.previous_span()),
            });
            self.expect_terminator()?;
        }
        let end = self.expect(TokenKind::RBrace)?;
        let methods = self.arena().alloc_method_specs(methods);
        Ok(self.alloc_expr(ExprKind::InterfaceType(methods), start.merge(end)))
    }
}
