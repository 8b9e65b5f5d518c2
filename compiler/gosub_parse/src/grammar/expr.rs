//! Expressions, lowest to highest precedence:
//! `||`, `&&`, relational, additive, multiplicative, unary, postfix.

use gosub_diagnostic::ErrorCode;
use gosub_ir::{BinaryOp, ExprId, ExprKind, ExprRange, FieldInit, TokenKind, UnaryOp};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        gosub_ir::ensure_sufficient_stack(|| self.parse_or())
    }

    /// Comma-separated expressions, at least one.
    pub(crate) fn parse_expr_list(&mut self) -> Result<ExprRange, ParseError> {
        let mut ids = vec![self.parse_expr()?];
        while self.cursor.eat(TokenKind::Comma) {
            ids.push(self.parse_expr()?);
        }
        Ok(self.arena().alloc_expr_list(ids))
    }

    fn parse_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_and()?;
        while self.cursor.eat(TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_relational()?;
        while self.cursor.eat(TokenKind::AmpAmp) {
            let right = self.parse_relational()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_sum()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_sum()?;
            left = self.binary(op, left, right);
        }
    }

    fn parse_sum(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_product()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Pipe => BinaryOp::BitOr,
                TokenKind::Caret => BinaryOp::BitXor,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_product()?;
            left = self.binary(op, left, right);
        }
    }

    fn parse_product(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                TokenKind::Shl => BinaryOp::Shl,
                TokenKind::Shr => BinaryOp::Shr,
                TokenKind::Amp => BinaryOp::BitAnd,
                TokenKind::AmpCaret => BinaryOp::AndNot,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.expr_span(left).merge(self.expr_span(right));
        self.alloc_expr(ExprKind::Binary { op, left, right }, span)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let op = match self.cursor.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Amp => return self.parse_ctor(),
            _ => return self.parse_postfix(),
        };
        self.cursor.advance();
        let operand = gosub_ir::ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(self.expr_span(operand));
        Ok(self.alloc_expr(ExprKind::Unary { op, operand }, span))
    }

    /// `&T{field: value, ...}`; the colon is optional.
    fn parse_ctor(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::Amp)?;
        let (name, name_span) = self.expect_ident()?;
        let mut ty = self.alloc_expr(ExprKind::Ident(name), name_span);
        if self.cursor.eat(TokenKind::Dot) {
            let (member, span) = self.expect_ident()?;
            ty = self.alloc_expr(
                ExprKind::Dot {
                    receiver: ty,
                    member,
                },
                name_span.merge(span),
            );
        }
        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        loop {
            self.cursor.skip_newlines();
            if self.cursor.check(TokenKind::RBrace) {
                break;
            }
            let (name, span) = self.expect_ident()?;
            self.cursor.eat(TokenKind::Colon);
            let value = self.parse_expr()?;
            fields.push(FieldInit {
                name,
                value,
                span: span.merge(self.expr_span(value)),
            });
            self.cursor.skip_newlines();
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.skip_newlines();
        let end = self.expect(TokenKind::RBrace)?;
        let fields = self.arena().alloc_field_inits(fields);
        Ok(self.alloc_expr(ExprKind::Ctor { ty, fields }, start.merge(end)))
    }

    /// Primary followed by any number of `(args)`, `[index]`, `[lo:hi]`,
    /// `.member`.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = self.expr_span(expr);
            match self.cursor.current_kind() {
                TokenKind::LParen => {
                    self.cursor.advance();
                    let (args, spread) = self.parse_call_args()?;
                    let end = self.expect(TokenKind::RParen)?;
                    expr = self.alloc_expr(
                        ExprKind::Call {
                            func: expr,
                            args,
                            spread,
                        },
                        start.merge(end),
                    );
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let kind = self.parse_subscript(expr)?;
                    let end = self.expect(TokenKind::RBracket)?;
                    expr = self.alloc_expr(kind, start.merge(end));
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (member, end) = self.expect_ident()?;
                    expr = self.alloc_expr(
                        ExprKind::Dot {
                            receiver: expr,
                            member,
                        },
                        start.merge(end),
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `[i]` or `[lo:hi]` after the opening bracket, up to the closing one.
    fn parse_subscript(&mut self, receiver: ExprId) -> Result<ExprKind, ParseError> {
        self.cursor.skip_newlines();
        let lo = if self.cursor.check(TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.skip_newlines();
        if !self.cursor.eat(TokenKind::Colon) {
            let Some(index) = lo else {
                return Err(self.unexpected("`:`"));
            };
            return Ok(ExprKind::Index { receiver, index });
        }
        self.cursor.skip_newlines();
        let hi = if self.cursor.check(TokenKind::RBracket) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.skip_newlines();
        Ok(ExprKind::SliceExpr { receiver, lo, hi })
    }

    /// Arguments up to (not including) `)`. A trailing `...` after the last
    /// argument spreads it.
    fn parse_call_args(&mut self) -> Result<(ExprRange, bool), ParseError> {
        let mut args = Vec::new();
        let mut spread = false;
        loop {
            self.cursor.skip_newlines();
            if self.cursor.check(TokenKind::RParen) {
                break;
            }
            args.push(self.parse_expr()?);
            if self.cursor.eat(TokenKind::Ellipsis) {
                spread = true;
                self.cursor.eat(TokenKind::Comma);
                self.cursor.skip_newlines();
                break;
            }
            self.cursor.skip_newlines();
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok((self.arena().alloc_expr_list(args), spread))
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = *self.cursor.current();
        match token.kind {
            TokenKind::Int(n) | TokenKind::Char(n) => {
                self.cursor.advance();
                Ok(self.alloc_expr(ExprKind::Int(n), token.span))
            }
            TokenKind::Str(s) => {
                self.cursor.advance();
                Ok(self.alloc_expr(ExprKind::Str(s), token.span))
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(self.alloc_expr(ExprKind::Ident(name), token.span))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                self.cursor.skip_newlines();
                let inner = self.parse_expr()?;
                self.cursor.skip_newlines();
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Star
            | TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Struct
            | TokenKind::Interface => self.parse_type(),
            TokenKind::Error(err) => Err(ParseError::lex(err, token.span)),
            found => Err(ParseError::new(
                ErrorCode::E1002,
                format!("expected expression, found {}", crate::error::describe(found)),
                token.span,
            )),
        }
    }
}
