//! Statements and blocks.

use gosub_ir::{
    AssignOp, BinaryOp, ExprRange, Name, Span, Stmt, StmtId, StmtKind, StmtRange, SwitchCase,
    TokenKind,
};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> Result<StmtRange, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let stmts = self.parse_stmts_until(&[TokenKind::RBrace])?;
        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    /// Statements up to (not including) any of `end`.
    fn parse_stmts_until(&mut self, end: &[TokenKind]) -> Result<StmtRange, ParseError> {
        let mut ids = Vec::new();
        loop {
            self.cursor.skip_terminators();
            let kind = self.cursor.current_kind();
            if end.contains(&kind) {
                break;
            }
            if kind == TokenKind::Eof {
                return Err(self.unexpected("`}`"));
            }
            ids.push(self.parse_stmt()?);
            self.expect_terminator()?;
        }
        Ok(self.arena().alloc_stmt_list(ids))
    }

    fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        gosub_ir::ensure_sufficient_stack(|| {
            let start = self.cursor.current_span();
            let kind = match self.cursor.current_kind() {
                TokenKind::If => return self.parse_if(),
                TokenKind::For => self.parse_for()?,
                TokenKind::Switch => self.parse_switch()?,
                TokenKind::Return => {
                    self.cursor.advance();
                    let values = if self.at_stmt_end() {
                        ExprRange::EMPTY
                    } else {
                        self.parse_expr_list()?
                    };
                    StmtKind::Return(values)
                }
                TokenKind::Break => {
                    self.cursor.advance();
                    StmtKind::Break(self.parse_opt_label())
                }
                TokenKind::Continue => {
                    self.cursor.advance();
                    StmtKind::Continue(self.parse_opt_label())
                }
                TokenKind::Var => {
                    self.cursor.advance();
                    let (name, _) = self.expect_ident()?;
                    let ty = self.parse_type()?;
                    StmtKind::Var { name, ty }
                }
                TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
                _ => self.parse_simple_stmt()?,
            };
            let span = start.merge(self.cursor.previous_span());
            Ok(self.arena().alloc_stmt(Stmt::new(kind, span)))
        })
    }

    fn at_stmt_end(&self) -> bool {
        let kind = self.cursor.current_kind();
        kind.is_terminator() || kind == TokenKind::RBrace
    }

    fn parse_opt_label(&mut self) -> Option<Name> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Some(name)
            }
            _ => None,
        }
    }

    /// Assignment in all its forms, or a lone expression.
    fn parse_simple_stmt(&mut self) -> Result<StmtKind, ParseError> {
        let lhs = self.parse_expr_list()?;
        let op = match self.cursor.current_kind() {
            TokenKind::Eq => AssignOp::Set,
            TokenKind::ColonEq => AssignOp::Define,
            TokenKind::PlusEq => AssignOp::Compound(BinaryOp::Add),
            TokenKind::MinusEq => AssignOp::Compound(BinaryOp::Sub),
            TokenKind::StarEq => AssignOp::Compound(BinaryOp::Mul),
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.cursor.check(TokenKind::PlusPlus) {
                    AssignOp::Inc
                } else {
                    AssignOp::Dec
                };
                self.cursor.advance();
                return Ok(StmtKind::Assign {
                    lhs,
                    op,
                    rhs: ExprRange::EMPTY,
                });
            }
            _ => {
                return Ok(StmtKind::Assign {
                    lhs: ExprRange::EMPTY,
                    op: AssignOp::Lone,
                    rhs: lhs,
                });
            }
        };
        self.cursor.advance();
        let rhs = self.parse_expr_list()?;
        Ok(StmtKind::Assign { lhs, op, rhs })
    }

    /// `if cond { } [else { } | else if ...]`
    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.expect(TokenKind::If)?;
        let cond = self.parse_expr()?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.cursor.eat(TokenKind::Else) {
            if self.cursor.check(TokenKind::If) {
                let nested = self.parse_if()?;
                Some(self.arena().alloc_stmt_list([nested]))
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        let span = start.merge(self.cursor.previous_span());
        Ok(self.arena().alloc_stmt(Stmt::new(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        )))
    }

    /// `for { }`, `for cond { }`, `for [init]; [cond]; [post] { }` and the
    /// `range` forms.
    fn parse_for(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(TokenKind::For)?;
        if self.at_range_clause() {
            return self.parse_range();
        }
        if self.cursor.check(TokenKind::LBrace) {
            let body = self.parse_block()?;
            return Ok(StmtKind::While { cond: None, body });
        }

        let init = if self.cursor.check(TokenKind::Semicolon) {
            None
        } else {
            let start = self.cursor.current_span();
            let kind = self.parse_simple_stmt()?;
            if self.cursor.check(TokenKind::LBrace) {
                let cond = match kind {
                    StmtKind::Assign {
                        op: AssignOp::Lone,
                        rhs,
                        ..
                    } => match self.arena().get_expr_list(rhs) {
                        [cond] => Some(*cond),
                        _ => None,
                    },
                    _ => None,
                };
                let Some(cond) = cond else {
                    return Err(self.unexpected("`;`"));
                };
                let body = self.parse_block()?;
                return Ok(StmtKind::While {
                    cond: Some(cond),
                    body,
                });
            }
            Some(self.alloc_stmt_from(kind, start))
        };
        self.expect(TokenKind::Semicolon)?;

        let cond = if self.cursor.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;

        let post = if self.cursor.check(TokenKind::LBrace) {
            None
        } else {
            let start = self.cursor.current_span();
            let kind = self.parse_simple_stmt()?;
            Some(self.alloc_stmt_from(kind, start))
        };
        let body = self.parse_block()?;
        Ok(StmtKind::For {
            init,
            cond,
            post,
            body,
        })
    }

    fn alloc_stmt_from(&mut self, kind: StmtKind, start: Span) -> StmtId {
        let span = start.merge(self.cursor.previous_span());
        self.arena().alloc_stmt(Stmt::new(kind, span))
    }

    /// `range x`, `k := range x` or `k, v := range x` comes next.
    fn at_range_clause(&self) -> bool {
        let at = |n| self.cursor.peek_kind_at(n);
        match (at(0), at(1), at(2)) {
            (TokenKind::Range, ..) | (TokenKind::Ident(_), TokenKind::ColonEq, TokenKind::Range) => {
                true
            }
            (TokenKind::Ident(_), TokenKind::Comma, TokenKind::Ident(_)) => {
                at(3) == TokenKind::ColonEq && at(4) == TokenKind::Range
            }
            _ => false,
        }
    }

    fn parse_range(&mut self) -> Result<StmtKind, ParseError> {
        let (mut key, mut value) = (None, None);
        if !self.cursor.check(TokenKind::Range) {
            key = Some(self.expect_ident()?.0);
            if self.cursor.eat(TokenKind::Comma) {
                value = Some(self.expect_ident()?.0);
            }
            self.expect(TokenKind::ColonEq)?;
        }
        self.expect(TokenKind::Range)?;
        let coll = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(StmtKind::Range {
            key,
            value,
            coll,
            body,
        })
    }

    /// `switch [subject] { case a, b: ... default: ... }`
    fn parse_switch(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(TokenKind::Switch)?;
        let subject = if self.cursor.check(TokenKind::LBrace) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::LBrace)?;

        let mut cases = Vec::new();
        let mut default = None;
        let arm_end = [TokenKind::Case, TokenKind::Default, TokenKind::RBrace];
        loop {
            self.cursor.skip_terminators();
            match self.cursor.current_kind() {
                TokenKind::RBrace => break,
                TokenKind::Case => {
                    let start = self.cursor.advance().span;
                    let matches = self.parse_expr_list()?;
                    self.expect(TokenKind::Colon)?;
                    let body = self.parse_stmts_until(&arm_end)?;
                    cases.push(SwitchCase {
                        matches,
                        body,
                        span: start.merge(self.cursor.previous_span()),
                    });
                }
                TokenKind::Default => {
                    self.cursor.advance();
                    self.expect(TokenKind::Colon)?;
                    default = Some(self.parse_stmts_until(&arm_end)?);
                }
                _ => return Err(self.unexpected("`case`, `default` or `}`")),
            }
        }
        self.expect(TokenKind::RBrace)?;
        let cases = self.arena().alloc_cases(cases);
        Ok(StmtKind::Switch {
            subject,
            cases,
            default,
        })
    }
}
