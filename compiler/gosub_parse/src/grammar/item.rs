//! Top-level declarations and function signatures.

use gosub_diagnostic::ErrorCode;
use gosub_ir::{
    ConstDecl, ExprId, ExprKind, FuncDecl, FuncSig, ImportDecl, Name, Param, ParamRange, Span,
    TokenKind, TypeDecl, VarDecl,
};

use crate::{ParseError, Parser};

/// One entry of a parenthesised parameter list before names are settled.
///
/// `a, b int` groups names, so a lone entry is a name when some later
/// entry is named and a type otherwise.
struct ParamItem {
    name: Option<(Name, Span)>,
    ty: Option<ExprId>,
    lone: Option<ExprId>,
}

impl Parser<'_> {
    /// Parse every top-level declaration until end of file.
    pub fn parse_module(&mut self) -> Result<(), ParseError> {
        loop {
            self.cursor.skip_terminators();
            match self.cursor.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Package => self.parse_package()?,
                TokenKind::Import => self.parse_import().map_err(|e| e.in_context("import"))?,
                TokenKind::Const => {
                    let decl = self
                        .parse_const()
                        .map_err(|e| e.in_context("const declaration"))?;
                    self.module.consts.push(decl);
                }
                TokenKind::Var => {
                    let decl = self
                        .parse_var()
                        .map_err(|e| e.in_context("var declaration"))?;
                    self.module.vars.push(decl);
                }
                TokenKind::Type => {
                    let decl = self
                        .parse_type_decl()
                        .map_err(|e| e.in_context("type declaration"))?;
                    self.module.types.push(decl);
                }
                TokenKind::Func => {
                    let decl = self
                        .parse_func()
                        .map_err(|e| e.in_context("function declaration"))?;
                    if decl.receiver.is_some() {
                        self.module.methods.push(decl);
                    } else {
                        self.module.funcs.push(decl);
                    }
                }
                _ => return Err(self.unexpected("declaration")),
            }
            self.expect_terminator()?;
            if self.cursor.check(TokenKind::RBrace) {
                return Err(self.unexpected("declaration"));
            }
        }
        tracing::debug!(decls = self.module.decl_count(), "parsed module");
        Ok(())
    }

    fn parse_package(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Package)?;
        let (name, _) = self.expect_ident()?;
        tracing::trace!(package = self.interner.lookup(name), "package clause");
        self.module.package = Some(name);
        Ok(())
    }

    /// `import "name"` or `import ( "a" \n "b" )`.
    fn parse_import(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Import)?;
        if self.cursor.eat(TokenKind::LParen) {
            loop {
                self.cursor.skip_terminators();
                if self.cursor.eat(TokenKind::RParen) {
                    break;
                }
                let decl = self.parse_import_path()?;
                self.module.imports.push(decl);
            }
        } else {
            let decl = self.parse_import_path()?;
            self.module.imports.push(decl);
        }
        Ok(())
    }

    fn parse_import_path(&mut self) -> Result<ImportDecl, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Str(name) => {
                let span = self.cursor.advance().span;
                Ok(ImportDecl { name, span })
            }
            _ => Err(self.unexpected("import path string")),
        }
    }

    /// `const name [type] = value`
    fn parse_const(&mut self) -> Result<ConstDecl, ParseError> {
        let start = self.expect(TokenKind::Const)?;
        let (name, _) = self.expect_ident()?;
        let ty = if self.cursor.check(TokenKind::Eq) {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        Ok(ConstDecl {
            name,
            ty,
            value,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// `var name [type] [= init]`
    fn parse_var(&mut self) -> Result<VarDecl, ParseError> {
        let start = self.expect(TokenKind::Var)?;
        let (name, _) = self.expect_ident()?;
        let ty = if self.cursor.check(TokenKind::Eq) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let init = if self.cursor.eat(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        if ty.is_none() && init.is_none() {
            return Err(self.unexpected("type or `=`"));
        }
        Ok(VarDecl {
            name,
            ty,
            init,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// `type name type-expr`
    fn parse_type_decl(&mut self) -> Result<TypeDecl, ParseError> {
        let start = self.expect(TokenKind::Type)?;
        let (name, _) = self.expect_ident()?;
        let ty = self.parse_type()?;
        Ok(TypeDecl {
            name,
            ty,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// `func [(recv T)] name(sig) [body]`
    fn parse_func(&mut self) -> Result<FuncDecl, ParseError> {
        let start = self.expect(TokenKind::Func)?;
        let receiver = if self.cursor.eat(TokenKind::LParen) {
            let (name, span) = self.expect_ident()?;
            let ty = self.parse_type()?;
            self.expect(TokenKind::RParen)?;
            Some(Param { name, ty, span })
        } else {
            None
        };
        let (name, _) = self.expect_ident()?;
        let sig = self
            .parse_signature()
            .map_err(|e| e.in_context("function signature"))?;
        let body = if self.cursor.check(TokenKind::LBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(FuncDecl {
            receiver,
            name,
            sig,
            body,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// `(inputs) [output | (outputs)]`
    pub(crate) fn parse_signature(&mut self) -> Result<FuncSig, ParseError> {
        let (inputs, variadic) = self.parse_param_list(true)?;
        let outputs = if self.cursor.check(TokenKind::LParen) {
            self.parse_param_list(false)?.0
        } else if self.starts_type() {
            let ty = self.parse_type()?;
            let span = self.expr_span(ty);
            self.arena().alloc_params([Param {
                name: Name::EMPTY,
                ty,
                span,
            }])
        } else {
            ParamRange::EMPTY
        };
        Ok(FuncSig {
            inputs,
            outputs,
            variadic,
        })
    }

    /// Parenthesised parameter list. Returns the params and whether the
    /// last one was variadic (`name ...T`, stored as `[]T`).
    fn parse_param_list(&mut self, allow_variadic: bool) -> Result<(ParamRange, bool), ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut items: Vec<ParamItem> = Vec::new();
        let mut variadic = false;

        loop {
            self.cursor.skip_newlines();
            if self.cursor.eat(TokenKind::RParen) {
                break;
            }
            if variadic {
                return Err(self.unexpected("`)` after variadic parameter"));
            }

            let item = if self.cursor.check(TokenKind::Ellipsis) {
                variadic = true;
                let ty = self.parse_variadic_type(allow_variadic)?;
                ParamItem {
                    name: None,
                    ty: None,
                    lone: Some(ty),
                }
            } else {
                let first = self.parse_type()?;
                match self.cursor.current_kind() {
                    TokenKind::Comma | TokenKind::RParen | TokenKind::Newline => ParamItem {
                        name: None,
                        ty: None,
                        lone: Some(first),
                    },
                    _ => {
                        let name = self.expr_as_name(first)?;
                        if self.cursor.check(TokenKind::Ellipsis) {
                            variadic = true;
                        }
                        let ty = if variadic {
                            self.parse_variadic_type(allow_variadic)?
                        } else {
                            self.parse_type()?
                        };
                        ParamItem {
                            name: Some(name),
                            ty: Some(ty),
                            lone: None,
                        }
                    }
                }
            };
            items.push(item);

            self.cursor.skip_newlines();
            if !self.cursor.eat(TokenKind::Comma) {
                self.cursor.skip_newlines();
                self.expect(TokenKind::RParen)?;
                break;
            }
        }

        let params = self.settle_params(items)?;
        let range = self.arena().alloc_params(params);
        Ok((range, variadic))
    }

    fn parse_variadic_type(&mut self, allow: bool) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::Ellipsis)?;
        if !allow {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "variadic `...` is only allowed on the last input",
                start,
            ));
        }
        let elem = self.parse_type()?;
        let span = start.merge(self.expr_span(elem));
        Ok(self.alloc_expr(ExprKind::SliceType(elem), span))
    }

    /// Resolve grouped names: in `(a, b int, c string)` the lone `a`
    /// takes the type of the next named entry.
    fn settle_params(&mut self, items: Vec<ParamItem>) -> Result<Vec<Param>, ParseError> {
        let any_named = items.iter().any(|i| i.name.is_some());
        let mut params = Vec::with_capacity(items.len());
        let mut pending: Vec<(Name, Span)> = Vec::new();

        for item in items {
            match (item.name, item.ty, item.lone) {
                (Some((name, span)), Some(ty), _) => {
                    for (pending_name, pending_span) in pending.drain(..) {
                        params.push(Param {
                            name: pending_name,
                            ty,
                            span: pending_span,
                        });
                    }
                    params.push(Param { name, ty, span });
                }
                (_, _, Some(lone)) if any_named => {
                    pending.push(self.expr_as_name(lone)?);
                }
                (_, _, Some(lone)) => {
                    let span = self.expr_span(lone);
                    params.push(Param {
                        name: Name::EMPTY,
                        ty: lone,
                        span,
                    });
                }
                _ => {}
            }
        }

        if let Some((_, span)) = pending.first() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "parameter is missing a type",
                *span,
            ));
        }
        Ok(params)
    }

    /// A bare identifier expression used where a name is expected.
    fn expr_as_name(&self, id: ExprId) -> Result<(Name, Span), ParseError> {
        let expr = self.module.arena.get_expr(id);
        match expr.kind {
            ExprKind::Ident(name) => Ok((name, expr.span)),
            _ => Err(ParseError::new(
                ErrorCode::E1004,
                "expected parameter name",
                expr.span,
            )),
        }
    }
}
