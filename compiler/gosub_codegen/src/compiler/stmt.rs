use gosub_ir::{
    ensure_sufficient_stack, AssignOp, ExprId, ExprKind, ExprRange, Name, Span, StmtId, StmtKind,
    StmtRange,
};
use gosub_types::{FuncRec, Prim, TypeValue};

use super::call::slice_len;
use super::Compiler;
use crate::{CExpr, CompileError, CompileErrorKind, Value};

impl Compiler<'_> {
    /// Compiles a list of statements in a new scope.
    pub(crate) fn compile_block(&mut self, stmts: StmtRange) -> Result<(), CompileError> {
        self.push_scope();
        let result = self.compile_stmts(stmts);
        self.pop_scope();
        result
    }

    fn compile_stmts(&mut self, stmts: StmtRange) -> Result<(), CompileError> {
        let ids = self.ast.arena.get_stmt_list(stmts).to_vec();
        for id in ids {
            self.compile_stmt(id)?;
        }
        Ok(())
    }

    fn compile_stmt(&mut self, id: StmtId) -> Result<(), CompileError> {
        ensure_sufficient_stack(|| self.compile_stmt_inner(id))
    }

    fn compile_stmt_inner(&mut self, id: StmtId) -> Result<(), CompileError> {
        let stmt = *self.ast.arena.get_stmt(id);
        tracing::trace!(span = ?stmt.span, "statement");
        match stmt.kind {
            StmtKind::Assign { lhs, op, rhs } => self.compile_assign(lhs, op, rhs, stmt.span),
            StmtKind::Var { name, ty } => {
                let ty = self.compile_type(ty)?;
                let name = self.name(name);
                let c = self.declare_local(name, &ty, stmt.span)?;
                self.bind(name, Value::cexpr(c, ty));
                Ok(())
            }
            StmtKind::Return(values) => self.compile_return(values, stmt.span),
            StmtKind::Break(_) => self.compile_jump(self.break_label.clone(), "break", stmt.span),
            StmtKind::Continue(_) => {
                self.compile_jump(self.continue_label.clone(), "continue", stmt.span)
            }
            StmtKind::While { cond, body } => self.compile_loop(cond, None, body),
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                self.push_scope();
                let result = self.compile_for(init, cond, post, body);
                self.pop_scope();
                result
            }
            StmtKind::Range {
                key,
                value,
                coll,
                body,
            } => {
                self.push_scope();
                let result = self.compile_range(key, value, coll, body, stmt.span);
                self.pop_scope();
                result
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.compile_value(cond)?;
                self.line(&format!("{{ t_bool _if_ = {};", cond.c));
                self.line("if( _if_ ) {");
                self.compile_block(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.line("} else {");
                    self.compile_block(else_branch)?;
                }
                self.line("}}");
                Ok(())
            }
            StmtKind::Switch {
                subject,
                cases,
                default,
            } => self.compile_switch(subject, cases, default),
            StmtKind::Block(stmts) => {
                self.line("{");
                self.compile_block(stmts)?;
                self.line("}");
                Ok(())
            }
        }
    }

    fn compile_jump(
        &mut self,
        target: Option<String>,
        what: &str,
        span: Span,
    ) -> Result<(), CompileError> {
        match target {
            Some(label) => {
                self.line(&format!("goto {label};"));
                Ok(())
            }
            None => Err(self.error(
                span,
                CompileErrorKind::InvalidStatement(format!("cannot {what} from here")),
            )),
        }
    }

    /// `while(1)` with the condition checked first; `continue` jumps to
    /// `Cont_<n>`, which runs `post` before the next round.
    fn compile_loop(
        &mut self,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: StmtRange,
    ) -> Result<(), CompileError> {
        let label = self.gen.next_serial();
        self.line("while(1) {");
        if let Some(cond) = cond {
            let cond = self.compile_value(cond)?;
            self.line(&format!("t_bool _while_ = (t_bool)({});", cond.c));
            self.line("if (!_while_) break;");
        }
        self.compile_loop_body(label, body)?;
        self.line(&format!("Cont_{label}: {{}}"));
        if let Some(post) = post {
            self.compile_stmt(post)?;
        }
        self.line("}");
        self.line(&format!("Break_{label}: {{}}"));
        Ok(())
    }

    /// Three-clause `for`; the caller scopes the locals `init` declares.
    fn compile_for(
        &mut self,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: StmtRange,
    ) -> Result<(), CompileError> {
        if let Some(init) = init {
            self.compile_stmt(init)?;
        }
        self.compile_loop(cond, post, body)
    }

    fn compile_loop_body(&mut self, label: u32, body: StmtRange) -> Result<(), CompileError> {
        let saved_break = self.break_label.replace(format!("Break_{label}"));
        let saved_continue = self.continue_label.replace(format!("Cont_{label}"));
        let result = self.compile_block(body);
        self.break_label = saved_break;
        self.continue_label = saved_continue;
        result
    }

    /// `for k, v := range coll` over a slice or a string. The collection is
    /// copied once; `k` gets the index and `v` the element, a byte for
    /// strings.
    fn compile_range(
        &mut self,
        key: Option<Name>,
        value: Option<Name>,
        coll: ExprId,
        body: StmtRange,
        span: Span,
    ) -> Result<(), CompileError> {
        let coll_span = self.expr_span(coll);
        let coll = self.compile_value(coll)?;
        let is_string = coll.ty.is_prim(Prim::String);
        let Some(elem) = coll.ty.slice_element().or(is_string.then_some(TypeValue::BYTE)) else {
            return Err(self.error(
                coll_span,
                CompileErrorKind::Mismatch {
                    expected: "slice or string".to_owned(),
                    found: coll.ty.to_string(),
                    context: "in range".to_owned(),
                },
            ));
        };

        let label = self.gen.next_serial();
        let copy = self.temp(&coll.ty, span)?;
        let index = self.temp(&TypeValue::INT, span)?;
        let limit = self.temp(&TypeValue::INT, span)?;
        self.line(&format!("{copy} = {};", coll.c));
        self.line(&format!("{index} = -1;"));
        let len = if is_string {
            format!("({copy}).len")
        } else {
            slice_len(&copy, &elem)
        };
        self.line(&format!("{limit} = {len};"));

        let key = self.range_local(key, &TypeValue::INT, span)?;
        let value = self.range_local(value, &elem, span)?;

        self.line(&format!("while(1) {{ Cont_{label}: {{}}"));
        self.line(&format!("{index}++;"));
        self.line(&format!("if ({index} >= {limit}) break;"));
        if let Some(key) = key {
            self.line(&format!("{key} = {index};"));
        }
        if let Some(value) = value {
            if is_string {
                self.line(&format!("StringGet({copy}, {index}, &{value});"));
            } else {
                self.line(&format!(
                    "SliceGet({copy}, sizeof({}), {index}, &{value});",
                    elem.c_type()
                ));
            }
        }
        self.compile_loop_body(label, body)?;
        self.line("}");
        self.line(&format!("Break_{label}: {{}}"));
        Ok(())
    }

    /// The local a range clause binds `name` to; none for `_` or no name.
    fn range_local(
        &mut self,
        name: Option<Name>,
        ty: &TypeValue,
        span: Span,
    ) -> Result<Option<String>, CompileError> {
        let Some(name) = name.map(|n| self.name(n)).filter(|&n| n != "_") else {
            return Ok(None);
        };
        let c = self.declare_local(name, ty, span)?;
        self.bind(name, Value::cexpr(c.clone(), ty.clone()));
        Ok(Some(c))
    }

    /// An if-else chain comparing `_switch_` against each case; without a
    /// subject the cases are compared against `1`.
    fn compile_switch(
        &mut self,
        subject: Option<ExprId>,
        cases: gosub_ir::CaseRange,
        default: Option<StmtRange>,
    ) -> Result<(), CompileError> {
        let subject = match subject {
            Some(subject) => self.compile_value(subject)?.c,
            None => "1".to_owned(),
        };
        let cases = self.ast.arena.get_cases(cases).to_vec();
        let mut matches = Vec::with_capacity(cases.len());
        for case in &cases {
            let exprs = self.ast.arena.get_expr_list(case.matches).to_vec();
            let mut compiled = Vec::with_capacity(exprs.len());
            for expr in exprs {
                compiled.push(self.compile_value(expr)?.c);
            }
            matches.push(compiled);
        }

        self.line(&format!("{{ t_int _switch_ = {subject};"));
        for (case, matches) in cases.iter().zip(matches) {
            self.line("if (");
            for m in matches {
                self.line(&format!("_switch_ == {m} ||"));
            }
            self.line("0 ) {");
            self.compile_block(case.body)?;
            self.line("} else ");
        }
        self.line("{");
        if let Some(default) = default {
            self.compile_block(default)?;
        }
        self.line("}");
        self.line("}");
        Ok(())
    }

    fn compile_return(&mut self, values: ExprRange, span: Span) -> Result<(), CompileError> {
        let Some(func) = self.func.clone() else {
            return Err(self.error(
                span,
                CompileErrorKind::InvalidStatement("return outside of a function".to_owned()),
            ));
        };
        let values = self.ast.arena.get_expr_list(values).to_vec();
        let wanted = func.outputs.len();

        match values.as_slice() {
            [] => {
                if let Some(result) = self.named_result.clone() {
                    self.line(&format!("return {result};"));
                } else if wanted == 1 {
                    return Err(self.result_count(span, "Got 0 return values, but needs 1"));
                } else {
                    self.line("return;");
                }
            }
            [value] if wanted == 1 => {
                let value = self.compile_value(*value)?;
                let c = self.convert(&func.outputs[0].ty, value, span, "in return value")?;
                self.line(&format!("return {c};"));
            }
            [value] => {
                let value = self.compile_expr(*value)?;
                let value = self.to_cexpr(value, span)?;
                let Some(results) = value.ty.as_multi().filter(|r| r.len() == wanted) else {
                    return Err(self.result_count(
                        span,
                        &format!("Got 1 return value, but needs {wanted}"),
                    ));
                };
                self.line(&format!("{};", value.c));
                let results: Vec<CExpr> = results
                    .iter()
                    .map(|m| CExpr::new(m.name.clone(), m.ty.clone()))
                    .collect();
                self.return_through_pointers(&func, results, span)?;
            }
            values => {
                if values.len() != wanted {
                    return Err(self.result_count(
                        span,
                        &format!("Got {} return values, but needs {wanted}", values.len()),
                    ));
                }
                let mut results = Vec::with_capacity(values.len());
                for &value in values {
                    results.push(self.compile_value(value)?);
                }
                self.return_through_pointers(&func, results, span)?;
            }
        }
        Ok(())
    }

    fn return_through_pointers(
        &mut self,
        func: &FuncRec,
        results: Vec<CExpr>,
        span: Span,
    ) -> Result<(), CompileError> {
        for (j, (output, result)) in func.outputs.iter().zip(results).enumerate() {
            let c = self.convert(&output.ty, result, span, "in return value")?;
            self.line(&format!("*{} = {c};", func.output_c_name(j)));
        }
        self.line("return;");
        Ok(())
    }

    fn result_count(&self, span: Span, message: &str) -> CompileError {
        self.error(span, CompileErrorKind::ResultCount(message.to_owned()))
    }

    // Assignment

    fn compile_assign(
        &mut self,
        lhs: ExprRange,
        op: AssignOp,
        rhs: ExprRange,
        span: Span,
    ) -> Result<(), CompileError> {
        let lhs = self.ast.arena.get_expr_list(lhs).to_vec();
        let rhs = self.ast.arena.get_expr_list(rhs).to_vec();

        match op {
            AssignOp::Inc | AssignOp::Dec => {
                let [target] = lhs.as_slice() else {
                    return Err(self.invalid(span, "`++` and `--` take exactly one operand"));
                };
                let target = self.compile_lvalue(*target)?;
                self.line(&format!("({}){};", target.c, op.as_str()));
                Ok(())
            }
            AssignOp::Lone => {
                let [call] = rhs.as_slice() else {
                    return Err(self.invalid(span, "Lone expr is not a function call"));
                };
                if !matches!(self.ast.arena.get_expr(*call).kind, ExprKind::Call { .. }) {
                    return Err(self.invalid(span, "Lone expr is not a function call"));
                }
                let value = self.compile_expr(*call)?;
                let call = self.to_cexpr(value, span)?;
                self.line(&format!("{};", call.c));
                Ok(())
            }
            AssignOp::Compound(bin) => {
                let ([target], [value]) = (lhs.as_slice(), rhs.as_slice()) else {
                    return Err(self.invalid(
                        span,
                        &format!("`{}` takes one value on each side", op.as_str()),
                    ));
                };
                let target = self.compile_lvalue(*target)?;
                let value = self.compile_value(*value)?;
                self.line(&format!("({}) {}= ({});", target.c, bin.as_c_str(), value.c));
                Ok(())
            }
            AssignOp::Set | AssignOp::Define => {
                let define = op == AssignOp::Define;
                if lhs.len() > 1 && rhs.len() == 1 {
                    return self.compile_multi_assign(&lhs, rhs[0], define, span);
                }
                if lhs.len() != rhs.len() {
                    return Err(self.result_count(
                        span,
                        &format!(
                            "wrong number of values in assign: left has {}, right has {}",
                            lhs.len(),
                            rhs.len()
                        ),
                    ));
                }
                if define {
                    self.compile_define(&lhs, &rhs, span)
                } else {
                    for (&target, &value) in lhs.iter().zip(&rhs) {
                        let value = self.compile_value(value)?;
                        self.assign_to(target, value, span)?;
                    }
                    Ok(())
                }
            }
        }
    }

    /// `a, b := x, y`: every right side is compiled before the new locals
    /// come into scope.
    fn compile_define(
        &mut self,
        lhs: &[ExprId],
        rhs: &[ExprId],
        span: Span,
    ) -> Result<(), CompileError> {
        let names = self.define_names(lhs)?;
        let mut values = Vec::with_capacity(rhs.len());
        for &value in rhs {
            values.push(self.compile_value(value)?);
        }
        for (name, value) in names.into_iter().zip(values) {
            self.define_one(name, value, span)?;
        }
        Ok(())
    }

    /// `a, b = f()` and `a, b := f()`.
    fn compile_multi_assign(
        &mut self,
        lhs: &[ExprId],
        rhs: ExprId,
        define: bool,
        span: Span,
    ) -> Result<(), CompileError> {
        let names = if define { self.define_names(lhs)? } else { Vec::new() };
        let is_call = matches!(self.ast.arena.get_expr(rhs).kind, ExprKind::Call { .. });
        let value = self.compile_expr(rhs)?;
        let value = self.to_cexpr(value, span)?;

        let results = value.ty.as_multi();
        let got = match (&results, is_call) {
            (Some(results), _) => results.len(),
            (None, true) if value.ty.is_prim(Prim::Void) => 0,
            (None, _) => 1,
        };
        let Some(results) = results.filter(|_| got == lhs.len()) else {
            return Err(self.result_count(
                span,
                &format!(
                    "expected call with {} results, but got {got}",
                    lhs.len()
                ),
            ));
        };

        self.line(&format!("{};", value.c));
        for (j, result) in results.iter().enumerate() {
            let result = CExpr::new(result.name.clone(), result.ty.clone());
            if define {
                self.define_one(names[j], result, span)?;
            } else {
                self.assign_to(lhs[j], result, span)?;
            }
        }
        Ok(())
    }

    /// Left sides of `:=`, which must all be identifiers.
    fn define_names(&self, lhs: &[ExprId]) -> Result<Vec<Name>, CompileError> {
        lhs.iter()
            .map(|&id| {
                let expr = self.ast.arena.get_expr(id);
                match expr.kind {
                    ExprKind::Ident(name) => Ok(name),
                    _ => Err(self.error(
                        expr.span,
                        CompileErrorKind::InvalidTarget(
                            "non-name on left side of `:=`".to_owned(),
                        ),
                    )),
                }
            })
            .collect()
    }

    /// Declares a local for `name` typed after `value` and assigns it.
    fn define_one(&mut self, name: Name, value: CExpr, span: Span) -> Result<(), CompileError> {
        let name = self.name(name);
        if name == "_" {
            self.line(&format!("(void)({});", value.c));
            return Ok(());
        }
        let ty = if value.ty.is_prim(Prim::ConstInt) {
            TypeValue::INT
        } else {
            value.ty.clone()
        };
        if ty.is_prim(Prim::Nil) {
            return Err(self.invalid(span, &format!("use of untyped nil in definition of `{name}`")));
        }
        let c = self.declare_local(name, &ty, span)?;
        let converted = self.convert(&ty, value, span, "in definition")?;
        self.line(&format!("{c} = ({})({converted});", ty.c_type()));
        self.bind(name, Value::cexpr(c, ty));
        Ok(())
    }

    /// `target = value` with the explicit cast to the target's C type.
    fn assign_to(&mut self, target: ExprId, value: CExpr, span: Span) -> Result<(), CompileError> {
        if let ExprKind::Ident(name) = self.ast.arena.get_expr(target).kind {
            if self.name(name) == "_" {
                self.line(&format!("(void)({});", value.c));
                return Ok(());
            }
        }
        let target = self.compile_lvalue(target)?;
        let converted = self.convert(&target.ty, value, span, "in assignment")?;
        self.line(&format!(
            "{} = ({})({converted});",
            target.c,
            target.ty.c_type()
        ));
        Ok(())
    }

    fn compile_lvalue(&mut self, id: ExprId) -> Result<CExpr, CompileError> {
        let expr = *self.ast.arena.get_expr(id);
        let assignable = match expr.kind {
            ExprKind::Ident(name) => self.is_assignable_name(self.name(name)),
            ExprKind::Dot { .. } | ExprKind::Index { .. } => true,
            _ => false,
        };
        if !assignable {
            return Err(self.error(
                expr.span,
                CompileErrorKind::InvalidTarget("cannot assign to this expression".to_owned()),
            ));
        }
        let value = self.compile_expr(id)?;
        self.to_single(value, expr.span)
    }

    fn invalid(&self, span: Span, message: &str) -> CompileError {
        self.error(span, CompileErrorKind::InvalidStatement(message.to_owned()))
    }
}
