//! Arena storage for one module's AST.

use crate::ast::{
    CaseRange, Expr, ExprId, ExprRange, FieldInit, FieldInitRange, MethodSpec, MethodSpecRange,
    Param, ParamRange, Stmt, StmtId, StmtRange, SwitchCase,
};

/// Contiguous storage for every node of one parsed module.
///
/// Children are referenced by index; child lists are ranges into the
/// flattened list vectors.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    stmts: Vec<Stmt>,
    stmt_lists: Vec<StmtId>,
    params: Vec<Param>,
    field_inits: Vec<FieldInit>,
    method_specs: Vec<MethodSpec>,
    cases: Vec<SwitchCase>,
}

/// Convert an arena length to a `u32` index.
#[inline]
fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("AST arena exceeded u32::MAX nodes"))
}

/// Append `items` to `storage`, returning `(start, len)` of the new run.
fn extend<T>(storage: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> (u32, u32) {
    let start = storage.len();
    storage.extend(items);
    (to_u32(start), to_u32(storage.len() - start))
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Expressions =====

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let (start, len) = extend(&mut self.expr_lists, ids);
        ExprRange::new(start, len)
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    // ===== Statements =====

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_u32(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    #[track_caller]
    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn alloc_stmt_list(&mut self, ids: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let (start, len) = extend(&mut self.stmt_lists, ids);
        StmtRange::new(start, len)
    }

    #[inline]
    pub fn get_stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.to_range()]
    }

    // ===== Auxiliary lists =====

    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let (start, len) = extend(&mut self.params, params);
        ParamRange::new(start, len)
    }

    #[inline]
    pub fn get_params(&self, range: ParamRange) -> &[Param] {
        &self.params[range.to_range()]
    }

    pub fn alloc_field_inits(
        &mut self,
        inits: impl IntoIterator<Item = FieldInit>,
    ) -> FieldInitRange {
        let (start, len) = extend(&mut self.field_inits, inits);
        FieldInitRange::new(start, len)
    }

    #[inline]
    pub fn get_field_inits(&self, range: FieldInitRange) -> &[FieldInit] {
        &self.field_inits[range.to_range()]
    }

    pub fn alloc_method_specs(
        &mut self,
        specs: impl IntoIterator<Item = MethodSpec>,
    ) -> MethodSpecRange {
        let (start, len) = extend(&mut self.method_specs, specs);
        MethodSpecRange::new(start, len)
    }

    #[inline]
    pub fn get_method_specs(&self, range: MethodSpecRange) -> &[MethodSpec] {
        &self.method_specs[range.to_range()]
    }

    pub fn alloc_cases(&mut self, cases: impl IntoIterator<Item = SwitchCase>) -> CaseRange {
        let (start, len) = extend(&mut self.cases, cases);
        CaseRange::new(start, len)
    }

    #[inline]
    pub fn get_cases(&self, range: CaseRange) -> &[SwitchCase] {
        &self.cases[range.to_range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, StmtKind};
    use crate::{Name, Span};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alloc_and_get_expr() {
        let mut arena = ExprArena::new();
        let one = arena.alloc_expr(Expr::new(ExprKind::Int(1), Span::new(0, 1)));
        let two = arena.alloc_expr(Expr::new(ExprKind::Int(2), Span::new(2, 3)));
        assert_eq!(arena.get_expr(one).kind, ExprKind::Int(1));
        assert_eq!(arena.get_expr(two).span, Span::new(2, 3));
        assert_eq!(arena.expr_count(), 2);
    }

    #[test]
    fn test_lists_do_not_overlap() {
        let mut arena = ExprArena::new();
        let a = arena.alloc_expr(Expr::new(ExprKind::Int(1), Span::DUMMY));
        let b = arena.alloc_expr(Expr::new(ExprKind::Int(2), Span::DUMMY));
        let first = arena.alloc_expr_list([a, b]);
        let second = arena.alloc_expr_list([b]);
        assert_eq!(arena.get_expr_list(first), &[a, b]);
        assert_eq!(arena.get_expr_list(second), &[b]);
        assert!(arena.get_expr_list(ExprRange::EMPTY).is_empty());
    }

    #[test]
    fn test_stmt_lists() {
        let mut arena = ExprArena::new();
        let brk = arena.alloc_stmt(Stmt::new(StmtKind::Break(None), Span::DUMMY));
        let body = arena.alloc_stmt_list([brk]);
        assert_eq!(body.len(), 1);
        assert_eq!(arena.get_stmt(arena.get_stmt_list(body)[0]).kind, StmtKind::Break(None));
    }

    #[test]
    fn test_params() {
        let mut arena = ExprArena::new();
        let ty = arena.alloc_expr(Expr::new(ExprKind::Ident(Name::EMPTY), Span::DUMMY));
        let params = arena.alloc_params([Param {
            name: Name::EMPTY,
            ty,
            span: Span::DUMMY,
        }]);
        assert_eq!(arena.get_params(params)[0].ty, ty);
        assert!(arena.get_params(ParamRange::EMPTY).is_empty());
    }
}
