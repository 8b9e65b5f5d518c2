//! Top-level declarations and the per-module declaration set.

use crate::{ExprArena, Name, Span};

use super::{ExprId, FuncSig, Param, StmtRange};

/// `import "name"`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ImportDecl {
    pub name: Name,
    pub span: Span,
}

/// `const name [type] = value`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ConstDecl {
    pub name: Name,
    pub ty: Option<ExprId>,
    pub value: ExprId,
    pub span: Span,
}

/// `var name [type] [= init]`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct VarDecl {
    pub name: Name,
    pub ty: Option<ExprId>,
    pub init: Option<ExprId>,
    pub span: Span,
}

/// `type name type-expr`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TypeDecl {
    pub name: Name,
    pub ty: ExprId,
    pub span: Span,
}

/// `func [(recv T)] name(sig) [body]`
///
/// `body` is `None` for native functions provided by the runtime.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FuncDecl {
    pub receiver: Option<Param>,
    pub name: Name,
    pub sig: FuncSig,
    pub body: Option<StmtRange>,
    pub span: Span,
}

/// Parsed declarations of one source module, grouped by kind in source
/// order, together with the arena that owns their trees.
#[derive(Clone, Default, Debug)]
pub struct ParsedModule {
    pub package: Option<Name>,
    pub imports: Vec<ImportDecl>,
    pub consts: Vec<ConstDecl>,
    pub vars: Vec<VarDecl>,
    pub types: Vec<TypeDecl>,
    pub funcs: Vec<FuncDecl>,
    /// Functions with a receiver.
    pub methods: Vec<FuncDecl>,
    pub arena: ExprArena,
}

impl ParsedModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of top-level declarations.
    pub fn decl_count(&self) -> usize {
        self.imports.len()
            + self.consts.len()
            + self.vars.len()
            + self.types.len()
            + self.funcs.len()
            + self.methods.len()
    }
}
