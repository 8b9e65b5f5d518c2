//! Gosub IR - shared front-end data structures.
//!
//! This crate holds everything the lexer, parser and code generator pass
//! between each other:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - The flat AST (expressions, statements, top-level declarations)
//! - `ParsedModule`, the declaration set of one source module
//!
//! # Design
//!
//! - **Intern identifiers**: strings become `Name(u32)`
//! - **Flatten trees**: children are `ExprId`/`StmtId` indices into an
//!   [`ExprArena`], lists are ranges into the same arena

mod arena;
pub mod ast;
mod interner;
mod span;
mod stack;
mod token;

pub use arena::ExprArena;
pub use ast::{
    AssignOp, BinaryOp, CaseRange, ConstDecl, Expr, ExprId, ExprKind, ExprRange, FieldInit,
    FieldInitRange, FuncDecl, FuncSig, ImportDecl, MethodSpec, MethodSpecRange, Param,
    ParamRange, ParsedModule, Stmt, StmtId, StmtKind, StmtRange, SwitchCase, TypeDecl, UnaryOp,
    VarDecl,
};
pub use interner::{Name, SharedInterner, StringInterner};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
pub use token::{LexError, Token, TokenKind, TokenList};
