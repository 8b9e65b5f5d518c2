//! Flat AST for the gosub source language.
//!
//! Nodes live in an [`ExprArena`](crate::ExprArena) and refer to each other
//! by `ExprId`/`StmtId`; lists of children are ranges into the arena.

mod decl;
mod expr;
mod stmt;

pub use decl::{ConstDecl, FuncDecl, ImportDecl, ParsedModule, TypeDecl, VarDecl};
pub use expr::{
    BinaryOp, Expr, ExprKind, FieldInit, FuncSig, MethodSpec, Param, UnaryOp,
};
pub use stmt::{AssignOp, Stmt, StmtKind, SwitchCase};

macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    )* };
}

/// Range types store `start` and `len` into one of the arena's list vectors.
macro_rules! define_range {
    ($($name:ident),* $(,)?) => { $(
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: Self = Self { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                Self { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            #[inline]
            pub(crate) fn to_range(self) -> ::std::ops::Range<usize> {
                self.start as usize..(self.start + self.len) as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({}..{})", stringify!($name), self.start, self.start + self.len)
            }
        }
    )* };
}

define_id!(
    /// Index of an [`Expr`] in its arena.
    ExprId,
    /// Index of a [`Stmt`] in its arena.
    StmtId,
);

define_range!(
    ExprRange,
    StmtRange,
    ParamRange,
    FieldInitRange,
    MethodSpecRange,
    CaseRange,
);
