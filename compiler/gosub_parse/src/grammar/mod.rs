//! Grammar productions, split by syntactic category.
//!
//! Each submodule adds `impl Parser` methods.

mod expr;
mod item;
mod stmt;
mod ty;
