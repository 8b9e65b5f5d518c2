//! Stack growth for the recursive parser and code generator.
//!
//! Deeply nested source (long `else if` chains, parenthesised expressions)
//! recurses once per nesting level in both the parser and the compiler.

/// Grow the stack when fewer than this many bytes remain.
const RED_ZONE: usize = 64 * 1024;

/// Size of each additional stack segment.
const GROWTH: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
