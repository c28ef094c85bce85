//! Stack growth guard for recursive region walks.
//!
//! Hardware designs can nest regions arbitrarily deep (generate blocks,
//! `ifdef` trees, procedural bodies). The IR walk recurses once per region,
//! so every recursive step goes through [`ensure_sufficient_stack`].
//!
//! - **Native targets**: grows the stack on demand with `stacker`.
//! - **WASM targets**: calls the closure directly.

/// Grow the stack once less than this much remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; run `f` as is.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
