//! Stack guard for the recursive walkers of the Rhino front-end.
//!
//! Name resolution, type resolution and checking all recurse over nested
//! blocks and expression trees. Source programs control that depth, so each
//! recursive step runs through [`ensure_sufficient_stack`], which grows the
//! stack on native targets when the remaining space drops below the red zone.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
///
/// On `wasm32` this is a direct call.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
