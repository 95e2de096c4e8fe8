//! Stack growth for deep recursion in the tree walker.
//!
//! Each user‑level call re‑enters `evaluate`/`execute` several frames deep, so
//! a few hundred nested calls can exhaust a small thread stack (test threads
//! get 2 MB).  Wrapping the call boundary in [`ensure_sufficient_stack`] moves
//! execution onto a freshly allocated segment whenever the remaining space
//! drops below the red zone; the interpreter's own call‑depth limit then
//! decides when recursion becomes a runtime fault.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
