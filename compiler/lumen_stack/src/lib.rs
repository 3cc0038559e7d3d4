//! Stack growth for recursive IR traversal.
//!
//! Visitors and mutators recurse once per level of expression nesting, so a
//! long chain of `let` bindings or a deeply nested tuple can exhaust the
//! thread's stack. Wrapping each recursive step in [`ensure_sufficient_stack`]
//! grows the stack on demand instead.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker` allocates a fresh stack segment when the
//!   remaining space drops below the red zone.
//! - **WASM targets**: No-op passthrough.
//!
//! # Configuration
//!
//! - **Red zone**: 100KB
//! - **Growth size**: 1MB per new segment

/// Minimum stack space to keep available before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated each time the red zone is hit.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// ```text
/// fn visit_expr(&mut self, expr: &Expr) {
///     ensure_sufficient_stack(|| dispatch(self, expr));
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
