//! Lumen functor - traversal framework for the Lumen IR
//!
//! - `ExprFunctor`: stateless per-kind dispatch with a fatal default
//! - `ExprVisitor`: read-only walk, each distinct node handled once
//! - `ExprMutator`: memoized copy-on-write rewrite that keeps unchanged
//!   nodes by identity
//! - `ExprMap`, `VisitCounter`, `ExprMemo`: identity-keyed bookkeeping
//! - `free_vars`, `bound_vars`, `all_vars`, `bind`, `post_order_visit`:
//!   passes built on the traits
//!
//! # Pass lifetime
//!
//! A visitor or mutator instance is one pass. Its counter or memo grows for
//! as long as the instance lives and is dropped with it; build a fresh
//! instance for every independent traversal. The graph itself is shared:
//! passes on different threads may walk the same root at once, each with its
//! own counter or memo.
//!
//! # Debugging
//!
//! - `RUST_LOG=lumen_functor=debug`: per-pass summaries.
//! - `RUST_LOG=lumen_functor=trace`: memo hits, skipped revisits, rebuilt
//!   nodes (very verbose).
//!
//! Call [`init_tracing`] once to install a subscriber that honors `RUST_LOG`.

mod analysis;
mod functor;
mod memo;
mod mutator;
mod visitor;

use std::sync::Once;

pub use analysis::{all_vars, bind, bound_vars, free_vars};
pub use functor::ExprFunctor;
pub use memo::{ExprMap, ExprMemo, VisitCounter};
pub use mutator::{
    rewrite_call, rewrite_expr, rewrite_function, rewrite_if, rewrite_let, rewrite_tuple,
    rewrite_tuple_get_item, rewrite_var, ExprMutator,
};
pub use visitor::{
    post_order_visit, walk_call, walk_expr, walk_function, walk_if, walk_let, walk_tuple,
    walk_tuple_get_item, walk_var, ExprVisitor,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Installs nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A test harness may have installed a global subscriber already.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
