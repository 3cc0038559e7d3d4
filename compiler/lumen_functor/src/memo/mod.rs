//! Identity-keyed bookkeeping for one traversal pass.
//!
//! Every table here retains a handle to each key node. That keeps the node
//! alive for as long as the table, so an `ExprKey` can never be recycled by a
//! fresh allocation while the pass is still consulting it.

use std::fmt;

use lumen_ir::{Expr, ExprKey};
use rustc_hash::FxHashMap;

/// Map from expression identity to `V`.
///
/// Two structurally equal but separately built nodes are distinct keys.
pub struct ExprMap<V> {
    entries: FxHashMap<ExprKey, (Expr, V)>,
}

impl<V> ExprMap<V> {
    pub fn new() -> Self {
        ExprMap {
            entries: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn get(&self, expr: &Expr) -> Option<&V> {
        self.entries.get(&expr.key()).map(|(_, value)| value)
    }

    #[inline]
    pub fn get_mut(&mut self, expr: &Expr) -> Option<&mut V> {
        self.entries.get_mut(&expr.key()).map(|(_, value)| value)
    }

    #[inline]
    pub fn contains(&self, expr: &Expr) -> bool {
        self.entries.contains_key(&expr.key())
    }

    /// Insert `value` for `expr`, returning the previous value if any.
    pub fn insert(&mut self, expr: Expr, value: V) -> Option<V> {
        self.entries
            .insert(expr.key(), (expr, value))
            .map(|(_, old)| old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Expr, &V)> {
        self.entries.values().map(|(expr, value)| (expr, value))
    }
}

impl<V> Default for ExprMap<V> {
    fn default() -> Self {
        ExprMap::new()
    }
}

impl<V> FromIterator<(Expr, V)> for ExprMap<V> {
    fn from_iter<I: IntoIterator<Item = (Expr, V)>>(iter: I) -> Self {
        let mut map = ExprMap::new();
        for (expr, value) in iter {
            map.insert(expr, value);
        }
        map
    }
}

impl<V: fmt::Debug> fmt::Debug for ExprMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, (_, value))| (key, value)))
            .finish()
    }
}

/// Per-node visit counts of an `ExprVisitor`.
///
/// A node is recorded with count 1 after its handler finishes; every later
/// arrival at the same node bumps the count without re-running the handler.
/// The count is therefore the number of parent edges traversed into the node
/// (plus one for the root).
#[derive(Default, Debug)]
pub struct VisitCounter {
    counts: ExprMap<usize>,
}

impl VisitCounter {
    pub fn new() -> Self {
        VisitCounter::default()
    }

    /// Bump the count of an already processed node.
    ///
    /// Returns `false` (and records nothing) if the node was never processed.
    pub(crate) fn revisit(&mut self, expr: &Expr) -> bool {
        match self.counts.get_mut(expr) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Mark `expr` as processed.
    pub(crate) fn record(&mut self, expr: &Expr) {
        self.counts.insert(expr.clone(), 1);
    }

    /// How many times `expr` was reached; 0 if never.
    pub fn count(&self, expr: &Expr) -> usize {
        self.counts.get(expr).copied().unwrap_or(0)
    }

    /// Number of distinct nodes processed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Nodes reached from more than one parent, with their counts.
    pub fn shared(&self) -> impl Iterator<Item = (&Expr, usize)> {
        self.counts
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(expr, &count)| (expr, count))
    }
}

/// Rewrite cache of an `ExprMutator`: source node identity to its result.
///
/// Append-only for the life of the mutator.
#[derive(Default, Debug)]
pub struct ExprMemo {
    rewritten: ExprMap<Expr>,
}

impl ExprMemo {
    pub fn new() -> Self {
        ExprMemo::default()
    }

    /// Rewritten form of `expr`, if it has been mutated already.
    #[inline]
    pub fn get(&self, expr: &Expr) -> Option<&Expr> {
        self.rewritten.get(expr)
    }

    pub(crate) fn insert(&mut self, source: Expr, rewritten: Expr) {
        self.rewritten.insert(source, rewritten);
    }

    /// Number of distinct nodes rewritten.
    pub fn len(&self) -> usize {
        self.rewritten.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewritten.is_empty()
    }
}
