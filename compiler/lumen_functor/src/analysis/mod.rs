//! Variable analyses and substitution built on the traversal traits.
//!
//! Binding is by identity: a `Var` handle is bound where it appears as a
//! function parameter or `let` binder, and free wherever it is used without
//! such a binder anywhere in the expression. The analysis does not track
//! scopes, since each variable object is expected to have one binding site.

use lumen_ir::{Expr, ExprKey, Function, Let, Var};
use rustc_hash::FxHashSet;

use crate::{
    rewrite_function, rewrite_let, rewrite_var, walk_function, walk_let, ExprMap, ExprMemo,
    ExprMutator, ExprVisitor, VisitCounter,
};

/// Collects every variable node, plus the binding sites, in visit order.
#[derive(Default)]
struct VarCollector {
    counter: VisitCounter,
    vars: Vec<Var>,
    bound: Vec<Var>,
    bound_keys: FxHashSet<ExprKey>,
}

impl VarCollector {
    fn run(expr: &Expr) -> Self {
        let mut collector = VarCollector::default();
        collector.visit_expr(expr);
        tracing::debug!(
            nodes = collector.counter.len(),
            vars = collector.vars.len(),
            bound = collector.bound.len(),
            "collected variables"
        );
        collector
    }

    fn bind(&mut self, var: &Var) {
        if self.bound_keys.insert(var.key()) {
            self.bound.push(var.clone());
        }
    }
}

impl ExprVisitor for VarCollector {
    fn visit_counter(&mut self) -> &mut VisitCounter {
        &mut self.counter
    }

    fn visit_var(&mut self, var: &Var) {
        self.vars.push(var.clone());
    }

    fn visit_function(&mut self, _expr: &Expr, function: &Function) {
        for param in &function.params {
            self.bind(param);
        }
        walk_function(self, function);
    }

    fn visit_let(&mut self, _expr: &Expr, let_: &Let) {
        self.bind(&let_.var);
        walk_let(self, let_);
    }
}

/// Every distinct variable reachable from `expr`, in first-visit order.
pub fn all_vars(expr: &Expr) -> Vec<Var> {
    VarCollector::run(expr).vars
}

/// Variables bound by a function parameter list or `let` in `expr`.
///
/// Ordered by the visit order of their binding site; a function's
/// parameters appear in declaration order.
pub fn bound_vars(expr: &Expr) -> Vec<Var> {
    VarCollector::run(expr).bound
}

/// Variables used in `expr` with no binding site inside it.
pub fn free_vars(expr: &Expr) -> Vec<Var> {
    let collector = VarCollector::run(expr);
    let VarCollector {
        vars, bound_keys, ..
    } = collector;
    vars.into_iter()
        .filter(|var| !bound_keys.contains(&var.key()))
        .collect()
}

/// Substitutes free variables by identity.
struct Binder<'a> {
    memo: ExprMemo,
    bindings: &'a ExprMap<Expr>,
}

impl Binder<'_> {
    fn check_not_bound(&self, var: &Var) {
        if self.bindings.contains(var.as_expr()) {
            panic!(
                "cannot substitute %{}: it is bound inside the expression",
                var.name_hint()
            );
        }
    }
}

impl ExprMutator for Binder<'_> {
    fn memo(&mut self) -> &mut ExprMemo {
        &mut self.memo
    }

    fn mutate_var(&mut self, var: &Var) -> Expr {
        match self.bindings.get(var.as_expr()) {
            Some(replacement) => replacement.clone(),
            None => rewrite_var(self, var),
        }
    }

    fn mutate_function(&mut self, expr: &Expr, function: &Function) -> Expr {
        for param in &function.params {
            self.check_not_bound(param);
        }
        rewrite_function(self, expr, function)
    }

    fn mutate_let(&mut self, expr: &Expr, let_: &Let) -> Expr {
        self.check_not_bound(&let_.var);
        rewrite_let(self, expr, let_)
    }
}

/// Replace each free variable that is a key of `bindings` with its value.
///
/// Unaffected subexpressions keep their identity, and a variable used in many
/// places is replaced by the same handle everywhere.
///
/// # Panics
///
/// Panics if a key of `bindings` is bound by a function parameter or `let`
/// inside `expr`.
pub fn bind(expr: &Expr, bindings: &ExprMap<Expr>) -> Expr {
    if bindings.is_empty() {
        return expr.clone();
    }
    let mut binder = Binder {
        memo: ExprMemo::new(),
        bindings,
    };
    let result = binder.mutate(expr);
    tracing::debug!(
        rewritten = binder.memo.len(),
        changed = !result.same_as(expr),
        "substituted variables"
    );
    result
}
