//! Generic per-kind dispatch.
//!
//! `ExprFunctor` maps an expression to `Self::Output` by calling one method
//! per node kind. It keeps no state and does not memoize; it is the building
//! block for one-off computations (a depth, a classification) that do not
//! need the dedup guarantees of `ExprVisitor` or `ExprMutator`.
//!
//! Every per-kind method falls back to `visit_expr_default`, which panics.
//! A functor that meets a kind it does not handle has a hole in its logic,
//! and that is surfaced at the first offending node. Override
//! `visit_expr_default` to give the functor a catch-all instead.

use lumen_ir::{
    Call, Constant, Expr, ExprKind, Function, GlobalVar, If, Let, Op, Tuple, TupleGetItem, Var,
};

/// Per-kind dispatch over expressions.
///
/// # Example
///
/// ```text
/// struct Depth;
///
/// impl ExprFunctor for Depth {
///     type Output = usize;
///
///     fn visit_expr_default(&mut self, _expr: &Expr) -> usize {
///         1
///     }
///
///     fn visit_tuple(&mut self, _expr: &Expr, tuple: &Tuple) -> usize {
///         1 + tuple.fields.iter().map(|f| self.visit_expr(f)).max().unwrap_or(0)
///     }
/// }
/// ```
pub trait ExprFunctor {
    type Output;

    /// Dispatch on the kind of `expr`.
    fn visit_expr(&mut self, expr: &Expr) -> Self::Output {
        match expr.kind() {
            ExprKind::Var(_) => self.visit_var(&Var::cast(expr)),
            ExprKind::Constant(constant) => self.visit_constant(expr, constant),
            ExprKind::GlobalVar(global) => self.visit_global_var(expr, global),
            ExprKind::Op(op) => self.visit_op(expr, op),
            ExprKind::Tuple(tuple) => self.visit_tuple(expr, tuple),
            ExprKind::Function(function) => self.visit_function(expr, function),
            ExprKind::Call(call) => self.visit_call(expr, call),
            ExprKind::Let(let_) => self.visit_let(expr, let_),
            ExprKind::If(if_) => self.visit_if(expr, if_),
            ExprKind::TupleGetItem(item) => self.visit_tuple_get_item(expr, item),
        }
    }

    /// Fallback for kinds without an override.
    fn visit_expr_default(&mut self, expr: &Expr) -> Self::Output {
        panic!(
            "{} has no handler for {} nodes",
            std::any::type_name::<Self>(),
            expr.tag()
        )
    }

    fn visit_var(&mut self, var: &Var) -> Self::Output {
        self.visit_expr_default(var.as_expr())
    }

    fn visit_constant(&mut self, expr: &Expr, _constant: &Constant) -> Self::Output {
        self.visit_expr_default(expr)
    }

    fn visit_global_var(&mut self, expr: &Expr, _global: &GlobalVar) -> Self::Output {
        self.visit_expr_default(expr)
    }

    fn visit_op(&mut self, expr: &Expr, _op: &Op) -> Self::Output {
        self.visit_expr_default(expr)
    }

    fn visit_tuple(&mut self, expr: &Expr, _tuple: &Tuple) -> Self::Output {
        self.visit_expr_default(expr)
    }

    fn visit_function(&mut self, expr: &Expr, _function: &Function) -> Self::Output {
        self.visit_expr_default(expr)
    }

    fn visit_call(&mut self, expr: &Expr, _call: &Call) -> Self::Output {
        self.visit_expr_default(expr)
    }

    fn visit_let(&mut self, expr: &Expr, _let: &Let) -> Self::Output {
        self.visit_expr_default(expr)
    }

    fn visit_if(&mut self, expr: &Expr, _if: &If) -> Self::Output {
        self.visit_expr_default(expr)
    }

    fn visit_tuple_get_item(&mut self, expr: &Expr, _item: &TupleGetItem) -> Self::Output {
        self.visit_expr_default(expr)
    }
}
