//! Read-only expression traversal.
//!
//! # Design
//!
//! `ExprVisitor` walks the DAG depth-first and runs each distinct node's
//! handler exactly once, however many parents point at it. The pass owns a
//! `VisitCounter` and hands it out through `visit_counter`; the default
//! `visit_expr` consults it before dispatching and records the node after.
//! Later arrivals only bump the node's count.
//!
//! Default `visit_*` methods call the matching `walk_*` function, which
//! visits children. Override a `visit_*` method to add behavior at one kind
//! and call `walk_*` from it to keep descending.
//!
//! Child order is fixed and passes may rely on it:
//!
//! | Kind | Order |
//! |---|---|
//! | Var | type annotation (via `visit_type`) |
//! | Tuple | fields |
//! | Function | params, body |
//! | Call | callee, type args (via `visit_type`), args |
//! | Let | value, var, body |
//! | If | cond, true branch, false branch |
//! | TupleGetItem | tuple |
//!
//! A function's type params and return type are not visited.
//!
//! # Example
//!
//! ```text
//! #[derive(Default)]
//! struct CountCalls {
//!     counter: VisitCounter,
//!     calls: usize,
//! }
//!
//! impl ExprVisitor for CountCalls {
//!     fn visit_counter(&mut self) -> &mut VisitCounter {
//!         &mut self.counter
//!     }
//!
//!     fn visit_call(&mut self, _expr: &Expr, call: &Call) {
//!         self.calls += 1;
//!         walk_call(self, call);
//!     }
//! }
//! ```

use lumen_ir::{
    Call, Constant, Expr, ExprKind, Function, GlobalVar, If, Let, Op, Tuple, TupleGetItem, Type,
    Var,
};
use lumen_stack::ensure_sufficient_stack;

use crate::VisitCounter;

/// Memoized read-only expression visitor.
pub trait ExprVisitor {
    /// The pass's visit record. Implementors own one `VisitCounter` and
    /// return it here; the traversal is its only writer.
    fn visit_counter(&mut self) -> &mut VisitCounter;

    /// Visit an expression (entry point and recursion point).
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    /// Visit a variable node.
    fn visit_var(&mut self, var: &Var) {
        walk_var(self, var);
    }

    /// Visit a constant. Constants have no children.
    fn visit_constant(&mut self, _expr: &Expr, _constant: &Constant) {}

    /// Visit a global reference. Globals have no children.
    fn visit_global_var(&mut self, _expr: &Expr, _global: &GlobalVar) {}

    /// Visit a primitive operator. Operators have no children.
    fn visit_op(&mut self, _expr: &Expr, _op: &Op) {}

    fn visit_tuple(&mut self, _expr: &Expr, tuple: &Tuple) {
        walk_tuple(self, tuple);
    }

    fn visit_function(&mut self, _expr: &Expr, function: &Function) {
        walk_function(self, function);
    }

    fn visit_call(&mut self, _expr: &Expr, call: &Call) {
        walk_call(self, call);
    }

    fn visit_let(&mut self, _expr: &Expr, let_: &Let) {
        walk_let(self, let_);
    }

    fn visit_if(&mut self, _expr: &Expr, if_: &If) {
        walk_if(self, if_);
    }

    fn visit_tuple_get_item(&mut self, _expr: &Expr, item: &TupleGetItem) {
        walk_tuple_get_item(self, item);
    }

    /// Visit a type annotation or type argument. Default does nothing.
    fn visit_type(&mut self, _ty: &Type) {}
}

// Walk Functions

/// Visit `expr` unless it was already processed by this visitor.
///
/// A first arrival dispatches to the kind's `visit_*` method and then records
/// the node. A repeat arrival only increments the node's count.
pub fn walk_expr<V: ExprVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    if visitor.visit_counter().revisit(expr) {
        tracing::trace!(kind = %expr.tag(), "skipping visited node");
        return;
    }
    ensure_sufficient_stack(|| dispatch(visitor, expr));
    visitor.visit_counter().record(expr);
}

fn dispatch<V: ExprVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr.kind() {
        ExprKind::Var(_) => visitor.visit_var(&Var::cast(expr)),
        ExprKind::Constant(constant) => visitor.visit_constant(expr, constant),
        ExprKind::GlobalVar(global) => visitor.visit_global_var(expr, global),
        ExprKind::Op(op) => visitor.visit_op(expr, op),
        ExprKind::Tuple(tuple) => visitor.visit_tuple(expr, tuple),
        ExprKind::Function(function) => visitor.visit_function(expr, function),
        ExprKind::Call(call) => visitor.visit_call(expr, call),
        ExprKind::Let(let_) => visitor.visit_let(expr, let_),
        ExprKind::If(if_) => visitor.visit_if(expr, if_),
        ExprKind::TupleGetItem(item) => visitor.visit_tuple_get_item(expr, item),
    }
}

pub fn walk_var<V: ExprVisitor + ?Sized>(visitor: &mut V, var: &Var) {
    if let Some(ty) = var.type_annotation() {
        visitor.visit_type(ty);
    }
}

pub fn walk_tuple<V: ExprVisitor + ?Sized>(visitor: &mut V, tuple: &Tuple) {
    for field in &tuple.fields {
        visitor.visit_expr(field);
    }
}

pub fn walk_function<V: ExprVisitor + ?Sized>(visitor: &mut V, function: &Function) {
    for param in &function.params {
        visitor.visit_expr(param.as_expr());
    }
    visitor.visit_expr(&function.body);
}

pub fn walk_call<V: ExprVisitor + ?Sized>(visitor: &mut V, call: &Call) {
    visitor.visit_expr(&call.op);
    for ty in &call.type_args {
        visitor.visit_type(ty);
    }
    for arg in &call.args {
        visitor.visit_expr(arg);
    }
}

/// Value before binder before body.
pub fn walk_let<V: ExprVisitor + ?Sized>(visitor: &mut V, let_: &Let) {
    visitor.visit_expr(&let_.value);
    visitor.visit_expr(let_.var.as_expr());
    visitor.visit_expr(&let_.body);
}

pub fn walk_if<V: ExprVisitor + ?Sized>(visitor: &mut V, if_: &If) {
    visitor.visit_expr(&if_.cond);
    visitor.visit_expr(&if_.true_branch);
    visitor.visit_expr(&if_.false_branch);
}

pub fn walk_tuple_get_item<V: ExprVisitor + ?Sized>(visitor: &mut V, item: &TupleGetItem) {
    visitor.visit_expr(&item.tuple);
}

// Helpers

/// Call `f` once for every distinct node reachable from `expr`, children
/// before parents.
pub fn post_order_visit(expr: &Expr, f: impl FnMut(&Expr)) {
    struct PostOrder<F> {
        counter: VisitCounter,
        f: F,
    }

    impl<F: FnMut(&Expr)> ExprVisitor for PostOrder<F> {
        fn visit_counter(&mut self) -> &mut VisitCounter {
            &mut self.counter
        }

        fn visit_expr(&mut self, expr: &Expr) {
            let first = self.counter.count(expr) == 0;
            walk_expr(self, expr);
            if first {
                (self.f)(expr);
            }
        }
    }

    let mut visitor = PostOrder {
        counter: VisitCounter::new(),
        f,
    };
    visitor.visit_expr(expr);
}
