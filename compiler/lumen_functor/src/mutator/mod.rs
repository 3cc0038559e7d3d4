//! Copy-on-write expression rewriting.
//!
//! # Design
//!
//! `ExprMutator::mutate` returns the rewritten form of an expression. Each
//! source node is rewritten at most once per mutator: the result is cached in
//! the pass's `ExprMemo` under the source node's identity, and every later
//! request for that node returns the cached handle. On a DAG with heavy
//! sharing this keeps the work linear in the number of distinct nodes, and
//! it keeps binder identity consistent: a `Var` rewritten at its `let` is
//! the same handle at every use.
//!
//! Default `mutate_*` methods call the matching `rewrite_*` function. These
//! rewrite all children, then compare each result with the original child by
//! identity. If nothing changed they return the original node, so "no change"
//! is observable as `result.same_as(&input)`. Otherwise they allocate a new
//! node of the same kind and carry attributes over by handle.
//!
//! Function parameters and `let` binders must rewrite to variables, and
//! function type parameters to type variables. Anything else panics: the pass
//! is malformed and the result could not be represented.

use lumen_ir::{
    Call, Constant, Expr, ExprKind, Function, GlobalVar, If, Let, Op, Tuple, TupleGetItem, Type,
    TypeVar, Var,
};
use lumen_stack::ensure_sufficient_stack;

use crate::ExprMemo;

/// Memoized, identity-preserving expression rewriter.
///
/// # Example
///
/// ```text
/// #[derive(Default)]
/// struct Negate {
///     memo: ExprMemo,
/// }
///
/// impl ExprMutator for Negate {
///     fn memo(&mut self) -> &mut ExprMemo {
///         &mut self.memo
///     }
///
///     fn mutate_constant(&mut self, expr: &Expr, constant: &Constant) -> Expr {
///         match constant.value {
///             ConstantValue::Int(v) => Expr::constant(-v),
///             _ => expr.clone(),
///         }
///     }
/// }
/// ```
pub trait ExprMutator {
    /// The pass's rewrite cache. Implementors own one `ExprMemo` and return
    /// it here; the traversal is its only writer.
    fn memo(&mut self) -> &mut ExprMemo;

    /// Rewrite an expression (entry point and recursion point).
    fn mutate(&mut self, expr: &Expr) -> Expr {
        rewrite_expr(self, expr)
    }

    fn mutate_var(&mut self, var: &Var) -> Expr {
        rewrite_var(self, var)
    }

    /// Constants are returned unchanged.
    fn mutate_constant(&mut self, expr: &Expr, _constant: &Constant) -> Expr {
        expr.clone()
    }

    /// Globals are returned unchanged.
    fn mutate_global_var(&mut self, expr: &Expr, _global: &GlobalVar) -> Expr {
        expr.clone()
    }

    /// Operators are returned unchanged.
    fn mutate_op(&mut self, expr: &Expr, _op: &Op) -> Expr {
        expr.clone()
    }

    fn mutate_tuple(&mut self, expr: &Expr, tuple: &Tuple) -> Expr {
        rewrite_tuple(self, expr, tuple)
    }

    fn mutate_function(&mut self, expr: &Expr, function: &Function) -> Expr {
        rewrite_function(self, expr, function)
    }

    fn mutate_call(&mut self, expr: &Expr, call: &Call) -> Expr {
        rewrite_call(self, expr, call)
    }

    fn mutate_let(&mut self, expr: &Expr, let_: &Let) -> Expr {
        rewrite_let(self, expr, let_)
    }

    fn mutate_if(&mut self, expr: &Expr, if_: &If) -> Expr {
        rewrite_if(self, expr, if_)
    }

    fn mutate_tuple_get_item(&mut self, expr: &Expr, item: &TupleGetItem) -> Expr {
        rewrite_tuple_get_item(self, expr, item)
    }

    /// Rewrite a type annotation, type parameter, or type argument.
    /// Default returns it unchanged.
    fn mutate_type(&mut self, ty: &Type) -> Type {
        ty.clone()
    }
}

// Rewrite Functions

/// Rewrite `expr`, consulting and then filling the mutator's memo.
pub fn rewrite_expr<M: ExprMutator + ?Sized>(mutator: &mut M, expr: &Expr) -> Expr {
    if let Some(done) = mutator.memo().get(expr).cloned() {
        tracing::trace!(kind = %expr.tag(), "memo hit");
        return done;
    }
    let new_expr = ensure_sufficient_stack(|| dispatch(mutator, expr));
    mutator.memo().insert(expr.clone(), new_expr.clone());
    new_expr
}

fn dispatch<M: ExprMutator + ?Sized>(mutator: &mut M, expr: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Var(_) => mutator.mutate_var(&Var::cast(expr)),
        ExprKind::Constant(constant) => mutator.mutate_constant(expr, constant),
        ExprKind::GlobalVar(global) => mutator.mutate_global_var(expr, global),
        ExprKind::Op(op) => mutator.mutate_op(expr, op),
        ExprKind::Tuple(tuple) => mutator.mutate_tuple(expr, tuple),
        ExprKind::Function(function) => mutator.mutate_function(expr, function),
        ExprKind::Call(call) => mutator.mutate_call(expr, call),
        ExprKind::Let(let_) => mutator.mutate_let(expr, let_),
        ExprKind::If(if_) => mutator.mutate_if(expr, if_),
        ExprKind::TupleGetItem(item) => mutator.mutate_tuple_get_item(expr, item),
    }
}

/// Allocate the replacement for a node whose children changed.
fn rebuild(kind: ExprKind) -> Expr {
    let expr = Expr::new(kind);
    tracing::trace!(kind = %expr.tag(), "rebuilt node");
    expr
}

/// A binder position must still hold a variable after rewriting.
fn cast_var(expr: &Expr, role: &str) -> Var {
    match Var::try_from(expr.clone()) {
        Ok(var) => var,
        Err(err) => panic!("{role} must rewrite to a variable: {err}"),
    }
}

fn cast_type_var(ty: &Type) -> TypeVar {
    match TypeVar::try_from(ty.clone()) {
        Ok(var) => var,
        Err(err) => panic!("function type parameter must rewrite to a type variable: {err}"),
    }
}

/// Mutate each expression in order, reporting whether any came back as a
/// different node.
fn mutate_all<M: ExprMutator + ?Sized>(mutator: &mut M, exprs: &[Expr]) -> (Vec<Expr>, bool) {
    let mut changed = false;
    let rewritten = exprs
        .iter()
        .map(|expr| {
            let new_expr = mutator.mutate(expr);
            changed |= !new_expr.same_as(expr);
            new_expr
        })
        .collect();
    (rewritten, changed)
}

fn mutate_types<M: ExprMutator + ?Sized>(mutator: &mut M, types: &[Type]) -> (Vec<Type>, bool) {
    let mut changed = false;
    let rewritten = types
        .iter()
        .map(|ty| {
            let new_ty = mutator.mutate_type(ty);
            changed |= !new_ty.same_as(ty);
            new_ty
        })
        .collect();
    (rewritten, changed)
}

/// Rebuild the variable with the same name hint if its annotation changed.
///
/// The new variable is a new identity; the memo maps the old one to it, so
/// every use of the old variable in this pass rewrites to the same handle.
pub fn rewrite_var<M: ExprMutator + ?Sized>(mutator: &mut M, var: &Var) -> Expr {
    if let Some(ty) = var.type_annotation() {
        let new_ty = mutator.mutate_type(ty);
        if !new_ty.same_as(ty) {
            tracing::trace!(name = %var.name_hint(), "rebuilt variable with new annotation");
            return Var::new(var.name_hint().clone(), Some(new_ty)).into();
        }
    }
    var.as_expr().clone()
}

pub fn rewrite_tuple<M: ExprMutator + ?Sized>(mutator: &mut M, expr: &Expr, tuple: &Tuple) -> Expr {
    let (fields, changed) = mutate_all(mutator, &tuple.fields);
    if changed {
        rebuild(ExprKind::Tuple(Tuple { fields }))
    } else {
        expr.clone()
    }
}

/// Type params, then params, then return type, then body.
pub fn rewrite_function<M: ExprMutator + ?Sized>(
    mutator: &mut M,
    expr: &Expr,
    function: &Function,
) -> Expr {
    let mut changed = false;

    let type_params: Vec<TypeVar> = function
        .type_params
        .iter()
        .map(|param| {
            let new_param = cast_type_var(&mutator.mutate_type(param.as_type()));
            changed |= !new_param.same_as(param);
            new_param
        })
        .collect();

    let params: Vec<Var> = function
        .params
        .iter()
        .map(|param| {
            let new_param = cast_var(&mutator.mutate(param.as_expr()), "function parameter");
            changed |= !new_param.same_as(param);
            new_param
        })
        .collect();

    let ret_type = function.ret_type.as_ref().map(|ty| {
        let new_ty = mutator.mutate_type(ty);
        changed |= !new_ty.same_as(ty);
        new_ty
    });

    let body = mutator.mutate(&function.body);
    changed |= !body.same_as(&function.body);

    if changed {
        rebuild(ExprKind::Function(Function {
            type_params,
            params,
            ret_type,
            body,
            attrs: function.attrs.clone(),
        }))
    } else {
        expr.clone()
    }
}

/// Callee, then type args, then args.
pub fn rewrite_call<M: ExprMutator + ?Sized>(mutator: &mut M, expr: &Expr, call: &Call) -> Expr {
    let op = mutator.mutate(&call.op);
    let (type_args, types_changed) = mutate_types(mutator, &call.type_args);
    let (args, args_changed) = mutate_all(mutator, &call.args);

    if types_changed || args_changed || !op.same_as(&call.op) {
        rebuild(ExprKind::Call(Call {
            op,
            type_args,
            args,
            attrs: call.attrs.clone(),
        }))
    } else {
        expr.clone()
    }
}

/// Binder before value before body.
pub fn rewrite_let<M: ExprMutator + ?Sized>(mutator: &mut M, expr: &Expr, let_: &Let) -> Expr {
    let var = cast_var(&mutator.mutate(let_.var.as_expr()), "let binder");
    let value = mutator.mutate(&let_.value);
    let body = mutator.mutate(&let_.body);

    if var.same_as(&let_.var) && value.same_as(&let_.value) && body.same_as(&let_.body) {
        expr.clone()
    } else {
        rebuild(ExprKind::Let(Let { var, value, body }))
    }
}

pub fn rewrite_if<M: ExprMutator + ?Sized>(mutator: &mut M, expr: &Expr, if_: &If) -> Expr {
    let cond = mutator.mutate(&if_.cond);
    let true_branch = mutator.mutate(&if_.true_branch);
    let false_branch = mutator.mutate(&if_.false_branch);

    if cond.same_as(&if_.cond)
        && true_branch.same_as(&if_.true_branch)
        && false_branch.same_as(&if_.false_branch)
    {
        expr.clone()
    } else {
        rebuild(ExprKind::If(If {
            cond,
            true_branch,
            false_branch,
        }))
    }
}

pub fn rewrite_tuple_get_item<M: ExprMutator + ?Sized>(
    mutator: &mut M,
    expr: &Expr,
    item: &TupleGetItem,
) -> Expr {
    let tuple = mutator.mutate(&item.tuple);
    if tuple.same_as(&item.tuple) {
        expr.clone()
    } else {
        rebuild(ExprKind::TupleGetItem(TupleGetItem {
            tuple,
            index: item.index,
        }))
    }
}
