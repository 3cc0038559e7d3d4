//! Compact text form of expressions and types.
//!
//! Used for logs and test expectations. The printer follows the tree, so a
//! node shared by several parents is printed once per parent. Each nested
//! node runs under `ensure_sufficient_stack`, so deep chains print without
//! overflowing. The derived `Debug` output has no such guard.
//!
//! ```text
//! let %x = 1; (%x, add(%x, 2))
//! fn<T>(%a: T) -> T { %a }
//! if (%c) { 1 } else { 2 }
//! ```

use std::fmt;

use lumen_stack::ensure_sufficient_stack;

use crate::{Attrs, Expr, ExprKind, Type, TypeKind, TypeVar, Var};

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

fn write_type_params(f: &mut fmt::Formatter<'_>, params: &[TypeVar]) -> fmt::Result {
    if params.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    write_list(f, params, |f, param| write!(f, "{}", param.name_hint()))?;
    f.write_str(">")
}

fn write_attrs(f: &mut fmt::Formatter<'_>, attrs: &Attrs) -> fmt::Result {
    for (name, value) in attrs.iter() {
        write!(f, ", {name}={value}")?;
    }
    Ok(())
}

fn write_binder(f: &mut fmt::Formatter<'_>, var: &Var) -> fmt::Result {
    write!(f, "%{}", var.name_hint())?;
    if let Some(ty) = var.type_annotation() {
        write!(f, ": {ty}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| write_expr(self, f))
    }
}

fn write_expr(expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expr.kind() {
        ExprKind::Var(var) => write!(f, "%{}", var.name_hint),
        ExprKind::Constant(constant) => write!(f, "{}", constant.value),
        ExprKind::GlobalVar(global) => write!(f, "@{}", global.name),
        ExprKind::Op(op) => write!(f, "{}", op.name),
        ExprKind::Tuple(tuple) => {
            f.write_str("(")?;
            write_list(f, &tuple.fields, |f, field| write!(f, "{field}"))?;
            if tuple.fields.len() == 1 {
                f.write_str(",")?;
            }
            f.write_str(")")
        }
        ExprKind::Function(function) => {
            f.write_str("fn")?;
            write_type_params(f, &function.type_params)?;
            f.write_str("(")?;
            write_list(f, &function.params, write_binder)?;
            f.write_str(")")?;
            if let Some(ret_type) = &function.ret_type {
                write!(f, " -> {ret_type}")?;
            }
            write!(f, " {{ {} }}", function.body)
        }
        ExprKind::Call(call) => {
            write!(f, "{}", call.op)?;
            if !call.type_args.is_empty() {
                f.write_str("<")?;
                write_list(f, &call.type_args, |f, ty| write!(f, "{ty}"))?;
                f.write_str(">")?;
            }
            f.write_str("(")?;
            write_list(f, &call.args, |f, arg| write!(f, "{arg}"))?;
            write_attrs(f, &call.attrs)?;
            f.write_str(")")
        }
        ExprKind::Let(let_) => {
            f.write_str("let ")?;
            write_binder(f, &let_.var)?;
            write!(f, " = {}; {}", let_.value, let_.body)
        }
        ExprKind::If(if_) => write!(
            f,
            "if ({}) {{ {} }} else {{ {} }}",
            if_.cond, if_.true_branch, if_.false_branch
        ),
        ExprKind::TupleGetItem(item) => write!(f, "{}.{}", item.tuple, item.index),
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_expr(), f)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| write_type(self, f))
    }
}

fn write_type(ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty.kind() {
        TypeKind::Var(var) => write!(f, "{}", var.name_hint),
        TypeKind::Tensor(tensor) => {
            f.write_str("Tensor[(")?;
            write_list(f, &tensor.shape, |f, dim| write!(f, "{dim}"))?;
            write!(f, "), {}]", tensor.dtype)
        }
        TypeKind::Tuple(tuple) => {
            f.write_str("(")?;
            write_list(f, &tuple.fields, |f, field| write!(f, "{field}"))?;
            f.write_str(")")
        }
        TypeKind::Func(func) => {
            f.write_str("fn")?;
            write_type_params(f, &func.type_params)?;
            f.write_str("(")?;
            write_list(f, &func.arg_types, |f, arg| write!(f, "{arg}"))?;
            write!(f, ") -> {}", func.ret_type)
        }
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_type(), f)
    }
}

#[cfg(test)]
mod tests;
