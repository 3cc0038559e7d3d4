//! Expression nodes and their shared handle.
//!
//! # Design
//!
//! The kind set is closed: `ExprKind` enumerates every node variant, and
//! traversal code dispatches with a single `match`. Each node sits behind an
//! `Arc`, so the same sub-expression can be reachable from several parents
//! (the graph is a DAG, never cyclic). `Expr` deliberately has no structural
//! equality; compare with `same_as` or key a map with `ExprKey`.
//!
//! `Var` is a typed handle over an `Expr` that is known to be a variable.
//! It shares the identity of the underlying node, which lets `Function`
//! parameters and `Let` binders be stored with their kind proven.

use std::fmt;
use std::sync::Arc;

use crate::{Attrs, ConstantValue, KindMismatch, Symbol, Type, TypeVar};

/// Local variable: a function parameter or `let` binder, or a use of one.
///
/// Uses refer to the binder by identity, not by name.
#[derive(Debug)]
pub struct VarNode {
    pub name_hint: Symbol,
    pub type_annotation: Option<Type>,
}

/// Literal value.
#[derive(Debug)]
pub struct Constant {
    pub value: ConstantValue,
}

/// Reference to a module-level function by name.
#[derive(Debug)]
pub struct GlobalVar {
    pub name: Symbol,
}

/// Primitive operator, e.g. `add`.
#[derive(Debug)]
pub struct Op {
    pub name: Symbol,
}

#[derive(Debug)]
pub struct Tuple {
    pub fields: Vec<Expr>,
}

/// Function literal.
#[derive(Debug)]
pub struct Function {
    pub type_params: Vec<TypeVar>,
    pub params: Vec<Var>,
    /// Declared return type; `None` when not annotated.
    pub ret_type: Option<Type>,
    pub body: Expr,
    pub attrs: Attrs,
}

/// Application of `op` (an `Op`, `GlobalVar`, `Function`, or any callee
/// expression) to arguments.
#[derive(Debug)]
pub struct Call {
    pub op: Expr,
    pub type_args: Vec<Type>,
    pub args: Vec<Expr>,
    pub attrs: Attrs,
}

/// `let var = value; body`
#[derive(Debug)]
pub struct Let {
    pub var: Var,
    pub value: Expr,
    pub body: Expr,
}

#[derive(Debug)]
pub struct If {
    pub cond: Expr,
    pub true_branch: Expr,
    pub false_branch: Expr,
}

/// Projection of field `index` out of a tuple-valued expression.
#[derive(Debug)]
pub struct TupleGetItem {
    pub tuple: Expr,
    pub index: usize,
}

/// Payload of an expression node.
#[derive(Debug)]
pub enum ExprKind {
    Var(VarNode),
    Constant(Constant),
    GlobalVar(GlobalVar),
    Op(Op),
    Tuple(Tuple),
    Function(Function),
    Call(Call),
    Let(Let),
    If(If),
    TupleGetItem(TupleGetItem),
}

/// Discriminant of `ExprKind`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprKindTag {
    Var,
    Constant,
    GlobalVar,
    Op,
    Tuple,
    Function,
    Call,
    Let,
    If,
    TupleGetItem,
}

impl fmt::Display for ExprKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExprKindTag::Var => "Var",
            ExprKindTag::Constant => "Constant",
            ExprKindTag::GlobalVar => "GlobalVar",
            ExprKindTag::Op => "Op",
            ExprKindTag::Tuple => "Tuple",
            ExprKindTag::Function => "Function",
            ExprKindTag::Call => "Call",
            ExprKindTag::Let => "Let",
            ExprKindTag::If => "If",
            ExprKindTag::TupleGetItem => "TupleGetItem",
        })
    }
}

/// Identity of an expression node, usable as a hash key.
///
/// Two keys are equal iff they were taken from handles to the same node.
/// A key is only meaningful while some handle keeps the node alive; maps
/// that outlive their source graph must retain a handle next to the key.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprKey(usize);

impl fmt::Debug for ExprKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprKey({:#x})", self.0)
    }
}

/// Shared handle to an immutable expression node.
#[derive(Clone)]
pub struct Expr(Arc<ExprKind>);

impl Expr {
    /// Allocate a new node. The result is identity-distinct from every
    /// existing node.
    pub fn new(kind: ExprKind) -> Self {
        Expr(Arc::new(kind))
    }

    pub fn constant(value: impl Into<ConstantValue>) -> Self {
        Expr::new(ExprKind::Constant(Constant {
            value: value.into(),
        }))
    }

    pub fn global_var(name: impl Into<Symbol>) -> Self {
        Expr::new(ExprKind::GlobalVar(GlobalVar { name: name.into() }))
    }

    pub fn op(name: impl Into<Symbol>) -> Self {
        Expr::new(ExprKind::Op(Op { name: name.into() }))
    }

    pub fn tuple(fields: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Tuple(Tuple { fields }))
    }

    pub fn function(
        params: Vec<Var>,
        body: Expr,
        ret_type: Option<Type>,
        type_params: Vec<TypeVar>,
        attrs: Attrs,
    ) -> Self {
        Expr::new(ExprKind::Function(Function {
            type_params,
            params,
            ret_type,
            body,
            attrs,
        }))
    }

    pub fn call(op: Expr, args: Vec<Expr>, attrs: Attrs, type_args: Vec<Type>) -> Self {
        Expr::new(ExprKind::Call(Call {
            op,
            type_args,
            args,
            attrs,
        }))
    }

    pub fn let_(var: Var, value: Expr, body: Expr) -> Self {
        Expr::new(ExprKind::Let(Let { var, value, body }))
    }

    pub fn if_(cond: Expr, true_branch: Expr, false_branch: Expr) -> Self {
        Expr::new(ExprKind::If(If {
            cond,
            true_branch,
            false_branch,
        }))
    }

    pub fn tuple_get_item(tuple: Expr, index: usize) -> Self {
        Expr::new(ExprKind::TupleGetItem(TupleGetItem { tuple, index }))
    }

    #[inline]
    pub fn kind(&self) -> &ExprKind {
        &self.0
    }

    pub fn tag(&self) -> ExprKindTag {
        match self.kind() {
            ExprKind::Var(_) => ExprKindTag::Var,
            ExprKind::Constant(_) => ExprKindTag::Constant,
            ExprKind::GlobalVar(_) => ExprKindTag::GlobalVar,
            ExprKind::Op(_) => ExprKindTag::Op,
            ExprKind::Tuple(_) => ExprKindTag::Tuple,
            ExprKind::Function(_) => ExprKindTag::Function,
            ExprKind::Call(_) => ExprKindTag::Call,
            ExprKind::Let(_) => ExprKindTag::Let,
            ExprKind::If(_) => ExprKindTag::If,
            ExprKind::TupleGetItem(_) => ExprKindTag::TupleGetItem,
        }
    }

    /// Whether both handles point at the same node.
    #[inline]
    pub fn same_as(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn key(&self) -> ExprKey {
        ExprKey(Arc::as_ptr(&self.0) as usize)
    }

    /// Typed view if this node is a variable.
    pub fn as_var(&self) -> Option<Var> {
        match self.kind() {
            ExprKind::Var(_) => Some(Var(self.clone())),
            _ => None,
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.kind(), f)
    }
}

/// Handle to an expression known to be a variable.
///
/// Shares identity with the underlying `Expr`: `var.key() ==
/// Expr::from(var.clone()).key()`.
#[derive(Clone)]
pub struct Var(Expr);

impl Var {
    pub fn new(name_hint: impl Into<Symbol>, type_annotation: Option<Type>) -> Self {
        Var(Expr::new(ExprKind::Var(VarNode {
            name_hint: name_hint.into(),
            type_annotation,
        })))
    }

    /// Downcast an expression that must be a variable.
    ///
    /// # Panics
    ///
    /// Panics if `expr` is another kind. Function parameters and `let`
    /// binders must stay variables through a rewrite; a pass that turns one
    /// into anything else is malformed.
    pub fn cast(expr: &Expr) -> Var {
        match Var::try_from(expr.clone()) {
            Ok(var) => var,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn name_hint(&self) -> &Symbol {
        &self.node().name_hint
    }

    pub fn type_annotation(&self) -> Option<&Type> {
        self.node().type_annotation.as_ref()
    }

    #[inline]
    pub fn as_expr(&self) -> &Expr {
        &self.0
    }

    pub fn into_expr(self) -> Expr {
        self.0
    }

    #[inline]
    pub fn same_as(&self, other: &Var) -> bool {
        self.0.same_as(&other.0)
    }

    #[inline]
    pub fn key(&self) -> ExprKey {
        self.0.key()
    }

    fn node(&self) -> &VarNode {
        match self.0.kind() {
            ExprKind::Var(node) => node,
            _ => unreachable!("Var handle wraps a non-variable node"),
        }
    }
}

impl TryFrom<Expr> for Var {
    type Error = KindMismatch;

    fn try_from(expr: Expr) -> Result<Self, Self::Error> {
        if matches!(expr.kind(), ExprKind::Var(_)) {
            Ok(Var(expr))
        } else {
            Err(KindMismatch::Expr {
                expected: ExprKindTag::Var,
                found: expr.tag(),
            })
        }
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        var.0
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests;
