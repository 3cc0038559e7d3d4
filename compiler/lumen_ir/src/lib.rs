//! Lumen IR - immutable expression graph
//!
//! This crate contains the node model that the traversal framework in
//! `lumen_functor` walks and rewrites:
//! - `Expr`: shared handle to one immutable expression node
//! - `Var` / `TypeVar`: typed handles proven to be of one kind
//! - `Type`: handle into the type sublanguage used for annotations
//! - `TypeVisitor` / `TypeFolder`: traversal over types
//!
//! # Identity
//!
//! Handles are atomically reference counted. Two handles are *the same node* when they
//! point at the same allocation (`same_as`), independent of contents. Nothing
//! here implements structural `PartialEq` or `Hash` on handles: passes that
//! need a map keyed by node use `ExprKey` / `TypeKey`.
//!
//! Nodes are never mutated after construction. Building a node twice from the
//! same children yields two distinct identities; there is no interning.
//! Because nothing is mutated, every handle is `Send + Sync`: independent
//! passes on different threads may read one graph without locking.

mod attrs;
mod constant;
mod error;
pub mod expr;
mod printer;
mod symbol;
pub mod traverse;
pub mod ty;

pub use attrs::{AttrValue, Attrs};
pub use constant::ConstantValue;
pub use error::KindMismatch;
pub use expr::{
    Call, Constant, Expr, ExprKey, ExprKind, ExprKindTag, Function, GlobalVar, If, Let, Op, Tuple,
    TupleGetItem, Var, VarNode,
};
pub use symbol::Symbol;
pub use traverse::{TypeFolder, TypeVisitor};
pub use ty::{
    DataType, FuncType, TensorType, TupleType, Type, TypeKey, TypeKind, TypeKindTag, TypeVar,
    TypeVarNode,
};
