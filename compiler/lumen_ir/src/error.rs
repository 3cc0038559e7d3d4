//! Kind mismatch on a typed downcast.

use crate::{ExprKindTag, TypeKindTag};

/// A handle was not of the kind a typed view required.
///
/// Returned by the fallible conversions (`Var::try_from`,
/// `TypeVar::try_from`) and used as the panic message when a rewrite breaks
/// a structural requirement, such as a function parameter that no longer
/// rewrites to a `Var`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum KindMismatch {
    #[error("expected {expected} expression, found {found}")]
    Expr {
        expected: ExprKindTag,
        found: ExprKindTag,
    },
    #[error("expected {expected} type, found {found}")]
    Type {
        expected: TypeKindTag,
        found: TypeKindTag,
    },
}
