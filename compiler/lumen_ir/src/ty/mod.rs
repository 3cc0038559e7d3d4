//! Type sublanguage.
//!
//! Types annotate variables, parameterize functions, and instantiate calls.
//! They share the expression handles' identity rules: `Type` is reference
//! counted, immutable, and compared with `same_as`.

use std::fmt;
use std::sync::Arc;

use crate::{KindMismatch, Symbol};

/// Scalar element type of a tensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    Int(u8),
    UInt(u8),
    Float(u8),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => f.write_str("bool"),
            DataType::Int(bits) => write!(f, "int{bits}"),
            DataType::UInt(bits) => write!(f, "uint{bits}"),
            DataType::Float(bits) => write!(f, "float{bits}"),
        }
    }
}

/// Type variable bound by a function's type parameter list.
#[derive(Debug)]
pub struct TypeVarNode {
    pub name_hint: Symbol,
}

/// Tensor of a fixed shape and element type.
#[derive(Debug)]
pub struct TensorType {
    pub shape: Vec<i64>,
    pub dtype: DataType,
}

#[derive(Debug)]
pub struct TupleType {
    pub fields: Vec<Type>,
}

/// Function signature, optionally polymorphic.
#[derive(Debug)]
pub struct FuncType {
    pub type_params: Vec<TypeVar>,
    pub arg_types: Vec<Type>,
    pub ret_type: Type,
}

/// Payload of a type node.
#[derive(Debug)]
pub enum TypeKind {
    Var(TypeVarNode),
    Tensor(TensorType),
    Tuple(TupleType),
    Func(FuncType),
}

/// Discriminant of `TypeKind`, used in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKindTag {
    Var,
    Tensor,
    Tuple,
    Func,
}

impl fmt::Display for TypeKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeKindTag::Var => "TypeVar",
            TypeKindTag::Tensor => "TensorType",
            TypeKindTag::Tuple => "TupleType",
            TypeKindTag::Func => "FuncType",
        })
    }
}

/// Identity of a type node, usable as a hash key.
///
/// Only meaningful while a handle to the node is alive.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(usize);

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({:#x})", self.0)
    }
}

/// Shared handle to an immutable type node.
#[derive(Clone)]
pub struct Type(Arc<TypeKind>);

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Type(Arc::new(kind))
    }

    pub fn tensor(shape: Vec<i64>, dtype: DataType) -> Self {
        Type::new(TypeKind::Tensor(TensorType { shape, dtype }))
    }

    /// Rank-0 tensor.
    pub fn scalar(dtype: DataType) -> Self {
        Type::tensor(Vec::new(), dtype)
    }

    pub fn tuple(fields: Vec<Type>) -> Self {
        Type::new(TypeKind::Tuple(TupleType { fields }))
    }

    pub fn func(type_params: Vec<TypeVar>, arg_types: Vec<Type>, ret_type: Type) -> Self {
        Type::new(TypeKind::Func(FuncType {
            type_params,
            arg_types,
            ret_type,
        }))
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    pub fn tag(&self) -> TypeKindTag {
        match self.kind() {
            TypeKind::Var(_) => TypeKindTag::Var,
            TypeKind::Tensor(_) => TypeKindTag::Tensor,
            TypeKind::Tuple(_) => TypeKindTag::Tuple,
            TypeKind::Func(_) => TypeKindTag::Func,
        }
    }

    /// Whether both handles point at the same node.
    #[inline]
    pub fn same_as(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        TypeKey(Arc::as_ptr(&self.0) as usize)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.kind(), f)
    }
}

/// Handle to a type known to be a type variable.
///
/// Shares identity with the underlying `Type`.
#[derive(Clone)]
pub struct TypeVar(Type);

impl TypeVar {
    pub fn new(name_hint: impl Into<Symbol>) -> Self {
        TypeVar(Type::new(TypeKind::Var(TypeVarNode {
            name_hint: name_hint.into(),
        })))
    }

    /// Downcast a type that must be a type variable.
    ///
    /// # Panics
    ///
    /// Panics if `ty` is another kind. Callers use this where the structure of
    /// the IR requires a type variable, so a mismatch is a bug in the pass
    /// that produced `ty`.
    pub fn cast(ty: &Type) -> TypeVar {
        match TypeVar::try_from(ty.clone()) {
            Ok(var) => var,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn name_hint(&self) -> &Symbol {
        &self.node().name_hint
    }

    #[inline]
    pub fn as_type(&self) -> &Type {
        &self.0
    }

    pub fn into_type(self) -> Type {
        self.0
    }

    #[inline]
    pub fn same_as(&self, other: &TypeVar) -> bool {
        self.0.same_as(&other.0)
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.0.key()
    }

    fn node(&self) -> &TypeVarNode {
        match self.0.kind() {
            TypeKind::Var(node) => node,
            _ => unreachable!("TypeVar handle wraps a non-variable type"),
        }
    }
}

impl TryFrom<Type> for TypeVar {
    type Error = KindMismatch;

    fn try_from(ty: Type) -> Result<Self, Self::Error> {
        if matches!(ty.kind(), TypeKind::Var(_)) {
            Ok(TypeVar(ty))
        } else {
            Err(KindMismatch::Type {
                expected: TypeKindTag::Var,
                found: ty.tag(),
            })
        }
    }
}

impl From<TypeVar> for Type {
    fn from(var: TypeVar) -> Self {
        var.0
    }
}

impl fmt::Debug for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
