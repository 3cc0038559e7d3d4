//! Type traversal traits.
//!
//! - `TypeVisitor`: read-only walk over a type tree
//! - `TypeFolder`: rewrite that rebuilds a node only when a child changed
//!
//! Expression passes reach these through their `visit_type` / `mutate_type`
//! hooks; a pass that needs type coverage implements one of these traits and
//! forwards the hook to it.
//!
//! Unlike the expression framework, neither trait memoizes: type trees are
//! small and rarely shared deeply enough to need it.

use crate::{FuncType, TensorType, TupleType, Type, TypeKind, TypeVar};

/// Trait for visiting types without modification.
///
/// Override specific `visit_*` methods to collect information.
///
/// # Example
///
/// ```text
/// struct CollectTypeVars {
///     vars: Vec<TypeVar>,
/// }
///
/// impl TypeVisitor for CollectTypeVars {
///     fn visit_type_var(&mut self, var: &TypeVar) {
///         if !self.vars.iter().any(|v| v.same_as(var)) {
///             self.vars.push(var.clone());
///         }
///     }
/// }
/// ```
pub trait TypeVisitor {
    /// Visit a type by dispatching to variant-specific methods.
    fn visit(&mut self, ty: &Type) {
        match ty.kind() {
            TypeKind::Var(_) => self.visit_type_var(&TypeVar::cast(ty)),
            TypeKind::Tensor(tensor) => self.visit_tensor_type(tensor),
            TypeKind::Tuple(tuple) => self.visit_tuple_type(tuple),
            TypeKind::Func(func) => self.visit_func_type(func),
        }
    }

    /// Visit a type variable. Override to handle variables.
    fn visit_type_var(&mut self, _var: &TypeVar) {}

    /// Visit a tensor type. Tensors have no child types.
    fn visit_tensor_type(&mut self, _tensor: &TensorType) {}

    /// Visit a tuple type. Default visits fields in order.
    fn visit_tuple_type(&mut self, tuple: &TupleType) {
        for field in &tuple.fields {
            self.visit(field);
        }
    }

    /// Visit a function type. Default visits type params, then argument
    /// types, then the return type.
    fn visit_func_type(&mut self, func: &FuncType) {
        for param in &func.type_params {
            self.visit(param.as_type());
        }
        for arg in &func.arg_types {
            self.visit(arg);
        }
        self.visit(&func.ret_type);
    }
}

/// Trait for rewriting types.
///
/// Default methods rebuild a node only when one of its children comes back
/// as a different node, and otherwise return the original handle, so an
/// identity fold of any type returns a handle `same_as` its input.
///
/// # Example
///
/// ```text
/// struct Instantiate<'a> {
///     bindings: &'a [(TypeVar, Type)],
/// }
///
/// impl TypeFolder for Instantiate<'_> {
///     fn fold_type_var(&mut self, ty: &Type, var: &TypeVar) -> Type {
///         self.bindings
///             .iter()
///             .find(|(v, _)| v.same_as(var))
///             .map_or_else(|| ty.clone(), |(_, t)| t.clone())
///     }
/// }
/// ```
pub trait TypeFolder {
    /// Fold a type by dispatching to variant-specific methods.
    fn fold(&mut self, ty: &Type) -> Type {
        match ty.kind() {
            TypeKind::Var(_) => self.fold_type_var(ty, &TypeVar::cast(ty)),
            TypeKind::Tensor(tensor) => self.fold_tensor_type(ty, tensor),
            TypeKind::Tuple(tuple) => self.fold_tuple_type(ty, tuple),
            TypeKind::Func(func) => self.fold_func_type(ty, func),
        }
    }

    /// Fold a type variable. Default returns it unchanged.
    fn fold_type_var(&mut self, ty: &Type, _var: &TypeVar) -> Type {
        ty.clone()
    }

    /// Fold a tensor type. Default returns it unchanged.
    fn fold_tensor_type(&mut self, ty: &Type, _tensor: &TensorType) -> Type {
        ty.clone()
    }

    /// Fold a tuple type. Default folds fields, rebuilding if any changed.
    fn fold_tuple_type(&mut self, ty: &Type, tuple: &TupleType) -> Type {
        let (fields, changed) = fold_all(self, &tuple.fields);
        if changed {
            Type::tuple(fields)
        } else {
            ty.clone()
        }
    }

    /// Fold a function type. Type parameters must fold to type variables.
    fn fold_func_type(&mut self, ty: &Type, func: &FuncType) -> Type {
        let mut changed = false;
        let type_params: Vec<TypeVar> = func
            .type_params
            .iter()
            .map(|param| {
                let folded = TypeVar::cast(&self.fold(param.as_type()));
                changed |= !folded.same_as(param);
                folded
            })
            .collect();
        let (arg_types, args_changed) = fold_all(self, &func.arg_types);
        let ret_type = self.fold(&func.ret_type);

        if changed || args_changed || !ret_type.same_as(&func.ret_type) {
            Type::func(type_params, arg_types, ret_type)
        } else {
            ty.clone()
        }
    }
}

/// Fold each type in order, reporting whether any came back as a new node.
fn fold_all<F: TypeFolder + ?Sized>(folder: &mut F, types: &[Type]) -> (Vec<Type>, bool) {
    let mut changed = false;
    let folded = types
        .iter()
        .map(|ty| {
            let new_ty = folder.fold(ty);
            changed |= !new_ty.same_as(ty);
            new_ty
        })
        .collect();
    (folded, changed)
}
