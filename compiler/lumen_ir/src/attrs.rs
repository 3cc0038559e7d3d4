//! Opaque attribute bags attached to `Function` and `Call` nodes.
//!
//! Traversal never inspects attributes; rewrites copy the bag through by
//! handle so an unchanged bag keeps its identity.

use std::fmt;
use std::sync::Arc;

use crate::Symbol;

/// Attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(Symbol),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Int(value) => write!(f, "{value}"),
            AttrValue::Str(value) => write!(f, "{:?}", value.as_str()),
        }
    }
}

/// Ordered key/value attributes, shared by reference.
#[derive(Clone, Debug, Default)]
pub struct Attrs(Option<Arc<[(Symbol, AttrValue)]>>);

impl Attrs {
    /// Empty attribute bag.
    pub fn new() -> Self {
        Attrs(None)
    }

    pub fn from_pairs<K: Into<Symbol>>(pairs: impl IntoIterator<Item = (K, AttrValue)>) -> Self {
        let pairs: Vec<(Symbol, AttrValue)> =
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        if pairs.is_empty() {
            Attrs(None)
        } else {
            Attrs(Some(Arc::from(pairs)))
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.iter()
            .find(|(name, _)| name.as_str() == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Symbol, AttrValue)> {
        self.0.iter().flat_map(|pairs| pairs.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Whether both bags are the same allocation (or both empty).
    pub fn same_as(&self, other: &Attrs) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}
