//! Literal payloads carried by `Constant` nodes.
//!
//! The traversal framework never looks inside a constant; the payload only
//! matters to passes that fold or print values.

use std::fmt;

/// Scalar literal value.
///
/// Floats are stored as `u64` bits so the payload can derive `Eq` and `Hash`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    Bool(bool),
    Int(i64),
    Float(u64),
}

impl ConstantValue {
    pub fn float(value: f64) -> Self {
        ConstantValue::Float(value.to_bits())
    }

    /// Float value, if this is a float literal.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            ConstantValue::Float(bits) => Some(f64::from_bits(bits)),
            ConstantValue::Bool(_) | ConstantValue::Int(_) => None,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            ConstantValue::Int(value) => Some(value),
            ConstantValue::Bool(_) | ConstantValue::Float(_) => None,
        }
    }
}

impl From<bool> for ConstantValue {
    fn from(value: bool) -> Self {
        ConstantValue::Bool(value)
    }
}

impl From<i64> for ConstantValue {
    fn from(value: i64) -> Self {
        ConstantValue::Int(value)
    }
}

impl From<i32> for ConstantValue {
    fn from(value: i32) -> Self {
        ConstantValue::Int(i64::from(value))
    }
}

impl From<f64> for ConstantValue {
    fn from(value: f64) -> Self {
        ConstantValue::float(value)
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Bool(value) => write!(f, "{value}"),
            ConstantValue::Int(value) => write!(f, "{value}"),
            ConstantValue::Float(bits) => write!(f, "{:?}f", f64::from_bits(*bits)),
        }
    }
}
