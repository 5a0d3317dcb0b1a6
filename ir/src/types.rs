//! Leaf value and property types.
//!
//! The engine treats values as opaque beyond equality and the small set of
//! arithmetic kernels below, which exist so standard architectures and constant
//! folding have something to compute with.

use std::borrow::Cow;
use std::fmt;

/// Value carried by a signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Logic(bool),
    /// Result of an undefined operation (division by zero, factorial of a negative...).
    Undefined,
}

impl Value {
    /// Identity comparison used for change detection.
    ///
    /// Reals compare bitwise so a NaN written twice counts as unchanged.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Real(a), Value::Real(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Integer(v) => *v == 0,
            Value::Real(v) => *v == 0.0,
            _ => false,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Value::Integer(v) => *v == 1,
            Value::Real(v) => *v == 1.0,
            _ => false,
        }
    }

    /// Numeric view as `f64`, if the value is numeric.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn add(&self, rhs: &Value) -> Value {
        numeric_binary(self, rhs, i64::checked_add, |a, b| a + b)
    }

    pub fn subtract(&self, rhs: &Value) -> Value {
        numeric_binary(self, rhs, i64::checked_sub, |a, b| a - b)
    }

    pub fn multiply(&self, rhs: &Value) -> Value {
        numeric_binary(self, rhs, i64::checked_mul, |a, b| a * b)
    }

    /// Division. Integer division stays integral only when exact.
    pub fn divide(&self, rhs: &Value) -> Value {
        if rhs.is_zero() {
            return Value::Undefined;
        }
        match (self, rhs) {
            (Value::Integer(a), Value::Integer(b)) if a.checked_rem(*b) == Some(0) => {
                a.checked_div(*b).map_or_else(|| Value::Real(*a as f64 / *b as f64), Value::Integer)
            }
            _ => match (self.as_real(), rhs.as_real()) {
                (Some(a), Some(b)) => Value::Real(a / b),
                _ => Value::Undefined,
            },
        }
    }

    pub fn power(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(a), Value::Integer(b)) if *b >= 0 => match u32::try_from(*b) {
                Ok(exp) => a.checked_pow(exp).map_or_else(|| Value::Real((*a as f64).powf(*b as f64)), Value::Integer),
                Err(_) => Value::Real((*a as f64).powf(*b as f64)),
            },
            (Value::Integer(0), Value::Integer(_)) => Value::Undefined,
            _ => match (self.as_real(), rhs.as_real()) {
                (Some(a), Some(b)) => {
                    let r = a.powf(b);
                    if r.is_nan() { Value::Undefined } else { Value::Real(r) }
                }
                _ => Value::Undefined,
            },
        }
    }

    pub fn negate(&self) -> Value {
        match self {
            Value::Integer(v) => v.checked_neg().map_or(Value::Real(-(*v as f64)), Value::Integer),
            Value::Real(v) => Value::Real(-v),
            _ => Value::Undefined,
        }
    }

    /// Factorial of a non-negative integer; anything else is undefined.
    ///
    /// Results past `i64` fall back to `f64`, which is infinite beyond `170!`.
    pub fn factorial(&self) -> Value {
        let Value::Integer(n) = *self else { return Value::Undefined };
        if n < 0 {
            return Value::Undefined;
        }
        if n > MAX_FINITE_FACTORIAL {
            return Value::Real(f64::INFINITY);
        }
        let mut acc: i64 = 1;
        for k in 2..=n {
            match acc.checked_mul(k) {
                Some(next) => acc = next,
                None => return Value::Real((2..=n).map(|k| k as f64).product()),
            }
        }
        Value::Integer(acc)
    }

    pub fn sine(&self) -> Value {
        self.as_real().map_or(Value::Undefined, |v| Value::Real(v.sin()))
    }
}

/// Largest `n` whose factorial is finite in `f64`.
const MAX_FINITE_FACTORIAL: i64 = 170;

fn numeric_binary(
    lhs: &Value,
    rhs: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    real_op: fn(f64, f64) -> f64,
) -> Value {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => {
            int_op(*a, *b).map_or_else(|| Value::Real(real_op(*a as f64, *b as f64)), Value::Integer)
        }
        _ => match (lhs.as_real(), rhs.as_real()) {
            (Some(a), Some(b)) => Value::Real(real_op(a, b)),
            _ => Value::Undefined,
        },
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Logic(v) => write!(f, "{v}"),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Logic(v)
    }
}

/// Domain-qualified property marker attached to signals (e.g. `Std.Constant`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct Property(Cow<'static, str>);

impl Property {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Signal holds a value fixed at construction time.
    pub const CONSTANT: Property = Property::from_static("Std.Constant");
    /// Signal value is always an integer.
    pub const INTEGER: Property = Property::from_static("Std.Integer");
    /// Signal value is always real.
    pub const REAL: Property = Property::from_static("Std.Real");
    /// Signal value is strictly positive.
    pub const POSITIVE: Property = Property::from_static("Std.Positive");
}
