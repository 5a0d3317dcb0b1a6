//! Helper predicates over constant signals.
//!
//! A constant is a free signal carrying [`Property::CONSTANT`] and a value.
//! These are used by theorem rewrites and by conditions built with
//! [`Condition::custom`](super::Condition::custom).

use crate::graph::{Graph, SignalId};
use crate::types::{Property, Value};

/// Value of `signal` if it is a constant.
#[inline]
pub fn try_const(graph: &Graph, signal: SignalId) -> Option<Value> {
    let node = graph.signal(signal).ok()?;
    if node.is_source() && node.has_property(&Property::CONSTANT) { node.value() } else { None }
}

/// Whether `signal` is a constant satisfying `predicate`.
#[inline]
pub fn const_matches<F>(graph: &Graph, signal: SignalId, predicate: F) -> bool
where
    F: FnOnce(&Value) -> bool,
{
    try_const(graph, signal).is_some_and(|value| predicate(&value))
}

#[inline]
pub fn is_zero(graph: &Graph, signal: SignalId) -> bool {
    const_matches(graph, signal, Value::is_zero)
}

#[inline]
pub fn is_one(graph: &Graph, signal: SignalId) -> bool {
    const_matches(graph, signal, Value::is_one)
}

#[inline]
pub fn is_nonzero(graph: &Graph, signal: SignalId) -> bool {
    const_matches(graph, signal, |v| !v.is_zero() && !v.is_undefined())
}
