//! Categories: memoized structural classifiers over the signal graph.
//!
//! A category answers "is the computation behind this signal a member?" with
//! a three-valued [`Membership`]. Classification recurses through the driving
//! port's inputs, so the answer for a signal depends on its whole driving
//! subgraph; results are cached per `(category, signal)` in the graph and
//! dropped whenever that subgraph changes.
//!
//! The recursion rules shared by every category live in [`classify`]:
//!
//! 1. Cyclic signals are never members.
//! 2. Free signals are decided by [`Category::classify_source`].
//! 3. Ports carrying a bus are never members.
//! 4. Otherwise the inputs' joint membership is computed; only when every
//!    input is a member does [`Category::classify_port`] look at the entity.
//! 5. A single-input `Std.Identity` port is transparent: its output has the
//!    membership of its input. Splicing a shared free signal into place goes
//!    through such a port, so simplification never changes a verdict.

mod expression;
mod structure;

use std::borrow::Cow;
use std::collections::HashMap;

pub use expression::AlgebraicExpression;
pub use structure::AlgebraicStructure;

use crate::entity::standard;
use crate::error::Result;
use crate::graph::{Graph, Port, SignalId};

/// Three-valued category membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Membership {
    Member,
    NotMember,
    Unknown,
}

impl Membership {
    /// Joint membership of two facts: `NotMember` dominates, then `Unknown`.
    pub fn and(self, other: Membership) -> Membership {
        match (self, other) {
            (Membership::NotMember, _) | (_, Membership::NotMember) => Membership::NotMember,
            (Membership::Member, Membership::Member) => Membership::Member,
            _ => Membership::Unknown,
        }
    }

    /// Joint membership of all items; `Member` for none.
    pub fn joint(items: impl IntoIterator<Item = Membership>) -> Membership {
        items.into_iter().fold(Membership::Member, Membership::and)
    }
}

/// Cache key half naming a category instance.
///
/// Parameterized categories encode their parameters in the id so differently
/// configured instances never share cache entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct CategoryId(Cow<'static, str>);

impl CategoryId {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A structural classifier.
pub trait Category: std::fmt::Debug + Send + Sync {
    fn id(&self) -> CategoryId;

    /// Membership of a free signal.
    fn classify_source(&self, graph: &Graph, signal: SignalId) -> Membership;

    /// Membership of a port's outputs, called only once every input is a member.
    fn classify_port(&self, graph: &Graph, port: &Port) -> Membership;
}

/// Memoized memberships keyed by `(category, signal)`.
#[derive(Debug, Default, Clone)]
pub struct CategoryCache {
    entries: HashMap<(CategoryId, SignalId), Membership>,
}

impl CategoryCache {
    pub fn get(&self, category: &CategoryId, signal: SignalId) -> Option<Membership> {
        self.entries.get(&(category.clone(), signal)).copied()
    }

    pub fn insert(&mut self, category: CategoryId, signal: SignalId, membership: Membership) {
        self.entries.insert((category, signal), membership);
    }

    /// Drop every entry for the given signals, across all categories.
    pub fn invalidate(&mut self, signals: &[SignalId]) {
        if self.entries.is_empty() || signals.is_empty() {
            return;
        }
        self.entries.retain(|(_, signal), _| !signals.contains(signal));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify `signal` under `category`.
///
/// With `ignore_cache` the cache is neither read nor written, which gives the
/// same answer as a cached run by construction.
pub fn classify(category: &dyn Category, graph: &Graph, signal: SignalId, ignore_cache: bool) -> Result<Membership> {
    let id = category.id();
    if !ignore_cache && let Some(membership) = graph.cached_membership(&id, signal) {
        tracing::trace!(category = %id, %signal, %membership, "membership cache hit");
        return Ok(membership);
    }

    let node = graph.signal(signal)?;
    let membership = if node.is_cyclic() {
        Membership::NotMember
    } else {
        match node.driver() {
            None => category.classify_source(graph, signal),
            Some(port) => {
                let port = graph.port(port)?;
                if port.buses().is_empty() {
                    let mut joint = Membership::Member;
                    for &input in port.inputs() {
                        joint = joint.and(classify(category, graph, input, ignore_cache)?);
                        if joint == Membership::NotMember {
                            break;
                        }
                    }
                    let forwards = port.entity().id == standard::IDENTITY && port.inputs().len() == 1;
                    match joint {
                        Membership::Member if forwards => Membership::Member,
                        Membership::Member => category.classify_port(graph, port),
                        other => other,
                    }
                } else {
                    Membership::NotMember
                }
            }
        }
    };

    tracing::trace!(category = %id, %signal, %membership, "classified");
    if !ignore_cache {
        graph.store_membership(id, signal, membership);
    }
    Ok(membership)
}

impl Graph {
    /// See [`classify`].
    pub fn classify(&self, category: &dyn Category, signal: SignalId, ignore_cache: bool) -> Result<Membership> {
        classify(category, self, signal, ignore_cache)
    }
}
