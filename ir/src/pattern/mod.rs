//! Condition and pattern matching over the signal graph.
//!
//! A [`Pattern`] pairs a [`Condition`] with positional child patterns. Matching
//! is a single top-down pass: the condition is checked against the signal and
//! its driving port, then child `i` is matched against the port's input `i`
//! and that input's own driver. There is no backtracking across siblings.
//! Used by architecture resolution and by theorem rewriting alike.

mod condition;
pub mod helpers;

use std::borrow::Cow;

use smallvec::SmallVec;

pub use condition::{Condition, Predicate};
pub use helpers::{const_matches, is_nonzero, is_one, is_zero, try_const};

use crate::entity::EntityId;
use crate::graph::{Graph, PortId, SignalId};

// =============================================================================
// Bindings
// =============================================================================

/// Signals captured by named sub-patterns during a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: SmallVec<[(Cow<'static, str>, SignalId); 4]>,
}

impl Bindings {
    pub fn get(&self, name: &str) -> Option<SignalId> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SignalId)> {
        self.entries.iter().map(|(n, s)| (n.as_ref(), *s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind `name`, or check it against an earlier binding.
    fn bind(&mut self, name: &Cow<'static, str>, signal: SignalId) -> bool {
        match self.get(name) {
            Some(bound) => bound == signal,
            None => {
                self.entries.push((name.clone(), signal));
                true
            }
        }
    }
}

// =============================================================================
// RewriteResult
// =============================================================================

/// Result of applying a theorem rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteResult {
    /// Pattern didn't match or the rewrite declined.
    NoMatch,
    /// Replacement signal computing the same thing.
    Rewritten(SignalId),
}

// =============================================================================
// Pattern
// =============================================================================

/// Tree-shaped structural matcher.
#[derive(Debug, Clone)]
pub struct Pattern {
    condition: Condition,
    children: Vec<Pattern>,
    binding: Option<Cow<'static, str>>,
}

impl Pattern {
    pub fn new(condition: Condition) -> Self {
        Self { condition, children: Vec::new(), binding: None }
    }

    /// Matches anything.
    pub fn any() -> Self {
        Self::new(Condition::Always)
    }

    /// Port instantiates `entity` and its inputs match `children` positionally.
    pub fn entity(entity: EntityId, children: impl IntoIterator<Item = Pattern>) -> Self {
        Self::new(Condition::EntityIs(entity)).with_children(children)
    }

    /// Matches anything and binds it as `name`.
    pub fn var(name: impl Into<Cow<'static, str>>) -> Self {
        Self::any().bind(name)
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Pattern>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Capture the matched signal as `name`.
    ///
    /// A name bound twice within one pattern must capture the same signal.
    pub fn bind(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.binding = Some(name.into());
        self
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    /// Match against `signal` with an explicit driving `port`.
    pub fn match_at(&self, graph: &Graph, signal: SignalId, port: Option<PortId>) -> Option<Bindings> {
        let mut bindings = Bindings::default();
        self.match_into(graph, signal, port, &mut bindings).then_some(bindings)
    }

    /// Match against `signal` and its current driver.
    pub fn match_signal(&self, graph: &Graph, signal: SignalId) -> Option<Bindings> {
        self.match_at(graph, signal, graph.driver(signal))
    }

    pub fn matches(&self, graph: &Graph, signal: SignalId, port: Option<PortId>) -> bool {
        self.match_at(graph, signal, port).is_some()
    }

    fn match_into(&self, graph: &Graph, signal: SignalId, port: Option<PortId>, bindings: &mut Bindings) -> bool {
        if !self.condition.holds(graph, signal, port) {
            return false;
        }
        if let Some(name) = &self.binding
            && !bindings.bind(name, signal)
        {
            return false;
        }
        if self.children.is_empty() {
            return true;
        }

        let Some(inputs) = port.and_then(|p| graph.port(p).ok()).map(|p| p.inputs()) else {
            return false;
        };
        if self.children.len() > inputs.len() {
            return false;
        }
        self.children.iter().zip(inputs).all(|(child, &input)| child.match_into(graph, input, graph.driver(input), bindings))
    }
}

impl From<Condition> for Pattern {
    fn from(condition: Condition) -> Self {
        Pattern::new(condition)
    }
}
