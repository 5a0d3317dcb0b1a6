use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use snafu::ensure;

use crate::error::{DuplicateTheoremSnafu, Result};
use crate::graph::{Graph, SignalId};
use crate::pattern::{Bindings, Pattern, RewriteResult};

/// Rewrite procedure: builds a replacement for the matched signal.
///
/// Gets the pattern's bindings and the matched signal. It may add structure to
/// the graph but must not touch the matched signal itself; splicing the result
/// in is the engine's job.
pub type RewriteFn = Arc<dyn Fn(&mut Graph, &Bindings, SignalId) -> Result<RewriteResult> + Send + Sync>;

/// A registered `(pattern, rewrite)` pair.
#[derive(Clone)]
pub struct Theorem {
    id: Cow<'static, str>,
    pattern: Pattern,
    rewrite: RewriteFn,
}

impl Theorem {
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        pattern: Pattern,
        rewrite: impl Fn(&mut Graph, &Bindings, SignalId) -> Result<RewriteResult> + Send + Sync + 'static,
    ) -> Self {
        Self { id: id.into(), pattern, rewrite: Arc::new(rewrite) }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Match against `signal` and run the rewrite on success.
    pub fn apply(&self, graph: &mut Graph, signal: SignalId) -> Result<RewriteResult> {
        let Some(bindings) = self.pattern.match_signal(graph, signal) else {
            return Ok(RewriteResult::NoMatch);
        };
        (self.rewrite)(graph, &bindings, signal)
    }
}

impl fmt::Debug for Theorem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theorem").field("id", &self.id).field("pattern", &self.pattern).finish_non_exhaustive()
    }
}

/// Ordered theorem registry; the first theorem that rewrites wins.
#[derive(Debug, Clone, Default)]
pub struct TheoremTable {
    theorems: Vec<Theorem>,
    ids: HashSet<Cow<'static, str>>,
}

impl TheoremTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, theorem: Theorem) -> Result<()> {
        ensure!(!self.ids.contains(&theorem.id), DuplicateTheoremSnafu { theorem: theorem.id.to_string() });
        tracing::debug!(theorem = %theorem.id, "theorem registered");
        self.ids.insert(theorem.id.clone());
        self.theorems.push(theorem);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theorem> {
        self.theorems.iter()
    }

    pub fn len(&self) -> usize {
        self.theorems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theorems.is_empty()
    }

    /// Try every theorem on `signal` in registration order.
    ///
    /// Returns the first replacement different from `signal` with the id of
    /// the theorem that produced it.
    pub fn rewrite(&self, graph: &mut Graph, signal: SignalId) -> Result<Option<(&str, SignalId)>> {
        for theorem in &self.theorems {
            match theorem.apply(graph, signal)? {
                RewriteResult::Rewritten(replacement) if replacement != signal => {
                    tracing::debug!(theorem = %theorem.id, %signal, %replacement, "theorem applied");
                    return Ok(Some((theorem.id(), replacement)));
                }
                _ => {}
            }
        }
        Ok(None)
    }
}
