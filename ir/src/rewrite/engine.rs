//! Theorem-driven simplification.
//!
//! # Algorithm
//!
//! The traversal operates in 2 stages per signal:
//! - Stage 0 (Children): schedule the driving port's inputs first.
//! - Stage 1 (Rewrite): try theorems in registration order; on a rewrite,
//!   splice the replacement into the signal (keeping its id), retire the port
//!   it displaced, and schedule the signal again, since its new inputs may
//!   need simplifying and a further theorem may now apply.
//!
//! Cyclic signals are left alone: a rewrite through a cycle could feed its own
//! result back into the pattern. Everything below a non-cyclic signal is a DAG,
//! so the traversal terminates; the rewrite budget in [`SimplifyConfig`] bounds
//! theorem sets that never reach a fixpoint.

use std::collections::HashSet;

use super::{SimplifyConfig, TheoremTable};
use crate::error::Result;
use crate::graph::{Graph, SignalId};

/// Stage in the 2-stage traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Stage 0: schedule children.
    Children,
    /// Stage 1: rewrite to a local fixpoint.
    Rewrite,
}

#[derive(Debug, Clone, Copy)]
struct StackEntry {
    signal: SignalId,
    stage: Stage,
}

impl StackEntry {
    fn children(signal: SignalId) -> Self {
        Self { signal, stage: Stage::Children }
    }

    fn rewrite(signal: SignalId) -> Self {
        Self { signal, stage: Stage::Rewrite }
    }
}

/// Result of [`simplify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOutput {
    /// The simplified signal; always the input root, whose id is preserved.
    pub root: SignalId,
    /// Number of theorem applications.
    pub rewrites: usize,
    /// False when the rewrite budget ran out first.
    pub converged: bool,
}

struct SimplifyEngine<'a> {
    graph: &'a mut Graph,
    theorems: &'a TheoremTable,
    config: &'a SimplifyConfig,
    /// Signals at their local fixpoint.
    done: HashSet<SignalId>,
    rewrites: usize,
}

impl<'a> SimplifyEngine<'a> {
    fn handle_children(&mut self, stack: &mut Vec<StackEntry>, signal: SignalId) -> Result<()> {
        if self.done.contains(&signal) {
            return Ok(());
        }
        if self.graph.is_cyclic(signal) {
            self.done.insert(signal);
            return Ok(());
        }

        stack.push(StackEntry::rewrite(signal));
        let Some(port) = self.graph.driver(signal) else {
            return Ok(());
        };
        // Reverse so the first input is processed first.
        for &input in self.graph.port(port)?.inputs().iter().rev() {
            if !self.done.contains(&input) {
                stack.push(StackEntry::children(input));
            }
        }
        Ok(())
    }

    /// Returns false once the rewrite budget is exhausted.
    fn handle_rewrite(&mut self, stack: &mut Vec<StackEntry>, signal: SignalId) -> Result<bool> {
        if self.done.contains(&signal) {
            return Ok(true);
        }
        if self.rewrites >= self.config.max_iterations {
            return Ok(false);
        }

        match self.theorems.rewrite(self.graph, signal)? {
            Some((_, replacement)) => {
                let displaced = self.graph.driver(signal);
                self.graph.splice(signal, replacement)?;
                if let Some(port) = displaced.filter(|&port| self.graph.driver(signal) != Some(port)) {
                    self.graph.retire_port(port)?;
                }
                self.rewrites += 1;
                stack.push(StackEntry::children(signal));
            }
            None => {
                self.done.insert(signal);
            }
        }
        Ok(true)
    }

    fn run(&mut self, root: SignalId) -> Result<bool> {
        let mut stack = vec![StackEntry::children(root)];
        while let Some(entry) = stack.pop() {
            match entry.stage {
                Stage::Children => self.handle_children(&mut stack, entry.signal)?,
                Stage::Rewrite => {
                    if !self.handle_rewrite(&mut stack, entry.signal)? {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }
}

/// Simplify `root`'s driving subgraph with `theorems` until no theorem applies.
///
/// Children are simplified before their parents are re-tested. `root` keeps
/// its id; consumers of any rewritten signal see the simplified structure.
pub fn simplify(
    graph: &mut Graph,
    theorems: &TheoremTable,
    root: SignalId,
    config: &SimplifyConfig,
) -> Result<SimplifyOutput> {
    graph.signal(root)?;
    let mut engine = SimplifyEngine { graph, theorems, config, done: HashSet::new(), rewrites: 0 };
    let converged = engine.run(root)?;
    if !converged {
        tracing::warn!(%root, max_iterations = config.max_iterations, "simplification budget exhausted before fixpoint");
    }
    tracing::debug!(%root, rewrites = engine.rewrites, converged, "simplified");
    Ok(SimplifyOutput { root, rewrites: engine.rewrites, converged })
}
