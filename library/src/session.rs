//! A graph together with the registry and scheduler that evaluate it.

use std::time::Duration;

use bon::bon;
use snafu::OptionExt;
use valence_ir::{
    Category, EntityId, Graph, Membership, SignalId, SimplifyConfig, SimplifyOutput, SweepStats, Value, simplify,
};
use valence_runtime::{Registry, Scheduler, SchedulerConfig};

use crate::error::{Result, UnknownSymbolSnafu};

/// Owns one graph and drives it: construction, evaluation and simplification.
///
/// Calls must be serialized by the host; the session is single-threaded.
#[derive(Debug)]
pub struct Session {
    graph: Graph,
    registry: Registry,
    scheduler: Scheduler,
    simplify: SimplifyConfig,
}

#[bon]
impl Session {
    /// Create a session with builder pattern.
    #[builder]
    pub fn builder(
        #[builder(default)] registry: Registry,
        #[builder(default)] scheduler: SchedulerConfig,
        #[builder(default)] simplify: SimplifyConfig,
    ) -> Self {
        Self { graph: Graph::new(), registry, scheduler: Scheduler::new(scheduler), simplify }
    }

    /// Session over the standard package, with limits taken from the environment.
    pub fn standard() -> Result<Self> {
        let mut registry = Registry::new();
        crate::register(&mut registry)?;
        Ok(Self::builder()
            .registry(registry)
            .scheduler(SchedulerConfig::from_env())
            .simplify(SimplifyConfig::from_env())
            .build())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Direct graph access for edits the session does not wrap.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn variable(&mut self, label: impl Into<String>) -> SignalId {
        self.graph.create_labeled_signal(label)
    }

    pub fn constant(&mut self, value: impl Into<Value>) -> SignalId {
        self.graph.create_constant(value)
    }

    /// Build `entity(inputs)` and return its first output.
    pub fn apply(&mut self, entity: &EntityId, inputs: &[SignalId]) -> Result<SignalId> {
        let entity = self.registry.entities.get(entity)?;
        Ok(self.graph.apply(entity, inputs)?)
    }

    /// [`apply`](Self::apply) with the entity looked up by display symbol.
    pub fn apply_symbol(&mut self, symbol: &str, inputs: &[SignalId]) -> Result<SignalId> {
        let entity = self.registry.entities.by_symbol(symbol).context(UnknownSymbolSnafu { symbol })?;
        Ok(self.graph.apply(entity, inputs)?)
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    pub fn post(&mut self, signal: SignalId, value: impl Into<Value>) -> Result<()> {
        Ok(self.scheduler.post(&self.graph, signal, value.into())?)
    }

    pub fn post_delayed(&mut self, signal: SignalId, value: impl Into<Value>, delay: Duration) -> Result<()> {
        Ok(self.scheduler.post_delayed(&self.graph, signal, value.into(), delay)?)
    }

    pub fn simulate_instant(&mut self) -> Result<()> {
        Ok(self.scheduler.simulate_instant(&mut self.graph, &self.registry.architectures)?)
    }

    pub fn simulate_for(&mut self, span: Duration) -> Result<Duration> {
        Ok(self.scheduler.simulate_for(&mut self.graph, &self.registry.architectures, span)?)
    }

    /// Post `point` to its source signals, settle, and read `signal`.
    ///
    /// `None` means `signal` stayed without a value: some port on the way has
    /// no applicable architecture or reads a source that was never posted.
    pub fn evaluate_at(&mut self, point: &[(SignalId, Value)], signal: SignalId) -> Result<Option<Value>> {
        for &(source, value) in point {
            self.scheduler.post(&self.graph, source, value)?;
        }
        self.simulate_instant()?;
        Ok(self.graph.value(signal))
    }

    // ------------------------------------------------------------------
    // Analysis and rewriting
    // ------------------------------------------------------------------

    pub fn classify(&self, category: &dyn Category, signal: SignalId) -> Result<Membership> {
        Ok(self.graph.classify(category, signal, false)?)
    }

    /// Simplify `signal` in place with the registered theorems.
    pub fn simplify(&mut self, signal: SignalId) -> Result<SimplifyOutput> {
        Ok(simplify(&mut self.graph, &self.registry.theorems, signal, &self.simplify)?)
    }

    /// Drop everything outside the driving subgraphs of `roots`.
    pub fn remove_unused(&mut self, roots: &[SignalId]) -> Result<SweepStats> {
        Ok(self.graph.remove_unused(roots)?)
    }

    pub fn render(&self, signal: SignalId) -> String {
        self.graph.render_tree(signal)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::builder().build()
    }
}
