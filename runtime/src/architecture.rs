//! Architectures: executable implementations of entities.
//!
//! An entity may have several architectures, each guarded by an applicability
//! [`Pattern`]. The pattern is matched against the port's first output and the
//! port itself, so it sees the port's entity and, through child patterns, the
//! structure and properties of its inputs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use smallvec::SmallVec;
use snafu::ensure;
use valence_ir::{ArchitectureId, EntityId, Graph, Pattern, PortId, SignalId, Value};

use crate::error::{DuplicateArchitectureSnafu, OutputSlotSnafu, ProcedureSnafu, Result};

/// Computes a port's outputs from its current input values.
pub type Procedure = Arc<dyn Fn(&mut Evaluation<'_>) -> Result<()> + Send + Sync>;

/// A value written to an output slot, applied after `delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputWrite {
    pub slot: usize,
    pub value: Value,
    pub delay: Duration,
}

/// One run of a procedure over a port.
///
/// Inputs are snapshotted when the evaluation starts; writes are collected and
/// applied by the scheduler afterwards, so a procedure cannot observe its own
/// outputs.
pub struct Evaluation<'g> {
    graph: &'g Graph,
    architecture: &'g ArchitectureId,
    port: PortId,
    inputs: SmallVec<[Value; 4]>,
    output_count: usize,
    writes: SmallVec<[OutputWrite; 1]>,
}

impl<'g> Evaluation<'g> {
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn port(&self) -> PortId {
        self.port
    }

    pub fn inputs(&self) -> &[Value] {
        &self.inputs
    }

    /// Value of input `index`; `Undefined` past the end.
    pub fn input(&self, index: usize) -> Value {
        self.inputs.get(index).copied().unwrap_or(Value::Undefined)
    }

    /// Signal feeding input `index`.
    pub fn input_signal(&self, index: usize) -> Option<SignalId> {
        self.graph.port(self.port).ok().and_then(|p| p.inputs().get(index).copied())
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Write `value` to output `slot` in the current delta round.
    pub fn set(&mut self, slot: usize, value: Value) -> Result<()> {
        self.set_delayed(slot, value, Duration::ZERO)
    }

    /// Write `value` to output `slot` after `delay` of virtual time.
    pub fn set_delayed(&mut self, slot: usize, value: Value, delay: Duration) -> Result<()> {
        ensure!(
            slot < self.output_count,
            OutputSlotSnafu { architecture: self.architecture.clone(), port: self.port, slot, outputs: self.output_count }
        );
        self.writes.push(OutputWrite { slot, value, delay });
        Ok(())
    }

    /// Abort the evaluation with a reason.
    pub fn fail<T>(&self, reason: impl Into<String>) -> Result<T> {
        ProcedureSnafu { architecture: self.architecture.clone(), port: self.port, reason: reason.into() }.fail()
    }

    pub fn writes(&self) -> &[OutputWrite] {
        &self.writes
    }
}

/// A concrete implementation of an entity.
#[derive(Clone)]
pub struct Architecture {
    id: ArchitectureId,
    entity: EntityId,
    pattern: Pattern,
    procedure: Procedure,
}

impl Architecture {
    pub fn new(
        id: ArchitectureId,
        entity: EntityId,
        pattern: Pattern,
        procedure: impl Fn(&mut Evaluation<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self { id, entity, pattern, procedure: Arc::new(procedure) }
    }

    pub fn id(&self) -> &ArchitectureId {
        &self.id
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Whether the applicability pattern matches `port`.
    pub fn applies(&self, graph: &Graph, port: PortId) -> bool {
        let Ok(p) = graph.port(port) else { return false };
        p.outputs().first().is_some_and(|&output| self.pattern.matches(graph, output, Some(port)))
    }

    /// Run the procedure over `port`'s current input values.
    ///
    /// Inputs without a value read as `Undefined`; the scheduler does not call
    /// this until every input has one.
    pub fn evaluate(&self, graph: &Graph, port: PortId) -> Result<SmallVec<[OutputWrite; 1]>> {
        let p = graph.port(port)?;
        let mut evaluation = Evaluation {
            graph,
            architecture: &self.id,
            port,
            inputs: p.inputs().iter().map(|&s| graph.value(s).unwrap_or(Value::Undefined)).collect(),
            output_count: p.outputs().len(),
            writes: SmallVec::new(),
        };
        (self.procedure)(&mut evaluation)?;
        tracing::trace!(architecture = %self.id, %port, writes = evaluation.writes.len(), "architecture evaluated");
        Ok(evaluation.writes)
    }
}

impl fmt::Debug for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Architecture")
            .field("id", &self.id)
            .field("entity", &self.entity)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Architectures per entity, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ArchitectureTable {
    by_entity: HashMap<EntityId, Vec<Arc<Architecture>>>,
    by_id: HashMap<ArchitectureId, Arc<Architecture>>,
}

impl ArchitectureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, architecture: Architecture) -> Result<Arc<Architecture>> {
        ensure!(
            !self.by_id.contains_key(&architecture.id),
            DuplicateArchitectureSnafu { architecture: architecture.id.clone() }
        );
        let architecture = Arc::new(architecture);
        tracing::debug!(architecture = %architecture.id, entity = %architecture.entity, "architecture registered");
        self.by_id.insert(architecture.id.clone(), architecture.clone());
        self.by_entity.entry(architecture.entity.clone()).or_default().push(architecture.clone());
        Ok(architecture)
    }

    pub fn get(&self, id: &ArchitectureId) -> Option<&Arc<Architecture>> {
        self.by_id.get(id)
    }

    /// Candidates for `entity` in registration order.
    pub fn for_entity(&self, entity: &EntityId) -> &[Arc<Architecture>] {
        self.by_entity.get(entity).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
