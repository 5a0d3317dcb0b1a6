use std::borrow::Cow;
use std::sync::Arc;

use smallvec::SmallVec;

use super::{BusId, PortId, SignalId};
use crate::entity::Entity;

/// Identifier of an executable implementation of an entity.
///
/// The graph only records which architecture a port selected; the
/// implementations themselves belong to the runtime.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct ArchitectureId(Cow<'static, str>);

impl ArchitectureId {
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

/// An instantiation of an [`Entity`] wiring input signals to output signals.
#[derive(Debug, Clone)]
pub struct Port {
    pub(crate) id: PortId,
    pub(crate) entity: Arc<Entity>,
    pub(crate) inputs: SmallVec<[SignalId; 2]>,
    pub(crate) outputs: SmallVec<[SignalId; 1]>,
    pub(crate) buses: SmallVec<[BusId; 1]>,
    pub(crate) architecture: Option<ArchitectureId>,
    pub(crate) needs_resolution: bool,
}

impl Port {
    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    /// Inputs in positional order; a signal may appear more than once.
    pub fn inputs(&self) -> &[SignalId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[SignalId] {
        &self.outputs
    }

    pub fn buses(&self) -> &[BusId] {
        &self.buses
    }

    /// Architecture chosen at the last resolution, if any matched.
    pub fn architecture(&self) -> Option<&ArchitectureId> {
        self.architecture.as_ref()
    }

    /// Whether the architecture must be selected again before the next evaluation.
    pub fn needs_resolution(&self) -> bool {
        self.needs_resolution
    }

    /// Output slot holding `signal`.
    pub fn slot_of(&self, signal: SignalId) -> Option<usize> {
        self.outputs.iter().position(|&s| s == signal)
    }

    /// Inputs with repeats removed, first occurrence order.
    pub(crate) fn distinct_inputs(&self) -> SmallVec<[SignalId; 2]> {
        let mut distinct = SmallVec::<[SignalId; 2]>::new();
        for &input in &self.inputs {
            if !distinct.contains(&input) {
                distinct.push(input);
            }
        }
        distinct
    }
}

/// A named group of signals bound to ports as a unit.
#[derive(Debug, Clone)]
pub struct Bus {
    pub(crate) id: BusId,
    pub(crate) label: Option<String>,
    pub(crate) signals: SmallVec<[SignalId; 4]>,
}

impl Bus {
    pub fn id(&self) -> BusId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn signals(&self) -> &[SignalId] {
        &self.signals
    }
}
