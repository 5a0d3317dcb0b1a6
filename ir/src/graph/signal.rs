use std::collections::BTreeSet;

use smallvec::SmallVec;

use super::{PortId, SignalId};
use crate::types::{Property, Value};

/// A named value holder.
///
/// Free signals (no driver) receive values from outside; driven signals are
/// written only by their driving port's architecture.
#[derive(Debug, Clone)]
pub struct Signal {
    pub(crate) id: SignalId,
    pub(crate) label: Option<String>,
    pub(crate) value: Option<Value>,
    pub(crate) driver: Option<PortId>,
    /// Ports reading this signal, each listed once.
    pub(crate) consumers: SmallVec<[PortId; 2]>,
    /// Number of elementary cycles passing through this signal.
    pub(crate) cycles: u32,
    pub(crate) properties: BTreeSet<Property>,
}

impl Signal {
    pub(crate) fn new(id: SignalId) -> Self {
        Self {
            id,
            label: None,
            value: None,
            driver: None,
            consumers: SmallVec::new(),
            cycles: 0,
            properties: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> SignalId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn value(&self) -> Option<Value> {
        self.value
    }

    pub fn driver(&self) -> Option<PortId> {
        self.driver
    }

    /// A signal with no driver, whose value comes from outside the graph.
    pub fn is_source(&self) -> bool {
        self.driver.is_none()
    }

    pub fn consumers(&self) -> &[PortId] {
        &self.consumers
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn is_cyclic(&self) -> bool {
        self.cycles > 0
    }

    pub fn properties(&self) -> &BTreeSet<Property> {
        &self.properties
    }

    pub fn has_property(&self, property: &Property) -> bool {
        self.properties.contains(property)
    }
}
