use std::fmt;
use std::sync::Arc;

use crate::category::{Category, Membership};
use crate::entity::EntityId;
use crate::graph::{Graph, PortId, SignalId};
use crate::types::Property;

/// Custom predicate over `(signal, driving port)`.
pub type Predicate = Arc<dyn Fn(&Graph, SignalId, Option<PortId>) -> bool + Send + Sync>;

/// Pure boolean predicate over a signal and its driving port.
///
/// Port-level predicates are false when there is no port (the signal is free).
#[derive(Clone)]
pub enum Condition {
    Always,
    /// The port instantiates this entity.
    EntityIs(EntityId),
    /// At least one port input carries the property.
    AnyInputHas(Property),
    /// Every port input carries the property (vacuously true for no inputs).
    AllInputsHave(Property),
    /// The signal itself carries the property.
    SignalHas(Property),
    /// The signal classifies as `membership` under `category`.
    InCategory { category: Arc<dyn Category>, membership: Membership },
    Not(Box<Condition>),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Custom(Predicate),
}

impl Condition {
    pub fn entity(id: EntityId) -> Self {
        Condition::EntityIs(id)
    }

    pub fn any_input_has(property: Property) -> Self {
        Condition::AnyInputHas(property)
    }

    pub fn all_inputs_have(property: Property) -> Self {
        Condition::AllInputsHave(property)
    }

    pub fn signal_has(property: Property) -> Self {
        Condition::SignalHas(property)
    }

    pub fn in_category(category: Arc<dyn Category>, membership: Membership) -> Self {
        Condition::InCategory { category, membership }
    }

    pub fn custom(predicate: impl Fn(&Graph, SignalId, Option<PortId>) -> bool + Send + Sync + 'static) -> Self {
        Condition::Custom(Arc::new(predicate))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Condition::Not(Box::new(self))
    }

    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut all) => {
                all.push(other);
                Condition::And(all)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut any) => {
                any.push(other);
                Condition::Or(any)
            }
            first => Condition::Or(vec![first, other]),
        }
    }

    /// Evaluate against `signal` and its driving `port`.
    pub fn holds(&self, graph: &Graph, signal: SignalId, port: Option<PortId>) -> bool {
        let port_ref = || port.and_then(|p| graph.port(p).ok());
        match self {
            Condition::Always => true,
            Condition::EntityIs(id) => port_ref().is_some_and(|p| p.entity().id == *id),
            Condition::AnyInputHas(property) => {
                port_ref().is_some_and(|p| p.inputs().iter().any(|&s| graph.has_property(s, property)))
            }
            Condition::AllInputsHave(property) => {
                port_ref().is_some_and(|p| p.inputs().iter().all(|&s| graph.has_property(s, property)))
            }
            Condition::SignalHas(property) => graph.has_property(signal, property),
            Condition::InCategory { category, membership } => {
                graph.classify(category.as_ref(), signal, false).is_ok_and(|m| m == *membership)
            }
            Condition::Not(inner) => !inner.holds(graph, signal, port),
            Condition::And(all) => all.iter().all(|c| c.holds(graph, signal, port)),
            Condition::Or(any) => any.iter().any(|c| c.holds(graph, signal, port)),
            Condition::Custom(predicate) => predicate(graph, signal, port),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => write!(f, "Always"),
            Condition::EntityIs(id) => write!(f, "EntityIs({id})"),
            Condition::AnyInputHas(p) => write!(f, "AnyInputHas({p})"),
            Condition::AllInputsHave(p) => write!(f, "AllInputsHave({p})"),
            Condition::SignalHas(p) => write!(f, "SignalHas({p})"),
            Condition::InCategory { category, membership } => write!(f, "InCategory({}, {membership})", category.id()),
            Condition::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Condition::And(all) => f.debug_tuple("And").field(all).finish(),
            Condition::Or(any) => f.debug_tuple("Or").field(any).finish(),
            Condition::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

impl From<EntityId> for Condition {
    fn from(id: EntityId) -> Self {
        Condition::EntityIs(id)
    }
}
