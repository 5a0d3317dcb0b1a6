use bon::bon;

use super::{Category, CategoryId, Membership};
use crate::entity::EntityId;
use crate::graph::{Graph, Port, SignalId};
use crate::types::Property;

/// An algebraic structure over an additive and a multiplicative operator.
///
/// A port built from one of the two operators is a member when that operator
/// is declared closed, and `Unknown` when it is not; any other entity is not a
/// member. Sources are `Unknown` unless they carry the `element` property,
/// which marks them as known elements of the carrier set.
#[derive(Debug, Clone)]
pub struct AlgebraicStructure {
    id: CategoryId,
    additive: EntityId,
    multiplicative: EntityId,
    additive_closed: bool,
    multiplicative_closed: bool,
    element: Option<Property>,
}

#[bon]
impl AlgebraicStructure {
    #[builder]
    pub fn new(
        additive: EntityId,
        multiplicative: EntityId,
        #[builder(default)] additive_closed: bool,
        #[builder(default)] multiplicative_closed: bool,
        element: Option<Property>,
    ) -> Self {
        let flag = |closed: bool| if closed { "closed" } else { "open" };
        let id = CategoryId::new(format!(
            "Std.AlgebraicStructure({additive}:{}, {multiplicative}:{}{})",
            flag(additive_closed),
            flag(multiplicative_closed),
            element.as_ref().map(|p| format!(", {p}")).unwrap_or_default(),
        ));
        Self { id, additive, multiplicative, additive_closed, multiplicative_closed, element }
    }

    pub fn additive(&self) -> &EntityId {
        &self.additive
    }

    pub fn multiplicative(&self) -> &EntityId {
        &self.multiplicative
    }
}

impl Category for AlgebraicStructure {
    fn id(&self) -> CategoryId {
        self.id.clone()
    }

    fn classify_source(&self, graph: &Graph, signal: SignalId) -> Membership {
        match &self.element {
            Some(element) if graph.has_property(signal, element) => Membership::Member,
            _ => Membership::Unknown,
        }
    }

    fn classify_port(&self, _graph: &Graph, port: &Port) -> Membership {
        let entity = &port.entity().id;
        let closed = if *entity == self.additive {
            self.additive_closed
        } else if *entity == self.multiplicative {
            self.multiplicative_closed
        } else {
            return Membership::NotMember;
        };
        if closed { Membership::Member } else { Membership::Unknown }
    }
}
