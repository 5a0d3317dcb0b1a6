use super::{Category, CategoryId, Membership};
use crate::entity::{EntityId, standard};
use crate::graph::{Graph, Port, SignalId};

/// Signals computed from sources by closed arithmetic only.
///
/// Sources are members; ports are members when their entity is one of
/// `Std.Add`, `Std.Subtract`, `Std.Multiply`, `Std.Divide`, `Std.Power` or
/// `Std.Factorial`. Anything else is not; `Std.Identity` forwards its input's
/// membership (see [`classify`](super::classify)).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgebraicExpression;

impl AlgebraicExpression {
    pub const ID: CategoryId = CategoryId::from_static("Std.AlgebraicExpression");

    pub fn is_closed_operator(entity: &EntityId) -> bool {
        [standard::ADD, standard::SUBTRACT, standard::MULTIPLY, standard::DIVIDE, standard::POWER, standard::FACTORIAL]
            .contains(entity)
    }
}

impl Category for AlgebraicExpression {
    fn id(&self) -> CategoryId {
        Self::ID
    }

    fn classify_source(&self, _graph: &Graph, _signal: SignalId) -> Membership {
        Membership::Member
    }

    fn classify_port(&self, _graph: &Graph, port: &Port) -> Membership {
        if Self::is_closed_operator(&port.entity().id) { Membership::Member } else { Membership::NotMember }
    }
}
