//! Standard entity declarations (`Std` domain).
//!
//! These live in the IR crate because categories and the splice primitive
//! refer to them by id. Registering them into an [`EntityTable`] is the job of
//! the package loader.

use std::sync::Arc;

use super::{Arity, Entity, EntityId, EntityTable, Fixity};
use crate::error::Result;

pub const ADD: EntityId = EntityId::from_static("Std.Add");
pub const SUBTRACT: EntityId = EntityId::from_static("Std.Subtract");
pub const MULTIPLY: EntityId = EntityId::from_static("Std.Multiply");
pub const DIVIDE: EntityId = EntityId::from_static("Std.Divide");
pub const POWER: EntityId = EntityId::from_static("Std.Power");
pub const NEGATE: EntityId = EntityId::from_static("Std.Negate");
pub const FACTORIAL: EntityId = EntityId::from_static("Std.Factorial");
pub const IDENTITY: EntityId = EntityId::from_static("Std.Identity");
pub const SINE: EntityId = EntityId::from_static("Std.Sine");

fn infix(id: EntityId, name: &str, symbol: &str, inputs: Arity) -> Entity {
    Entity::builder().id(id).name(name).symbol(symbol).fixity(Fixity::Infix).inputs(inputs).build()
}

pub fn add() -> Entity {
    infix(ADD, "add", "+", Arity::AtLeast(2))
}

pub fn subtract() -> Entity {
    infix(SUBTRACT, "subtract", "-", Arity::Exact(2))
}

pub fn multiply() -> Entity {
    infix(MULTIPLY, "multiply", "*", Arity::AtLeast(2))
}

pub fn divide() -> Entity {
    infix(DIVIDE, "divide", "/", Arity::Exact(2))
}

pub fn power() -> Entity {
    infix(POWER, "power", "^", Arity::Exact(2))
}

pub fn negate() -> Entity {
    Entity::builder().id(NEGATE).name("negate").symbol("neg").inputs(Arity::Exact(1)).build()
}

pub fn factorial() -> Entity {
    Entity::builder().id(FACTORIAL).name("factorial").symbol("!").fixity(Fixity::Postfix).inputs(Arity::Exact(1)).build()
}

/// Transports its single input unchanged; used to drive a signal from a shared one.
pub fn identity() -> Entity {
    Entity::builder().id(IDENTITY).name("identity").symbol("id").inputs(Arity::Exact(1)).build()
}

pub fn sine() -> Entity {
    Entity::builder().id(SINE).name("sine").symbol("sin").inputs(Arity::Exact(1)).build()
}

/// All standard entities in registration order.
pub fn all() -> Vec<Entity> {
    vec![add(), subtract(), multiply(), divide(), power(), negate(), factorial(), identity(), sine()]
}

/// Register every standard entity into `table`.
pub fn register(table: &mut EntityTable) -> Result<Vec<Arc<Entity>>> {
    all().into_iter().map(|entity| table.register(entity)).collect()
}
