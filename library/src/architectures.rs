//! Architectures for the `Std` entities.
//!
//! Addition and multiplication come in two variants. The integer variant
//! applies when the output belongs to the integer ring: its driving subgraph
//! is built only from additions and multiplications over signals marked
//! `Std.Integer`. Everything else goes to the real variant, which evaluates
//! in `f64`. The two patterns are complements, so exactly one applies.

use std::sync::Arc;

use valence_ir::entity::standard;
use valence_ir::{AlgebraicStructure, ArchitectureId, Condition, EntityId, Membership, Pattern, Property, Value};
use valence_runtime::{Architecture, ArchitectureTable, Evaluation};

use crate::error::Result;

pub const ADD_INTEGER: ArchitectureId = ArchitectureId::from_static("Std.Add.Integer");
pub const ADD_REAL: ArchitectureId = ArchitectureId::from_static("Std.Add.Real");
pub const MULTIPLY_INTEGER: ArchitectureId = ArchitectureId::from_static("Std.Multiply.Integer");
pub const MULTIPLY_REAL: ArchitectureId = ArchitectureId::from_static("Std.Multiply.Real");

/// Integers under `Std.Add` and `Std.Multiply`.
pub fn integer_ring() -> AlgebraicStructure {
    AlgebraicStructure::builder()
        .additive(standard::ADD)
        .multiplicative(standard::MULTIPLY)
        .additive_closed(true)
        .multiplicative_closed(true)
        .element(Property::INTEGER)
        .build()
}

/// Value of `entity` applied to `inputs`, for the entities this package evaluates.
pub fn compute(entity: &EntityId, inputs: &[Value]) -> Option<Value> {
    let (first, rest) = inputs.split_first()?;
    let fold = |op: fn(&Value, &Value) -> Value| rest.iter().fold(*first, |acc, v| op(&acc, v));
    let value = match entity.as_str() {
        "Std.Add" => fold(Value::add),
        "Std.Multiply" => fold(Value::multiply),
        "Std.Subtract" => fold(Value::subtract),
        "Std.Divide" => fold(Value::divide),
        "Std.Power" => fold(Value::power),
        "Std.Negate" => first.negate(),
        "Std.Factorial" => first.factorial(),
        "Std.Sine" => first.sine(),
        "Std.Identity" => *first,
        _ => return None,
    };
    Some(value)
}

fn real_fold(inputs: &[Value], op: fn(f64, f64) -> f64) -> Value {
    let mut reals = inputs.iter().map(Value::as_real);
    let Some(Some(first)) = reals.next() else { return Value::Undefined };
    reals.try_fold(first, |acc, v| v.map(|v| op(acc, v))).map_or(Value::Undefined, Value::Real)
}

/// Catch-all architecture computing `entity` with [`compute`].
fn generic(id: &'static str, entity: EntityId) -> Architecture {
    let target = entity.clone();
    Architecture::new(ArchitectureId::from_static(id), entity.clone(), Pattern::entity(entity, []), move |e| {
        match compute(&target, e.inputs()) {
            Some(value) => e.set(0, value),
            None => e.fail(format!("{target} has no operands")),
        }
    })
}

fn typed(
    integer: ArchitectureId,
    real: ArchitectureId,
    entity: EntityId,
    integer_op: fn(&Value, &Value) -> Value,
    real_op: fn(f64, f64) -> f64,
) -> [Architecture; 2] {
    let in_ring = Condition::in_category(Arc::new(integer_ring()), Membership::Member);
    let on_integers = Pattern::new(Condition::entity(entity.clone()).and(in_ring.clone()));
    let on_reals = Pattern::new(Condition::entity(entity.clone()).and(in_ring.not()));
    [
        Architecture::new(integer, entity.clone(), on_integers, move |e: &mut Evaluation<'_>| {
            let mut inputs = e.inputs().iter();
            let Some(&first) = inputs.next() else { return e.fail("no operands") };
            let value = inputs.fold(first, |acc, v| integer_op(&acc, v));
            e.set(0, value)
        }),
        Architecture::new(real, entity, on_reals, move |e: &mut Evaluation<'_>| {
            let value = real_fold(e.inputs(), real_op);
            e.set(0, value)
        }),
    ]
}

/// Every standard architecture in registration order.
pub fn all() -> Vec<Architecture> {
    let mut architectures = Vec::new();
    architectures.extend(typed(ADD_INTEGER, ADD_REAL, standard::ADD, Value::add, |a, b| a + b));
    architectures.extend(typed(MULTIPLY_INTEGER, MULTIPLY_REAL, standard::MULTIPLY, Value::multiply, |a, b| a * b));
    architectures.extend([
        generic("Std.Subtract", standard::SUBTRACT),
        generic("Std.Divide", standard::DIVIDE),
        generic("Std.Power", standard::POWER),
        generic("Std.Negate", standard::NEGATE),
        generic("Std.Factorial", standard::FACTORIAL),
        generic("Std.Identity", standard::IDENTITY),
        generic("Std.Sine", standard::SINE),
    ]);
    architectures
}

pub fn register(table: &mut ArchitectureTable) -> Result<()> {
    for architecture in all() {
        table.register(architecture)?;
    }
    Ok(())
}
