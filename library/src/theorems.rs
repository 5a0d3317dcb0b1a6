//! Simplification theorems for the `Std` entities.
//!
//! Identity-element rules come first, in the order they are listed below;
//! constant folding runs last so `x * 0` collapses even when `x` is not
//! constant. Binary rules only fire on ports with exactly two inputs: `Add`
//! and `Multiply` accept more, and dropping an operand of `a + 0 + b` through
//! a two-child pattern would lose `b`.

use valence_ir::entity::standard;
use valence_ir::pattern::{is_one, is_zero, try_const};
use valence_ir::{Bindings, Condition, EntityId, Graph, Pattern, Result, RewriteResult, SignalId, Theorem, TheoremTable};

use crate::architectures::compute;

/// Entities constant folding evaluates.
const FOLDABLE: [EntityId; 9] = [
    standard::ADD,
    standard::SUBTRACT,
    standard::MULTIPLY,
    standard::DIVIDE,
    standard::POWER,
    standard::NEGATE,
    standard::FACTORIAL,
    standard::IDENTITY,
    standard::SINE,
];

fn zero() -> Pattern {
    Pattern::new(Condition::custom(|graph, signal, _| is_zero(graph, signal)))
}

fn one() -> Pattern {
    Pattern::new(Condition::custom(|graph, signal, _| is_one(graph, signal)))
}

fn input_count(n: usize) -> Condition {
    Condition::custom(move |graph, _, port| {
        port.and_then(|p| graph.port(p).ok()).is_some_and(|p| p.inputs().len() == n)
    })
}

fn binary(entity: EntityId, lhs: Pattern, rhs: Pattern) -> Pattern {
    Pattern::new(Condition::entity(entity).and(input_count(2))).with_children([lhs, rhs])
}

/// Rewrite to the signal bound as `name`.
fn to_binding(name: &'static str) -> impl Fn(&mut Graph, &Bindings, SignalId) -> Result<RewriteResult> + Send + Sync {
    move |_, bindings, _| Ok(bindings.get(name).map_or(RewriteResult::NoMatch, RewriteResult::Rewritten))
}

/// `entity(x, 0) → x`-style rule: keep the operand bound as `x`.
fn drop_operand(id: &'static str, pattern: Pattern) -> Theorem {
    Theorem::new(id, pattern, to_binding("x"))
}

fn fold_constants(graph: &mut Graph, _: &Bindings, signal: SignalId) -> Result<RewriteResult> {
    let Some(port) = graph.driver(signal) else { return Ok(RewriteResult::NoMatch) };
    let port = graph.port(port)?;
    let inputs: Option<Vec<_>> = port.inputs().iter().map(|&s| try_const(graph, s)).collect();
    let Some(value) = inputs.and_then(|inputs| compute(&port.entity().id, &inputs)) else {
        return Ok(RewriteResult::NoMatch);
    };
    if value.is_undefined() {
        return Ok(RewriteResult::NoMatch);
    }
    Ok(RewriteResult::Rewritten(graph.create_constant(value)))
}

/// Every standard theorem in registration order.
pub fn all() -> Vec<Theorem> {
    vec![
        drop_operand("add-zero-right", binary(standard::ADD, Pattern::var("x"), zero())),
        drop_operand("add-zero-left", binary(standard::ADD, zero(), Pattern::var("x"))),
        drop_operand("subtract-zero", binary(standard::SUBTRACT, Pattern::var("x"), zero())),
        drop_operand("multiply-one-right", binary(standard::MULTIPLY, Pattern::var("x"), one())),
        drop_operand("multiply-one-left", binary(standard::MULTIPLY, one(), Pattern::var("x"))),
        Theorem::new("multiply-zero-right", binary(standard::MULTIPLY, Pattern::any(), zero().bind("zero")), to_binding("zero")),
        Theorem::new("multiply-zero-left", binary(standard::MULTIPLY, zero().bind("zero"), Pattern::any()), to_binding("zero")),
        drop_operand("divide-one", binary(standard::DIVIDE, Pattern::var("x"), one())),
        drop_operand("power-one", binary(standard::POWER, Pattern::var("x"), one())),
        Theorem::new("power-zero", binary(standard::POWER, Pattern::any(), zero()), |graph, _, _| {
            Ok(RewriteResult::Rewritten(graph.create_constant(1)))
        }),
        drop_operand(
            "double-negation",
            Pattern::entity(standard::NEGATE, [Pattern::entity(standard::NEGATE, [Pattern::var("x")])]),
        ),
        Theorem::new(
            "fold-constants",
            Pattern::new(Condition::custom(|graph, _, port| {
                port.and_then(|p| graph.port(p).ok()).is_some_and(|p| {
                    FOLDABLE.contains(&p.entity().id)
                        && !p.inputs().is_empty()
                        && p.inputs().iter().all(|&s| try_const(graph, s).is_some())
                })
            })),
            fold_constants,
        ),
    ]
}

pub fn register(table: &mut TheoremTable) -> Result<()> {
    for theorem in all() {
        table.register(theorem)?;
    }
    Ok(())
}
