//! Generators for property-based testing.
//!
//! A [`GraphPlan`] is a list of construction steps whose signal references are
//! taken modulo the number of signals built so far, so every generated plan is
//! buildable. Feedback steps drive a still-free signal from any other signal,
//! which is how cycles arise.

use proptest::prelude::*;

use crate::entity::standard;
use crate::graph::{Graph, SignalId};
use crate::test::helpers::entity;
use crate::types::Value;

// ============================================================================
// Values
// ============================================================================

/// Numeric values with reasonable bounds.
pub fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![(-1000i64..=1000).prop_map(Value::Integer), (-100.0..=100.0f64).prop_map(Value::Real),]
}

// ============================================================================
// Graph plans
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryEntity {
    Add,
    Subtract,
    Multiply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryEntity {
    Negate,
    Sine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Binary { entity: BinaryEntity, lhs: usize, rhs: usize },
    Unary { entity: UnaryEntity, input: usize },
    /// Drive signal `target` (if still free) with `id(source)`.
    Feedback { target: usize, source: usize },
}

#[derive(Debug, Clone)]
pub struct GraphPlan {
    pub sources: usize,
    pub steps: Vec<Step>,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (prop_oneof![Just(BinaryEntity::Add), Just(BinaryEntity::Subtract), Just(BinaryEntity::Multiply)], any::<usize>(), any::<usize>())
            .prop_map(|(entity, lhs, rhs)| Step::Binary { entity, lhs, rhs }),
        2 => (prop_oneof![Just(UnaryEntity::Negate), Just(UnaryEntity::Sine)], any::<usize>())
            .prop_map(|(entity, input)| Step::Unary { entity, input }),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(target, source)| Step::Feedback { target, source }),
    ]
}

/// Plans with 1-4 sources and up to `max_steps` steps.
pub fn arb_graph_plan(max_steps: usize) -> impl Strategy<Value = GraphPlan> {
    (1usize..=4, prop::collection::vec(arb_step(), 0..=max_steps)).prop_map(|(sources, steps)| GraphPlan { sources, steps })
}

/// A graph built from a plan.
#[derive(Debug)]
pub struct Built {
    pub graph: Graph,
    pub signals: Vec<SignalId>,
    /// Signals driven by feedback steps.
    pub feedback: Vec<SignalId>,
}

impl GraphPlan {
    pub fn build(&self) -> Built {
        let mut graph = Graph::new();
        let mut signals: Vec<SignalId> = (0..self.sources).map(|_| graph.create_signal()).collect();
        let mut feedback = Vec::new();

        for step in &self.steps {
            let pick = |i: usize| signals[i % signals.len()];
            match *step {
                Step::Binary { entity: kind, lhs, rhs } => {
                    let make = match kind {
                        BinaryEntity::Add => standard::add,
                        BinaryEntity::Subtract => standard::subtract,
                        BinaryEntity::Multiply => standard::multiply,
                    };
                    let (lhs, rhs) = (pick(lhs), pick(rhs));
                    signals.push(graph.apply(entity(make), &[lhs, rhs]).unwrap());
                }
                Step::Unary { entity: kind, input } => {
                    let make = match kind {
                        UnaryEntity::Negate => standard::negate,
                        UnaryEntity::Sine => standard::sine,
                    };
                    let input = pick(input);
                    signals.push(graph.apply(entity(make), &[input]).unwrap());
                }
                Step::Feedback { target, source } => {
                    let (target, source) = (pick(target), pick(source));
                    if graph.driver(target).is_none() {
                        graph.add_port(entity(standard::identity), &[source], &[target]).unwrap();
                        feedback.push(target);
                    }
                }
            }
        }
        Built { graph, signals, feedback }
    }
}
