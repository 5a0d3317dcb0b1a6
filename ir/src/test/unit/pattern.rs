use std::sync::Arc;

use crate::category::{AlgebraicExpression, Membership};
use crate::entity::standard;
use crate::pattern::{Condition, Pattern};
use crate::test::helpers::*;
use crate::types::Property;

// ============================================================================
// Conditions
// ============================================================================

#[test]
fn test_entity_condition() {
    let AddMul { graph, a, c, .. } = add_mul();
    let is_add = Condition::entity(standard::ADD);
    assert!(is_add.holds(&graph, c, graph.driver(c)));
    assert!(!is_add.holds(&graph, a, graph.driver(a)), "free signals have no port");
    assert!(Condition::Always.holds(&graph, a, None));
}

#[test]
fn test_input_property_conditions() {
    let AddMul { mut graph, a, b, c, .. } = add_mul();
    graph.add_property(a, Property::INTEGER).unwrap();
    let port = graph.driver(c);

    assert!(Condition::any_input_has(Property::INTEGER).holds(&graph, c, port));
    assert!(!Condition::all_inputs_have(Property::INTEGER).holds(&graph, c, port));

    graph.add_property(b, Property::INTEGER).unwrap();
    assert!(Condition::all_inputs_have(Property::INTEGER).holds(&graph, c, port));
    assert!(!Condition::all_inputs_have(Property::INTEGER).holds(&graph, a, None));
}

#[test]
fn test_composite_conditions() {
    let AddMul { graph, c, .. } = add_mul();
    let port = graph.driver(c);
    let is_add = Condition::entity(standard::ADD);
    let is_mul = Condition::entity(standard::MULTIPLY);

    assert!(is_add.clone().or(is_mul.clone()).holds(&graph, c, port));
    assert!(!is_add.clone().and(is_mul.clone()).holds(&graph, c, port));
    assert!(is_mul.not().holds(&graph, c, port));
    assert!(Condition::And(vec![]).holds(&graph, c, port));
    assert!(!Condition::Or(vec![]).holds(&graph, c, port));
}

#[test]
fn test_category_and_custom_conditions() {
    let AddMul { graph, a, d, .. } = add_mul();
    let expression = Condition::in_category(Arc::new(AlgebraicExpression), Membership::Member);
    assert!(expression.holds(&graph, d, graph.driver(d)));

    let labeled_a = Condition::custom(|graph, signal, _| graph.signal(signal).is_ok_and(|s| s.label() == Some("a")));
    assert!(labeled_a.holds(&graph, a, None));
    assert!(!labeled_a.holds(&graph, d, None));
}

// ============================================================================
// Patterns
// ============================================================================

#[test]
fn test_pattern_positional_children() {
    let AddMul { graph, a, c, d, .. } = add_mul();
    let pattern = Pattern::entity(standard::MULTIPLY, [Pattern::var("x"), Pattern::entity(standard::ADD, []).bind("sum")]);

    let bindings = pattern.match_signal(&graph, d).unwrap();
    assert_eq!(bindings.get("x"), Some(a));
    assert_eq!(bindings.get("sum"), Some(c));
    assert_eq!(bindings.len(), 2);

    let swapped = Pattern::entity(standard::MULTIPLY, [Pattern::entity(standard::ADD, []), Pattern::any()]);
    assert!(swapped.match_signal(&graph, d).is_none(), "no backtracking across sibling order");
}

#[test]
fn test_pattern_children_need_a_port() {
    let AddMul { graph, a, .. } = add_mul();
    let pattern = Pattern::any().with_children([Pattern::any()]);
    assert!(!pattern.matches(&graph, a, None));
    assert!(Pattern::any().matches(&graph, a, None));
}

#[test]
fn test_pattern_fewer_children_than_inputs() {
    let AddMul { graph, d, .. } = add_mul();
    let pattern = Pattern::entity(standard::MULTIPLY, [Pattern::any()]);
    assert!(pattern.matches(&graph, d, graph.driver(d)));

    let too_many = Pattern::entity(standard::MULTIPLY, [Pattern::any(), Pattern::any(), Pattern::any()]);
    assert!(!too_many.matches(&graph, d, graph.driver(d)));
}

#[test]
fn test_pattern_repeated_binding_must_agree() {
    let mut graph = crate::graph::Graph::new();
    let x = graph.create_signal();
    let y = graph.create_signal();
    let same = graph.apply(entity(standard::subtract), &[x, x]).unwrap();
    let different = graph.apply(entity(standard::subtract), &[x, y]).unwrap();

    let pattern = Pattern::entity(standard::SUBTRACT, [Pattern::var("x"), Pattern::var("x")]);
    assert!(pattern.match_signal(&graph, same).is_some());
    assert!(pattern.match_signal(&graph, different).is_none());
}

#[test]
fn test_pattern_terminates_on_cycles() {
    let AddMul { graph, a, d, .. } = add_mul_feedback();
    let identity_of_mul = Pattern::entity(standard::IDENTITY, [Pattern::entity(standard::MULTIPLY, [Pattern::any()])]);
    assert!(identity_of_mul.match_signal(&graph, a).is_some());
    assert!(identity_of_mul.match_signal(&graph, d).is_none());
}
