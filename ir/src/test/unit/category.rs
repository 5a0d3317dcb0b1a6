use test_case::test_case;

use crate::category::{AlgebraicExpression, AlgebraicStructure, Category, Membership, classify};
use crate::entity::{Entity, standard};
use crate::graph::Graph;
use crate::test::helpers::*;
use crate::types::Property;

use Membership::*;

// ============================================================================
// Joint membership
// ============================================================================

#[test_case(Member, Member, Member ; "all members")]
#[test_case(Member, Unknown, Unknown ; "unknown without rejection")]
#[test_case(Unknown, NotMember, NotMember ; "rejection dominates unknown")]
#[test_case(NotMember, Member, NotMember ; "rejection dominates member")]
#[test_case(Unknown, Unknown, Unknown ; "all unknown")]
fn test_joint_membership(lhs: Membership, rhs: Membership, expected: Membership) {
    assert_eq!(lhs.and(rhs), expected);
    assert_eq!(rhs.and(lhs), expected);
}

#[test]
fn test_joint_of_nothing_is_member() {
    assert_eq!(Membership::joint([]), Member);
    assert_eq!(Membership::joint([Member, Unknown, Member]), Unknown);
}

// ============================================================================
// AlgebraicExpression
// ============================================================================

#[test_case(standard::add ; "add")]
#[test_case(standard::subtract ; "subtract")]
#[test_case(standard::multiply ; "multiply")]
#[test_case(standard::divide ; "divide")]
#[test_case(standard::power ; "power")]
fn test_expression_closed_binary(make: fn() -> Entity) {
    let mut graph = Graph::new();
    let x = graph.create_signal();
    let y = graph.create_signal();
    let z = graph.apply(entity(make), &[x, y]).unwrap();
    assert_eq!(classify(&AlgebraicExpression, &graph, z, false).unwrap(), Member);
}

#[test_case(standard::negate, NotMember ; "negate is not closed")]
#[test_case(standard::identity, Member ; "identity forwards its input")]
#[test_case(standard::sine, NotMember ; "sine is not closed")]
#[test_case(standard::factorial, Member ; "factorial is closed")]
fn test_expression_unary(make: fn() -> Entity, expected: Membership) {
    let mut graph = Graph::new();
    let x = graph.create_signal();
    let y = graph.apply(entity(make), &[x]).unwrap();
    assert_eq!(classify(&AlgebraicExpression, &graph, y, false).unwrap(), expected);
}

#[test]
fn test_expression_rejection_propagates() {
    let mut graph = Graph::new();
    let x = graph.create_signal();
    let s = graph.apply(entity(standard::sine), &[x]).unwrap();
    let sum = graph.apply(entity(standard::add), &[s, x]).unwrap();
    assert_eq!(classify(&AlgebraicExpression, &graph, sum, false).unwrap(), NotMember);
}

#[test]
fn test_identity_is_transparent() {
    let mut graph = Graph::new();
    let x = graph.create_signal();
    let s = graph.apply(entity(standard::sine), &[x]).unwrap();
    let through_sine = graph.apply(entity(standard::identity), &[s]).unwrap();
    assert_eq!(classify(&AlgebraicExpression, &graph, through_sine, false).unwrap(), NotMember);

    let category = ring(true, true);
    let through_source = graph.apply(entity(standard::identity), &[x]).unwrap();
    assert_eq!(classify(&category, &graph, through_source, false).unwrap(), Unknown);
    graph.add_property(x, Property::INTEGER).unwrap();
    assert_eq!(classify(&category, &graph, through_source, false).unwrap(), Member);
}

#[test]
fn test_splice_of_shared_source_keeps_membership() {
    // x + 0 spliced to x: x is still read by the sum, so the sum's signal
    // ends up driven through an identity port.
    let mut graph = Graph::new();
    let x = graph.create_signal();
    let zero = graph.create_constant(0);
    let sum = graph.apply(entity(standard::add), &[x, zero]).unwrap();
    assert_eq!(graph.classify(&AlgebraicExpression, sum, false).unwrap(), Member);

    graph.splice(sum, x).unwrap();
    let driver = graph.port(graph.driver(sum).unwrap()).unwrap();
    assert_eq!(driver.entity().id, standard::IDENTITY);
    assert_eq!(graph.classify(&AlgebraicExpression, sum, false).unwrap(), Member);
    assert_eq!(graph.classify(&AlgebraicExpression, sum, true).unwrap(), Member);
}

#[test]
fn test_expression_sources_are_members() {
    let AddMul { graph, a, d, .. } = add_mul();
    assert_eq!(classify(&AlgebraicExpression, &graph, a, false).unwrap(), Member);
    assert_eq!(classify(&AlgebraicExpression, &graph, d, false).unwrap(), Member);
}

#[test]
fn test_cyclic_signals_are_not_members() {
    let AddMul { graph, a, b, c, d } = add_mul_feedback();
    for s in [a, b, c, d] {
        assert_eq!(classify(&AlgebraicExpression, &graph, s, true).unwrap(), NotMember);
        assert_eq!(classify(&AlgebraicExpression, &graph, s, false).unwrap(), NotMember);
    }
}

#[test]
fn test_reader_of_cycle_is_not_member() {
    let AddMul { mut graph, c, .. } = add_mul_feedback();
    let x = graph.create_signal();
    let reader = graph.apply(entity(standard::add), &[c, x]).unwrap();
    assert!(!graph.is_cyclic(reader));
    assert_eq!(classify(&AlgebraicExpression, &graph, reader, false).unwrap(), NotMember);
}

// ============================================================================
// Cache
// ============================================================================

#[test]
fn test_cache_fills_and_agrees() {
    let AddMul { graph, a, b, c, d } = add_mul();
    let uncached = classify(&AlgebraicExpression, &graph, d, true).unwrap();
    assert_eq!(graph.cached_membership_count(), 0, "ignore_cache neither reads nor writes");

    let cached = classify(&AlgebraicExpression, &graph, d, false).unwrap();
    assert_eq!(uncached, cached);
    assert_eq!(graph.cached_membership_count(), 4);
    for s in [a, b, c, d] {
        assert_eq!(graph.cached_membership(&AlgebraicExpression::ID, s), Some(Member));
    }
}

#[test]
fn test_cache_follows_rewire() {
    let AddMul { mut graph, a, c, d, .. } = add_mul();
    assert_eq!(graph.classify(&AlgebraicExpression, d, false).unwrap(), Member);

    let s = graph.apply(entity(standard::sine), &[a]).unwrap();
    graph.splice(c, s).unwrap();
    assert_eq!(graph.classify(&AlgebraicExpression, d, false).unwrap(), NotMember);
    assert_eq!(graph.classify(&AlgebraicExpression, d, true).unwrap(), NotMember);
}

// ============================================================================
// AlgebraicStructure
// ============================================================================

fn ring(additive_closed: bool, multiplicative_closed: bool) -> AlgebraicStructure {
    AlgebraicStructure::builder()
        .additive(standard::ADD)
        .multiplicative(standard::MULTIPLY)
        .additive_closed(additive_closed)
        .multiplicative_closed(multiplicative_closed)
        .element(Property::INTEGER)
        .build()
}

#[test]
fn test_structure_sources_unknown_without_element_property() {
    let AddMul { graph, a, d, .. } = add_mul();
    let category = ring(true, true);
    assert_eq!(classify(&category, &graph, a, false).unwrap(), Unknown);
    assert_eq!(classify(&category, &graph, d, false).unwrap(), Unknown);
}

#[test_case(true, true, Member ; "both closed")]
#[test_case(true, false, Unknown ; "multiplication open")]
#[test_case(false, true, Unknown ; "addition open")]
fn test_structure_closure_flags(additive_closed: bool, multiplicative_closed: bool, expected: Membership) {
    let mut graph = Graph::new();
    let x = graph.create_constant(2);
    let y = graph.create_constant(3);
    let sum = graph.apply(entity(standard::add), &[x, y]).unwrap();
    let product = graph.apply(entity(standard::multiply), &[sum, x]).unwrap();
    assert_eq!(classify(&ring(additive_closed, multiplicative_closed), &graph, product, false).unwrap(), expected);
}

#[test]
fn test_structure_foreign_entity_not_member() {
    let mut graph = Graph::new();
    let x = graph.create_constant(2);
    let y = graph.create_constant(3);
    let quotient = graph.apply(entity(standard::divide), &[x, y]).unwrap();
    assert_eq!(classify(&ring(true, true), &graph, quotient, false).unwrap(), NotMember);
}

#[test]
fn test_structure_instances_do_not_share_cache() {
    let mut graph = Graph::new();
    let x = graph.create_constant(2);
    let product = graph.apply(entity(standard::multiply), &[x, x]).unwrap();

    let closed = ring(true, true);
    let open = ring(true, false);
    assert_ne!(closed.id(), open.id());
    assert_eq!(classify(&closed, &graph, product, false).unwrap(), Member);
    assert_eq!(classify(&open, &graph, product, false).unwrap(), Unknown);
}
