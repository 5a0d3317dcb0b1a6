use std::time::Duration;

use valence_ir::entity::standard;
use valence_ir::{AlgebraicExpression, EntityId, Membership, Value};
use valence_runtime::{Registry, SchedulerConfig};

use crate::error::Error;
use crate::session::Session;

#[test]
fn test_standard_registration() {
    let session = Session::standard().unwrap();
    let registry = session.registry();
    assert_eq!(registry.entities.len(), standard::all().len());
    assert_eq!(registry.architectures.len(), crate::architectures::all().len());
    assert_eq!(registry.theorems.len(), crate::theorems::all().len());
}

#[test]
fn test_register_twice_fails() {
    let mut registry = Registry::new();
    crate::register(&mut registry).unwrap();
    let err = crate::register(&mut registry).unwrap_err();
    assert!(matches!(err, Error::Ir { source: valence_ir::Error::DuplicateEntity { .. } }));
}

#[test]
fn test_apply_requires_registered_entity() {
    let mut session = Session::default();
    let x = session.variable("x");
    let err = session.apply(&standard::NEGATE, &[x]).unwrap_err();
    assert!(matches!(err, Error::Ir { source: valence_ir::Error::UnknownEntity { .. } }));

    let mut session = Session::standard().unwrap();
    let x = session.variable("x");
    let err = session.apply(&EntityId::new("Test", "Missing"), &[x]).unwrap_err();
    assert!(matches!(err, Error::Ir { source: valence_ir::Error::UnknownEntity { .. } }));
}

#[test]
fn test_apply_symbol() {
    let mut session = Session::standard().unwrap();
    let x = session.variable("x");
    let y = session.variable("y");
    let sum = session.apply_symbol("+", &[x, y]).unwrap();
    assert_eq!(session.graph().port(session.graph().driver(sum).unwrap()).unwrap().entity().id, standard::ADD);

    let err = session.apply_symbol("%", &[x, y]).unwrap_err();
    assert!(matches!(err, Error::UnknownSymbol { symbol } if symbol == "%"));
}

#[test]
fn test_evaluate_polynomial() {
    // (x + 1) * x - 3
    let mut session = Session::standard().unwrap();
    let x = session.variable("x");
    let one = session.constant(1);
    let three = session.constant(3);
    let sum = session.apply(&standard::ADD, &[x, one]).unwrap();
    let product = session.apply(&standard::MULTIPLY, &[sum, x]).unwrap();
    let root = session.apply(&standard::SUBTRACT, &[product, three]).unwrap();

    assert_eq!(session.evaluate_at(&[(x, Value::Real(2.0))], root).unwrap(), Some(Value::Real(3.0)));
    assert_eq!(session.evaluate_at(&[(x, Value::Real(-1.0))], root).unwrap(), Some(Value::Real(-3.0)));
}

#[test]
fn test_evaluate_without_inputs_is_none() {
    let mut session = Session::standard().unwrap();
    let x = session.variable("x");
    let root = session.apply(&standard::NEGATE, &[x]).unwrap();
    assert_eq!(session.evaluate_at(&[], root).unwrap(), None);
}

#[test]
fn test_post_to_driven_rejected() {
    let mut session = Session::standard().unwrap();
    let x = session.variable("x");
    let root = session.apply(&standard::NEGATE, &[x]).unwrap();
    let err = session.post(root, 1).unwrap_err();
    assert!(matches!(err, Error::Runtime { source: valence_runtime::Error::PostToDriven { .. } }));
}

#[test]
fn test_simulate_for_jumps_to_next_post() {
    let mut session = Session::standard().unwrap();
    let x = session.variable("x");
    let root = session.apply(&standard::NEGATE, &[x]).unwrap();

    session.post_delayed(x, 4.0, Duration::from_secs(60)).unwrap();
    assert_eq!(session.simulate_for(Duration::from_secs(30)).unwrap(), Duration::from_secs(60));
    assert_eq!(session.now(), Duration::from_secs(60));
    assert_eq!(session.graph().value(root), Some(Value::Real(-4.0)));
}

#[test]
fn test_delta_limit_from_config() {
    let mut registry = Registry::new();
    crate::register(&mut registry).unwrap();
    let mut session =
        Session::builder().registry(registry).scheduler(SchedulerConfig::builder().max_delta_rounds(16).build()).build();

    // b = c + 1, c = -b
    let one = session.constant(1);
    let c = session.variable("c");
    session.graph_mut().set_value(c, Value::Integer(0)).unwrap();
    let b = session.apply(&standard::ADD, &[c, one]).unwrap();
    let negate = session.registry().entities.get(&standard::NEGATE).unwrap();
    session.graph_mut().add_port(negate, &[b], &[c]).unwrap();

    let err = session.simulate_instant().unwrap_err();
    assert!(matches!(err, Error::Runtime { source: valence_runtime::Error::DeltaLimit { rounds: 16, .. } }));
}

#[test]
fn test_simplify_preserves_value_and_sweeps_garbage() {
    let mut session = Session::standard().unwrap();
    let x = session.variable("x");
    let zero = session.constant(0);
    let one = session.constant(1);
    let product = session.apply(&standard::MULTIPLY, &[x, one]).unwrap();
    let root = session.apply(&standard::ADD, &[product, zero]).unwrap();

    let before = session.evaluate_at(&[(x, Value::Real(7.0))], root).unwrap();
    let out = session.simplify(root).unwrap();
    assert!(out.rewrites > 0);
    let ports_before_sweep = session.graph().port_count();

    let stats = session.remove_unused(&[root]).unwrap();
    assert!(stats.ports > 0);
    assert_eq!(session.graph().port_count(), ports_before_sweep - stats.ports);
    assert_eq!(session.evaluate_at(&[(x, Value::Real(8.0))], root).unwrap(), Some(Value::Real(8.0)));
    assert_eq!(before, Some(Value::Real(7.0)));
}

#[test]
fn test_classify_and_render() {
    let mut session = Session::standard().unwrap();
    let x = session.variable("x");
    let two = session.constant(2);
    let root = session.apply(&standard::POWER, &[x, two]).unwrap();
    session.graph_mut().set_label(root, "square").unwrap();

    assert_eq!(session.classify(&AlgebraicExpression, root).unwrap(), Membership::Member);
    let sine = session.apply(&standard::SINE, &[root]).unwrap();
    assert_eq!(session.classify(&AlgebraicExpression, sine).unwrap(), Membership::NotMember);

    let tree = session.render(root);
    assert!(tree.contains("square"), "{tree}");
    assert!(tree.contains('x'), "{tree}");
}
