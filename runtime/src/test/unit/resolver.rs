use valence_ir::entity::standard;
use valence_ir::{ArchitectureId, Condition, Graph, Pattern, Property, SignalId, Value};

use crate::architecture::{Architecture, ArchitectureTable};
use crate::error::Error;
use crate::resolver::{current, resolve, select};
use crate::scheduler::Scheduler;
use crate::test::helpers::*;

const ADD_INTEGER: ArchitectureId = ArchitectureId::from_static("add-integer");
const ADD_REAL: ArchitectureId = ArchitectureId::from_static("add-real");

/// Integer and real additions, told apart by the `Std.Integer` property of the inputs.
fn typed_additions() -> ArchitectureTable {
    let integer = Condition::all_inputs_have(Property::INTEGER);
    let mut table = ArchitectureTable::new();
    table
        .register(Architecture::new(
            ADD_INTEGER,
            standard::ADD,
            Pattern::new(Condition::entity(standard::ADD).and(integer.clone())),
            |e| {
                let v = e.input(0).add(&e.input(1));
                e.set(0, v)
            },
        ))
        .unwrap();
    table
        .register(Architecture::new(
            ADD_REAL,
            standard::ADD,
            Pattern::new(Condition::entity(standard::ADD).and(integer.not())),
            |e| {
                let v = match (e.input(0).as_real(), e.input(1).as_real()) {
                    (Some(a), Some(b)) => Value::Real(a + b),
                    _ => Value::Undefined,
                };
                e.set(0, v)
            },
        ))
        .unwrap();
    table
}

fn sum(graph: &mut Graph) -> (SignalId, SignalId, SignalId) {
    let a = graph.create_signal();
    let b = graph.create_signal();
    let c = graph.apply(entity(standard::add), &[a, b]).unwrap();
    (a, b, c)
}

#[test]
fn test_select_follows_input_properties() {
    let table = typed_additions();
    let mut graph = Graph::new();
    let (a, b, c) = sum(&mut graph);
    let port = graph.driver(c).unwrap();

    assert_eq!(select(&table, &graph, port).unwrap().unwrap().id(), &ADD_REAL);
    graph.add_property(a, Property::INTEGER).unwrap();
    assert_eq!(select(&table, &graph, port).unwrap().unwrap().id(), &ADD_REAL);
    graph.add_property(b, Property::INTEGER).unwrap();
    assert_eq!(select(&table, &graph, port).unwrap().unwrap().id(), &ADD_INTEGER);
}

#[test]
fn test_resolution_is_deterministic() {
    let table = typed_additions();
    let mut graph = Graph::new();
    let three = graph.create_constant(3);
    let four = graph.create_constant(4);
    let c = graph.apply(entity(standard::add), &[three, four]).unwrap();
    let port = graph.driver(c).unwrap();

    for _ in 0..3 {
        graph.request_resolution(port).unwrap();
        let selected = resolve(&table, &mut graph, port).unwrap().unwrap();
        assert_eq!(selected.id(), &ADD_INTEGER);
        assert_eq!(graph.port(port).unwrap().architecture(), Some(&ADD_INTEGER));
        assert!(!graph.port(port).unwrap().needs_resolution());
    }
}

#[test]
fn test_registration_order_breaks_ties() {
    let mut table = ArchitectureTable::new();
    table.register(architecture("first", standard::ADD, |e| e.set(0, Value::Integer(1)))).unwrap();
    table.register(architecture("second", standard::ADD, |e| e.set(0, Value::Integer(2)))).unwrap();
    let mut graph = Graph::new();
    let (_, _, c) = sum(&mut graph);

    let port = graph.driver(c).unwrap();
    let selected = resolve(&table, &mut graph, port).unwrap().unwrap();
    assert_eq!(selected.id().as_str(), "first");
}

#[test]
fn test_no_match_leaves_port_unresolved() {
    let table = typed_additions();
    let mut graph = Graph::new();
    let x = graph.create_signal();
    let y = graph.apply(entity(standard::negate), &[x]).unwrap();
    let port = graph.driver(y).unwrap();

    assert!(resolve(&table, &mut graph, port).unwrap().is_none());
    let p = graph.port(port).unwrap();
    assert_eq!(p.architecture(), None);
    assert!(!p.needs_resolution());
}

#[test]
fn test_current_reuses_recorded_selection() {
    let table = typed_additions();
    let mut graph = Graph::new();
    let (a, _, c) = sum(&mut graph);
    let port = graph.driver(c).unwrap();
    resolve(&table, &mut graph, port).unwrap();

    // Without invalidation the recorded choice stands, even if it would no longer be selected.
    graph.set_architecture(port, Some(ADD_INTEGER)).unwrap();
    assert_eq!(current(&table, &mut graph, port).unwrap().unwrap().id(), &ADD_INTEGER);

    // A property change flags the port, and the next lookup re-resolves.
    graph.add_property(a, Property::INTEGER).unwrap();
    assert!(graph.port(port).unwrap().needs_resolution());
    assert_eq!(current(&table, &mut graph, port).unwrap().unwrap().id(), &ADD_REAL);
}

#[test]
fn test_current_rejects_unknown_architecture() {
    let table = typed_additions();
    let mut graph = Graph::new();
    let (_, _, c) = sum(&mut graph);
    let port = graph.driver(c).unwrap();
    graph.set_architecture(port, Some(ArchitectureId::new("ghost"))).unwrap();

    let err = current(&table, &mut graph, port).unwrap_err();
    assert!(matches!(err, Error::UnknownArchitecture { architecture } if architecture.as_str() == "ghost"));
}

#[test]
fn test_scheduler_switches_architecture_after_property_change() {
    let table = typed_additions();
    let mut graph = Graph::new();
    let (a, b, c) = sum(&mut graph);
    let port = graph.driver(c).unwrap();
    let mut scheduler = Scheduler::default();

    scheduler.post(&graph, a, Value::Integer(2)).unwrap();
    scheduler.post(&graph, b, Value::Integer(3)).unwrap();
    scheduler.simulate_instant(&mut graph, &table).unwrap();
    assert_eq!(graph.value(c), Some(Value::Real(5.0)));
    assert_eq!(graph.port(port).unwrap().architecture(), Some(&ADD_REAL));

    graph.add_property(a, Property::INTEGER).unwrap();
    graph.add_property(b, Property::INTEGER).unwrap();
    scheduler.simulate_instant(&mut graph, &table).unwrap();
    assert_eq!(graph.value(c), Some(Value::Integer(5)));
    assert_eq!(graph.port(port).unwrap().architecture(), Some(&ADD_INTEGER));
}

#[test]
fn test_losing_architecture_withdraws_outputs_downstream() {
    // c = a + b with only the integer variant registered, d = -c.
    let mut table = ArchitectureTable::new();
    table
        .register(Architecture::new(
            ADD_INTEGER,
            standard::ADD,
            Pattern::new(Condition::entity(standard::ADD).and(Condition::all_inputs_have(Property::INTEGER))),
            |e| {
                let v = e.input(0).add(&e.input(1));
                e.set(0, v)
            },
        ))
        .unwrap();
    table
        .register(architecture("negate", standard::NEGATE, |e| {
            let v = e.input(0).negate();
            e.set(0, v)
        }))
        .unwrap();

    let mut graph = Graph::new();
    let (a, b, c) = sum(&mut graph);
    let d = graph.apply(entity(standard::negate), &[c]).unwrap();
    let port = graph.driver(c).unwrap();
    graph.add_property(a, Property::INTEGER).unwrap();
    graph.add_property(b, Property::INTEGER).unwrap();
    let mut scheduler = Scheduler::default();

    scheduler.post(&graph, a, Value::Integer(2)).unwrap();
    scheduler.post(&graph, b, Value::Integer(3)).unwrap();
    scheduler.simulate_instant(&mut graph, &table).unwrap();
    assert_eq!(graph.value(d), Some(Value::Integer(-5)));

    graph.remove_property(a, &Property::INTEGER).unwrap();
    scheduler.simulate_instant(&mut graph, &table).unwrap();
    assert_eq!(graph.port(port).unwrap().architecture(), None);
    assert_eq!(graph.value(c), None, "an unresolved port keeps no stale output");
    assert_eq!(graph.value(d), None, "readers of a withdrawn signal are blocked");

    graph.add_property(a, Property::INTEGER).unwrap();
    scheduler.simulate_instant(&mut graph, &table).unwrap();
    assert_eq!(graph.value(c), Some(Value::Integer(5)));
    assert_eq!(graph.value(d), Some(Value::Integer(-5)));
}
