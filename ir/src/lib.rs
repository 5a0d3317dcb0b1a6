//! Signal-graph intermediate representation for the Valence engine.
//!
//! Expressions are not trees here but a mutable, possibly cyclic dataflow
//! graph of value-carrying signals driven by ports that instantiate entities.
//! This crate owns that graph and the structural machinery over it.
//!
//! # Module Organization
//!
//! - [`graph`] - Signals, ports, buses; wiring, cycle counting, splice/substitute, sweep
//! - [`entity`] - Entity declarations and registry, plus the `Std` entities
//! - [`types`] - Leaf values and property markers
//! - [`pattern`] - Conditions and structural patterns
//! - [`category`] - Three-valued, cached classification of driving subgraphs
//! - [`rewrite`] - Theorems and bottom-up simplification
//! - [`error`] - Error types and result handling
//!
//! The graph is not thread-safe; callers serialize access.

pub mod category;
pub mod entity;
pub mod error;
pub mod graph;
pub mod pattern;
pub mod prelude;
pub mod rewrite;
pub mod types;

#[cfg(any(test, feature = "proptest"))]
pub mod test;

pub use category::{AlgebraicExpression, AlgebraicStructure, Category, CategoryId, Membership, classify};
pub use entity::{Arity, Entity, EntityId, EntityTable, Fixity};
pub use error::{Error, Result};
pub use graph::{ArchitectureId, Bus, BusId, Graph, Port, PortId, Signal, SignalId, SweepStats};
pub use pattern::{Bindings, Condition, Pattern, RewriteResult};
pub use rewrite::{SimplifyConfig, SimplifyOutput, Theorem, TheoremTable, simplify};
pub use types::{Property, Value};
