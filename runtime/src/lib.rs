//! Evaluation runtime for valence signal graphs.
//!
//! Ports compute their outputs through architectures: executable
//! implementations of an entity, each guarded by an applicability pattern.
//! The [`Scheduler`] propagates posted values through the graph on a virtual
//! clock, resolving architectures lazily as ports are evaluated.
//!
//! # Module Organization
//!
//! - [`architecture`] - Architectures, procedures and the per-entity table
//! - [`resolver`] - First-match architecture selection
//! - [`scheduler`] - Event queue, delta rounds and the virtual clock
//! - [`registry`] - Entities, architectures and theorems registered by a package
//! - [`config`] - Scheduler limits

pub mod architecture;
pub mod config;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod scheduler;


pub use architecture::{Architecture, ArchitectureTable, Evaluation, OutputWrite, Procedure};
pub use config::SchedulerConfig;
pub use error::{Error, Result};
pub use registry::Registry;
pub use scheduler::Scheduler;
