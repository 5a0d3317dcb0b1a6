//! Error types for propagation and architecture dispatch.

use std::time::Duration;

use snafu::Snafu;
use valence_ir::{ArchitectureId, PortId, SignalId};

/// Result type for runtime operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while scheduling or evaluating.
///
/// An unresolved port is not an error: its outputs simply stay undefined.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Structural error from the graph.
    #[snafu(display("graph error: {source}"))]
    Graph { source: valence_ir::Error },

    /// Only free signals accept external values.
    #[snafu(display("signal {signal} is driven by port {driver}; only free signals accept posted values"))]
    PostToDriven { signal: SignalId, driver: PortId },

    /// Zero-delay propagation did not settle.
    #[snafu(display("no fixpoint at t={time:?} after {rounds} delta rounds"))]
    DeltaLimit { time: Duration, rounds: usize },

    /// Architecture registered twice.
    #[snafu(display("architecture {architecture} is already registered"))]
    DuplicateArchitecture { architecture: ArchitectureId },

    /// A port records an architecture the table does not know.
    #[snafu(display("architecture {architecture} is not registered"))]
    UnknownArchitecture { architecture: ArchitectureId },

    /// Procedure wrote past the port's outputs.
    #[snafu(display("architecture {architecture} wrote output slot {slot}, port {port} has {outputs}"))]
    OutputSlot { architecture: ArchitectureId, port: PortId, slot: usize, outputs: usize },

    /// Procedure reported a failure.
    #[snafu(display("architecture {architecture} failed on port {port}: {reason}"))]
    Procedure { architecture: ArchitectureId, port: PortId, reason: String },
}

impl From<valence_ir::Error> for Error {
    fn from(source: valence_ir::Error) -> Self {
        Error::Graph { source }
    }
}
