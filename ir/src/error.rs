use snafu::Snafu;

use crate::entity::EntityId;
use crate::graph::{BusId, PortId, SignalId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Structural errors raised by graph construction and registration.
///
/// All of these indicate a programming error in the caller; none is recovered
/// internally.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Signal id does not name a live signal.
    #[snafu(display("unknown signal {signal}"))]
    UnknownSignal { signal: SignalId },

    /// Port id does not name a live port.
    #[snafu(display("unknown port {port}"))]
    UnknownPort { port: PortId },

    /// Bus id does not name a live bus.
    #[snafu(display("unknown bus {bus}"))]
    UnknownBus { bus: BusId },

    /// A signal has at most one driving port.
    #[snafu(display("signal {signal} is already driven by port {driver}"))]
    AlreadyDriven { signal: SignalId, driver: PortId },

    /// Input count does not satisfy the entity's declared arity.
    #[snafu(display("entity {entity} expects {expected} inputs, got {actual}"))]
    InputArityMismatch { entity: EntityId, expected: String, actual: usize },

    /// Output count does not match the entity's declared output count.
    #[snafu(display("entity {entity} drives {expected} outputs, got {actual}"))]
    OutputArityMismatch { entity: EntityId, expected: usize, actual: usize },

    /// Every port drives at least one signal.
    #[snafu(display("entity {entity} declares no outputs and cannot be instantiated"))]
    NoOutputs { entity: EntityId },

    /// Output slot index past the port's declared outputs.
    #[snafu(display("port {port} has {outputs} outputs, slot {slot} is out of range"))]
    OutputSlotOutOfRange { port: PortId, slot: usize, outputs: usize },

    /// The same signal listed twice among a port's outputs.
    #[snafu(display("signal {signal} listed more than once among the outputs of {entity}"))]
    DuplicateOutput { entity: EntityId, signal: SignalId },

    /// Entity registered twice.
    #[snafu(display("entity {entity} is already registered"))]
    DuplicateEntity { entity: EntityId },

    /// Entity lookup failed.
    #[snafu(display("entity {entity} is not registered"))]
    UnknownEntity { entity: EntityId },

    /// Theorem registered twice.
    #[snafu(display("theorem '{theorem}' is already registered"))]
    DuplicateTheorem { theorem: String },

    /// Splicing would make a signal depend on itself through its replacement.
    #[snafu(display("cannot splice {replacement} into {target}: the replacement depends on the target"))]
    SpliceCycle { target: SignalId, replacement: SignalId },
}
