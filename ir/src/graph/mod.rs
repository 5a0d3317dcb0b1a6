//! The signal graph.
//!
//! Signals, ports and buses live in index-stable arenas owned by [`Graph`];
//! every relation between them ("driven by", "consumed by", "bound to") is an
//! id, so cyclic graphs need no shared ownership.
//!
//! # Invariants
//!
//! - A signal has at most one driving port, and a port's outputs are exactly
//!   the signals whose driver is that port.
//! - `Signal::cycles` equals the number of elementary cycles (along
//!   driven-by → input edges) passing through the signal. It is maintained on
//!   every driver attach and detach, see [`Graph::find_all_paths`].
//! - Any change to a signal's driver, properties or bus bindings drops the
//!   category memberships of that signal and of everything that depends on it,
//!   and flags every consuming port for architecture re-resolution.
//!
//! The graph is single-threaded by construction: category memberships are
//! memoized through a `RefCell` so classification can run behind `&Graph`.

mod port;
mod query;
mod signal;
mod sweep;
pub mod tree;
mod wiring;

use std::cell::RefCell;

use snafu::OptionExt;

pub use port::{ArchitectureId, Bus, Port};
pub use signal::Signal;
pub use sweep::SweepStats;
pub use tree::render_tree;

use crate::category::{CategoryCache, CategoryId, Membership};
use crate::error::{Result, UnknownBusSnafu, UnknownPortSnafu, UnknownSignalSnafu};
use crate::types::{Property, Value};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
        #[display("{}{}", $prefix, _0)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Position of this id in its arena.
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Identifier of a signal in its [`Graph`].
    SignalId,
    "s"
);
arena_id!(
    /// Identifier of a port in its [`Graph`].
    PortId,
    "p"
);
arena_id!(
    /// Identifier of a bus in its [`Graph`].
    BusId,
    "b"
);

/// Mutable, cycle-tolerant dataflow graph.
#[derive(Debug, Default)]
pub struct Graph {
    signals: Vec<Option<Signal>>,
    ports: Vec<Option<Port>>,
    buses: Vec<Option<Bus>>,
    memberships: RefCell<CategoryCache>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Signals
    // ------------------------------------------------------------------

    /// Create a free signal with no value.
    pub fn create_signal(&mut self) -> SignalId {
        let id = SignalId(self.signals.len() as u32);
        self.signals.push(Some(Signal::new(id)));
        id
    }

    pub fn create_labeled_signal(&mut self, label: impl Into<String>) -> SignalId {
        let id = self.create_signal();
        if let Some(signal) = self.signals[id.index()].as_mut() {
            signal.label = Some(label.into());
        }
        id
    }

    /// Create a free signal holding `value`, marked [`Property::CONSTANT`].
    pub fn create_constant(&mut self, value: impl Into<Value>) -> SignalId {
        let value = value.into();
        let id = self.create_signal();
        if let Some(signal) = self.signals[id.index()].as_mut() {
            signal.value = Some(value);
            signal.properties.insert(Property::CONSTANT);
            if value.is_integer() {
                signal.properties.insert(Property::INTEGER);
            }
        }
        id
    }

    pub fn signal(&self, id: SignalId) -> Result<&Signal> {
        self.signals.get(id.index()).and_then(Option::as_ref).context(UnknownSignalSnafu { signal: id })
    }

    pub(crate) fn signal_mut(&mut self, id: SignalId) -> Result<&mut Signal> {
        self.signals.get_mut(id.index()).and_then(Option::as_mut).context(UnknownSignalSnafu { signal: id })
    }

    pub fn contains_signal(&self, id: SignalId) -> bool {
        self.signal(id).is_ok()
    }

    /// Live signals in id order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter_map(Option::as_ref)
    }

    pub fn signal_count(&self) -> usize {
        self.signals().count()
    }

    /// Current value, `None` until first propagated (or for unknown ids).
    pub fn value(&self, id: SignalId) -> Option<Value> {
        self.signal(id).ok().and_then(|s| s.value)
    }

    /// Port driving `id`, `None` for free signals (or unknown ids).
    pub fn driver(&self, id: SignalId) -> Option<PortId> {
        self.signal(id).ok().and_then(|s| s.driver)
    }

    pub fn is_cyclic(&self, id: SignalId) -> bool {
        self.signal(id).is_ok_and(Signal::is_cyclic)
    }

    /// Overwrite a signal's value.
    ///
    /// This bypasses the rule that only free signals accept external values;
    /// the scheduler enforces that rule at `post` time and uses this to apply
    /// both external posts and architecture outputs. Returns whether the value
    /// changed.
    pub fn set_value(&mut self, id: SignalId, value: Value) -> Result<bool> {
        let signal = self.signal_mut(id)?;
        let changed = !signal.value.is_some_and(|old| old.same(&value));
        signal.value = Some(value);
        Ok(changed)
    }

    /// Forget a signal's value.
    pub fn clear_value(&mut self, id: SignalId) -> Result<()> {
        self.signal_mut(id)?.value = None;
        Ok(())
    }

    pub fn set_label(&mut self, id: SignalId, label: impl Into<String>) -> Result<()> {
        self.signal_mut(id)?.label = Some(label.into());
        Ok(())
    }

    /// Attach a property marker. Returns whether it was newly added.
    pub fn add_property(&mut self, id: SignalId, property: Property) -> Result<bool> {
        let added = self.signal_mut(id)?.properties.insert(property);
        if added {
            self.invalidate_upward(id);
        }
        Ok(added)
    }

    /// Remove a property marker. Returns whether it was present.
    pub fn remove_property(&mut self, id: SignalId, property: &Property) -> Result<bool> {
        let removed = self.signal_mut(id)?.properties.remove(property);
        if removed {
            self.invalidate_upward(id);
        }
        Ok(removed)
    }

    pub fn has_property(&self, id: SignalId, property: &Property) -> bool {
        self.signal(id).is_ok_and(|s| s.has_property(property))
    }

    // ------------------------------------------------------------------
    // Ports
    // ------------------------------------------------------------------

    pub fn port(&self, id: PortId) -> Result<&Port> {
        self.ports.get(id.index()).and_then(Option::as_ref).context(UnknownPortSnafu { port: id })
    }

    pub(crate) fn port_mut(&mut self, id: PortId) -> Result<&mut Port> {
        self.ports.get_mut(id.index()).and_then(Option::as_mut).context(UnknownPortSnafu { port: id })
    }

    /// Live ports in id order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter_map(Option::as_ref)
    }

    pub fn port_count(&self) -> usize {
        self.ports().count()
    }

    /// Record the architecture selected for `port` and clear its re-resolution flag.
    pub fn set_architecture(&mut self, port: PortId, architecture: Option<ArchitectureId>) -> Result<()> {
        let port = self.port_mut(port)?;
        port.architecture = architecture;
        port.needs_resolution = false;
        Ok(())
    }

    /// Ask for `port`'s architecture to be selected again on its next evaluation.
    pub fn request_resolution(&mut self, port: PortId) -> Result<()> {
        self.port_mut(port)?.needs_resolution = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Buses
    // ------------------------------------------------------------------

    pub fn bus(&self, id: BusId) -> Result<&Bus> {
        self.buses.get(id.index()).and_then(Option::as_ref).context(UnknownBusSnafu { bus: id })
    }

    /// Live buses in id order.
    pub fn buses(&self) -> impl Iterator<Item = &Bus> {
        self.buses.iter().filter_map(Option::as_ref)
    }

    /// Group `signals` into a bus.
    pub fn create_bus(&mut self, label: Option<String>, signals: &[SignalId]) -> Result<BusId> {
        for &signal in signals {
            self.signal(signal)?;
        }
        let id = BusId(self.buses.len() as u32);
        self.buses.push(Some(Bus { id, label, signals: signals.iter().copied().collect() }));
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Category memberships
    // ------------------------------------------------------------------

    pub(crate) fn cached_membership(&self, category: &CategoryId, signal: SignalId) -> Option<Membership> {
        self.memberships.borrow().get(category, signal)
    }

    pub(crate) fn store_membership(&self, category: CategoryId, signal: SignalId, membership: Membership) {
        self.memberships.borrow_mut().insert(category, signal, membership);
    }

    /// Number of memoized category memberships.
    pub fn cached_membership_count(&self) -> usize {
        self.memberships.borrow().len()
    }

    /// Drop every memoized category membership.
    pub fn clear_memberships(&self) {
        self.memberships.borrow_mut().clear();
    }
}
