//! Removal of structure no root reaches.

use std::collections::HashSet;

use super::{Graph, PortId, SignalId};
use crate::error::Result;

/// What [`Graph::remove_unused`] dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub signals: usize,
    pub ports: usize,
    pub buses: usize,
}

impl Graph {
    /// Drop every signal, port and bus not needed to compute `roots`.
    ///
    /// A signal is live when it is a root, an input of a live port, or a member
    /// of a bus bound to a live port; a port is live when it drives a live
    /// signal. Cycle counts are unaffected: any cycle through a live signal
    /// lies entirely inside its driving subgraph.
    pub fn remove_unused(&mut self, roots: &[SignalId]) -> Result<SweepStats> {
        let mut live_signals = HashSet::new();
        let mut live_ports: HashSet<PortId> = HashSet::new();
        let mut stack = Vec::with_capacity(roots.len());
        for &root in roots {
            self.signal(root)?;
            if live_signals.insert(root) {
                stack.push(root);
            }
        }

        while let Some(signal) = stack.pop() {
            let Some(port_id) = self.driver(signal) else { continue };
            if !live_ports.insert(port_id) {
                continue;
            }
            let port = self.port(port_id)?;
            let members = port.buses.iter().filter_map(|bus| self.bus(*bus).ok()).flat_map(|bus| bus.signals.iter());
            for &next in port.inputs.iter().chain(port.outputs.iter()).chain(members) {
                if live_signals.insert(next) {
                    stack.push(next);
                }
            }
        }

        let live_buses: HashSet<_> = live_ports
            .iter()
            .filter_map(|port| self.port(*port).ok())
            .flat_map(|port| port.buses.iter().copied())
            .collect();

        let mut stats = SweepStats::default();
        let mut dropped = Vec::new();
        for slot in &mut self.signals {
            if slot.as_ref().is_some_and(|s| !live_signals.contains(&s.id)) {
                if let Some(signal) = slot.take() {
                    dropped.push(signal.id);
                }
                stats.signals += 1;
            }
        }
        for slot in &mut self.ports {
            if slot.as_ref().is_some_and(|p| !live_ports.contains(&p.id)) {
                *slot = None;
                stats.ports += 1;
            }
        }
        for slot in &mut self.buses {
            if slot.as_ref().is_some_and(|b| !live_buses.contains(&b.id)) {
                *slot = None;
                stats.buses += 1;
            }
        }
        for signal in self.signals.iter_mut().flatten() {
            signal.consumers.retain(|port| live_ports.contains(port));
        }
        self.memberships.borrow_mut().invalidate(&dropped);

        tracing::debug!(roots = roots.len(), signals = stats.signals, ports = stats.ports, buses = stats.buses, "swept unused");
        Ok(stats)
    }

    /// Drop `port` if nothing can observe it: every output is an unread,
    /// unlabeled signal without value or properties, as the placeholder left
    /// behind by [`Graph::rewire`]. Returns whether the port was dropped.
    pub fn retire_port(&mut self, port: PortId) -> Result<bool> {
        let (inputs, outputs) = {
            let p = self.port(port)?;
            (p.distinct_inputs(), p.outputs.clone())
        };
        let unobserved = outputs.iter().all(|&output| {
            self.signal(output).is_ok_and(|s| {
                s.consumers.is_empty() && s.label.is_none() && s.value.is_none() && s.properties.is_empty()
            })
        });
        if !unobserved {
            return Ok(false);
        }

        for input in inputs {
            self.signal_mut(input)?.consumers.retain(|reader| *reader != port);
        }
        for output in &outputs {
            self.signals[output.index()] = None;
        }
        self.ports[port.index()] = None;
        self.memberships.borrow_mut().invalidate(&outputs);
        tracing::debug!(%port, "port retired");
        Ok(true)
    }
}
