//! Structural mutation: ports, driver edges, splicing and substitution.
//!
//! Every driver change goes through `attach` and `detach`, the only places
//! that touch cycle counts.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use itertools::Itertools;
use smallvec::SmallVec;
use snafu::ensure;

use super::{BusId, Graph, Port, PortId, SignalId};
use crate::entity::{Entity, standard};
use crate::error::{
    AlreadyDrivenSnafu, DuplicateOutputSnafu, InputArityMismatchSnafu, NoOutputsSnafu, OutputArityMismatchSnafu,
    OutputSlotOutOfRangeSnafu, Result, SpliceCycleSnafu,
};

impl Graph {
    /// Instantiate `entity` reading `inputs` and driving `outputs`.
    ///
    /// Outputs must be free signals. Cycle counts are updated as each output
    /// is attached, so an output that is also one of the inputs closes a cycle.
    pub fn add_port(&mut self, entity: Arc<Entity>, inputs: &[SignalId], outputs: &[SignalId]) -> Result<PortId> {
        ensure!(entity.outputs > 0, NoOutputsSnafu { entity: entity.id.clone() });
        ensure!(
            entity.inputs.accepts(inputs.len()),
            InputArityMismatchSnafu { entity: entity.id.clone(), expected: entity.inputs.to_string(), actual: inputs.len() }
        );
        ensure!(
            outputs.len() == entity.outputs,
            OutputArityMismatchSnafu { entity: entity.id.clone(), expected: entity.outputs, actual: outputs.len() }
        );
        for &input in inputs {
            self.signal(input)?;
        }
        for (i, &output) in outputs.iter().enumerate() {
            if let Some(driver) = self.signal(output)?.driver {
                return AlreadyDrivenSnafu { signal: output, driver }.fail();
            }
            ensure!(!outputs[..i].contains(&output), DuplicateOutputSnafu { entity: entity.id.clone(), signal: output });
        }

        let id = PortId(self.ports.len() as u32);
        let port = Port {
            id,
            entity,
            inputs: inputs.iter().copied().collect(),
            outputs: outputs.iter().copied().collect(),
            buses: SmallVec::new(),
            architecture: None,
            needs_resolution: true,
        };
        let distinct = port.distinct_inputs();
        tracing::debug!(port = %id, entity = %port.entity.id, inputs = ?port.inputs, outputs = ?port.outputs, "port added");
        self.ports.push(Some(port));

        for input in distinct {
            self.signal_mut(input)?.consumers.push(id);
        }
        for (slot, &output) in outputs.iter().enumerate() {
            self.attach(id, slot, output)?;
        }
        Ok(id)
    }

    /// Instantiate `entity` over `inputs` with fresh output signals; returns the first output.
    pub fn apply(&mut self, entity: Arc<Entity>, inputs: &[SignalId]) -> Result<SignalId> {
        let outputs = self.apply_multi(entity, inputs)?;
        Ok(outputs[0])
    }

    /// Instantiate `entity` over `inputs` with fresh output signals.
    pub fn apply_multi(&mut self, entity: Arc<Entity>, inputs: &[SignalId]) -> Result<SmallVec<[SignalId; 1]>> {
        ensure!(entity.outputs > 0, NoOutputsSnafu { entity: entity.id.clone() });
        let outputs: SmallVec<[SignalId; 1]> = (0..entity.outputs).map(|_| self.create_signal()).collect();
        let port = self.add_port(entity, inputs, &outputs)?;
        Ok(self.port(port)?.outputs.clone())
    }

    /// Make the free signal `signal` the output of `port` at `slot`.
    ///
    /// The signal previously occupying the slot becomes free.
    pub fn connect(&mut self, signal: SignalId, port: PortId, slot: usize) -> Result<()> {
        if let Some(driver) = self.signal(signal)?.driver {
            if driver == port && self.port(port)?.outputs.get(slot) == Some(&signal) {
                return Ok(());
            }
            return AlreadyDrivenSnafu { signal, driver }.fail();
        }
        self.rewire(signal, port, slot)
    }

    /// Move `signal` onto `port`'s output `slot`, whatever drove it before.
    ///
    /// The slot the signal leaves is refilled with a fresh signal so the old
    /// port keeps its declared output count; the signal previously occupying
    /// the target slot becomes free. Consumers of `signal` are untouched.
    pub fn rewire(&mut self, signal: SignalId, port: PortId, slot: usize) -> Result<()> {
        self.signal(signal)?;
        let occupant = {
            let target = self.port(port)?;
            ensure!(
                slot < target.outputs.len(),
                OutputSlotOutOfRangeSnafu { port, slot, outputs: target.outputs.len() }
            );
            target.outputs[slot]
        };
        if occupant == signal {
            return Ok(());
        }

        self.release(signal)?;
        self.detach(occupant)?;
        self.attach(port, slot, signal)?;
        tracing::debug!(%signal, %port, slot, freed = %occupant, "signal rewired");
        Ok(())
    }

    /// Detach `signal` from its driver, leaving a fresh placeholder in the slot.
    pub(crate) fn release(&mut self, signal: SignalId) -> Result<()> {
        if let Some((port, slot)) = self.detach(signal)? {
            let placeholder = self.create_signal();
            self.attach(port, slot, placeholder)?;
        }
        Ok(())
    }

    /// Turn a driven signal into a free one. Its value and properties are kept.
    pub fn disconnect(&mut self, signal: SignalId) -> Result<()> {
        self.release(signal)
    }

    /// Bind `bus` to `port`.
    pub fn bind_bus(&mut self, port: PortId, bus: BusId) -> Result<()> {
        self.bus(bus)?;
        let target = self.port_mut(port)?;
        if target.buses.contains(&bus) {
            return Ok(());
        }
        target.buses.push(bus);
        target.needs_resolution = true;
        let outputs = target.outputs.clone();
        for output in outputs {
            self.invalidate_upward(output);
        }
        tracing::debug!(%port, %bus, "bus bound");
        Ok(())
    }

    /// Replace `target` by `replacement` in place.
    ///
    /// Afterwards `target` computes what `replacement` computed, and every
    /// consumer of `target` keeps reading the same signal id:
    ///
    /// - a driven replacement nobody consumes hands its port slot to `target`;
    /// - a driven replacement that is shared gets its port cloned to drive `target`;
    /// - a free replacement nobody consumes is absorbed (value and properties move over);
    /// - a free replacement that is shared drives `target` through `Std.Identity`.
    pub fn splice(&mut self, target: SignalId, replacement: SignalId) -> Result<()> {
        if target == replacement {
            return Ok(());
        }
        ensure!(!self.depends_on(replacement, target)?, SpliceCycleSnafu { target, replacement });

        let (driver, shared) = {
            let signal = self.signal(replacement)?;
            (signal.driver, !signal.consumers.is_empty())
        };
        match (driver, shared) {
            (Some(port), false) => {
                let slot = self.slot_of(port, replacement)?;
                self.rewire(target, port, slot)?;
            }
            (Some(port), true) => {
                let slot = self.slot_of(port, replacement)?;
                let clone = self.clone_port(port)?;
                self.rewire(target, clone, slot)?;
            }
            (None, false) => {
                self.release(target)?;
                let (value, properties) = {
                    let signal = self.signal(replacement)?;
                    (signal.value, signal.properties.clone())
                };
                let signal = self.signal_mut(target)?;
                signal.value = value;
                signal.properties = properties;
                self.invalidate_upward(target);
            }
            (None, true) => {
                let placeholder = self.create_signal();
                let port = self.add_port(Arc::new(standard::identity()), &[replacement], &[placeholder])?;
                self.rewire(target, port, 0)?;
            }
        }
        tracing::debug!(%target, %replacement, "signal spliced");
        Ok(())
    }

    /// Rebuild `root` with every occurrence of `target` in its driving subgraph
    /// replaced by `replacement`.
    ///
    /// Signals between `root` and `target` are copied rather than mutated, so
    /// other readers of the original subgraph are unaffected. `root` itself is
    /// rewired onto the rebuilt structure and keeps its id; when `root` is
    /// `target` the replacement is returned instead, and a `root` independent
    /// of `target` is returned untouched.
    pub fn substitute(&mut self, root: SignalId, target: SignalId, replacement: SignalId) -> Result<SignalId> {
        self.signal(replacement)?;
        if root == target {
            return Ok(replacement);
        }
        if !self.depends_on(root, target)? {
            return Ok(root);
        }

        let (dependents, _) = self.dependents(target);
        let dependents: HashSet<SignalId> = dependents.into_iter().collect();
        let affected: Vec<SignalId> =
            self.driving_subgraph(root)?.into_iter().filter(|s| *s != target && dependents.contains(s)).collect();

        let mut inputs_map = HashMap::from([(target, replacement)]);
        let mut copies = HashMap::new();
        for &signal in &affected {
            if signal == root {
                continue;
            }
            let copy = self.copy_signal(signal)?;
            inputs_map.insert(signal, copy);
            copies.insert(signal, copy);
        }

        let ports: Vec<PortId> = affected.iter().filter_map(|&s| self.driver(s)).unique().collect();
        let mut root_slot = None;
        for port in ports {
            let (entity, inputs, outputs, buses) = {
                let p = self.port(port)?;
                (p.entity.clone(), p.inputs.clone(), p.outputs.clone(), p.buses.clone())
            };
            let inputs: SmallVec<[SignalId; 2]> =
                inputs.iter().map(|s| inputs_map.get(s).copied().unwrap_or(*s)).collect();
            let mut new_outputs = SmallVec::<[SignalId; 1]>::new();
            for &output in &outputs {
                match copies.get(&output) {
                    Some(&copy) => new_outputs.push(copy),
                    None => new_outputs.push(self.create_signal()),
                }
            }
            let rebuilt = self.add_port(entity, &inputs, &new_outputs)?;
            for bus in buses {
                self.bind_bus(rebuilt, bus)?;
            }
            if let Some(slot) = outputs.iter().position(|&s| s == root) {
                root_slot = Some((rebuilt, slot));
            }
        }

        if let Some((port, slot)) = root_slot {
            self.rewire(root, port, slot)?;
        }
        tracing::debug!(%root, %target, %replacement, copied = copies.len(), "substituted");
        Ok(root)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Set `port` as the driver of `signal` at `slot`, counting the cycles closed.
    fn attach(&mut self, port: PortId, slot: usize, signal: SignalId) -> Result<()> {
        self.port_mut(port)?.outputs[slot] = signal;
        self.signal_mut(signal)?.driver = Some(port);

        let inputs = self.port(port)?.distinct_inputs();
        let mut closed = 0;
        for input in inputs {
            for path in self.find_all_paths(input, signal)? {
                closed += 1;
                for member in path {
                    self.signal_mut(member)?.cycles += 1;
                }
            }
        }
        if closed > 0 {
            tracing::debug!(%signal, %port, cycles = closed, "driver edge closed cycles");
        }
        self.invalidate_upward(signal);
        Ok(())
    }

    /// Clear `signal`'s driver, uncounting the cycles the edge closed.
    ///
    /// Returns the port and slot the signal occupied. The slot is left stale;
    /// callers refill it.
    fn detach(&mut self, signal: SignalId) -> Result<Option<(PortId, usize)>> {
        let Some(port) = self.signal(signal)?.driver else {
            return Ok(None);
        };
        let slot = self.slot_of(port, signal)?;

        let inputs = self.port(port)?.distinct_inputs();
        for input in inputs {
            for path in self.find_all_paths(input, signal)? {
                for member in path {
                    let member = self.signal_mut(member)?;
                    member.cycles = member.cycles.saturating_sub(1);
                }
            }
        }
        self.signal_mut(signal)?.driver = None;
        self.invalidate_upward(signal);
        Ok(Some((port, slot)))
    }

    fn slot_of(&self, port: PortId, signal: SignalId) -> Result<usize> {
        let p = self.port(port)?;
        p.slot_of(signal).ok_or_else(|| OutputSlotOutOfRangeSnafu { port, slot: p.outputs.len(), outputs: p.outputs.len() }.build())
    }

    /// Same entity, inputs and buses; fresh outputs.
    fn clone_port(&mut self, port: PortId) -> Result<PortId> {
        let (entity, inputs, output_count, buses) = {
            let p = self.port(port)?;
            (p.entity.clone(), p.inputs.clone(), p.outputs.len(), p.buses.clone())
        };
        let outputs: SmallVec<[SignalId; 1]> = (0..output_count).map(|_| self.create_signal()).collect();
        let clone = self.add_port(entity, &inputs, &outputs)?;
        for bus in buses {
            self.bind_bus(clone, bus)?;
        }
        Ok(clone)
    }

    /// Fresh free signal with the label and properties of `signal`.
    fn copy_signal(&mut self, signal: SignalId) -> Result<SignalId> {
        let (label, properties) = {
            let s = self.signal(signal)?;
            (s.label.clone(), s.properties.clone())
        };
        let copy = self.create_signal();
        let s = self.signal_mut(copy)?;
        s.label = label;
        s.properties = properties;
        Ok(copy)
    }

    /// Drop memoized memberships of `signal` and its dependents, and flag the
    /// ports reading any of them for re-resolution.
    pub(crate) fn invalidate_upward(&mut self, signal: SignalId) {
        let (signals, ports) = self.dependents(signal);
        self.memberships.borrow_mut().invalidate(&signals);
        for port in &ports {
            if let Ok(port) = self.port_mut(*port) {
                port.needs_resolution = true;
            }
        }
        tracing::trace!(%signal, signals = signals.len(), ports = ports.len(), "invalidated upward");
    }
}
