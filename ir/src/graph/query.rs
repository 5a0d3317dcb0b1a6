//! Read-only traversals over driven-by and consumed-by edges.

use std::collections::{HashSet, VecDeque};

use smallvec::SmallVec;

use super::{Graph, PortId, SignalId};
use crate::error::Result;

impl Graph {
    /// Distinct inputs of the port driving `signal`; empty for free signals.
    pub(crate) fn predecessors(&self, signal: SignalId) -> SmallVec<[SignalId; 2]> {
        self.driver(signal).and_then(|port| self.port(port).ok()).map(|port| port.distinct_inputs()).unwrap_or_default()
    }

    /// Whether `a` transitively depends on `b` through driver → input edges.
    ///
    /// A signal depends on itself.
    pub fn depends_on(&self, a: SignalId, b: SignalId) -> Result<bool> {
        self.signal(a)?;
        self.signal(b)?;
        if a == b {
            return Ok(true);
        }

        let mut visited = HashSet::from([a]);
        let mut stack = vec![a];
        while let Some(current) = stack.pop() {
            for input in self.predecessors(current) {
                if input == b {
                    return Ok(true);
                }
                if visited.insert(input) {
                    stack.push(input);
                }
            }
        }
        Ok(false)
    }

    /// Every simple dependency path through which `from` depends on `to`.
    ///
    /// The search starts at `from` and walks down driver → input edges until
    /// it reaches `to`, so paths exist exactly when `depends_on(from, to)`.
    /// Each path is listed upstream first, from `to` to `from`, and includes
    /// both endpoints; no signal repeats within a path. `from == to` yields the single path `[to]`.
    /// Closing a driver edge `port → signal` adds one elementary cycle for every
    /// path from the signal back to each of the port's inputs, which is how
    /// cycle counts are maintained.
    pub fn find_all_paths(&self, from: SignalId, to: SignalId) -> Result<Vec<Vec<SignalId>>> {
        self.signal(from)?;
        self.signal(to)?;
        if from == to {
            return Ok(vec![vec![to]]);
        }

        let mut paths = Vec::new();
        let mut path = vec![from];
        let mut on_path = HashSet::from([from]);
        let mut frames = vec![self.predecessors(from).into_iter()];

        while let Some(frame) = frames.last_mut() {
            match frame.next() {
                Some(next) if next == to => {
                    let mut found = path.clone();
                    found.push(to);
                    found.reverse();
                    paths.push(found);
                }
                Some(next) if on_path.contains(&next) => {}
                Some(next) => {
                    path.push(next);
                    on_path.insert(next);
                    frames.push(self.predecessors(next).into_iter());
                }
                None => {
                    frames.pop();
                    if let Some(done) = path.pop() {
                        on_path.remove(&done);
                    }
                }
            }
        }

        tracing::trace!(%from, %to, paths = paths.len(), "paths enumerated");
        Ok(paths)
    }

    /// `root` and every signal it transitively depends on, breadth-first.
    pub fn driving_subgraph(&self, root: SignalId) -> Result<Vec<SignalId>> {
        self.signal(root)?;
        let mut seen = HashSet::from([root]);
        let mut order = vec![root];
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for input in self.predecessors(current) {
                if seen.insert(input) {
                    order.push(input);
                    queue.push_back(input);
                }
            }
        }
        Ok(order)
    }

    /// `signal` and every signal that transitively depends on it, plus the
    /// consuming ports crossed on the way.
    pub(crate) fn dependents(&self, signal: SignalId) -> (Vec<SignalId>, Vec<PortId>) {
        let mut seen = HashSet::from([signal]);
        let mut signals = vec![signal];
        let mut ports = Vec::new();
        let mut seen_ports = HashSet::new();
        let mut queue = VecDeque::from([signal]);

        while let Some(current) = queue.pop_front() {
            let Ok(current) = self.signal(current) else { continue };
            for &consumer in current.consumers() {
                if !seen_ports.insert(consumer) {
                    continue;
                }
                ports.push(consumer);
                let Ok(port) = self.port(consumer) else { continue };
                for &output in port.outputs() {
                    if seen.insert(output) {
                        signals.push(output);
                        queue.push_back(output);
                    }
                }
            }
        }
        (signals, ports)
    }

    /// Free signals in `root`'s driving subgraph.
    pub fn sources(&self, root: SignalId) -> Result<Vec<SignalId>> {
        Ok(self.driving_subgraph(root)?.into_iter().filter(|&s| self.driver(s).is_none()).collect())
    }
}
