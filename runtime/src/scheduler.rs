//! Discrete-event propagation over a signal graph.
//!
//! The scheduler owns a virtual clock and a queue of pending value changes.
//! Each instant is settled in delta rounds: deliver every change due now, then
//! evaluate every port that reads a changed signal (or was touched, or needs
//! re-resolution). Zero-delay outputs land in the queue at the same instant
//! and are delivered in the next round, so all ports of one round observe the
//! same input snapshot. An instant is settled once a round delivers no change
//! and leaves no port to evaluate.
//!
//! A port whose architecture cannot be resolved, or with an input that has
//! never carried a value, is skipped. When a port loses the architecture it
//! was running, its outputs are withdrawn (reset to no value), and so are the
//! outputs of every port downstream that becomes blocked on a withdrawn
//! signal. No output outlives the computation that produced it.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap};
use std::time::Duration;

use smallvec::SmallVec;
use snafu::ensure;
use valence_ir::{Graph, PortId, SignalId, Value};

use crate::architecture::ArchitectureTable;
use crate::config::SchedulerConfig;
use crate::error::{DeltaLimitSnafu, PostToDrivenSnafu, Result};
use crate::resolver;

/// A pending value change.
#[derive(Debug, Clone, Copy)]
struct Event {
    due: Duration,
    /// Posting order; breaks ties between events due at the same time.
    seq: u64,
    signal: SignalId,
    value: Value,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Event queue and virtual clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Event>>,
    now: Duration,
    seq: u64,
    touched: BTreeSet<PortId>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of undelivered events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest undelivered event.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(event)| event.due)
    }

    /// Post `value` to a free signal, due at the current instant.
    pub fn post(&mut self, graph: &Graph, signal: SignalId, value: Value) -> Result<()> {
        self.post_delayed(graph, signal, value, Duration::ZERO)
    }

    /// Post `value` to a free signal, due `delay` from now.
    pub fn post_delayed(&mut self, graph: &Graph, signal: SignalId, value: Value, delay: Duration) -> Result<()> {
        if let Some(driver) = graph.signal(signal)?.driver() {
            return PostToDrivenSnafu { signal, driver }.fail();
        }
        let due = self.now.saturating_add(delay);
        tracing::trace!(%signal, %value, ?due, "value posted");
        self.enqueue(signal, value, due);
        Ok(())
    }

    /// Evaluate `port` in the next delta round even if none of its inputs changed.
    pub fn touch(&mut self, port: PortId) {
        self.touched.insert(port);
    }

    /// Settle the current instant without advancing the clock.
    pub fn simulate_instant(&mut self, graph: &mut Graph, architectures: &ArchitectureTable) -> Result<()> {
        self.settle(graph, architectures)
    }

    /// Advance the clock by at most `span`, settling every instant visited.
    ///
    /// When nothing is due within the window the clock jumps straight to the
    /// next event, which may lie beyond `span`. Returns the elapsed virtual
    /// time: `span` if events remain after the window, the time of the last
    /// visited instant if the queue ran dry inside it, and zero if the queue
    /// was empty to begin with.
    pub fn simulate_for(
        &mut self,
        graph: &mut Graph,
        architectures: &ArchitectureTable,
        span: Duration,
    ) -> Result<Duration> {
        let start = self.now;
        let end = start.saturating_add(span);
        self.settle(graph, architectures)?;

        let Some(first) = self.next_due() else {
            return Ok(Duration::ZERO);
        };
        if first > end {
            self.advance(first);
            self.settle(graph, architectures)?;
            return Ok(first - start);
        }

        while let Some(due) = self.next_due().filter(|&due| due <= end) {
            self.advance(due);
            self.settle(graph, architectures)?;
        }
        if !self.queue.is_empty() {
            self.advance(end);
        }
        Ok(self.now - start)
    }

    fn advance(&mut self, to: Duration) {
        if to != self.now {
            tracing::debug!(from = ?self.now, ?to, "clock advanced");
            self.now = to;
        }
    }

    fn enqueue(&mut self, signal: SignalId, value: Value, due: Duration) {
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(Reverse(Event { due, seq, signal, value }));
    }

    /// Run delta rounds at the current instant until nothing changes.
    fn settle(&mut self, graph: &mut Graph, architectures: &ArchitectureTable) -> Result<()> {
        let mut dirty = std::mem::take(&mut self.touched);
        dirty.extend(graph.ports().filter(|p| p.needs_resolution()).map(|p| p.id()));

        let mut withdrawn = BTreeSet::new();
        let mut rounds = 0;
        loop {
            for signal in self.deliver(graph)? {
                dirty.extend(graph.signal(signal)?.consumers().iter().copied());
            }
            if dirty.is_empty() {
                break;
            }
            rounds += 1;
            ensure!(rounds <= self.config.max_delta_rounds, DeltaLimitSnafu { time: self.now, rounds: rounds - 1 });

            for port in std::mem::take(&mut dirty) {
                for signal in self.evaluate(graph, architectures, port, &withdrawn)? {
                    dirty.extend(graph.signal(signal)?.consumers().iter().copied());
                    withdrawn.insert(signal);
                }
            }
        }
        if rounds > 0 {
            tracing::debug!(time = ?self.now, rounds, "instant settled");
        }
        Ok(())
    }

    /// Apply every event due at the current instant; returns the signals whose value changed.
    fn deliver(&mut self, graph: &mut Graph) -> Result<BTreeSet<SignalId>> {
        let mut changed = BTreeSet::new();
        while let Some(Reverse(event)) = self.queue.peek().copied() {
            if event.due > self.now {
                break;
            }
            self.queue.pop();
            if !graph.contains_signal(event.signal) {
                tracing::trace!(signal = %event.signal, "dropping event for removed signal");
                continue;
            }
            if graph.set_value(event.signal, event.value)? {
                tracing::trace!(signal = %event.signal, value = %event.value, "value delivered");
                changed.insert(event.signal);
            }
        }
        Ok(changed)
    }

    /// Run `port` once. Returns the outputs it withdrew, if it could not run.
    fn evaluate(
        &mut self,
        graph: &mut Graph,
        architectures: &ArchitectureTable,
        port: PortId,
        withdrawn: &BTreeSet<SignalId>,
    ) -> Result<SmallVec<[SignalId; 1]>> {
        let Ok(p) = graph.port(port) else {
            return Ok(SmallVec::new());
        };
        let was_resolved = p.architecture().is_some();
        let Some(architecture) = resolver::current(architectures, graph, port)? else {
            tracing::trace!(%port, "port unresolved");
            return if was_resolved { withdraw(graph, port) } else { Ok(SmallVec::new()) };
        };
        let p = graph.port(port)?;
        if let Some(&missing) = p.inputs().iter().find(|&&s| graph.value(s).is_none()) {
            tracing::trace!(%port, input = %missing, "port blocked on input without value");
            let upstream_withdrawn = p.inputs().iter().any(|s| withdrawn.contains(s) && graph.value(*s).is_none());
            return if upstream_withdrawn { withdraw(graph, port) } else { Ok(SmallVec::new()) };
        }
        let outputs: SmallVec<[SignalId; 1]> = p.outputs().iter().copied().collect();

        for write in architecture.evaluate(graph, port)? {
            if let Some(&signal) = outputs.get(write.slot) {
                self.enqueue(signal, write.value, self.now.saturating_add(write.delay));
            }
        }
        Ok(SmallVec::new())
    }
}

/// Reset every valued output of `port`; returns the signals that lost a value.
fn withdraw(graph: &mut Graph, port: PortId) -> Result<SmallVec<[SignalId; 1]>> {
    let outputs: SmallVec<[SignalId; 1]> =
        graph.port(port)?.outputs().iter().copied().filter(|&s| graph.value(s).is_some()).collect();
    for &signal in &outputs {
        graph.clear_value(signal)?;
    }
    if !outputs.is_empty() {
        tracing::debug!(%port, withdrawn = outputs.len(), "outputs withdrawn");
    }
    Ok(outputs)
}
