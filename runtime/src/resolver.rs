//! Architecture resolution.
//!
//! A port's architecture is the first of its entity's architectures, in
//! registration order, whose applicability pattern matches the port. Resolution
//! is lazy: structural edits only flag the port, and the flag is honoured the
//! next time the scheduler evaluates it.

use std::sync::Arc;

use snafu::OptionExt;
use valence_ir::{Graph, PortId};

use crate::architecture::{Architecture, ArchitectureTable};
use crate::error::{Result, UnknownArchitectureSnafu};

/// First architecture applicable to `port`, without recording it.
pub fn select(table: &ArchitectureTable, graph: &Graph, port: PortId) -> Result<Option<Arc<Architecture>>> {
    let entity = graph.port(port)?.entity().id.clone();
    Ok(table.for_entity(&entity).iter().find(|a| a.applies(graph, port)).cloned())
}

/// Select and record `port`'s architecture, clearing its re-resolution flag.
///
/// `None` leaves the port unresolved.
pub fn resolve(table: &ArchitectureTable, graph: &mut Graph, port: PortId) -> Result<Option<Arc<Architecture>>> {
    let selected = select(table, graph, port)?;
    let previous = graph.port(port)?.architecture().cloned();
    let current = selected.as_ref().map(|a| a.id().clone());
    if previous != current {
        match &current {
            Some(architecture) => tracing::debug!(%port, %architecture, "architecture selected"),
            None => tracing::debug!(%port, "no applicable architecture"),
        }
    }
    graph.set_architecture(port, current)?;
    Ok(selected)
}

/// The architecture `port` currently runs, resolving first if it is flagged.
pub fn current(table: &ArchitectureTable, graph: &mut Graph, port: PortId) -> Result<Option<Arc<Architecture>>> {
    let p = graph.port(port)?;
    if p.needs_resolution() {
        return resolve(table, graph, port);
    }
    match p.architecture() {
        Some(id) => table.get(id).cloned().context(UnknownArchitectureSnafu { architecture: id.clone() }).map(Some),
        None => Ok(None),
    }
}
