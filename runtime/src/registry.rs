//! Registration state for entities, architectures and theorems.

use valence_ir::{EntityTable, TheoremTable};

use crate::architecture::ArchitectureTable;

/// Everything a package registers at load time, passed explicitly to the
/// code that builds, evaluates and simplifies graphs.
#[derive(Debug, Default)]
pub struct Registry {
    pub entities: EntityTable,
    pub architectures: ArchitectureTable,
    pub theorems: TheoremTable,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
}
