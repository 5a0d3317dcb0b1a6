//! Common imports for building and querying signal graphs.
//!
//! ```rust,ignore
//! use valence_ir::prelude::*;
//! ```

// Graph
pub use crate::graph::{ArchitectureId, BusId, Graph, PortId, SignalId};

// Entities and values
pub use crate::entity::{Arity, Entity, EntityId, EntityTable, Fixity, standard};
pub use crate::types::{Property, Value};

// Matching, classification, rewriting
pub use crate::category::{AlgebraicExpression, AlgebraicStructure, Category, Membership};
pub use crate::pattern::{Bindings, Condition, Pattern, RewriteResult};
pub use crate::rewrite::{SimplifyConfig, Theorem, TheoremTable};
