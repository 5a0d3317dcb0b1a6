//! Theorem-based rewriting with identity-preserving splicing.

pub mod config;
pub mod engine;
mod theorem;

pub use config::SimplifyConfig;
pub use engine::{SimplifyOutput, simplify};
pub use theorem::{RewriteFn, Theorem, TheoremTable};
