//! The standard valence package.
//!
//! Registers the `Std` entities, an architecture for each of them and the
//! simplification theorems over them, and offers a [`Session`] that ties a
//! graph to a registry and a scheduler.
//!
//! ```rust,ignore
//! use valence_library::Session;
//! use valence_ir::entity::standard;
//!
//! let mut session = Session::standard()?;
//! let x = session.variable("x");
//! let two = session.constant(2);
//! let y = session.apply(&standard::MULTIPLY, &[x, two])?;
//! assert_eq!(session.evaluate_at(&[(x, 21.into())], y)?, Some(42.0.into()));
//! ```

pub mod architectures;
pub mod error;
pub mod session;
pub mod theorems;


use valence_ir::entity::standard;
use valence_runtime::Registry;

pub use error::{Error, Result};
pub use session::Session;

/// Register the whole standard package into `registry`.
pub fn register(registry: &mut Registry) -> Result<()> {
    let entities = standard::register(&mut registry.entities)?;
    architectures::register(&mut registry.architectures)?;
    theorems::register(&mut registry.theorems)?;
    tracing::debug!(
        entities = entities.len(),
        architectures = registry.architectures.len(),
        theorems = registry.theorems.len(),
        "standard package registered"
    );
    Ok(())
}
