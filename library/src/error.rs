//! Error types for the standard package and sessions.

use snafu::Snafu;

/// Result type for package and session operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Graph construction, classification or rewriting failed.
    #[snafu(display("{source}"))]
    Ir { source: valence_ir::Error },

    /// Registration, resolution or propagation failed.
    #[snafu(display("{source}"))]
    Runtime { source: valence_runtime::Error },

    /// No registered entity uses this symbol.
    #[snafu(display("no entity is registered with symbol '{symbol}'"))]
    UnknownSymbol { symbol: String },
}

impl From<valence_ir::Error> for Error {
    fn from(source: valence_ir::Error) -> Self {
        Error::Ir { source }
    }
}

impl From<valence_runtime::Error> for Error {
    fn from(source: valence_runtime::Error) -> Self {
        Error::Runtime { source }
    }
}
