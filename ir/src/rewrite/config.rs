//! Simplification configuration.

use bon::bon;

/// Limits for [`simplify`](super::simplify).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifyConfig {
    /// Maximum number of successful rewrites before giving up on a fixpoint.
    pub max_iterations: usize,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self { max_iterations: Self::DEFAULT_MAX_ITERATIONS }
    }
}

#[bon]
impl SimplifyConfig {
    pub const DEFAULT_MAX_ITERATIONS: usize = 1_000;

    #[builder]
    pub fn builder(#[builder(default = 1_000)] max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `VALENCE_SIMPLIFY_MAX_ITERATIONS` - Rewrite budget (default: 1000)
    pub fn from_env() -> Self {
        let max_iterations = std::env::var("VALENCE_SIMPLIFY_MAX_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::DEFAULT_MAX_ITERATIONS);
        Self { max_iterations }
    }
}
