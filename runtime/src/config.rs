//! Scheduler configuration.

use bon::bon;

/// Limits for [`Scheduler`](crate::Scheduler) propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Zero-delay rounds allowed at a single instant before propagation is
    /// declared non-converging.
    pub max_delta_rounds: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_delta_rounds: Self::DEFAULT_MAX_DELTA_ROUNDS }
    }
}

#[bon]
impl SchedulerConfig {
    pub const DEFAULT_MAX_DELTA_ROUNDS: usize = 10_000;

    #[builder]
    pub fn builder(#[builder(default = 10_000)] max_delta_rounds: usize) -> Self {
        Self { max_delta_rounds }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `VALENCE_MAX_DELTA_ROUNDS` - Delta rounds per instant (default: 10000)
    pub fn from_env() -> Self {
        let max_delta_rounds = std::env::var("VALENCE_MAX_DELTA_ROUNDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(Self::DEFAULT_MAX_DELTA_ROUNDS);
        Self { max_delta_rounds }
    }
}
