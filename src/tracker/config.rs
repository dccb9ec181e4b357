//! Tracker configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::tracker::kalman_filter::MotionConfig;

/// Configuration for the [`TrackerController`](crate::TrackerController).
///
/// Missing fields fall back to [`Default`] when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Search window size relative to the last matched extent, per dimension
    pub search_expansion_factor: f32,
    /// Minimum best score for a match to correct the motion estimate
    pub acceptance_threshold: f32,
    /// A score above this stops the bank scan
    pub early_exit_threshold: f32,
    /// Number of training exemplars captured into the bank
    pub template_count: usize,
    pub process_noise: f64,
    pub measurement_noise: f64,
    pub initial_uncertainty: f64,
    /// Recovery window radius as a fraction of the shorter frame side
    pub fallback_window_fraction: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let motion = MotionConfig::default();
        Self {
            search_expansion_factor: 1.5,
            acceptance_threshold: 0.8,
            early_exit_threshold: 0.8,
            template_count: 8,
            process_noise: motion.process_noise,
            measurement_noise: motion.measurement_noise,
            initial_uncertainty: motion.initial_uncertainty,
            fallback_window_fraction: 1.0 / 6.0,
        }
    }
}

impl TrackerConfig {
    pub fn motion(&self) -> MotionConfig {
        MotionConfig {
            process_noise: self.process_noise,
            measurement_noise: self.measurement_noise,
            initial_uncertainty: self.initial_uncertainty,
        }
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<()> {
            Err(TrackerError::InvalidConfig { field, reason })
        }

        if !self.search_expansion_factor.is_finite() || self.search_expansion_factor < 1.0 {
            return invalid("search_expansion_factor", "must be finite and >= 1");
        }
        if !self.acceptance_threshold.is_finite() {
            return invalid("acceptance_threshold", "must be finite");
        }
        if !self.early_exit_threshold.is_finite() {
            return invalid("early_exit_threshold", "must be finite");
        }
        if self.template_count == 0 {
            return invalid("template_count", "must be at least 1");
        }
        for (field, value) in [
            ("process_noise", self.process_noise),
            ("measurement_noise", self.measurement_noise),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(field, "must be finite and >= 0");
            }
        }
        if !self.initial_uncertainty.is_finite() || self.initial_uncertainty <= 0.0 {
            return invalid("initial_uncertainty", "must be finite and > 0");
        }
        if !(self.fallback_window_fraction > 0.0 && self.fallback_window_fraction <= 1.0) {
            return invalid("fallback_window_fraction", "must be in (0, 1]");
        }
        Ok(())
    }
}
