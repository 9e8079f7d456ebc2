//! Availability classification
//!
//! | Outcome | Condition | State |
//! |---|---|---|
//! | `Denied` | | `Unauthorized` |
//! | `Empty` | | `Aggregating` |
//! | `Populated` | no watch time | `Aggregating` |
//! | `Populated` | aggregated views below `ratio x` public views | `Aggregating` |
//! | `Populated` | otherwise | `Settled` |
//!
//! Low or zero watch time therefore never reaches the full analysis, where it
//! would read as poor retention instead of missing data.

use crate::config::defaults::DEFAULT_EARLY_STAGE_RATIO;
use crate::models::{AvailabilityState, BehavioralMetrics, BehavioralOutcome};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailabilityClassifier {
    early_stage_ratio: f64,
}

impl AvailabilityClassifier {
    /// Ratios outside `0.0..=1.0` are clamped; NaN falls back to the default
    pub fn new(early_stage_ratio: f64) -> Self {
        let early_stage_ratio = if early_stage_ratio.is_nan() {
            DEFAULT_EARLY_STAGE_RATIO
        } else {
            early_stage_ratio.clamp(0.0, 1.0)
        };

        Self { early_stage_ratio }
    }

    pub fn early_stage_ratio(&self) -> f64 {
        self.early_stage_ratio
    }

    pub fn classify(&self, outcome: &BehavioralOutcome, public_view_count: u64) -> AvailabilityState {
        match outcome {
            BehavioralOutcome::Denied { .. } => AvailabilityState::Unauthorized,
            BehavioralOutcome::Empty { .. } => AvailabilityState::Aggregating,
            BehavioralOutcome::Populated { metrics, .. } => {
                if metrics.watched_minutes == 0 || self.is_early_stage(metrics, public_view_count) {
                    AvailabilityState::Aggregating
                } else {
                    AvailabilityState::Settled
                }
            }
        }
    }

    /// Aggregated views still lag far behind the public counter
    pub fn is_early_stage(&self, metrics: &BehavioralMetrics, public_view_count: u64) -> bool {
        (metrics.aggregated_view_count as f64) < self.early_stage_ratio * public_view_count as f64
    }
}

impl Default for AvailabilityClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_EARLY_STAGE_RATIO)
    }
}
