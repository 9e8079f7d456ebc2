//! Reconciliation engine
//!
//! Merges the public metrics, the caller identity and the analytics outcome
//! into one [`ReconciledRecord`], deciding ownership and availability on the
//! way. [`ReconciliationEngine::reconcile`] is total: every input combination
//! yields a displayable record, and the same inputs always yield the same
//! record.
//!
//! Ownership is decided by the analytics call, not by comparing identifiers.
//! Brand and managed accounts publish under a channel that differs from the
//! login identity, so a successful analytics call (even one with no rows) is
//! the only reliable proof of access.

pub mod availability;
pub mod scenario;
pub mod window;

pub use availability::AvailabilityClassifier;
pub use scenario::{NarrativeInput, select_scenario};
pub use window::{WindowCalculator, WindowPolicy, compute_window};

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::models::{
    BehavioralMetrics, BehavioralOutcome, CallerIdentity, OwnershipState, PublicMetrics,
    ReconciledRecord,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine {
    classifier: AvailabilityClassifier,
}

impl ReconciliationEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self::with_early_stage_ratio(config.early_stage_ratio)
    }

    pub fn with_early_stage_ratio(early_stage_ratio: f64) -> Self {
        Self {
            classifier: AvailabilityClassifier::new(early_stage_ratio),
        }
    }

    pub fn reconcile(
        &self,
        public: PublicMetrics,
        caller: Option<CallerIdentity>,
        outcome: BehavioralOutcome,
    ) -> ReconciledRecord {
        let ownership_state = resolve_ownership(caller.as_ref(), &public, &outcome);
        let availability_state = self.classifier.classify(&outcome, public.view_count);
        let analysis_window = outcome.window();

        debug!(
            "Reconciled {}: ownership={} availability={}",
            public.resource_id, ownership_state, availability_state
        );

        let (behavioral, denial_detail) = match outcome {
            BehavioralOutcome::Denied { detail } => (None, Some(detail)),
            BehavioralOutcome::Empty { .. } => (Some(BehavioralMetrics::zeroed()), None),
            BehavioralOutcome::Populated { metrics, .. } => (Some(metrics), None),
        };

        ReconciledRecord::new(
            public,
            caller,
            behavioral,
            denial_detail,
            ownership_state,
            availability_state,
            analysis_window,
        )
    }
}

/// Ownership from the analytics outcome, using identity comparison only to
/// explain a denial
pub fn resolve_ownership(
    caller: Option<&CallerIdentity>,
    public: &PublicMetrics,
    outcome: &BehavioralOutcome,
) -> OwnershipState {
    match (outcome, caller) {
        (BehavioralOutcome::Empty { .. } | BehavioralOutcome::Populated { .. }, _) => {
            OwnershipState::Confirmed
        }
        (BehavioralOutcome::Denied { .. }, Some(caller))
            if caller.identity != public.owning_identity =>
        {
            OwnershipState::Mismatch
        }
        (BehavioralOutcome::Denied { .. }, _) => OwnershipState::Unknown,
    }
}
