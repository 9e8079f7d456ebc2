//! Analysis pipeline
//!
//! identifier -> metadata (concurrently with ownership) -> analytics window ->
//! behavioral fetch -> reconciliation -> scenario -> narrative. Data only
//! flows forward; no stage calls back into an earlier one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::{AppError, AppResult, ReportError};
use crate::models::{Credential, ReconciledRecord, ResourceIdentifier, ScenarioTag};
use crate::reconciliation::{NarrativeInput, ReconciliationEngine, WindowCalculator, select_scenario};
use crate::report::{ANALYSIS_UNAVAILABLE, ReportGenerator, build_report_generator};
use crate::sources::{
    BehavioralFetcher, MetadataFetcher, OwnershipResolver, YoutubeAnalyticsClient,
    YoutubeDataClient,
};
use crate::utils::UrlUtils;

/// Result of one analysis request
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub resource_id: ResourceIdentifier,
    pub scenario: ScenarioTag,
    pub record: ReconciledRecord,
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_error: Option<String>,
}

/// Remote collaborators the pipeline depends on
#[derive(Clone)]
pub struct Collaborators {
    pub metadata: Arc<dyn MetadataFetcher>,
    pub ownership: Arc<dyn OwnershipResolver>,
    pub behavioral: Arc<dyn BehavioralFetcher>,
    pub reports: Arc<dyn ReportGenerator>,
}

#[derive(Clone)]
pub struct AnalysisService {
    collaborators: Collaborators,
    engine: ReconciliationEngine,
    window: WindowCalculator,
}

impl AnalysisService {
    pub fn new(
        collaborators: Collaborators,
        engine: ReconciliationEngine,
        window: WindowCalculator,
    ) -> Self {
        Self {
            collaborators,
            engine,
            window,
        }
    }

    /// Wire the YouTube and Gemini clients from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let data_client = Arc::new(YoutubeDataClient::new(&config.youtube)?);
        let analytics_client = Arc::new(YoutubeAnalyticsClient::new(&config.youtube)?);

        let collaborators = Collaborators {
            metadata: data_client.clone(),
            ownership: data_client,
            behavioral: analytics_client,
            reports: build_report_generator(&config.report),
        };

        let window = WindowCalculator::new(
            config.analysis.window_policy,
            config.analysis.timezone()?,
        );

        Ok(Self::new(
            collaborators,
            ReconciliationEngine::new(&config.analysis),
            window,
        ))
    }

    pub async fn analyze(&self, reference: &str, credential: &Credential) -> AppResult<AnalysisReport> {
        self.analyze_at(reference, credential, Utc::now()).await
    }

    /// Run the pipeline with `now` as the evaluation instant
    pub async fn analyze_at(
        &self,
        reference: &str,
        credential: &Credential,
        now: DateTime<Utc>,
    ) -> AppResult<AnalysisReport> {
        let resource_id = UrlUtils::extract_resource_id(reference)
            .ok_or_else(|| AppError::invalid_reference(reference))?;

        if credential.is_empty() {
            return Err(AppError::validation("An access token is required"));
        }

        info!("Analyzing video {}", resource_id);

        let (public, caller) = tokio::join!(
            self.collaborators
                .metadata
                .fetch_public(&resource_id, credential),
            self.collaborators.ownership.fetch_caller_identity(credential),
        );

        let public =
            public?.ok_or_else(|| AppError::resource_not_found(resource_id.as_str()))?;

        if caller.is_none() {
            warn!("Caller identity unknown for {}", resource_id);
        }

        let window = self.window.window_for(public.publication_date(), now);
        debug!(
            "Analytics window for {}: {} to {}",
            resource_id, window.start_date, window.end_date
        );

        let outcome = self
            .collaborators
            .behavioral
            .fetch_behavioral(&resource_id, window, credential)
            .await;

        let record = self.engine.reconcile(public, caller, outcome);
        let scenario = select_scenario(&record);

        info!(
            resource_id = %resource_id,
            ownership_state = %record.ownership_state(),
            availability_state = %record.availability_state(),
            scenario = %scenario,
            "Video classified"
        );

        let input = NarrativeInput::from_record(&record);
        let (narrative, narrative_error) = match self.collaborators.reports.generate(&input).await {
            Ok(text) => (Some(text), None),
            Err(ReportError::Disabled) => {
                debug!("Narrative skipped: report generation disabled");
                (None, Some(ANALYSIS_UNAVAILABLE.to_string()))
            }
            Err(e) => {
                warn!("Narrative generation failed for {}: {}", resource_id, e);
                (None, Some(ANALYSIS_UNAVAILABLE.to_string()))
            }
        };

        Ok(AnalysisReport {
            resource_id,
            scenario,
            record,
            narrative,
            narrative_error,
        })
    }
}
