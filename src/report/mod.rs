//! Narrative report generation
//!
//! The generator receives a [`NarrativeInput`], never the full record, and
//! returns Markdown prose. Its failures stay out of the reconciliation path:
//! the pipeline reports them as an unavailable narrative.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::errors::{ReportError, ReportResult};
use crate::reconciliation::NarrativeInput;

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiReportGenerator;

/// Message shown whenever a narrative cannot be produced
pub const ANALYSIS_UNAVAILABLE: &str = "analysis unavailable";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, input: &NarrativeInput) -> ReportResult<String>;
}

/// Generator used when narratives are switched off or cannot be configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledReportGenerator;

#[async_trait]
impl ReportGenerator for DisabledReportGenerator {
    async fn generate(&self, _input: &NarrativeInput) -> ReportResult<String> {
        Err(ReportError::Disabled)
    }
}

/// Build the configured generator, degrading to [`DisabledReportGenerator`]
pub fn build_report_generator(config: &ReportConfig) -> Arc<dyn ReportGenerator> {
    if !config.enabled {
        info!("Report generation disabled by configuration");
        return Arc::new(DisabledReportGenerator);
    }

    match GeminiReportGenerator::new(config) {
        Ok(generator) => {
            info!("Report generation using model {}", config.model);
            Arc::new(generator)
        }
        Err(e) => {
            warn!("Report generation unavailable: {}", e);
            Arc::new(DisabledReportGenerator)
        }
    }
}
