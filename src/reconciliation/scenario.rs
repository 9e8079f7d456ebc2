//! Narrative strategy selection
//!
//! Maps a reconciled record to a [`ScenarioTag`] and builds the matching
//! [`NarrativeInput`]. Each input variant carries only the fields its scenario
//! may talk about, so the report generator cannot reference watch time for a
//! record that has none worth reading.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    AnalysisWindow, AvailabilityState, BehavioralMetrics, OwnershipState, ReconciledRecord,
    ScenarioTag, TrafficSource,
};

pub fn select_scenario(record: &ReconciledRecord) -> ScenarioTag {
    match record.availability_state() {
        AvailabilityState::Unauthorized => ScenarioTag::UnauthorizedFallback,
        AvailabilityState::Aggregating => ScenarioTag::AggregatingFallback,
        AvailabilityState::Settled => ScenarioTag::FullAnalysis,
    }
}

/// Public facts every scenario may use
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicBrief {
    pub title: String,
    pub published_on: NaiveDate,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub ownership_state: OwnershipState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatingBrief {
    #[serde(flatten)]
    pub public: PublicBrief,
    pub window: Option<AnalysisWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullBrief {
    #[serde(flatten)]
    pub public: PublicBrief,
    pub window: Option<AnalysisWindow>,
    pub aggregated_view_count: u64,
    pub watched_minutes: u64,
    pub average_watch_seconds: f64,
    pub traffic_breakdown: Vec<TrafficSource>,
}

/// Field subset handed to the report generator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scenario", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NarrativeInput {
    UnauthorizedFallback(PublicBrief),
    AggregatingFallback(AggregatingBrief),
    FullAnalysis(FullBrief),
}

impl NarrativeInput {
    pub fn from_record(record: &ReconciledRecord) -> Self {
        let public = record.public();
        let brief = PublicBrief {
            title: public.title.clone(),
            published_on: public.publication_date(),
            view_count: public.view_count,
            like_count: public.like_count,
            comment_count: public.comment_count,
            ownership_state: record.ownership_state(),
        };

        match select_scenario(record) {
            ScenarioTag::UnauthorizedFallback => Self::UnauthorizedFallback(brief),
            ScenarioTag::AggregatingFallback => Self::AggregatingFallback(AggregatingBrief {
                public: brief,
                window: record.analysis_window(),
            }),
            ScenarioTag::FullAnalysis => {
                let metrics = record
                    .behavioral()
                    .cloned()
                    .unwrap_or_else(BehavioralMetrics::zeroed);
                Self::FullAnalysis(FullBrief {
                    public: brief,
                    window: record.analysis_window(),
                    aggregated_view_count: metrics.aggregated_view_count,
                    watched_minutes: metrics.watched_minutes,
                    average_watch_seconds: metrics.average_watch_seconds,
                    traffic_breakdown: metrics.traffic_breakdown,
                })
            }
        }
    }

    pub fn scenario(&self) -> ScenarioTag {
        match self {
            Self::UnauthorizedFallback(_) => ScenarioTag::UnauthorizedFallback,
            Self::AggregatingFallback(_) => ScenarioTag::AggregatingFallback,
            Self::FullAnalysis(_) => ScenarioTag::FullAnalysis,
        }
    }

    pub fn public(&self) -> &PublicBrief {
        match self {
            Self::UnauthorizedFallback(brief) => brief,
            Self::AggregatingFallback(brief) => &brief.public,
            Self::FullAnalysis(brief) => &brief.public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BehavioralOutcome, CallerIdentity, PublicMetrics, ResourceIdentifier};
    use crate::reconciliation::ReconciliationEngine;
    use chrono::DateTime;

    fn public(view_count: u64) -> PublicMetrics {
        PublicMetrics {
            resource_id: ResourceIdentifier::parse("dQw4w9WgXcQ").unwrap(),
            title: "Launch video".to_string(),
            owning_identity: "UC_owner".to_string(),
            published_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap(),
            view_count,
            like_count: 120,
            comment_count: 8,
            thumbnail_reference: None,
        }
    }

    fn window() -> AnalysisWindow {
        AnalysisWindow {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
        }
    }

    fn settled_outcome() -> BehavioralOutcome {
        BehavioralOutcome::Populated {
            metrics: BehavioralMetrics {
                aggregated_view_count: 9000,
                watched_minutes: 500,
                average_watch_seconds: 180.0,
                traffic_breakdown: vec![TrafficSource {
                    source_type: "YT_SEARCH".to_string(),
                    view_count: 9000,
                }],
            },
            window: window(),
        }
    }

    #[test]
    fn test_full_analysis_carries_behavioral_fields() {
        let record = ReconciliationEngine::default().reconcile(public(10_000), None, settled_outcome());
        let input = NarrativeInput::from_record(&record);

        assert_eq!(input.scenario(), ScenarioTag::FullAnalysis);
        let NarrativeInput::FullAnalysis(brief) = input else {
            panic!("expected full analysis");
        };
        assert_eq!(brief.watched_minutes, 500);
        assert_eq!(brief.traffic_breakdown.len(), 1);
        assert_eq!(brief.window, Some(window()));
    }

    #[test]
    fn test_unauthorized_fallback_omits_watch_time() {
        let caller = CallerIdentity {
            identity: "UC_someone_else".to_string(),
            display_name: "Someone".to_string(),
        };
        let record = ReconciliationEngine::default().reconcile(
            public(10_000),
            Some(caller),
            BehavioralOutcome::denied("forbidden"),
        );
        let input = NarrativeInput::from_record(&record);

        assert_eq!(input.scenario(), ScenarioTag::UnauthorizedFallback);
        assert_eq!(input.public().ownership_state, OwnershipState::Mismatch);

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["scenario"], "UNAUTHORIZED_FALLBACK");
        assert!(json.get("watched_minutes").is_none());
        assert!(json.get("traffic_breakdown").is_none());
        assert_eq!(json["view_count"], 10_000);
    }

    #[test]
    fn test_aggregating_fallback_omits_watch_time_but_keeps_window() {
        let record = ReconciliationEngine::default().reconcile(
            public(10_000),
            None,
            BehavioralOutcome::Empty { window: window() },
        );
        let input = NarrativeInput::from_record(&record);

        assert_eq!(input.scenario(), ScenarioTag::AggregatingFallback);
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("watched_minutes").is_none());
        assert!(json.get("average_watch_seconds").is_none());
        assert_eq!(json["window"]["start_date"], "2024-05-01");
    }
}
