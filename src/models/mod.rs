//! Data model shared by the fetchers, the reconciliation engine and the
//! report generator.
//!
//! Everything here is built once per request and treated as immutable
//! afterwards. The two metric feeds keep their own types so that "no
//! analytics at all" and "analytics with nothing aggregated yet" can never be
//! confused.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

pub mod credential;

pub use credential::Credential;

/// Length of a video identifier token
pub const RESOURCE_ID_LEN: usize = 11;

/// Canonical identifier of the analyzed video, used as the join key across
/// both metric feeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceIdentifier(String);

impl ResourceIdentifier {
    /// Accepts exactly one well-formed identifier token
    pub fn parse(token: &str) -> Option<Self> {
        let well_formed = token.len() == RESOURCE_ID_LEN
            && token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

        well_formed.then(|| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Low-latency counters and attributes from the public metadata feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    pub resource_id: ResourceIdentifier,
    pub title: String,
    /// Ground truth for who owns the resource
    pub owning_identity: String,
    /// Publication instant in the offset the metadata service reported
    pub published_at: DateTime<FixedOffset>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub thumbnail_reference: Option<String>,
}

impl PublicMetrics {
    /// Publication date in the source's own time zone
    pub fn publication_date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }
}

/// The authenticated principal making the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub identity: String,
    pub display_name: String,
}

/// One row of the traffic source breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSource {
    pub source_type: String,
    pub view_count: u64,
}

/// Gated, aggregation-delayed metrics from the analytics feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralMetrics {
    pub aggregated_view_count: u64,
    pub watched_minutes: u64,
    pub average_watch_seconds: f64,
    /// Ordered by descending view count, as the service returned it
    pub traffic_breakdown: Vec<TrafficSource>,
}

impl BehavioralMetrics {
    /// Metrics for a query that succeeded but returned no rows
    pub fn zeroed() -> Self {
        Self {
            aggregated_view_count: 0,
            watched_minutes: 0,
            average_watch_seconds: 0.0,
            traffic_breakdown: Vec::new(),
        }
    }
}

/// Inclusive date range used for the analytics query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AnalysisWindow {
    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Result of the analytics fetch
///
/// `Denied` covers every failure of the call itself (authorization or
/// transport). `Empty` means the call succeeded with zero rows, which is still
/// proof that the caller may read the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BehavioralOutcome {
    Denied {
        detail: String,
    },
    Empty {
        window: AnalysisWindow,
    },
    Populated {
        metrics: BehavioralMetrics,
        window: AnalysisWindow,
    },
}

impl BehavioralOutcome {
    pub fn denied<S: Into<String>>(detail: S) -> Self {
        Self::Denied {
            detail: detail.into(),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }

    pub fn window(&self) -> Option<AnalysisWindow> {
        match self {
            Self::Denied { .. } => None,
            Self::Empty { window } | Self::Populated { window, .. } => Some(*window),
        }
    }
}

/// Whether the caller owns the analyzed resource
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipState {
    /// The analytics service accepted the caller for this resource
    Confirmed,
    /// Analytics were denied and the caller's identity differs from the owner's
    Mismatch,
    /// Analytics were denied and the cause cannot be diagnosed
    Unknown,
}

/// How complete the analytics data is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityState {
    Unauthorized,
    Aggregating,
    Settled,
}

/// Narrative strategy handed to the report generator
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioTag {
    UnauthorizedFallback,
    AggregatingFallback,
    FullAnalysis,
}

/// Join of both feeds plus the derived ownership and availability states
///
/// Only the reconciliation engine constructs these; fields are read through
/// accessors so a record cannot be edited after classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRecord {
    public: PublicMetrics,
    caller: Option<CallerIdentity>,
    behavioral: Option<BehavioralMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    denial_detail: Option<String>,
    ownership_state: OwnershipState,
    availability_state: AvailabilityState,
    analysis_window: Option<AnalysisWindow>,
}

impl ReconciledRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        public: PublicMetrics,
        caller: Option<CallerIdentity>,
        behavioral: Option<BehavioralMetrics>,
        denial_detail: Option<String>,
        ownership_state: OwnershipState,
        availability_state: AvailabilityState,
        analysis_window: Option<AnalysisWindow>,
    ) -> Self {
        Self {
            public,
            caller,
            behavioral,
            denial_detail,
            ownership_state,
            availability_state,
            analysis_window,
        }
    }

    pub fn public(&self) -> &PublicMetrics {
        &self.public
    }

    pub fn caller(&self) -> Option<&CallerIdentity> {
        self.caller.as_ref()
    }

    /// `None` when the analytics call was denied, zeroed when it returned nothing
    pub fn behavioral(&self) -> Option<&BehavioralMetrics> {
        self.behavioral.as_ref()
    }

    pub fn denial_detail(&self) -> Option<&str> {
        self.denial_detail.as_deref()
    }

    pub fn ownership_state(&self) -> OwnershipState {
        self.ownership_state
    }

    pub fn availability_state(&self) -> AvailabilityState {
        self.availability_state
    }

    pub fn analysis_window(&self) -> Option<AnalysisWindow> {
        self.analysis_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_resource_identifier_parse() {
        assert!(ResourceIdentifier::parse("dQw4w9WgXcQ").is_some());
        assert!(ResourceIdentifier::parse("a-b_c-d_e-f").is_some());

        assert!(ResourceIdentifier::parse("").is_none());
        assert!(ResourceIdentifier::parse("dQw4w9WgXc").is_none()); // too short
        assert!(ResourceIdentifier::parse("dQw4w9WgXcQQ").is_none()); // too long
        assert!(ResourceIdentifier::parse("dQw4w9WgX!Q").is_none());
    }

    #[test]
    fn test_state_names_round_trip_through_strum() {
        assert_eq!(OwnershipState::Confirmed.to_string(), "CONFIRMED");
        assert_eq!(
            AvailabilityState::from_str("AGGREGATING").unwrap(),
            AvailabilityState::Aggregating
        );
        assert_eq!(
            ScenarioTag::UnauthorizedFallback.to_string(),
            "UNAUTHORIZED_FALLBACK"
        );
    }

    #[test]
    fn test_outcome_window() {
        let window = AnalysisWindow {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        };
        assert_eq!(window.days(), 7);

        assert_eq!(BehavioralOutcome::denied("403").window(), None);
        assert_eq!(BehavioralOutcome::Empty { window }.window(), Some(window));
        assert!(BehavioralOutcome::denied("403").is_denied());
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(BehavioralOutcome::denied("forbidden")).unwrap();
        assert_eq!(json["outcome"], "denied");
        assert_eq!(json["detail"], "forbidden");
    }
}
