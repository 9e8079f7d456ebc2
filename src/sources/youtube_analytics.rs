//! YouTube Analytics API v2 client
//!
//! Issues two `reports.query` calls per request: headline metrics, then the
//! traffic source breakdown. A failed headline call is reported as
//! [`BehavioralOutcome::Denied`]. Once the headline call has succeeded the
//! caller is authorized, so a failed traffic call only drops the breakdown.
//! Nothing is retried.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::BehavioralFetcher;
use crate::config::YoutubeConfig;
use crate::errors::{AppResult, SourceResult};
use crate::models::{
    AnalysisWindow, BehavioralMetrics, BehavioralOutcome, Credential, ResourceIdentifier,
    TrafficSource,
};
use crate::utils::StandardHttpClient;

const SERVICE: &str = "youtube_analytics";
const DATE_FORMAT: &str = "%Y-%m-%d";
const HEADLINE_METRICS: &str = "views,estimatedMinutesWatched,averageViewDuration";
const TRAFFIC_DIMENSION: &str = "insightTrafficSourceType";

pub struct YoutubeAnalyticsClient {
    http_client: StandardHttpClient,
    base_url: String,
}

/// Optional parts of a report query
#[derive(Debug, Default)]
struct ReportQuery<'a> {
    dimensions: Option<&'a str>,
    sort: Option<&'a str>,
}

impl YoutubeAnalyticsClient {
    pub fn new(config: &YoutubeConfig) -> AppResult<Self> {
        let http_client =
            StandardHttpClient::new(SERVICE, config.request_timeout, config.connect_timeout)?;

        Ok(Self {
            http_client,
            base_url: config.analytics_api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn query_report(
        &self,
        resource_id: &ResourceIdentifier,
        window: AnalysisWindow,
        metrics: &str,
        extra: ReportQuery<'_>,
        credential: &Credential,
    ) -> SourceResult<ReportResponse> {
        let start_date = window.start_date.format(DATE_FORMAT).to_string();
        let end_date = window.end_date.format(DATE_FORMAT).to_string();
        let filters = format!("video=={resource_id}");

        let mut query = vec![
            ("ids", "channel==MINE"),
            ("startDate", start_date.as_str()),
            ("endDate", end_date.as_str()),
            ("metrics", metrics),
            ("filters", filters.as_str()),
        ];
        if let Some(dimensions) = extra.dimensions {
            query.push(("dimensions", dimensions));
        }
        if let Some(sort) = extra.sort {
            query.push(("sort", sort));
        }

        self.http_client
            .get_json(&format!("{}/reports", self.base_url), &query, credential)
            .await
    }
}

#[async_trait]
impl BehavioralFetcher for YoutubeAnalyticsClient {
    async fn fetch_behavioral(
        &self,
        resource_id: &ResourceIdentifier,
        window: AnalysisWindow,
        credential: &Credential,
    ) -> BehavioralOutcome {
        debug!(
            "Querying analytics for {} from {} to {}",
            resource_id, window.start_date, window.end_date
        );

        let headline = match self
            .query_report(
                resource_id,
                window,
                HEADLINE_METRICS,
                ReportQuery::default(),
                credential,
            )
            .await
        {
            Ok(report) => report,
            Err(e) => {
                warn!("Analytics headline query denied for {}: {}", resource_id, e);
                return BehavioralOutcome::denied(e.to_string());
            }
        };

        if headline.rows.is_empty() {
            debug!("Analytics returned no rows for {}", resource_id);
            return BehavioralOutcome::Empty { window };
        }

        let traffic = match self
            .query_report(
                resource_id,
                window,
                "views",
                ReportQuery {
                    dimensions: Some(TRAFFIC_DIMENSION),
                    sort: Some("-views"),
                },
                credential,
            )
            .await
        {
            Ok(report) => report,
            Err(e) => {
                warn!(
                    "Analytics traffic query failed for {}, continuing without breakdown: {}",
                    resource_id, e
                );
                ReportResponse::default()
            }
        };

        interpret_reports(&headline, &traffic, window)
    }
}

/// Raw `reports.query` response; rows are positional per the requested metrics
#[derive(Debug, Default, Deserialize)]
struct ReportResponse {
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

fn interpret_reports(
    headline: &ReportResponse,
    traffic: &ReportResponse,
    window: AnalysisWindow,
) -> BehavioralOutcome {
    let Some(row) = headline.rows.first() else {
        return BehavioralOutcome::Empty { window };
    };

    let traffic_breakdown = traffic
        .rows
        .iter()
        .filter_map(|row| {
            let source_type = row.first()?.as_str()?.to_string();
            Some(TrafficSource {
                source_type,
                view_count: count_at(row, 1),
            })
        })
        .collect();

    BehavioralOutcome::Populated {
        metrics: BehavioralMetrics {
            aggregated_view_count: count_at(row, 0),
            watched_minutes: count_at(row, 1),
            average_watch_seconds: number_at(row, 2),
            traffic_breakdown,
        },
        window,
    }
}

fn number_at(row: &[Value], index: usize) -> f64 {
    row.get(index)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .unwrap_or(0.0)
}

fn count_at(row: &[Value], index: usize) -> u64 {
    number_at(row, index).round() as u64
}
