//! HTTP-level tests for the YouTube Data and Analytics clients

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;
use video_insight::{
    config::YoutubeConfig,
    errors::{AppError, SourceError},
    models::{AnalysisWindow, BehavioralOutcome, Credential, ResourceIdentifier},
    sources::{
        BehavioralFetcher, MetadataFetcher, OwnershipResolver, YoutubeAnalyticsClient,
        YoutubeDataClient,
    },
};

const VIDEO_ID: &str = "dQw4w9WgXcQ";
const HEADLINE_METRICS: &str = "views,estimatedMinutesWatched,averageViewDuration";

fn config(server: &MockServer) -> YoutubeConfig {
    YoutubeConfig {
        data_api_base_url: server.base_url(),
        analytics_api_base_url: server.base_url(),
        ..YoutubeConfig::default()
    }
}

fn video_id() -> ResourceIdentifier {
    ResourceIdentifier::parse(VIDEO_ID).unwrap()
}

fn window() -> AnalysisWindow {
    AnalysisWindow {
        start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
    }
}

#[tokio::test]
async fn fetch_public_sends_bearer_and_parses_counters() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/videos")
            .query_param("part", "snippet,statistics")
            .query_param("id", VIDEO_ID)
            .header("authorization", "Bearer user-token");
        then.status(200).json_body(json!({
            "items": [{
                "id": VIDEO_ID,
                "snippet": {
                    "title": "Launch video",
                    "channelId": "UC_owner",
                    "publishedAt": "2024-05-01T08:00:00Z",
                    "thumbnails": {
                        "default": {"url": "https://i.ytimg.com/default.jpg"},
                        "high": {"url": "https://i.ytimg.com/high.jpg"}
                    }
                },
                "statistics": {
                    "viewCount": "10500",
                    "likeCount": "320"
                }
            }]
        }));
    });

    let client = YoutubeDataClient::new(&config(&server)).unwrap();
    let public = client
        .fetch_public(&video_id(), &Credential::new("user-token"))
        .await
        .unwrap()
        .expect("video should be found");

    mock.assert();
    assert_eq!(public.title, "Launch video");
    assert_eq!(public.owning_identity, "UC_owner");
    assert_eq!(public.view_count, 10_500);
    assert_eq!(public.like_count, 320);
    assert_eq!(public.comment_count, 0);
    assert_eq!(
        public.thumbnail_reference.as_deref(),
        Some("https://i.ytimg.com/high.jpg")
    );
    assert_eq!(
        public.publication_date(),
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    );
}

#[tokio::test]
async fn fetch_public_returns_none_for_empty_items() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/videos");
        then.status(200).json_body(json!({"items": []}));
    });

    let client = YoutubeDataClient::new(&config(&server)).unwrap();
    let public = client
        .fetch_public(&video_id(), &Credential::new("user-token"))
        .await
        .unwrap();

    assert!(public.is_none());
}

#[tokio::test]
async fn fetch_public_maps_rejected_token_to_auth_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/videos");
        then.status(401).json_body(json!({
            "error": {"code": 401, "message": "Request had invalid authentication credentials."}
        }));
    });

    let client = YoutubeDataClient::new(&config(&server)).unwrap();
    let result = client
        .fetch_public(&video_id(), &Credential::new("expired"))
        .await;

    match result {
        Err(AppError::Source(SourceError::AuthenticationFailed { message, .. })) => {
            assert!(message.contains("invalid authentication credentials"));
        }
        other => panic!("expected authentication failure, got {other:?}"),
    }
}

#[tokio::test]
async fn caller_identity_comes_from_mine_channel() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/channels")
            .query_param("part", "snippet")
            .query_param("mine", "true");
        then.status(200).json_body(json!({
            "items": [{"id": "UC_owner", "snippet": {"title": "Owner Channel"}}]
        }));
    });

    let client = YoutubeDataClient::new(&config(&server)).unwrap();
    let caller = client
        .fetch_caller_identity(&Credential::new("user-token"))
        .await
        .expect("identity should resolve");

    mock.assert();
    assert_eq!(caller.identity, "UC_owner");
    assert_eq!(caller.display_name, "Owner Channel");
}

#[tokio::test]
async fn caller_identity_failure_degrades_to_unknown() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/channels");
        then.status(500).body("backend error");
    });

    let client = YoutubeDataClient::new(&config(&server)).unwrap();
    assert!(
        client
            .fetch_caller_identity(&Credential::new("user-token"))
            .await
            .is_none()
    );
}

#[tokio::test]
async fn behavioral_fetch_populates_metrics_and_traffic() {
    let server = MockServer::start();
    let headline = server.mock(|when, then| {
        when.method(GET)
            .path("/reports")
            .query_param("ids", "channel==MINE")
            .query_param("startDate", "2024-05-01")
            .query_param("endDate", "2024-05-09")
            .query_param("filters", format!("video=={VIDEO_ID}"))
            .query_param("metrics", HEADLINE_METRICS)
            .header("authorization", "Bearer user-token");
        then.status(200).json_body(json!({
            "columnHeaders": [
                {"name": "views"},
                {"name": "estimatedMinutesWatched"},
                {"name": "averageViewDuration"}
            ],
            "rows": [[9000, 512, 143.5]]
        }));
    });
    let traffic = server.mock(|when, then| {
        when.method(GET)
            .path("/reports")
            .query_param("metrics", "views")
            .query_param("dimensions", "insightTrafficSourceType")
            .query_param("sort", "-views");
        then.status(200).json_body(json!({
            "rows": [["YT_SEARCH", 6000], ["SUBSCRIBER", 2500], ["EXT_URL", 500]]
        }));
    });

    let client = YoutubeAnalyticsClient::new(&config(&server)).unwrap();
    let outcome = client
        .fetch_behavioral(&video_id(), window(), &Credential::new("user-token"))
        .await;

    headline.assert();
    traffic.assert();
    match outcome {
        BehavioralOutcome::Populated { metrics, window: w } => {
            assert_eq!(w, window());
            assert_eq!(metrics.aggregated_view_count, 9000);
            assert_eq!(metrics.watched_minutes, 512);
            assert_eq!(metrics.average_watch_seconds, 143.5);
            let order: Vec<&str> = metrics
                .traffic_breakdown
                .iter()
                .map(|source| source.source_type.as_str())
                .collect();
            assert_eq!(order, vec!["YT_SEARCH", "SUBSCRIBER", "EXT_URL"]);
        }
        other => panic!("expected populated outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn behavioral_fetch_without_rows_is_empty_and_skips_traffic() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/reports")
            .query_param("metrics", HEADLINE_METRICS);
        then.status(200).json_body(json!({"columnHeaders": []}));
    });
    let traffic = server.mock(|when, then| {
        when.method(GET)
            .path("/reports")
            .query_param("metrics", "views");
        then.status(200).json_body(json!({"rows": []}));
    });

    let client = YoutubeAnalyticsClient::new(&config(&server)).unwrap();
    let outcome = client
        .fetch_behavioral(&video_id(), window(), &Credential::new("user-token"))
        .await;

    assert_eq!(traffic.hits(), 0);
    assert!(matches!(outcome, BehavioralOutcome::Empty { .. }));
}

#[tokio::test]
async fn behavioral_fetch_forbidden_is_denied() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/reports");
        then.status(403).json_body(json!({
            "error": {"code": 403, "message": "Forbidden"}
        }));
    });

    let client = YoutubeAnalyticsClient::new(&config(&server)).unwrap();
    let outcome = client
        .fetch_behavioral(&video_id(), window(), &Credential::new("other-account"))
        .await;

    match outcome {
        BehavioralOutcome::Denied { detail } => assert!(detail.contains("Forbidden")),
        other => panic!("expected denied outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn behavioral_fetch_traffic_failure_keeps_headline_metrics() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/reports")
            .query_param("metrics", HEADLINE_METRICS);
        then.status(200).json_body(json!({"rows": [[100, 20, 60.0]]}));
    });
    let traffic = server.mock(|when, then| {
        when.method(GET)
            .path("/reports")
            .query_param("metrics", "views");
        then.status(500).body("internal");
    });

    let client = YoutubeAnalyticsClient::new(&config(&server)).unwrap();
    let outcome = client
        .fetch_behavioral(&video_id(), window(), &Credential::new("user-token"))
        .await;

    traffic.assert();
    match outcome {
        BehavioralOutcome::Populated { metrics, .. } => {
            assert_eq!(metrics.aggregated_view_count, 100);
            assert_eq!(metrics.watched_minutes, 20);
            assert!(metrics.traffic_breakdown.is_empty());
        }
        other => panic!("expected populated outcome, got {other:?}"),
    }
}
