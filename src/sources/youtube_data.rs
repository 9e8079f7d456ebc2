//! YouTube Data API v3 client
//!
//! Provides the metadata fetcher (`videos.list`) and the ownership resolver
//! (`channels.list?mine=true`).

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::traits::{MetadataFetcher, OwnershipResolver};
use crate::config::YoutubeConfig;
use crate::errors::{AppResult, SourceError, SourceResult};
use crate::models::{CallerIdentity, Credential, PublicMetrics, ResourceIdentifier};
use crate::utils::StandardHttpClient;

const SERVICE: &str = "youtube_data";

/// Thumbnail sizes in order of preference
const THUMBNAIL_PREFERENCE: [&str; 3] = ["high", "medium", "default"];

pub struct YoutubeDataClient {
    http_client: StandardHttpClient,
    base_url: String,
}

impl YoutubeDataClient {
    pub fn new(config: &YoutubeConfig) -> AppResult<Self> {
        let http_client =
            StandardHttpClient::new(SERVICE, config.request_timeout, config.connect_timeout)?;

        Ok(Self {
            http_client,
            base_url: config.data_api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    async fn list_mine_channels(
        &self,
        credential: &Credential,
    ) -> SourceResult<ListResponse<ChannelResource>> {
        self.http_client
            .get_json(
                &self.endpoint("channels"),
                &[("part", "snippet"), ("mine", "true")],
                credential,
            )
            .await
    }
}

#[async_trait]
impl MetadataFetcher for YoutubeDataClient {
    async fn fetch_public(
        &self,
        resource_id: &ResourceIdentifier,
        credential: &Credential,
    ) -> AppResult<Option<PublicMetrics>> {
        debug!("Fetching public metrics for {}", resource_id);

        let response: ListResponse<VideoResource> = self
            .http_client
            .get_json(
                &self.endpoint("videos"),
                &[("part", "snippet,statistics"), ("id", resource_id.as_str())],
                credential,
            )
            .await?;

        let Some(video) = response.items.into_iter().next() else {
            info!("Video {} not found in metadata service", resource_id);
            return Ok(None);
        };

        Ok(Some(to_public_metrics(resource_id, video)?))
    }
}

#[async_trait]
impl OwnershipResolver for YoutubeDataClient {
    async fn fetch_caller_identity(&self, credential: &Credential) -> Option<CallerIdentity> {
        match self.list_mine_channels(credential).await {
            Ok(response) => {
                let identity = response.items.into_iter().next().map(|channel| {
                    CallerIdentity {
                        display_name: channel
                            .snippet
                            .map(|snippet| snippet.title)
                            .unwrap_or_default(),
                        identity: channel.id,
                    }
                });
                if identity.is_none() {
                    warn!("Caller has no channel; ownership comparison unavailable");
                }
                identity
            }
            Err(e) => {
                warn!("Caller identity lookup failed: {}", e);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_id: String,
    published_at: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Counters arrive as decimal strings and are omitted when hidden by the owner
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelResource {
    id: String,
    snippet: Option<ChannelSnippet>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

fn to_public_metrics(
    resource_id: &ResourceIdentifier,
    video: VideoResource,
) -> SourceResult<PublicMetrics> {
    let published_at = DateTime::parse_from_rfc3339(&video.snippet.published_at).map_err(|e| {
        SourceError::parse(
            SERVICE,
            format!(
                "invalid publishedAt '{}': {e}",
                video.snippet.published_at
            ),
        )
    })?;

    let thumbnail_reference = THUMBNAIL_PREFERENCE
        .iter()
        .find_map(|size| video.snippet.thumbnails.get(*size))
        .map(|thumbnail| thumbnail.url.clone());

    Ok(PublicMetrics {
        resource_id: resource_id.clone(),
        title: video.snippet.title,
        owning_identity: video.snippet.channel_id,
        published_at,
        view_count: parse_counter("viewCount", video.statistics.view_count.as_deref()),
        like_count: parse_counter("likeCount", video.statistics.like_count.as_deref()),
        comment_count: parse_counter("commentCount", video.statistics.comment_count.as_deref()),
        thumbnail_reference,
    })
}

fn parse_counter(name: &str, value: Option<&str>) -> u64 {
    match value {
        None => 0,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {} '{}'", name, raw);
            0
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id() -> ResourceIdentifier {
        ResourceIdentifier::parse("dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_to_public_metrics_full_item() {
        let video: VideoResource = serde_json::from_value(json!({
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "title": "Launch video",
                "channelId": "UC_owner",
                "publishedAt": "2024-05-02T09:30:00Z",
                "thumbnails": {
                    "default": {"url": "https://i.ytimg.com/default.jpg"},
                    "high": {"url": "https://i.ytimg.com/high.jpg"}
                }
            },
            "statistics": {
                "viewCount": "10000",
                "likeCount": "420",
                "commentCount": "37"
            }
        }))
        .unwrap();

        let metrics = to_public_metrics(&id(), video).unwrap();
        assert_eq!(metrics.title, "Launch video");
        assert_eq!(metrics.owning_identity, "UC_owner");
        assert_eq!(metrics.view_count, 10_000);
        assert_eq!(metrics.like_count, 420);
        assert_eq!(metrics.comment_count, 37);
        assert_eq!(
            metrics.thumbnail_reference.as_deref(),
            Some("https://i.ytimg.com/high.jpg")
        );
        assert_eq!(metrics.publication_date().to_string(), "2024-05-02");
    }

    #[test]
    fn test_hidden_counters_default_to_zero() {
        let video: VideoResource = serde_json::from_value(json!({
            "snippet": {
                "title": "Quiet video",
                "channelId": "UC_owner",
                "publishedAt": "2024-05-02T23:30:00-07:00"
            },
            "statistics": {"viewCount": "12"}
        }))
        .unwrap();

        let metrics = to_public_metrics(&id(), video).unwrap();
        assert_eq!(metrics.view_count, 12);
        assert_eq!(metrics.like_count, 0);
        assert_eq!(metrics.comment_count, 0);
        assert!(metrics.thumbnail_reference.is_none());
        // Date component is taken in the source's own offset
        assert_eq!(metrics.publication_date().to_string(), "2024-05-02");
    }

    #[test]
    fn test_invalid_publication_timestamp_is_a_parse_error() {
        let video: VideoResource = serde_json::from_value(json!({
            "snippet": {
                "title": "Broken",
                "channelId": "UC_owner",
                "publishedAt": "yesterday"
            }
        }))
        .unwrap();

        assert!(matches!(
            to_public_metrics(&id(), video),
            Err(SourceError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("viewCount", Some("123")), 123);
        assert_eq!(parse_counter("viewCount", Some("n/a")), 0);
        assert_eq!(parse_counter("viewCount", None), 0);
    }
}
