use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppResult, SourceError, SourceResult};
use crate::models::Credential;
use crate::utils::url::UrlUtils;

/// JSON-over-HTTP client shared by the remote collaborators
///
/// Sends the caller's credential as a bearer token and maps non-success
/// statuses onto [`SourceError`]. Never retries.
#[derive(Clone)]
pub struct StandardHttpClient {
    client: Client,
    service: String,
}

impl StandardHttpClient {
    /// Create a client with a total request timeout and a connection timeout
    pub fn new<S: Into<String>>(
        service: S,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            client,
            service: service.into(),
        })
    }

    /// GET `url` with `query` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        credential: &Credential,
    ) -> SourceResult<T> {
        debug!(
            "Fetching JSON from {}: {}",
            self.service,
            UrlUtils::obfuscate_credentials(url)
        );

        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(credential.bearer_token())
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        self.decode_json(response).await
    }

    async fn decode_json<T: DeserializeOwned>(&self, response: Response) -> SourceResult<T> {
        let status = response.status();
        let body = response.text().await.map_err(|e| SourceError::Transport {
            service: self.service.clone(),
            message: UrlUtils::obfuscate_credentials(&format!("Failed to read response: {e}")),
        })?;

        if !status.is_success() {
            let message = UrlUtils::obfuscate_credentials(&google_error_message(&body));
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    SourceError::auth_failed(&self.service, message)
                }
                _ => SourceError::Http {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        debug!("Fetched {} bytes from {}", body.len(), self.service);

        serde_json::from_str(&body).map_err(|e| SourceError::parse(&self.service, e.to_string()))
    }

    fn transport_error(&self, url: &str, error: reqwest::Error) -> SourceError {
        if error.is_timeout() {
            return SourceError::Timeout {
                url: UrlUtils::obfuscate_credentials(url),
            };
        }

        SourceError::Transport {
            service: self.service.clone(),
            message: UrlUtils::obfuscate_credentials(&error.to_string()),
        }
    }
}

/// Pull `error.message` out of a Google API error body, falling back to the raw body
pub fn google_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.chars().take(500).collect()
            }
        })
}
