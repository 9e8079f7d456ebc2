//! Gemini `generateContent` report generator

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::ReportGenerator;
use super::prompt::build_prompt;
use crate::config::ReportConfig;
use crate::errors::{ReportError, ReportResult};
use crate::reconciliation::NarrativeInput;
use crate::utils::url::UrlUtils;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiReportGenerator {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    language: String,
}

impl GeminiReportGenerator {
    pub fn new(config: &ReportConfig) -> ReportResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ReportError::MissingApiKey)?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            language: config.language.clone(),
        })
    }

    fn generate_content_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl ReportGenerator for GeminiReportGenerator {
    async fn generate(&self, input: &NarrativeInput) -> ReportResult<String> {
        let prompt = build_prompt(input, &self.language);
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });

        debug!(
            "Requesting {} narrative from model {}",
            input.scenario(),
            self.model
        );

        let response = self
            .client
            .post(self.generate_content_url())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let raw = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(ReportError::Http {
                status: status.as_u16(),
                body: UrlUtils::obfuscate_credentials(&raw),
            });
        }

        parse_generate_content_response(&raw)
    }
}

/// reqwest renders the request URL into its errors; strip it before logging
fn transport_error(error: reqwest::Error) -> ReportError {
    ReportError::Transport(error.without_url())
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn parse_generate_content_response(raw: &str) -> ReportResult<String> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(raw).map_err(|_| ReportError::EmptyResponse)?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ReportError::EmptyResponse);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let config = ReportConfig::default();
        assert!(matches!(
            GeminiReportGenerator::new(&config),
            Err(ReportError::MissingApiKey)
        ));

        let blank = ReportConfig {
            api_key: Some("  ".to_string()),
            ..ReportConfig::default()
        };
        assert!(matches!(
            GeminiReportGenerator::new(&blank),
            Err(ReportError::MissingApiKey)
        ));
    }

    #[test]
    fn test_generate_content_url() {
        let config = ReportConfig {
            api_key: Some("k".to_string()),
            api_base_url: "https://example.com/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..ReportConfig::default()
        };
        let generator = GeminiReportGenerator::new(&config).unwrap();
        assert_eq!(
            generator.generate_content_url(),
            "https://example.com/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_parse_joins_text_parts() {
        let raw = r###"{"candidates":[{"content":{"parts":[{"text":"## Plan\n"},{"text":"Post shorts."}]}}]}"###;
        assert_eq!(
            parse_generate_content_response(raw).unwrap(),
            "## Plan\nPost shorts."
        );
    }

    #[test]
    fn test_parse_rejects_empty_candidates() {
        assert!(matches!(
            parse_generate_content_response(r#"{"candidates":[]}"#),
            Err(ReportError::EmptyResponse)
        ));
        assert!(matches!(
            parse_generate_content_response("not json"),
            Err(ReportError::EmptyResponse)
        ));
    }
}
