//! URL utilities: resource identifier extraction and credential redaction
//!
//! Both functions are pure and never touch the network.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::models::ResourceIdentifier;

/// Identifier token after `v=` or a `/`, followed by a non-token character or the end
static REFERENCE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]v=|/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)")
        .expect("reference token pattern is valid")
});

static BEARER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._~+/=-]+").expect("bearer pattern is valid")
});

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Extract the video identifier from a user-supplied reference
    ///
    /// Recognizes the query parameter form (`watch?v=<id>`), the path segment
    /// form (`youtu.be/<id>`, `/shorts/<id>`, `/embed/<id>`, `/live/<id>`) and
    /// a bare identifier. Returns `None` when nothing matches.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use video_insight::utils::url::UrlUtils;
    ///
    /// let id = UrlUtils::extract_resource_id("https://youtu.be/dQw4w9WgXcQ?t=42").unwrap();
    /// assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    /// assert!(UrlUtils::extract_resource_id("https://example.com/").is_none());
    /// ```
    pub fn extract_resource_id(reference: &str) -> Option<ResourceIdentifier> {
        let trimmed = reference.trim();

        if let Some(id) = ResourceIdentifier::parse(trimmed) {
            return Some(id);
        }

        REFERENCE_TOKEN
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .and_then(|m| ResourceIdentifier::parse(m.as_str()))
    }

    /// Mask credentials embedded in a URL or error message
    ///
    /// Covers URL userinfo, API key and token query parameters, and bearer
    /// tokens quoted in response bodies.
    ///
    /// ```rust
    /// use video_insight::utils::url::UrlUtils;
    ///
    /// let masked = UrlUtils::obfuscate_credentials("https://api.example.com/v1?key=secret&alt=json");
    /// assert_eq!(masked, "https://api.example.com/v1?key=****&alt=json");
    /// ```
    pub fn obfuscate_credentials(text: &str) -> String {
        let mut obfuscated = text.to_string();

        if let Ok(parsed) = Url::parse(text) {
            if !parsed.username().is_empty() || parsed.password().is_some() {
                let mut new_url = parsed.clone();
                let _ = new_url.set_username("****");
                let _ = new_url.set_password(Some("****"));
                obfuscated = new_url.to_string();
            }
        }

        let sensitive_params = ["key", "api_key", "access_token", "token", "password"];

        for param in &sensitive_params {
            let pattern = format!(r"(?i)([?&]{}=)[^&\s]*", regex::escape(param));
            if let Ok(re) = Regex::new(&pattern) {
                obfuscated = re.replace_all(&obfuscated, "${1}****").to_string();
            }
        }

        BEARER_TOKEN.replace_all(&obfuscated, "${1}****").to_string()
    }
}
