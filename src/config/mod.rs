use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub mod defaults;
pub mod duration_serde;

use crate::errors::{AppError, AppResult};
use crate::reconciliation::window::WindowPolicy;
use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub youtube: YoutubeConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub web: WebConfig,
}

/// Endpoints and timeouts for the metadata and analytics services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    #[serde(default = "default_data_api_base_url")]
    pub data_api_base_url: String,
    #[serde(default = "default_analytics_api_base_url")]
    pub analytics_api_base_url: String,
    /// Total request timeout per call
    #[serde(default = "default_request_timeout", with = "duration_serde::duration")]
    pub request_timeout: Duration,
    #[serde(default = "default_connect_timeout", with = "duration_serde::duration")]
    pub connect_timeout: Duration,
}

/// Tunables for reconciliation and the analytics query window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Aggregated/public view ratio below which data is still settling (0.0-1.0)
    #[serde(default = "default_early_stage_ratio")]
    pub early_stage_ratio: f64,
    /// Where the analytics window ends relative to the evaluation date
    #[serde(default)]
    pub window_policy: WindowPolicy,
    /// IANA time zone that defines "today" for the window
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Narrative generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_enabled")]
    pub enabled: bool,
    #[serde(default = "default_report_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_report_model")]
    pub model: String,
    /// Overridden by the GEMINI_API_KEY environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Language the narrative is written in
    #[serde(default = "default_report_language")]
    pub language: String,
    #[serde(default = "default_report_timeout", with = "duration_serde::duration")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// YouTube defaults
fn default_data_api_base_url() -> String {
    DEFAULT_DATA_API_BASE_URL.to_string()
}

fn default_analytics_api_base_url() -> String {
    DEFAULT_ANALYTICS_API_BASE_URL.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECONDS)
}

// Analysis defaults
fn default_early_stage_ratio() -> f64 {
    DEFAULT_EARLY_STAGE_RATIO
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

// Report defaults
fn default_report_enabled() -> bool {
    DEFAULT_REPORT_ENABLED
}

fn default_report_api_base_url() -> String {
    DEFAULT_REPORT_API_BASE_URL.to_string()
}

fn default_report_model() -> String {
    DEFAULT_REPORT_MODEL.to_string()
}

fn default_report_language() -> String {
    DEFAULT_REPORT_LANGUAGE.to_string()
}

fn default_report_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REPORT_TIMEOUT_SECONDS)
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            data_api_base_url: default_data_api_base_url(),
            analytics_api_base_url: default_analytics_api_base_url(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            early_stage_ratio: default_early_stage_ratio(),
            window_policy: WindowPolicy::default(),
            timezone: default_timezone(),
        }
    }
}

impl AnalysisConfig {
    /// Parsed form of `timezone`
    pub fn timezone(&self) -> AppResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            AppError::configuration(format!("Unknown timezone '{}'", self.timezone))
        })
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: default_report_enabled(),
            api_base_url: default_report_api_base_url(),
            model: default_report_model(),
            api_key: None,
            language: default_report_language(),
            request_timeout: default_report_timeout(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Secrets may come from the environment instead of the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(REPORT_API_KEY_ENV) {
            if !api_key.trim().is_empty() {
                debug!("Using report API key from {}", REPORT_API_KEY_ENV);
                self.report.api_key = Some(api_key);
            }
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let ratio = self.analysis.early_stage_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(AppError::configuration(format!(
                "analysis.early_stage_ratio must be between 0.0 and 1.0, got {ratio}"
            )));
        }

        self.analysis.timezone()?;

        if self.web.port == 0 {
            return Err(AppError::configuration("web.port must not be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.early_stage_ratio, 0.10);
        assert_eq!(config.analysis.window_policy, WindowPolicy::ShiftToYesterday);
        assert_eq!(config.analysis.timezone().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            early_stage_ratio = 0.25
            window_policy = "through_today"
            timezone = "Asia/Seoul"

            [report]
            language = "Korean"
            request_timeout = "2m"
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.early_stage_ratio, 0.25);
        assert_eq!(config.analysis.window_policy, WindowPolicy::ThroughToday);
        assert_eq!(config.analysis.timezone().unwrap(), chrono_tz::Asia::Seoul);
        assert_eq!(config.report.language, "Korean");
        assert_eq!(config.report.request_timeout, Duration::from_secs(120));
        assert_eq!(config.youtube.data_api_base_url, DEFAULT_DATA_API_BASE_URL);
        assert_eq!(config.web.port, DEFAULT_PORT);
    }

    #[test]
    fn test_out_of_range_ratio_is_rejected() {
        let mut config = Config::default();
        config.analysis.early_stage_ratio = 1.5;
        assert!(matches!(
            config.validate(),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let mut config = Config::default();
        config.analysis.timezone = "Mars/Olympus_Mons".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.youtube.request_timeout, Duration::from_secs(30));
        assert_eq!(parsed.report.model, DEFAULT_REPORT_MODEL);
        assert!(parsed.report.api_key.is_none());
    }
}
