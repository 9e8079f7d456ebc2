/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Remote service defaults
pub const DEFAULT_DATA_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_ANALYTICS_API_BASE_URL: &str = "https://youtubeanalytics.googleapis.com/v2";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 10;

// Analysis defaults
/// Aggregated views below this share of public views count as still aggregating
pub const DEFAULT_EARLY_STAGE_RATIO: f64 = 0.10;
pub const DEFAULT_TIMEZONE: &str = "UTC";

// Report generator defaults
pub const DEFAULT_REPORT_ENABLED: bool = true;
pub const DEFAULT_REPORT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REPORT_MODEL: &str = "gemini-1.5-pro-latest";
pub const DEFAULT_REPORT_LANGUAGE: &str = "English";
pub const DEFAULT_REPORT_TIMEOUT_SECONDS: u64 = 60;
pub const REPORT_API_KEY_ENV: &str = "GEMINI_API_KEY";

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
