//! Utility modules for the video insight service
//!
//! This module contains reusable utilities that can be used
//! across different parts of the system.

pub mod http_client;
pub mod url;

// Re-export commonly used types for convenience
pub use http_client::StandardHttpClient;
pub use url::UrlUtils;
