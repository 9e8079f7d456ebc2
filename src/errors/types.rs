//! Error type definitions for the video insight service

use thiserror::Error;

/// Top-level application error type
///
/// Every variant here aborts the request it occurs in. The reconciliation
/// engine itself never produces one of these.
#[derive(Error, Debug)]
pub enum AppError {
    /// The supplied reference string contains no recognizable resource identifier
    #[error("Invalid reference: no video identifier found in '{reference}'")]
    InvalidReference { reference: String },

    /// The metadata service does not know the resource
    #[error("Resource not found: {resource_id}")]
    ResourceNotFound { resource_id: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Remote collaborator errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Remote collaborator specific errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network connection timeouts
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// The service rejected the credential
    #[error("Authentication failed: {service} - {message}")]
    AuthenticationFailed { service: String, message: String },

    /// The response body did not have the expected shape
    #[error("Parse error: {service} - {message}")]
    ParseError { service: String, message: String },

    /// Non-success HTTP status from a remote service
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response
    #[error("Transport error: {service} - {message}")]
    Transport { service: String, message: String },
}

/// Narrative generator errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Report generation is switched off in configuration
    #[error("report generation is disabled")]
    Disabled,

    /// No API key configured for the generator
    #[error("report generator API key is not configured")]
    MissingApiKey,

    /// Non-success HTTP status from the generator
    #[error("report generator returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The generator answered without any text
    #[error("report generator returned no text")]
    EmptyResponse,

    /// Transport level failure
    #[error("report generator transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create an invalid reference error
    pub fn invalid_reference<S: Into<String>>(reference: S) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
        }
    }

    /// Create a resource not found error
    pub fn resource_not_found<S: Into<String>>(resource_id: S) -> Self {
        Self::ResourceNotFound {
            resource_id: resource_id.into(),
        }
    }

    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create an authentication failed error
    pub fn auth_failed<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::AuthenticationFailed {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ParseError {
            service: service.into(),
            message: message.into(),
        }
    }
}
