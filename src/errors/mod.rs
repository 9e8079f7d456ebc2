//! Centralized error handling for the video insight service
//!
//! Only conditions that stop the pipeline are errors. Degradations that still
//! produce a displayable record (unknown caller identity, denied analytics)
//! are modelled as values in [`crate::models`] instead.
//!
//! # Error Categories
//!
//! - **Pipeline Errors**: invalid references and missing resources, fatal before reconciliation
//! - **Source Errors**: remote collaborator connectivity, status and parsing failures
//! - **Report Errors**: narrative generator failures, never fatal to the pipeline
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! # Usage
//!
//! ```rust
//! use video_insight::errors::{AppError, AppResult};
//!
//! fn example_function(reference: &str) -> AppResult<String> {
//!     if reference.is_empty() {
//!         return Err(AppError::invalid_reference(reference));
//!     }
//!     Ok(reference.to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for Report Results
pub type ReportResult<T> = Result<T, ReportError>;
