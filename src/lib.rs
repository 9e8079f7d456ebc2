//! Video insight: reconciles public video counters with gated channel
//! analytics, classifies how trustworthy the gated data is, and picks a
//! narrative strategy for the report.

pub mod config;
pub mod errors;
pub mod models;
pub mod reconciliation;
pub mod report;
pub mod services;
pub mod sources;
pub mod utils;
pub mod web;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use services::{AnalysisReport, AnalysisService};
