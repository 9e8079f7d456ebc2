//! Service layer
//!
//! Orchestrates the collaborators and the reconciliation engine. Outer
//! surfaces (CLI, HTTP) only talk to this layer.

pub mod analysis;

pub use analysis::{AnalysisReport, AnalysisService, Collaborators};
