//! Collaborator trait definitions
//!
//! One trait per remote collaborator, so each can be replaced or mocked on its
//! own. Every call takes the caller's [`Credential`] explicitly; no fetcher
//! holds session state.

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{
    AnalysisWindow, BehavioralOutcome, CallerIdentity, Credential, PublicMetrics,
    ResourceIdentifier,
};

/// Public, low-latency attributes and counters for a resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// `Ok(None)` when the service does not know the resource
    async fn fetch_public(
        &self,
        resource_id: &ResourceIdentifier,
        credential: &Credential,
    ) -> AppResult<Option<PublicMetrics>>;
}

/// The authenticated caller's own identity
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipResolver: Send + Sync {
    /// `None` when the lookup fails for any reason; never an error
    async fn fetch_caller_identity(&self, credential: &Credential) -> Option<CallerIdentity>;
}

/// Gated behavioral metrics scoped to the caller's authorization
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BehavioralFetcher: Send + Sync {
    /// Failures are folded into [`BehavioralOutcome::Denied`]; never an error
    async fn fetch_behavioral(
        &self,
        resource_id: &ResourceIdentifier,
        window: AnalysisWindow,
        credential: &Credential,
    ) -> BehavioralOutcome;
}
