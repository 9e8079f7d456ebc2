//! Remote collaborators
//!
//! The engine consumes three independent request/response collaborators:
//!
//! - **Metadata**: public counters for a video ([`MetadataFetcher`])
//! - **Ownership**: the caller's own channel ([`OwnershipResolver`])
//! - **Behavioral**: gated analytics for a date window ([`BehavioralFetcher`])
//!
//! [`YoutubeDataClient`] implements the first two against the YouTube Data
//! API v3, [`YoutubeAnalyticsClient`] the third against the YouTube Analytics
//! API v2.

pub mod traits;
pub mod youtube_analytics;
pub mod youtube_data;

pub use traits::*;
pub use youtube_analytics::YoutubeAnalyticsClient;
pub use youtube_data::YoutubeDataClient;
