pub mod rest;
pub mod types;

pub use rest::TogetherRest;
pub use types::{Fundraising, FundraisingPage, FundraisingStatus};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
}

/// The platform operations the engine needs. Production uses
/// [`TogetherRest`]; tests substitute scripted sources.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one page (1-based) of currently-running fundraisings.
    async fn fundraising_page(&self, page: u32, size: u32) -> Result<FundraisingPage, ApiError>;

    /// Add a like ("sign") to a campaign.
    async fn like(&self, content_id: u64) -> Result<(), ApiError>;

    /// Post a support comment on a campaign.
    async fn comment(&self, content_id: u64, message: &str) -> Result<(), ApiError>;
}
