// src/services/mod.rs

//! Service layer: the network collaborators of the claim core.
//!
//! - Page fetching (`ChannelFetcher`)
//! - Code redemption (`GiftClaimClient`)

mod channel;
mod claim;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ClaimReply;

pub use channel::ChannelFetcher;
pub use claim::GiftClaimClient;

/// Source of the latest text snapshot of the watched resource.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Return the latest message text; empty when there is none.
    async fn fetch_latest(&self) -> Result<String>;
}

/// Remote redeem endpoint.
#[async_trait]
pub trait ClaimApi: Send + Sync {
    /// Redeem `code`.
    ///
    /// HTTP status failures come back as the matching [`crate::error::AppError`]
    /// variant; a decoded body is always a [`ClaimReply`].
    async fn redeem(&self, code: &str) -> Result<ClaimReply>;
}
