//! News sources: anything that can produce a batch of [`NewsItem`]s.
//!
//! # Supported Sources
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Usenet group | [`nntp`] | `GROUP` / `OVER` / `BODY` over NNTP |
//! | Web page | [`web`] | Regex title/body extraction from fetched HTML |
//!
//! A source's configuration is fixed when it is built. Each call to
//! [`Source::fetch_items`] performs the whole retrieval again from scratch
//! and returns every item it found, in production order.

pub mod nntp;
pub mod web;

use crate::error::Result;
use crate::models::NewsItem;
use async_trait::async_trait;

pub use nntp::NntpGroupSource;
pub use web::PatternWebSource;

#[async_trait]
pub trait Source: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> String;

    /// Retrieve every item this source currently offers.
    ///
    /// Any connection, protocol, or decoding failure aborts the retrieval and
    /// is returned as-is; no partial batch is produced.
    async fn fetch_items(&self) -> Result<Vec<NewsItem>>;
}
