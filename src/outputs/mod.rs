//! News destinations: renderers that consume a complete item collection.
//!
//! # Submodules
//!
//! - [`plain`]: title, dash underline, and body on standard output
//! - [`html`]: a static HTML page with a table of contents
//! - [`json`]: the items as a JSON array, for other tools to pick up
//!
//! Every destination receives the same shared slice, in full, once per
//! distribution cycle. File destinations rewrite their target from scratch
//! on each call.

pub mod html;
pub mod json;
pub mod plain;

use crate::error::Result;
use crate::models::NewsItem;
use async_trait::async_trait;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use plain::PlainRenderer;

#[async_trait]
pub trait Destination: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> String;

    /// Render the full collection.
    async fn receive_items(&self, items: &[NewsItem]) -> Result<()>;
}
