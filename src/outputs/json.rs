//! JSON output for other tools.
//!
//! The collection is written as a pretty-printed array:
//!
//! ```text
//! [
//!   { "title": "...", "body": "..." },
//!   ...
//! ]
//! ```
//!
//! Missing parent directories are created; the file itself is rewritten
//! from scratch each cycle.

use super::Destination;
use crate::error::Result;
use crate::models::NewsItem;
use crate::utils::ensure_parent_dir;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Clone)]
pub struct JsonRenderer {
    path: PathBuf,
}

impl JsonRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Destination for JsonRenderer {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = items.len()))]
    async fn receive_items(&self, items: &[NewsItem]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;

        if let Err(e) = ensure_parent_dir(&self.path).await {
            error!(error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }

        fs::write(&self.path, json).await?;
        info!("Wrote JSON file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_items_as_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api/news.json");
        let renderer = JsonRenderer::new(&path);

        let items = vec![
            NewsItem::new("First", "one\n"),
            NewsItem::new("Second", "two\n"),
        ];
        renderer.receive_items(&items).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!([
                { "title": "First", "body": "one\n" },
                { "title": "Second", "body": "two\n" },
            ])
        );
    }

    #[tokio::test]
    async fn test_empty_collection_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.json");
        std::fs::write(&path, "stale contents that should disappear").unwrap();

        JsonRenderer::new(&path).receive_items(&[]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
