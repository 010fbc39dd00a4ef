//! Static HTML page output.
//!
//! The page has three parts, always in this order:
//!
//! ```text
//! header   doctype, <title>, stylesheet link, <h1>
//! toc      <ul> with one <li><a href="#N">title</a></li> per item
//! stories  <h2 id="N">title</h2> followed by <pre>body</pre> per item
//! ```
//!
//! `N` is the item's 1-based position. Titles and bodies are inserted as-is,
//! without escaping; `<pre>` keeps the bodies' line breaks.

use super::Destination;
use crate::error::Result;
use crate::models::NewsItem;
use crate::utils::ensure_parent_dir;
use async_trait::async_trait;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

const PAGE_TITLE: &str = "Today's News";
const STYLESHEET: &str = "format.css";

/// Writes the whole collection to one HTML file, replacing whatever the
/// file held before.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    path: PathBuf,
}

impl HtmlRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Build the complete document in memory.
    pub fn render(items: &[NewsItem]) -> Result<String> {
        let mut html = String::new();

        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "  <head>")?;
        writeln!(html, "    <title>{PAGE_TITLE}</title>")?;
        writeln!(html, "    <meta charset=\"UTF-8\">")?;
        writeln!(
            html,
            "    <link rel=\"stylesheet\" href=\"{STYLESHEET}\" type=\"text/css\"/>"
        )?;
        writeln!(html, "  </head>")?;
        writeln!(html, "  <body>")?;
        writeln!(html, "    <h1>{PAGE_TITLE}</h1>")?;

        writeln!(html, "<ul>")?;
        for (id, item) in (1..).zip(items) {
            writeln!(html, " <li><a href=\"#{id}\">{}</a></li>", item.title)?;
        }
        writeln!(html, "</ul>")?;

        for (id, item) in (1..).zip(items) {
            writeln!(html, "<h2 id=\"{id}\">{}</h2>", item.title)?;
            writeln!(html, "<pre>{}</pre>", item.body)?;
        }

        writeln!(html, "  </body>")?;
        writeln!(html, "</html>")?;
        Ok(html)
    }
}

#[async_trait]
impl Destination for HtmlRenderer {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = items.len()))]
    async fn receive_items(&self, items: &[NewsItem]) -> Result<()> {
        let html = Self::render(items)?;
        ensure_parent_dir(&self.path).await?;
        fs::write(&self.path, html.as_bytes()).await?;
        info!(bytes = html.len(), "Wrote HTML page");
        Ok(())
    }
}
