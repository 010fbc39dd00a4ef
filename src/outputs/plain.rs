//! Plain-text rendering to standard output.

use super::Destination;
use crate::error::Result;
use crate::models::NewsItem;
use async_trait::async_trait;
use std::io::{self, Write};
use tracing::{info, instrument};

/// Prints each item as its title, a dash underline of the same length, and
/// the body.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl PlainRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Write `items` to `out`.
    ///
    /// The underline has one `-` per character of the title. A newline
    /// follows the body; blank lines between items come from the bodies.
    pub fn render<W: Write>(items: &[NewsItem], out: &mut W) -> io::Result<()> {
        for item in items {
            writeln!(out, "{}", item.title)?;
            writeln!(out, "{}", "-".repeat(item.title.chars().count()))?;
            writeln!(out, "{}", item.body)?;
        }
        out.flush()
    }
}

#[async_trait]
impl Destination for PlainRenderer {
    fn name(&self) -> String {
        "stdout".to_string()
    }

    #[instrument(level = "info", skip_all, fields(count = items.len()))]
    async fn receive_items(&self, items: &[NewsItem]) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        Self::render(items, &mut out)?;
        info!("Printed items");
        Ok(())
    }
}
