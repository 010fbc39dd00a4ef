//! Web page source driven by a pair of regular expressions.
//!
//! The page is fetched once, decoded with its declared encoding, and scanned
//! twice: once for titles, once for bodies. The two match lists are paired
//! up by position, so the patterns must walk the page's stories in the same
//! order. Extra matches on either side are dropped.

use super::Source;
use crate::charset::Charset;
use crate::error::{NewsError, Result};
use crate::models::NewsItem;
use crate::utils::{FILL_WIDTH, reflow, truncate_for_log};
use async_trait::async_trait;
use encoding_rs::UTF_8;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

/// Fetches raw page bytes for a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body.to_vec())
    }
}

/// Scrapes title/body pairs out of one web page.
#[derive(Debug, Clone)]
pub struct PatternWebSource<F = HttpFetcher> {
    url: Url,
    title_pattern: Regex,
    body_pattern: Regex,
    encoding: Charset,
    fetcher: F,
}

impl PatternWebSource {
    /// Build a source for `url` that reads pages as UTF-8.
    ///
    /// Both patterns are compiled here; a bad URL or pattern fails
    /// construction rather than the first fetch.
    pub fn new(url: &str, title_pattern: &str, body_pattern: &str) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url)?,
            title_pattern: Regex::new(title_pattern)?,
            body_pattern: Regex::new(body_pattern)?,
            encoding: Charset::Registry(UTF_8),
            fetcher: HttpFetcher::new()?,
        })
    }
}

impl<F: PageFetcher> PatternWebSource<F> {
    /// Decode pages with the encoding named by `label` (e.g. `ascii`,
    /// `latin1`, `windows-1252`, `shift_jis`).
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Charset::for_label(label)
            .ok_or_else(|| NewsError::UnknownEncoding(label.to_string()))?;
        Ok(self)
    }

    #[cfg(test)]
    pub fn with_fetcher<G: PageFetcher>(self, fetcher: G) -> PatternWebSource<G> {
        PatternWebSource {
            url: self.url,
            title_pattern: self.title_pattern,
            body_pattern: self.body_pattern,
            encoding: self.encoding,
            fetcher,
        }
    }

    /// Decode raw page bytes, rejecting anything malformed.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.encoding.decode_strict(bytes).ok_or(NewsError::Decode {
            encoding: self.encoding.name(),
        })
    }

    /// Pair up title and body matches in `text` by position.
    pub fn extract(&self, text: &str) -> Vec<NewsItem> {
        let titles = first_captures(&self.title_pattern, text);
        let bodies = first_captures(&self.body_pattern, text);
        debug!(
            titles = titles.len(),
            bodies = bodies.len(),
            "Pattern matches"
        );

        titles
            .into_iter()
            .zip(bodies)
            .map(|(title, body)| {
                let mut body = reflow(body, FILL_WIDTH);
                body.push('\n');
                NewsItem::new(title, body)
            })
            .collect()
    }
}

/// Every non-overlapping match of `pattern`, as its first capture group
/// (or the whole match when the pattern has no groups).
fn first_captures<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    let group = if pattern.captures_len() > 1 { 1 } else { 0 };
    pattern
        .captures_iter(text)
        .map(|caps| caps.get(group).map_or("", |m| m.as_str()))
        .collect()
}

#[async_trait]
impl<F: PageFetcher> Source for PatternWebSource<F> {
    fn name(&self) -> String {
        self.url.to_string()
    }

    #[instrument(level = "info", skip(self), fields(url = %self.url, encoding = self.encoding.name()))]
    async fn fetch_items(&self) -> Result<Vec<NewsItem>> {
        let bytes = self.fetcher.fetch(&self.url).await?;
        let text = self.decode(&bytes)?;
        debug!(preview = %truncate_for_log(&text, 200), "Decoded page");

        let items = self.extract(&text);
        info!(count = items.len(), "Extracted web items");
        Ok(items)
    }
}
