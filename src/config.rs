//! Wiring configuration: which sources and destinations to register.
//!
//! A YAML file lists both in processing order:
//!
//! ```yaml
//! sources:
//!   - kind: web
//!     url: http://www.reuters.com/news/world
//!     title_pattern: '<h2><a href="[^"]*"\s*>(.*?)</a>'
//!     body_pattern: '</h2><p>(.*?)</p>'
//!     encoding: utf-8
//!   - kind: nntp
//!     server: nntp.aioe.org
//!     group: comp.lang.python.announce
//!     how_many: 10
//! destinations:
//!   - kind: plain
//!   - kind: html
//!     path: news.html
//! ```
//!
//! Without a file, [`AgentConfig::default`] provides the same wiring.

use crate::distributor::{Distributor, FailurePolicy};
use crate::error::{NewsError, Result};
use crate::outputs::{HtmlRenderer, JsonRenderer, PlainRenderer};
use crate::sources::{NntpGroupSource, PatternWebSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const DEFAULT_ENCODING: &str = "utf-8";
const DEFAULT_HOW_MANY: u64 = 10;

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

fn default_how_many() -> u64 {
    DEFAULT_HOW_MANY
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Regex-scraped web page
    Web {
        url: String,
        title_pattern: String,
        body_pattern: String,
        #[serde(default = "default_encoding")]
        encoding: String,
    },
    /// Most recent postings of a Usenet group
    Nntp {
        server: String,
        group: String,
        #[serde(default = "default_how_many")]
        how_many: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DestinationConfig {
    Plain,
    Html { path: PathBuf },
    Json { path: PathBuf },
}

impl Default for AgentConfig {
    /// Reuters world news plus the last ten comp.lang.python.announce
    /// postings, printed and written to `news.html`.
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::Web {
                    url: "http://www.reuters.com/news/world".to_string(),
                    title_pattern: r#"<h2><a href="[^"]*"\s*>(.*?)</a>"#.to_string(),
                    body_pattern: r"</h2><p>(.*?)</p>".to_string(),
                    encoding: default_encoding(),
                },
                SourceConfig::Nntp {
                    server: "nntp.aioe.org".to_string(),
                    group: "comp.lang.python.announce".to_string(),
                    how_many: DEFAULT_HOW_MANY,
                },
            ],
            destinations: vec![
                DestinationConfig::Plain,
                DestinationConfig::Html {
                    path: PathBuf::from("news.html"),
                },
            ],
        }
    }
}

impl AgentConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate the YAML file at `path`.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(
            sources = config.sources.len(),
            destinations = config.destinations.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        for (i, source) in self.sources.iter().enumerate() {
            match source {
                SourceConfig::Nntp { how_many: 0, .. } => {
                    return Err(NewsError::Config(format!(
                        "sources[{i}]: how_many must be at least 1"
                    )));
                }
                SourceConfig::Nntp { server, group, .. }
                    if server.trim().is_empty() || group.trim().is_empty() =>
                {
                    return Err(NewsError::Config(format!(
                        "sources[{i}]: server and group must not be empty"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Construct every configured source and destination, in file order.
    pub fn build_distributor(&self, policy: FailurePolicy) -> Result<Distributor> {
        let mut distributor = Distributor::new().with_policy(policy);

        for source in &self.sources {
            match source {
                SourceConfig::Web {
                    url,
                    title_pattern,
                    body_pattern,
                    encoding,
                } => {
                    let web = PatternWebSource::new(url, title_pattern, body_pattern)?
                        .with_encoding(encoding)?;
                    distributor.add_source(web);
                }
                SourceConfig::Nntp {
                    server,
                    group,
                    how_many,
                } => {
                    distributor.add_source(NntpGroupSource::new(server, group, *how_many));
                }
            }
        }

        for destination in &self.destinations {
            match destination {
                DestinationConfig::Plain => distributor.add_destination(PlainRenderer::new()),
                DestinationConfig::Html { path } => {
                    distributor.add_destination(HtmlRenderer::new(path))
                }
                DestinationConfig::Json { path } => {
                    distributor.add_destination(JsonRenderer::new(path))
                }
            }
        }

        debug!(
            sources = distributor.source_count(),
            destinations = distributor.destination_count(),
            ?policy,
            "Distributor assembled"
        );
        Ok(distributor)
    }
}
