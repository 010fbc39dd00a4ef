//! The fetch-then-render cycle.
//!
//! A [`Distributor`] owns ordered lists of sources and destinations. Each
//! call to [`Distributor::distribute`] drains every source in registration
//! order into one collection, then hands that collection to every
//! destination in registration order. No rendering starts before all
//! retrieval has finished.

use crate::error::Result;
use crate::models::NewsItem;
use crate::outputs::Destination;
use crate::sources::Source;
use tracing::{error, info, instrument, warn};

/// What to do when a source fails mid-cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the cycle and return the error. Later sources are not tried
    /// and no destination runs.
    #[default]
    Abort,
    /// Log the failure, leave that source's items out, and carry on.
    /// Destination failures still abort.
    SkipFailedSources,
}

#[derive(Default)]
pub struct Distributor {
    sources: Vec<Box<dyn Source>>,
    destinations: Vec<Box<dyn Destination>>,
    policy: FailurePolicy,
}

impl Distributor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn add_source(&mut self, source: impl Source + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn add_destination(&mut self, destination: impl Destination + 'static) {
        self.destinations.push(Box::new(destination));
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Run one full cycle and return how many items were distributed.
    #[instrument(level = "info", skip(self), fields(sources = self.sources.len(), destinations = self.destinations.len()))]
    pub async fn distribute(&self) -> Result<usize> {
        let items = self.collect().await?;
        info!(count = items.len(), "Collected items from all sources");

        for destination in &self.destinations {
            if let Err(e) = destination.receive_items(&items).await {
                error!(destination = %destination.name(), error = %e, "Destination failed");
                return Err(e);
            }
        }

        info!(count = items.len(), "Distribution complete");
        Ok(items.len())
    }

    async fn collect(&self) -> Result<Vec<NewsItem>> {
        let mut items = Vec::new();
        for source in &self.sources {
            match source.fetch_items().await {
                Ok(batch) => {
                    info!(source = %source.name(), count = batch.len(), "Source drained");
                    items.extend(batch);
                }
                Err(e) if self.policy == FailurePolicy::SkipFailedSources => {
                    warn!(source = %source.name(), error = %e, "Source failed; skipping");
                }
                Err(e) => {
                    error!(source = %source.name(), error = %e, "Source failed");
                    return Err(e);
                }
            }
        }
        Ok(items)
    }
}
