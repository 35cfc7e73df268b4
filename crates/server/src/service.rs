//! Request orchestration for the metadata inventory.
//!
//! Two flows:
//! - `collect`: always fetch fresh metadata and upsert it, reporting
//!   whether the snapshot was created or refreshed.
//! - `lookup`: return the stored snapshot when present; otherwise
//!   schedule a detached fetch-and-upsert and acknowledge immediately.
//!
//! Concurrent collections for the same URL are not serialized; the
//! store's single-row upsert keeps the key unique and the last write
//! to complete wins.

use std::sync::Arc;

use sitemeta_client::{FetchClient, normalize};
use sitemeta_core::{Error, MetadataRecord, MetadataStore, UpsertOutcome};

/// Orchestrates the normalizer, fetcher, and store adapter. Cheap to
/// clone; collaborators are passed in at construction so tests can
/// substitute them.
#[derive(Clone)]
pub struct MetadataService {
    store: MetadataStore,
    fetcher: Arc<FetchClient>,
}

/// Outcome of a synchronous collection, decided by the existence
/// pre-check rather than the upsert result.
#[derive(Debug)]
pub enum CollectOutcome {
    Created(MetadataRecord),
    Refreshed(MetadataRecord),
}

/// Outcome of a lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    Found(MetadataRecord),
    Accepted { url: String },
}

impl MetadataService {
    pub fn new(store: MetadataStore, fetcher: Arc<FetchClient>) -> Self {
        Self { store, fetcher }
    }

    /// Fetch fresh metadata for a URL and store it, creating or
    /// refreshing the snapshot under its canonical key.
    ///
    /// A transport failure or a store failure propagates to the caller
    /// and leaves any prior snapshot untouched; the fetch result is
    /// discarded on a store failure, never queued.
    pub async fn collect(&self, raw_url: &str) -> Result<CollectOutcome, Error> {
        let url = normalize(raw_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let existed = self.store.exists(&url).await?;
        tracing::info!(url = %url, refresh = existed, "collecting metadata");

        let record = self.fetcher.fetch(&url).await?;
        let stored = self.store.upsert(&record).await?;
        tracing::info!(url = %url, outcome = ?stored, "stored metadata snapshot");

        Ok(if existed { CollectOutcome::Refreshed(record) } else { CollectOutcome::Created(record) })
    }

    /// Return the stored snapshot for a URL, or schedule a background
    /// collection and acknowledge immediately on a miss.
    ///
    /// The detached task's lifetime is not tied to this call; its
    /// failures are logged and never surfaced to the caller.
    pub async fn lookup(&self, raw_url: &str) -> Result<LookupOutcome, Error> {
        let url = normalize(raw_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        if let Some(record) = self.store.get(&url).await? {
            return Ok(LookupOutcome::Found(record));
        }

        tracing::info!(url = %url, "no snapshot stored, scheduling background collection");
        let service = self.clone();
        let target = url.clone();
        tokio::spawn(async move {
            match service.collect_detached(&target).await {
                Ok(outcome) => {
                    tracing::info!(url = %target, outcome = ?outcome, "background collection finished");
                }
                Err(err) => {
                    tracing::warn!(url = %target, error = %err, "background collection failed");
                }
            }
        });

        Ok(LookupOutcome::Accepted { url })
    }

    /// Store liveness, for the health surface.
    pub async fn ping(&self) -> Result<(), Error> {
        self.store.ping().await
    }

    async fn collect_detached(&self, url: &str) -> Result<UpsertOutcome, Error> {
        let record = self.fetcher.fetch(url).await?;
        self.store.upsert(&record).await
    }
}
