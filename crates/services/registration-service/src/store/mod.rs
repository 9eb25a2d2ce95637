//! Record store - persistence of the whole registration collection.
//!
//! The collection is one JSON document (an array, pretty-printed with two
//! space indentation). Backends only move that document; they know nothing
//! about ids or merges.

mod file_store;
mod gist_store;
mod memory_store;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use common::{AppResult, StoreBackend, StoreConfig};
use domain::Registration;

pub use file_store::FileStore;
pub use gist_store::{GistCredentials, GistStore};
pub use memory_store::MemoryStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistence backend for the registration collection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the full collection.
    ///
    /// A document that does not exist yet is an empty collection, not an
    /// error. Missing credentials, I/O and decode failures are errors.
    async fn fetch(&self) -> AppResult<Vec<Registration>>;

    /// Replace the full collection. Never retried.
    async fn save(&self, registrations: &[Registration]) -> AppResult<()>;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;
}

/// Result of a soft load: the collection plus a warning when the read failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub registrations: Vec<Registration>,
    /// Set when the store could not be read and the collection is empty
    /// because of that
    pub warning: Option<String>,
}

impl Snapshot {
    /// Read the store, degrading to an empty collection on any failure.
    pub async fn load(store: &dyn RecordStore) -> Self {
        match store.fetch().await {
            Ok(registrations) => Self {
                registrations,
                warning: None,
            },
            Err(e) => {
                warn!(
                    backend = store.backend(),
                    "Failed to load registrations, serving an empty list: {}", e
                );
                Self {
                    registrations: Vec::new(),
                    warning: Some(e.to_string()),
                }
            }
        }
    }

    /// Whether the collection was served from a failed read
    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

/// Encode the collection as the stored document.
pub fn encode(registrations: &[Registration]) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(registrations)?)
}

/// Decode a stored document. Blank content is an empty collection.
pub fn decode(document: &str) -> AppResult<Vec<Registration>> {
    if document.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(document)?)
}

/// Build the configured backend.
pub fn build_store(config: &StoreConfig) -> AppResult<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.backend {
        StoreBackend::File => Arc::new(FileStore::new(config.file_path.clone())),
        StoreBackend::Gist => Arc::new(GistStore::from_config(&config.gist)?),
    };
    Ok(store)
}
