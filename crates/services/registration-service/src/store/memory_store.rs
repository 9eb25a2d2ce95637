//! In-process backend for tests and local demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use common::{AppError, AppResult};
use domain::Registration;

use super::{decode, encode, RecordStore};

/// Holds the encoded document in memory, exactly as a real backend would
/// store it, so tests can compare documents byte for byte.
#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<String>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing collection
    pub fn with_registrations(registrations: &[Registration]) -> AppResult<Self> {
        Ok(Self {
            document: Mutex::new(encode(registrations)?),
            saves: AtomicUsize::new(0),
        })
    }

    /// Current stored document
    pub fn document(&self) -> String {
        self.lock().map(|document| document.clone()).unwrap_or_default()
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, String>> {
        self.document
            .lock()
            .map_err(|_| AppError::internal("memory store lock poisoned"))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(&self) -> AppResult<Vec<Registration>> {
        let document = self.lock()?.clone();
        decode(&document)
    }

    async fn save(&self, registrations: &[Registration]) -> AppResult<()> {
        let document = encode(registrations)?;
        *self.lock()? = document;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
