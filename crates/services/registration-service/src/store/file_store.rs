//! Local JSON file backend.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use common::{AppError, AppResult};
use domain::Registration;

use super::{decode, encode, RecordStore};

/// Keeps the collection in a single JSON file.
///
/// Each write goes to its own uniquely named sibling temp file which is then
/// renamed over the target, so a crash mid-write leaves the previous document
/// in place and concurrent saves never share a temp file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Write `document` next to `path` and rename it into place.
fn replace_atomically(path: &Path, document: &[u8]) -> AppResult<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::persistence(format!("failed to create {}: {}", parent.display(), e))
            })?;
            parent
        }
        None => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
        AppError::persistence(format!("failed to create temp file in {}: {}", parent.display(), e))
    })?;
    temp.write_all(document)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| {
            AppError::persistence(format!("failed to write {}: {}", temp.path().display(), e))
        })?;
    temp.persist(path).map_err(|e| {
        AppError::persistence(format!("failed to replace {}: {}", path.display(), e.error))
    })?;

    Ok(())
}

#[async_trait]
impl RecordStore for FileStore {
    async fn fetch(&self) -> AppResult<Vec<Registration>> {
        let document = match tokio::fs::read_to_string(&self.path).await {
            Ok(document) => document,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No registrations file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(AppError::persistence(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let registrations = decode(&document)?;
        debug!(
            "Loaded {} registrations from {}",
            registrations.len(),
            self.path.display()
        );
        Ok(registrations)
    }

    async fn save(&self, registrations: &[Registration]) -> AppResult<()> {
        let document = encode(registrations)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_atomically(&path, document.as_bytes()))
            .await
            .map_err(|e| AppError::internal(format!("file store write task failed: {}", e)))??;

        debug!(
            "Saved {} registrations to {}",
            registrations.len(),
            self.path.display()
        );
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
