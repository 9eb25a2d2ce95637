//! Shared configuration structures.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use domain::{DEFAULT_GIST_FILENAME, DEFAULT_REGISTRATIONS_FILE};
use serde::{Deserialize, Serialize};

/// Which backend holds the registrations document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local JSON file
    #[default]
    File,
    /// One file inside a GitHub Gist
    Gist,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "gist" => Ok(StoreBackend::Gist),
            other => Err(format!("unknown store backend '{}' (expected 'file' or 'gist')", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::File => write!(f, "file"),
            StoreBackend::Gist => write!(f, "gist"),
        }
    }
}

/// Remote single-document store settings.
///
/// `token` and `gist_id` are optional: when either is missing the store
/// still starts, reads degrade to an empty collection and writes fail.
#[derive(Clone, Deserialize, Serialize)]
pub struct GistConfig {
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub gist_id: Option<String>,
    pub filename: String,
    pub api_base_url: String,
}

impl fmt::Debug for GistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GistConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("gist_id", &self.gist_id)
            .field("filename", &self.filename)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl Default for GistConfig {
    fn default() -> Self {
        Self {
            token: None,
            gist_id: None,
            filename: DEFAULT_GIST_FILENAME.to_string(),
            api_base_url: "https://api.github.com".to_string(),
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Used by the file backend
    pub file_path: PathBuf,
    /// Used by the gist backend
    pub gist: GistConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            file_path: PathBuf::from(DEFAULT_REGISTRATIONS_FILE),
            gist: GistConfig::default(),
        }
    }
}
