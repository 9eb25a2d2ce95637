//! Registration service configuration.

use std::env;
use std::path::PathBuf;

use common::{GistConfig, StoreBackend, StoreConfig};
use domain::{DEFAULT_GIST_FILENAME, DEFAULT_REGISTRATIONS_FILE};

/// Registration service configuration.
#[derive(Debug, Clone, Default)]
pub struct RegistrationServiceConfig {
    /// Where the registrations document lives
    pub store: StoreConfig,
}

impl RegistrationServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// An unknown `STORE_BACKEND` falls back to the file backend with a
    /// warning. Missing gist credentials are not an error here; the store
    /// reports them on first use.
    pub fn from_env() -> Self {
        let backend = match env::var("STORE_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, using file backend", e);
                StoreBackend::File
            }),
            Err(_) => StoreBackend::File,
        };

        Self {
            store: StoreConfig {
                backend,
                file_path: env::var("REGISTRATIONS_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_REGISTRATIONS_FILE)),
                gist: GistConfig {
                    token: non_empty_var("GITHUB_TOKEN"),
                    gist_id: non_empty_var("GIST_ID"),
                    filename: env::var("GIST_FILENAME")
                        .unwrap_or_else(|_| DEFAULT_GIST_FILENAME.to_string()),
                    api_base_url: env::var("GITHUB_API_URL")
                        .unwrap_or_else(|_| "https://api.github.com".to_string()),
                },
            },
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
