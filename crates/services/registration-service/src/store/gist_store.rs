//! Remote single-document backend: one file inside a GitHub Gist.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use common::{AppError, AppResult, GistConfig};
use domain::Registration;

use super::{decode, encode, RecordStore};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("wild-senses-registration/", env!("CARGO_PKG_VERSION"));

/// Token and gist id, both required to reach the document.
#[derive(Clone)]
pub struct GistCredentials {
    pub token: String,
    pub gist_id: String,
}

impl fmt::Debug for GistCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GistCredentials")
            .field("token", &"[REDACTED]")
            .field("gist_id", &self.gist_id)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

/// Keeps the collection as one file of a gist.
///
/// Without credentials the store is still constructed; every call then fails
/// with a configuration error.
pub struct GistStore {
    client: Client,
    api_base_url: String,
    filename: String,
    credentials: Option<GistCredentials>,
}

impl GistStore {
    pub fn new(
        api_base_url: impl Into<String>,
        filename: impl Into<String>,
        credentials: Option<GistCredentials>,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            filename: filename.into(),
            credentials,
        })
    }

    pub fn from_config(config: &GistConfig) -> AppResult<Self> {
        let credentials = match (&config.token, &config.gist_id) {
            (Some(token), Some(gist_id)) => Some(GistCredentials {
                token: token.clone(),
                gist_id: gist_id.clone(),
            }),
            _ => None,
        };

        Self::new(&config.api_base_url, &config.filename, credentials)
    }

    fn credentials(&self) -> AppResult<&GistCredentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| AppError::configuration("Missing GitHub token or Gist ID"))
    }

    fn gist_url(&self, credentials: &GistCredentials) -> String {
        format!("{}/gists/{}", self.api_base_url, credentials.gist_id)
    }

    fn authorized(&self, request: RequestBuilder, credentials: &GistCredentials) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("token {}", credentials.token))
            .header(ACCEPT, GITHUB_ACCEPT)
    }

    /// Large files are cut off in the gist response; the full text is at `raw_url`.
    async fn fetch_raw(&self, raw_url: &str, credentials: &GistCredentials) -> AppResult<String> {
        debug!("Gist file is truncated, fetching {}", raw_url);
        let response = self
            .authorized(self.client.get(raw_url), credentials)
            .send()
            .await
            .map_err(|e| AppError::persistence(format!("failed to fetch gist file: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::persistence(format!(
                "failed to fetch gist file: {}",
                status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::persistence(format!("failed to read gist file: {}", e)))
    }
}

#[async_trait]
impl RecordStore for GistStore {
    async fn fetch(&self) -> AppResult<Vec<Registration>> {
        let credentials = self.credentials()?;

        let response = self
            .authorized(self.client.get(self.gist_url(credentials)), credentials)
            .send()
            .await
            .map_err(|e| AppError::persistence(format!("failed to fetch gist: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::persistence(format!(
                "failed to fetch gist: {}",
                status
            )));
        }

        let mut gist: GistResponse = response
            .json()
            .await
            .map_err(|e| AppError::persistence(format!("invalid gist response: {}", e)))?;

        let Some(file) = gist.files.remove(&self.filename) else {
            debug!("Gist has no {} yet", self.filename);
            return Ok(Vec::new());
        };

        let content = match (file.truncated, file.raw_url) {
            (true, Some(raw_url)) => self.fetch_raw(&raw_url, credentials).await?,
            _ => file.content.unwrap_or_default(),
        };

        let registrations = decode(&content)?;
        debug!("Loaded {} registrations from gist", registrations.len());
        Ok(registrations)
    }

    async fn save(&self, registrations: &[Registration]) -> AppResult<()> {
        let credentials = self.credentials()?;
        let document = encode(registrations)?;
        let body = json!({
            "files": {
                self.filename.as_str(): { "content": document }
            }
        });

        let response = self
            .authorized(self.client.patch(self.gist_url(credentials)), credentials)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::persistence(format!("failed to update gist: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::persistence(format!(
                "failed to update gist: {}",
                status
            )));
        }

        debug!("Saved {} registrations to gist", registrations.len());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "gist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_fail_reads_and_writes_with_configuration_error() {
        let store = GistStore::from_config(&GistConfig::default()).unwrap();

        assert!(matches!(store.fetch().await, Err(AppError::Configuration(_))));
        assert!(matches!(store.save(&[]).await, Err(AppError::Configuration(_))));
    }

    #[test]
    fn gist_url_ignores_trailing_slash() {
        let credentials = GistCredentials {
            token: "t".to_string(),
            gist_id: "abc123".to_string(),
        };
        let store = GistStore::new("https://api.github.com/", "registrations.json", None).unwrap();

        assert_eq!(store.gist_url(&credentials), "https://api.github.com/gists/abc123");
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let credentials = GistCredentials {
            token: "ghp_secret".to_string(),
            gist_id: "abc123".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("ghp_secret"));
    }
}
