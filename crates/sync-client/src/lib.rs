//! Read-only client for a running registration gateway.
//!
//! Used by the admin CLI to list, count and export registrations held by a
//! remote server. `fetch` never fails: problems come back as a message next
//! to an empty list, the way the admin dashboard shows them.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use common::{AppError, AppResult, STORE_WARNING_HEADER};
use domain::Registration;

const USER_AGENT: &str = concat!("wild-senses-sync/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a lenient fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub registrations: Vec<Registration>,
    /// Set when the fetch failed or the server read its store in degraded mode
    pub error: Option<String>,
}

/// HTTP client for the `/registrations` endpoint.
pub struct SyncClient {
    client: Client,
    base_url: String,
}

impl SyncClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all registrations, never failing.
    pub async fn fetch(&self) -> SyncOutcome {
        match self.request().await {
            Ok((registrations, None)) => SyncOutcome {
                registrations,
                error: None,
            },
            Ok((registrations, Some(warning))) => {
                warn!("Server served registrations from a failed store read: {}", warning);
                SyncOutcome {
                    registrations,
                    error: Some(warning),
                }
            }
            Err(e) => {
                warn!("Failed to fetch registrations from {}: {}", self.base_url, e);
                SyncOutcome {
                    registrations: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Fetch all registrations, failing on any transport or decode error.
    ///
    /// A degraded server read is not an error here; the list is returned
    /// as served.
    pub async fn try_fetch(&self) -> AppResult<Vec<Registration>> {
        let (registrations, _) = self.request().await?;
        Ok(registrations)
    }

    async fn request(&self) -> AppResult<(Vec<Registration>, Option<String>)> {
        let url = format!("{}/registrations", self.base_url);
        debug!("Fetching registrations from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::service_unavailable(format!("{} returned {}", url, status)));
        }

        let warning = response
            .headers()
            .get(STORE_WARNING_HEADER)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

        let registrations: Vec<Registration> = response.json().await.map_err(|e| {
            AppError::service_unavailable(format!("{} sent an invalid response: {}", url, e))
        })?;

        debug!("Fetched {} registrations", registrations.len());
        Ok((registrations, warning))
    }
}
