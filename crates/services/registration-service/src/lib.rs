//! Registration Service Library
//!
//! This crate owns the registration collection: the record store backends
//! that persist it and the repository that enforces id assignment and
//! partial-update rules on top of them. The HTTP gateway embeds it.

pub mod config;
pub mod repository;
pub mod store;

use std::sync::Arc;

use tracing::info;

use common::AppResult;

use crate::config::RegistrationServiceConfig;
use crate::repository::{RegistrationManager, RegistrationRepository};
use crate::store::{build_store, RecordStore};

/// Store and repository wired together from configuration.
#[derive(Clone)]
pub struct RegistrationService {
    pub store: Arc<dyn RecordStore>,
    pub repository: Arc<dyn RegistrationRepository>,
}

impl RegistrationService {
    /// Build the configured store and a repository over it.
    pub fn from_config(config: &RegistrationServiceConfig) -> AppResult<Self> {
        let store = build_store(&config.store)?;
        info!(backend = store.backend(), "Registration store ready");
        Ok(Self::with_store(store))
    }

    /// Wrap an existing store (tests, alternate backends).
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        let repository = Arc::new(RegistrationManager::new(store.clone()));
        Self { store, repository }
    }
}
