//! Application state for dependency injection.

use std::sync::Arc;

use registration_service_lib::repository::RegistrationRepository;
use registration_service_lib::store::RecordStore;
use registration_service_lib::RegistrationService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registrations: Arc<dyn RegistrationRepository>,
    /// Raw store, used by the health check
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Create new app state.
    pub fn new(service: RegistrationService) -> Self {
        Self {
            registrations: service.repository,
            store: service.store,
        }
    }
}
