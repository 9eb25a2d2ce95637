//! Repository layer - registration rules over the record store.

mod registration_repository;

pub use registration_repository::{RegistrationManager, RegistrationRepository};
