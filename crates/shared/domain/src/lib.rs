//! Domain layer - Registration entity and the rules around it.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The persisted JSON shape of a registration is defined here and shared by
//! the store, the HTTP gateway and the sync client.

pub mod constants;
pub mod error;
pub mod registration;
pub mod stats;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use registration::{next_id, search, NewRegistration, Registration, RegistrationPatch};
pub use stats::RegistrationStats;
