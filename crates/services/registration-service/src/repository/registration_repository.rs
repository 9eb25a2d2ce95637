//! Registration repository - create/list/update/delete over a record store.
//!
//! Every mutation is one full read of the collection, an in-memory change and
//! at most one full write. Writes are not coordinated: two concurrent
//! mutations both read the same collection and the later save wins.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use common::{AppResult, OptionExt};
use domain::{next_id, NewRegistration, Registration, RegistrationPatch};

use crate::store::{RecordStore, Snapshot};

/// Registration repository trait for dependency injection.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Full collection in stored order. Never fails: an unreadable store
    /// yields an empty list with a warning.
    async fn list(&self) -> Snapshot;

    /// Single registration by id
    async fn get(&self, id: &str) -> AppResult<Registration>;

    /// Validate form data and append a new registration
    async fn create(&self, form: NewRegistration) -> AppResult<Registration>;

    /// Merge supplied fields into an existing registration
    async fn update(&self, id: &str, patch: RegistrationPatch) -> AppResult<Registration>;

    /// Flip the check-in status of a registration
    async fn toggle_check_in(&self, id: &str) -> AppResult<Registration>;

    /// Remove a registration
    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// Concrete implementation of RegistrationRepository using a record store.
pub struct RegistrationManager {
    store: Arc<dyn RecordStore>,
}

impl RegistrationManager {
    /// Create new repository instance over a store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Read, change one record in place, write back.
    ///
    /// Reads for mutations are strict: a failed read is returned as an error
    /// rather than treated as an empty collection, which would otherwise be
    /// written back over the stored registrations.
    async fn modify<F>(&self, id: &str, change: F) -> AppResult<Registration>
    where
        F: FnOnce(&mut Registration) + Send,
    {
        let mut registrations = self.store.fetch().await?;
        let registration = registrations
            .iter_mut()
            .find(|registration| registration.id == id)
            .ok_or_not_found()?;

        change(registration);
        let updated = registration.clone();

        self.store.save(&registrations).await?;
        Ok(updated)
    }
}

#[async_trait]
impl RegistrationRepository for RegistrationManager {
    async fn list(&self) -> Snapshot {
        Snapshot::load(self.store.as_ref()).await
    }

    async fn get(&self, id: &str) -> AppResult<Registration> {
        self.store
            .fetch()
            .await?
            .into_iter()
            .find(|registration| registration.id == id)
            .ok_or_not_found()
    }

    async fn create(&self, form: NewRegistration) -> AppResult<Registration> {
        form.validate()?;

        let mut registrations = self.store.fetch().await?;
        let now = Utc::now();
        let registration = Registration::new(next_id(&registrations, now), form, now);

        registrations.push(registration.clone());
        self.store.save(&registrations).await?;

        info!(id = %registration.id, "Registration created");
        Ok(registration)
    }

    async fn update(&self, id: &str, patch: RegistrationPatch) -> AppResult<Registration> {
        let updated = self
            .modify(id, |registration| {
                let ignored = registration.apply(patch);
                if !ignored.is_empty() {
                    warn!(id = %registration.id, ?ignored, "Ignoring protected fields in update");
                }
            })
            .await?;

        info!(id = %updated.id, "Registration updated");
        Ok(updated)
    }

    async fn toggle_check_in(&self, id: &str) -> AppResult<Registration> {
        let updated = self
            .modify(id, |registration| {
                registration.toggle_check_in();
            })
            .await?;

        info!(id = %updated.id, checked_in = updated.checked_in, "Check-in toggled");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut registrations = self.store.fetch().await?;
        let index = registrations
            .iter()
            .position(|registration| registration.id == id)
            .ok_or_not_found()?;

        registrations.remove(index);
        self.store.save(&registrations).await?;

        info!(id, "Registration deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use crate::store::MockRecordStore;

    fn form() -> NewRegistration {
        NewRegistration {
            parent_name: "Jo Lee".to_string(),
            parent_email: "jo@example.com".to_string(),
            parent_phone: "555-1".to_string(),
            child_names: "Amy, Sam".to_string(),
            child_ages: "6, 8".to_string(),
            emergency_contact_name: "Pat Lee".to_string(),
            emergency_contact_phone: "555-2".to_string(),
            ..NewRegistration::default()
        }
    }

    fn existing(id: &str) -> Registration {
        Registration::new(id.to_string(), form(), Utc::now())
    }

    #[tokio::test]
    async fn create_propagates_save_failure() {
        let mut store = MockRecordStore::new();
        store.expect_fetch().returning(|| Ok(Vec::new()));
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(AppError::persistence("failed to update gist: 502 Bad Gateway")));

        let manager = RegistrationManager::new(Arc::new(store));
        let result = manager.create(form()).await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_without_touching_the_store() {
        let mut store = MockRecordStore::new();
        store.expect_fetch().never();
        store.expect_save().never();

        let manager = RegistrationManager::new(Arc::new(store));
        let mut form = form();
        form.parent_phone.clear();
        let result = manager.create(form).await;

        match result {
            Err(AppError::Validation(message)) => assert!(message.contains("parentPhone")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_does_not_overwrite_after_a_failed_read() {
        let mut store = MockRecordStore::new();
        store
            .expect_fetch()
            .returning(|| Err(AppError::configuration("Missing GitHub token or Gist ID")));
        store.expect_save().never();

        let manager = RegistrationManager::new(Arc::new(store));
        let result = manager.create(form()).await;

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn update_of_unknown_id_never_saves() {
        let mut store = MockRecordStore::new();
        store.expect_fetch().returning(|| Ok(vec![existing("1")]));
        store.expect_save().never();

        let manager = RegistrationManager::new(Arc::new(store));
        let result = manager.update("2", RegistrationPatch::check_in(true)).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn delete_saves_the_reduced_collection() {
        let mut store = MockRecordStore::new();
        store
            .expect_fetch()
            .returning(|| Ok(vec![existing("1"), existing("2"), existing("3")]));
        store
            .expect_save()
            .withf(|saved| {
                saved.iter().map(|r| r.id.as_str()).collect::<Vec<_>>() == ["1", "3"]
            })
            .times(1)
            .returning(|_| Ok(()));

        let manager = RegistrationManager::new(Arc::new(store));

        assert!(manager.delete("2").await.is_ok());
    }

    #[tokio::test]
    async fn list_degrades_when_store_is_unreachable() {
        let mut store = MockRecordStore::new();
        store
            .expect_fetch()
            .returning(|| Err(AppError::persistence("failed to fetch gist: 503")));
        store.expect_backend().return_const("gist");

        let manager = RegistrationManager::new(Arc::new(store));
        let snapshot = manager.list().await;

        assert!(snapshot.registrations.is_empty());
        assert!(snapshot.is_degraded());
    }
}
