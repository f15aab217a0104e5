use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::staff::{Email, StaffChanges, StaffRecord};

/// Errors raised by staff persistence
///
/// A lookup that matches nothing is not an error; it is reported as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("{0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result of applying a batch permission update to one staff id
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Updated(StaffRecord),
    NotFound,
    Failed(String),
}

/// Repository trait for staff records
///
/// Email uniqueness is global across shops; implementations report a
/// collision on create or update as `RepositoryError::DuplicateEmail`.
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Insert a new staff record and return it as stored
    async fn create(&self, staff: StaffRecord) -> RepositoryResult<StaffRecord>;

    /// Find a staff record by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<StaffRecord>>;

    /// Find a staff record by email, in any shop
    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<StaffRecord>>;

    /// Find all staff of a shop, oldest first
    async fn find_by_shop(&self, shop_id: &str) -> RepositoryResult<Vec<StaffRecord>>;

    /// Replace the permission list of one staff record
    async fn update_permissions(
        &self,
        id: Uuid,
        permissions: &[String],
    ) -> RepositoryResult<Option<StaffRecord>>;

    /// Apply a partial profile update
    async fn update(&self, id: Uuid, changes: &StaffChanges)
        -> RepositoryResult<Option<StaffRecord>>;

    /// Delete a staff record, returning whether it existed
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;

    /// Replace the permission list of every id in `ids`
    ///
    /// Returns one outcome per id, in input order. The default issues every
    /// single-record update concurrently and reports failures per item;
    /// backends that can do this atomically should override it.
    async fn update_permissions_batch(
        &self,
        ids: &[Uuid],
        permissions: &[String],
    ) -> RepositoryResult<Vec<BatchOutcome>> {
        let updates = ids.iter().map(|id| self.update_permissions(*id, permissions));

        let outcomes = join_all(updates)
            .await
            .into_iter()
            .map(|result| match result {
                Ok(Some(staff)) => BatchOutcome::Updated(staff),
                Ok(None) => BatchOutcome::NotFound,
                Err(e) => BatchOutcome::Failed(e.to_string()),
            })
            .collect();

        Ok(outcomes)
    }
}
