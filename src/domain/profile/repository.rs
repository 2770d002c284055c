//! Profile repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ProfileDraft, ProfileId, ProfileRecord, ProfileUpdate};
use crate::domain::DomainError;

/// Repository trait for profile record storage
///
/// One abstraction for every operation; implementations choose how to
/// execute (parameterized statements in the Postgres case). Insert and
/// update also maintain the linked credential account, atomically with the
/// profile row.
#[async_trait]
pub trait ProfileRepository: Send + Sync + Debug {
    /// List all profile records, oldest first
    async fn list(&self) -> Result<Vec<ProfileRecord>, DomainError>;

    /// Get a record by primary key
    async fn get(&self, id: ProfileId) -> Result<Option<ProfileRecord>, DomainError>;

    /// Check whether a login id is taken by a profile record, optionally
    /// excluding one record (the one being edited)
    async fn login_id_exists(
        &self,
        login_id: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool, DomainError>;

    /// Insert the draft and provision its credential account in one
    /// transaction. A taken login id surfaces as a conflict, whichever
    /// uniqueness constraint catches it.
    async fn insert(
        &self,
        draft: &ProfileDraft,
        password_hash: &str,
    ) -> Result<ProfileRecord, DomainError>;

    /// Update by primary key; zero affected rows is not-found. When a new
    /// password hash is given, the linked account is re-keyed in the same
    /// transaction.
    async fn update(
        &self,
        update: &ProfileUpdate,
        password_hash: Option<&str>,
    ) -> Result<ProfileRecord, DomainError>;

    /// Delete by primary key; returns whether a row was removed
    async fn delete(&self, id: ProfileId) -> Result<bool, DomainError>;

    /// Count stored records
    async fn count(&self) -> Result<usize, DomainError>;
}
