//! Account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Account, AccountId};
use crate::domain::DomainError;

/// Repository trait for credential account storage
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Get an account by its login id (for login)
    async fn get_by_login_id(&self, login_id: &str) -> Result<Option<Account>, DomainError>;

    /// Create a new account; a taken login id is a conflict
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account
    async fn update(&self, account: &Account) -> Result<Account, DomainError>;

    /// Record a login for an account
    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError>;

    /// Check if a login id is taken
    async fn login_id_exists(&self, login_id: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_login_id(login_id).await?.is_some())
    }
}
