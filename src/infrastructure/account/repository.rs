//! In-memory account repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::DomainError;

/// In-memory implementation of AccountRepository, used in tests and for
/// running without a database
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    /// login_id -> account id index
    login_index: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id.as_str()).cloned())
    }

    async fn get_by_login_id(&self, login_id: &str) -> Result<Option<Account>, DomainError> {
        let login_index = self.login_index.read().await;

        if let Some(account_id) = login_index.get(login_id) {
            let accounts = self.accounts.read().await;
            return Ok(accounts.get(account_id).cloned());
        }

        Ok(None)
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;
        let mut login_index = self.login_index.write().await;

        let id = account.id().as_str().to_string();
        let login_id = account.login_id().to_string();

        if accounts.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Account with ID '{}' already exists",
                id
            )));
        }

        if login_index.contains_key(&login_id) {
            return Err(DomainError::conflict(format!(
                "Login ID '{}' already exists",
                login_id
            )));
        }

        login_index.insert(login_id, id.clone());
        accounts.insert(id, account.clone());

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;
        let mut login_index = self.login_index.write().await;

        let id = account.id().as_str().to_string();

        let old = accounts
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", id)))?;

        let old_login_id = old.login_id().to_string();
        let new_login_id = account.login_id().to_string();

        if old_login_id != new_login_id {
            if login_index.contains_key(&new_login_id) {
                return Err(DomainError::conflict(format!(
                    "Login ID '{}' already exists",
                    new_login_id
                )));
            }
            login_index.remove(&old_login_id);
            login_index.insert(new_login_id, id.clone());
        }

        accounts.insert(id, account.clone());
        Ok(account.clone())
    }

    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        match accounts.get_mut(id.as_str()) {
            Some(account) => {
                account.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Account '{}' not found",
                id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_account(login_id: &str) -> Account {
        Account::new(
            AccountId::generate(),
            login_id,
            format!("{}@example.com", login_id),
            "hash",
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryAccountRepository::new();
        let account = make_account("tanaka01");

        repo.create(account.clone()).await.unwrap();

        let by_id = repo.get(account.id()).await.unwrap();
        assert!(by_id.is_some());

        let by_login = repo.get_by_login_id("tanaka01").await.unwrap();
        assert_eq!(by_login.unwrap().id(), account.id());
    }

    #[tokio::test]
    async fn test_login_id_uniqueness() {
        let repo = InMemoryAccountRepository::new();

        repo.create(make_account("tanaka01")).await.unwrap();
        let result = repo.create(make_account("tanaka01")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_login_id_exists() {
        let repo = InMemoryAccountRepository::new();
        repo.create(make_account("tanaka01")).await.unwrap();

        assert!(repo.login_id_exists("tanaka01").await.unwrap());
        assert!(!repo.login_id_exists("suzuki02").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_reindexes_login_id() {
        let repo = InMemoryAccountRepository::new();
        let mut account = make_account("tanaka01");
        repo.create(account.clone()).await.unwrap();

        account.set_login_id("tanaka02");
        repo.update(&account).await.unwrap();

        assert!(repo.get_by_login_id("tanaka01").await.unwrap().is_none());
        assert!(repo.get_by_login_id("tanaka02").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = InMemoryAccountRepository::new();
        let account = make_account("tanaka01");
        repo.create(account.clone()).await.unwrap();

        repo.record_login(account.id()).await.unwrap();

        let stored = repo.get(account.id()).await.unwrap().unwrap();
        assert!(stored.last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_record_login_unknown_account() {
        let repo = InMemoryAccountRepository::new();
        let result = repo.record_login(&AccountId::generate()).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
