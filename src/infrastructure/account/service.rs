//! Account service for registration and authentication

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new credential account.
///
/// Input validation happens at the submission edge (the structured field
/// report is part of the response contract there); by the time a request
/// reaches this service the fields are taken as given.
#[derive(Debug, Clone)]
pub struct RegisterAccountRequest {
    pub login_id: String,
    pub email: String,
    pub password: String,
}

/// Account service for registration and authentication
#[derive(Debug)]
pub struct AccountService<R: AccountRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: AccountRepository, H: PasswordHasher> AccountService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new account with the login id as its username.
    ///
    /// A taken login id surfaces as a conflict; callers present it as a
    /// form-level error rather than a field annotation.
    pub async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError> {
        let password_hash = self.hasher.hash(&request.password)?;

        let account = Account::new(
            AccountId::generate(),
            &request.login_id,
            &request.email,
            password_hash,
        );

        let account = self.repository.create(account).await?;
        info!(login_id = %account.login_id(), "New account created with password");

        Ok(account)
    }

    /// Authenticate with login id and password.
    ///
    /// Returns `None` on every failure path without revealing which step
    /// failed; the log events carry the distinction.
    pub async fn authenticate(
        &self,
        login_id: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        info!(login_id = %login_id, "Login attempt");

        let account = match self.repository.get_by_login_id(login_id).await? {
            Some(account) => {
                info!(login_id = %login_id, "Account found for login id");
                account
            }
            None => {
                warn!(login_id = %login_id, "No account found for login id");
                return Ok(None);
            }
        };

        if !self.hasher.verify(password, account.password_hash()) {
            warn!(login_id = %login_id, "Invalid login attempt");
            return Ok(None);
        }

        info!(login_id = %login_id, "Password check passed");

        self.repository.record_login(account.id()).await?;

        info!(login_id = %login_id, "User logged in");

        // Re-fetch to pick up the recorded login timestamp
        self.repository.get(account.id()).await
    }

    /// Get an account by ID
    pub async fn get(&self, id: &str) -> Result<Option<Account>, DomainError> {
        let account_id = AccountId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&account_id).await
    }

    /// Get an account by login id
    pub async fn get_by_login_id(&self, login_id: &str) -> Result<Option<Account>, DomainError> {
        self.repository.get_by_login_id(login_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::account::password::Argon2Hasher;
    use crate::infrastructure::account::repository::InMemoryAccountRepository;

    fn create_service() -> AccountService<InMemoryAccountRepository, Argon2Hasher> {
        AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn make_request(login_id: &str, password: &str) -> RegisterAccountRequest {
        RegisterAccountRequest {
            login_id: login_id.to_string(),
            email: format!("{}@example.com", login_id),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let service = create_service();

        let account = service.register(make_request("tanaka01", "Passw0rd!")).await.unwrap();

        assert_eq!(account.login_id(), "tanaka01");
        assert_eq!(account.email(), "tanaka01@example.com");
        assert_ne!(account.password_hash(), "Passw0rd!");
    }

    #[tokio::test]
    async fn test_register_duplicate_login_id_conflicts() {
        let service = create_service();

        service.register(make_request("tanaka01", "Passw0rd!")).await.unwrap();
        let result = service.register(make_request("tanaka01", "0therPass!")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_success_records_login() {
        let service = create_service();
        service.register(make_request("tanaka01", "Passw0rd!")).await.unwrap();

        let account = service.authenticate("tanaka01", "Passw0rd!").await.unwrap();

        assert!(account.is_some());
        assert!(account.unwrap().last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();
        service.register(make_request("tanaka01", "Passw0rd!")).await.unwrap();

        let account = service.authenticate("tanaka01", "Passw0rd?").await.unwrap();

        assert!(account.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_login_id() {
        let service = create_service();

        let account = service.authenticate("nobody", "Passw0rd!").await.unwrap();

        assert!(account.is_none());
    }

    #[tokio::test]
    async fn test_get_by_login_id() {
        let service = create_service();
        service.register(make_request("tanaka01", "Passw0rd!")).await.unwrap();

        let account = service.get_by_login_id("tanaka01").await.unwrap();
        assert!(account.is_some());

        let missing = service.get_by_login_id("suzuki02").await.unwrap();
        assert!(missing.is_none());
    }
}
