//! Application state for shared services

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account::{Account, AccountRepository};
use crate::domain::profile::{
    ProfileDraft, ProfileRecord, ProfileRepository, ProfileSubmission, ProfileUpdate,
};
use crate::domain::DomainError;
use crate::infrastructure::account::{AccountService, PasswordHasher, RegisterAccountRequest};
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::profile::{ConfirmOutcome, EditOutcome, ProfileService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub profile_service: Arc<dyn ProfileServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    /// External login scheme names from configuration
    pub external_schemes: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        account_service: Arc<dyn AccountServiceTrait>,
        profile_service: Arc<dyn ProfileServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
        external_schemes: Vec<String>,
    ) -> Self {
        Self {
            account_service,
            profile_service,
            jwt_service,
            external_schemes: Arc::new(external_schemes),
        }
    }
}

/// Trait for account service operations
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError>;
    async fn authenticate(
        &self,
        login_id: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<Account>, DomainError>;
}

/// Trait for profile workflow operations
#[async_trait]
pub trait ProfileServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<ProfileRecord>, DomainError>;
    async fn get(&self, id: i64) -> Result<Option<ProfileRecord>, DomainError>;
    async fn confirm(&self, submission: ProfileSubmission) -> Result<ConfirmOutcome, DomainError>;
    async fn save(&self, draft: ProfileDraft) -> Result<ProfileRecord, DomainError>;
    async fn edit(&self, path_id: i64, update: ProfileUpdate) -> Result<EditOutcome, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

// Implement the traits for the concrete services

#[async_trait]
impl<R, H> AccountServiceTrait for AccountService<R, H>
where
    R: AccountRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError> {
        AccountService::register(self, request).await
    }

    async fn authenticate(
        &self,
        login_id: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        AccountService::authenticate(self, login_id, password).await
    }

    async fn get(&self, id: &str) -> Result<Option<Account>, DomainError> {
        AccountService::get(self, id).await
    }
}

#[async_trait]
impl<R, H> ProfileServiceTrait for ProfileService<R, H>
where
    R: ProfileRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn list(&self) -> Result<Vec<ProfileRecord>, DomainError> {
        ProfileService::list(self).await
    }

    async fn get(&self, id: i64) -> Result<Option<ProfileRecord>, DomainError> {
        ProfileService::get(self, id).await
    }

    async fn confirm(&self, submission: ProfileSubmission) -> Result<ConfirmOutcome, DomainError> {
        ProfileService::confirm(self, submission).await
    }

    async fn save(&self, draft: ProfileDraft) -> Result<ProfileRecord, DomainError> {
        ProfileService::save(self, draft).await
    }

    async fn edit(&self, path_id: i64, update: ProfileUpdate) -> Result<EditOutcome, DomainError> {
        ProfileService::edit(self, path_id, update).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        ProfileService::delete(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        ProfileService::count(self).await
    }
}
