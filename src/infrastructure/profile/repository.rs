//! In-memory profile repository

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::profile::{
    ProfileDraft, ProfileId, ProfileRecord, ProfileRepository, ProfileUpdate,
};
use crate::domain::DomainError;

use super::super::account::InMemoryAccountRepository;

/// In-memory implementation of ProfileRepository, used in tests and for
/// running without a database.
///
/// Shares the account repository so the atomic insert-with-credential
/// contract behaves like the Postgres transaction does.
#[derive(Debug)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<BTreeMap<i64, ProfileRecord>>>,
    next_id: Arc<RwLock<i64>>,
    accounts: Arc<InMemoryAccountRepository>,
}

impl InMemoryProfileRepository {
    pub fn new(accounts: Arc<InMemoryAccountRepository>) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(RwLock::new(1)),
            accounts,
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn list(&self) -> Result<Vec<ProfileRecord>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().cloned().collect())
    }

    async fn get(&self, id: ProfileId) -> Result<Option<ProfileRecord>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&id.value()).cloned())
    }

    async fn login_id_exists(
        &self,
        login_id: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool, DomainError> {
        let profiles = self.profiles.read().await;

        Ok(profiles.values().any(|p| {
            p.login_id() == login_id && exclude.map(|e| p.id() != e).unwrap_or(true)
        }))
    }

    async fn insert(
        &self,
        draft: &ProfileDraft,
        password_hash: &str,
    ) -> Result<ProfileRecord, DomainError> {
        let mut profiles = self.profiles.write().await;
        let mut next_id = self.next_id.write().await;

        if profiles.values().any(|p| p.login_id() == draft.login_id) {
            return Err(DomainError::conflict(format!(
                "Login ID '{}' already exists",
                draft.login_id
            )));
        }

        // Provision the credential first so its conflict aborts the insert,
        // mirroring the all-or-nothing transaction of the Postgres path
        let account = Account::new(
            AccountId::generate(),
            &draft.login_id,
            &draft.email,
            password_hash,
        );
        self.accounts.create(account).await?;

        let id = *next_id;
        *next_id += 1;

        let now = Utc::now();
        let record = ProfileRecord::from_parts(
            ProfileId::new(id),
            draft.name.clone(),
            draft.kana.clone(),
            draft.gender.clone(),
            draft.birthdate,
            draft.phone_number.clone(),
            draft.email.clone(),
            draft.login_id.clone(),
            now,
            now,
        );

        profiles.insert(id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        update: &ProfileUpdate,
        password_hash: Option<&str>,
    ) -> Result<ProfileRecord, DomainError> {
        let mut profiles = self.profiles.write().await;

        let existing = profiles
            .get(&update.id.value())
            .ok_or_else(|| DomainError::not_found(format!("Profile '{}' not found", update.id)))?
            .clone();

        let login_id_taken = profiles
            .values()
            .any(|p| p.login_id() == update.login_id && p.id() != update.id);

        if login_id_taken {
            return Err(DomainError::conflict(format!(
                "Login ID '{}' already exists",
                update.login_id
            )));
        }

        // Keep the linked credential in step with the profile
        if let Some(mut account) = self.accounts.get_by_login_id(existing.login_id()).await? {
            account.set_login_id(&update.login_id);
            account.set_email(&update.email);
            if let Some(hash) = password_hash {
                account.set_password_hash(hash);
            }
            self.accounts.update(&account).await?;
        }

        let record = ProfileRecord::from_parts(
            update.id,
            update.name.clone(),
            update.kana.clone(),
            update.gender.clone(),
            update.birthdate,
            update.phone_number.clone(),
            update.email.clone(),
            update.login_id.clone(),
            existing.created_at(),
            Utc::now(),
        );

        profiles.insert(update.id.value(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: ProfileId) -> Result<bool, DomainError> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.remove(&id.value()).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.len())
    }
}
