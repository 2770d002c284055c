//! Profile workflow service
//!
//! Orchestrates the confirm-before-save lifecycle: `confirm` validates a
//! submission without persisting anything, `save` inserts a previously
//! confirmed draft without re-running the field rules, `edit` re-runs only
//! the imperative rules before updating by primary key.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::domain::profile::{
    birthdate_is_valid, validate_submission, ProfileDraft, ProfileId, ProfileRecord,
    ProfileRepository, ProfileSubmission, ProfileUpdate,
};
use crate::domain::validation::{ErrorKind, Field, ValidationReport};
use crate::domain::DomainError;

use super::super::account::PasswordHasher;

/// Result of the confirm step
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// Every rule passed; the draft is ready for the save step
    Confirmed(ProfileDraft),
    /// One or more rules failed; nothing was persisted
    Invalid(ValidationReport),
}

/// Result of the edit step
#[derive(Debug, Clone)]
pub enum EditOutcome {
    Updated(ProfileRecord),
    Invalid(ValidationReport),
}

/// Profile workflow service
#[derive(Debug)]
pub struct ProfileService<R: ProfileRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: ProfileRepository, H: PasswordHasher> ProfileService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// List all profile records
    pub async fn list(&self) -> Result<Vec<ProfileRecord>, DomainError> {
        self.repository.list().await
    }

    /// Get a record by primary key
    pub async fn get(&self, id: i64) -> Result<Option<ProfileRecord>, DomainError> {
        self.repository.get(ProfileId::new(id)).await
    }

    /// The confirm step: run every rule, persist nothing.
    pub async fn confirm(
        &self,
        submission: ProfileSubmission,
    ) -> Result<ConfirmOutcome, DomainError> {
        self.confirm_as_of(submission, Utc::now().date_naive()).await
    }

    /// Confirm against an explicit reference date for the birthdate rule.
    pub async fn confirm_as_of(
        &self,
        submission: ProfileSubmission,
        today: NaiveDate,
    ) -> Result<ConfirmOutcome, DomainError> {
        let mut report = validate_submission(&submission);

        if !submission.login_id.trim().is_empty()
            && self
                .repository
                .login_id_exists(&submission.login_id, None)
                .await?
        {
            warn!(login_id = %submission.login_id, "Duplicate login id rejected at confirm");
            report.push(Field::LoginId, ErrorKind::Duplicate);
        }

        if let Some(birthdate) = submission.birthdate {
            if !birthdate_is_valid(birthdate, today) {
                warn!(%birthdate, "Future birthdate rejected at confirm");
                report.push(Field::Birthdate, ErrorKind::InFuture);
            }
        }

        if !report.is_valid() {
            return Ok(ConfirmOutcome::Invalid(report));
        }

        // Birthdate presence was checked by the field rules above
        let draft = submission
            .into_draft()
            .ok_or_else(|| DomainError::internal("Confirmed submission lost its birthdate"))?;

        Ok(ConfirmOutcome::Confirmed(draft))
    }

    /// The save step: insert a confirmed draft.
    ///
    /// Field rules are not re-run here; the storage-level uniqueness
    /// constraint is the backstop for submissions that race between
    /// confirm and save, surfacing as a conflict.
    pub async fn save(&self, draft: ProfileDraft) -> Result<ProfileRecord, DomainError> {
        info!(login_id = %draft.login_id, "Saving profile record");

        let password_hash = self.hasher.hash(&draft.password)?;
        let record = self.repository.insert(&draft, &password_hash).await?;

        info!(id = %record.id(), login_id = %record.login_id(), "Profile record created");
        Ok(record)
    }

    /// The edit step: update by primary key.
    ///
    /// The path id must match the body id or the store is never touched.
    /// Re-runs the two imperative rules (the duplicate check excludes the
    /// record being edited); zero affected rows is not-found.
    pub async fn edit(&self, path_id: i64, update: ProfileUpdate) -> Result<EditOutcome, DomainError> {
        if path_id != update.id.value() {
            warn!(path_id, body_id = %update.id, "Profile id mismatch on edit");
            return Err(DomainError::not_found(format!(
                "Profile '{}' not found",
                path_id
            )));
        }

        self.edit_as_of(update, Utc::now().date_naive()).await
    }

    /// Edit against an explicit reference date for the birthdate rule.
    pub async fn edit_as_of(
        &self,
        update: ProfileUpdate,
        today: NaiveDate,
    ) -> Result<EditOutcome, DomainError> {
        let mut report = ValidationReport::new();

        if self
            .repository
            .login_id_exists(&update.login_id, Some(update.id))
            .await?
        {
            warn!(login_id = %update.login_id, "Duplicate login id rejected at edit");
            report.push(Field::LoginId, ErrorKind::Duplicate);
        }

        if !birthdate_is_valid(update.birthdate, today) {
            warn!(birthdate = %update.birthdate, "Future birthdate rejected at edit");
            report.push(Field::Birthdate, ErrorKind::InFuture);
        }

        if !report.is_valid() {
            return Ok(EditOutcome::Invalid(report));
        }

        let password_hash = match update.password.as_deref() {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };

        let record = self
            .repository
            .update(&update, password_hash.as_deref())
            .await?;

        info!(id = %record.id(), "Profile record updated");
        Ok(EditOutcome::Updated(record))
    }

    /// Delete by primary key; returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let removed = self.repository.delete(ProfileId::new(id)).await?;

        if removed {
            info!(id, "Profile record deleted");
        } else {
            warn!(id, "Delete requested for missing profile record");
        }

        Ok(removed)
    }

    /// Count stored records
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::account::{Argon2Hasher, InMemoryAccountRepository};
    use crate::infrastructure::profile::InMemoryProfileRepository;
    use crate::domain::validation::PasswordPolicy;

    fn create_service() -> ProfileService<InMemoryProfileRepository, Argon2Hasher> {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        ProfileService::new(
            Arc::new(InMemoryProfileRepository::new(accounts)),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn sample_submission(login_id: &str) -> ProfileSubmission {
        ProfileSubmission {
            name: "田中太郎".to_string(),
            kana: "タナカ タロウ".to_string(),
            gender: "男性".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 1),
            phone_number: "09012345678".to_string(),
            email: "tanaka@example.com".to_string(),
            login_id: login_id.to_string(),
            password: "Passw0rd".to_string(),
            confirm_password: "Passw0rd".to_string(),
        }
    }

    async fn confirm_and_save(
        service: &ProfileService<InMemoryProfileRepository, Argon2Hasher>,
        login_id: &str,
    ) -> ProfileRecord {
        let outcome = service
            .confirm_as_of(sample_submission(login_id), today())
            .await
            .unwrap();

        match outcome {
            ConfirmOutcome::Confirmed(draft) => service.save(draft).await.unwrap(),
            ConfirmOutcome::Invalid(report) => panic!("unexpected invalid: {:?}", report),
        }
    }

    #[tokio::test]
    async fn test_confirm_valid_submission_yields_draft() {
        let service = create_service();

        let outcome = service
            .confirm_as_of(sample_submission("tanaka01"), today())
            .await
            .unwrap();

        match outcome {
            ConfirmOutcome::Confirmed(draft) => {
                assert_eq!(draft.login_id, "tanaka01");
                assert_eq!(draft.name, "田中太郎");
            }
            ConfirmOutcome::Invalid(report) => panic!("unexpected invalid: {:?}", report),
        }

        // Confirm never persists
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_confirm_rejects_taken_login_id_regardless_of_other_fields() {
        let service = create_service();
        confirm_and_save(&service, "tanaka01").await;

        let mut submission = sample_submission("tanaka01");
        submission.name = "別人".to_string();
        submission.email = "other@example.com".to_string();

        let outcome = service.confirm_as_of(submission, today()).await.unwrap();

        match outcome {
            ConfirmOutcome::Invalid(report) => {
                assert!(report.contains(Field::LoginId, ErrorKind::Duplicate));
            }
            ConfirmOutcome::Confirmed(_) => panic!("duplicate login id was accepted"),
        }
    }

    #[tokio::test]
    async fn test_confirm_rejects_future_birthdate_without_store_mutation() {
        let service = create_service();

        let mut submission = sample_submission("alice");
        submission.birthdate = today().succ_opt();

        let outcome = service.confirm_as_of(submission, today()).await.unwrap();

        match outcome {
            ConfirmOutcome::Invalid(report) => {
                assert!(report.contains(Field::Birthdate, ErrorKind::InFuture));
            }
            ConfirmOutcome::Confirmed(_) => panic!("future birthdate was accepted"),
        }

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_confirm_birthdate_today_is_accepted() {
        let service = create_service();

        let mut submission = sample_submission("newborn");
        submission.birthdate = Some(today());

        let outcome = service.confirm_as_of(submission, today()).await.unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Confirmed(_)));
    }

    #[tokio::test]
    async fn test_confirm_password_mismatch() {
        let service = create_service();

        let mut submission = sample_submission("tanaka01");
        submission.confirm_password = "Different1".to_string();

        let outcome = service.confirm_as_of(submission, today()).await.unwrap();

        match outcome {
            ConfirmOutcome::Invalid(report) => {
                assert!(report.contains(Field::ConfirmPassword, ErrorKind::Mismatch));
            }
            ConfirmOutcome::Confirmed(_) => panic!("mismatched passwords were accepted"),
        }
    }

    #[tokio::test]
    async fn test_save_inserts_exactly_one_record() {
        let service = create_service();

        let record = confirm_and_save(&service, "tanaka01").await;

        assert_eq!(service.count().await.unwrap(), 1);
        assert_eq!(record.login_id(), "tanaka01");
        assert_eq!(record.name(), "田中太郎");
    }

    #[tokio::test]
    async fn test_save_race_loser_gets_conflict() {
        let service = create_service();

        // Both submissions confirm before either saves
        let first = match service
            .confirm_as_of(sample_submission("tanaka01"), today())
            .await
            .unwrap()
        {
            ConfirmOutcome::Confirmed(draft) => draft,
            ConfirmOutcome::Invalid(_) => unreachable!(),
        };
        let second = match service
            .confirm_as_of(sample_submission("tanaka01"), today())
            .await
            .unwrap()
        {
            ConfirmOutcome::Confirmed(draft) => draft,
            ConfirmOutcome::Invalid(_) => unreachable!(),
        };

        service.save(first).await.unwrap();
        let result = service.save(second).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_edit_id_mismatch_is_not_found_without_store_access() {
        let service = create_service();
        let record = confirm_and_save(&service, "tanaka01").await;

        let update = ProfileUpdate {
            id: record.id(),
            name: "変更".to_string(),
            kana: "ヘンコウ".to_string(),
            gender: "男性".to_string(),
            birthdate: record.birthdate(),
            phone_number: "0312345678".to_string(),
            email: "changed@example.com".to_string(),
            login_id: "tanaka01".to_string(),
            password: None,
        };

        let result = service.edit(record.id().value() + 1, update).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        // Store untouched
        let stored = service.get(record.id().value()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "田中太郎");
    }

    #[tokio::test]
    async fn test_edit_reruns_imperative_rules() {
        let service = create_service();
        confirm_and_save(&service, "tanaka01").await;
        let record = confirm_and_save(&service, "suzuki02").await;

        // Taking another record's login id fails the duplicate rule
        let update = ProfileUpdate {
            id: record.id(),
            name: record.name().to_string(),
            kana: record.kana().to_string(),
            gender: record.gender().to_string(),
            birthdate: today().succ_opt().unwrap(),
            phone_number: record.phone_number().to_string(),
            email: record.email().to_string(),
            login_id: "tanaka01".to_string(),
            password: None,
        };

        let outcome = service.edit_as_of(update, today()).await.unwrap();

        match outcome {
            EditOutcome::Invalid(report) => {
                assert!(report.contains(Field::LoginId, ErrorKind::Duplicate));
                assert!(report.contains(Field::Birthdate, ErrorKind::InFuture));
            }
            EditOutcome::Updated(_) => panic!("invalid edit was applied"),
        }
    }

    #[tokio::test]
    async fn test_edit_keeping_own_login_id_is_allowed() {
        let service = create_service();
        let record = confirm_and_save(&service, "tanaka01").await;

        let update = ProfileUpdate {
            id: record.id(),
            name: "田中次郎".to_string(),
            kana: "タナカ ジロウ".to_string(),
            gender: record.gender().to_string(),
            birthdate: record.birthdate(),
            phone_number: record.phone_number().to_string(),
            email: record.email().to_string(),
            login_id: "tanaka01".to_string(),
            password: None,
        };

        let outcome = service.edit_as_of(update, today()).await.unwrap();

        match outcome {
            EditOutcome::Updated(updated) => assert_eq!(updated.name(), "田中次郎"),
            EditOutcome::Invalid(report) => panic!("unexpected invalid: {:?}", report),
        }
    }

    #[tokio::test]
    async fn test_edit_missing_record_is_not_found() {
        let service = create_service();

        let update = ProfileUpdate {
            id: ProfileId::new(42),
            name: "田中太郎".to_string(),
            kana: "タナカ タロウ".to_string(),
            gender: "男性".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
            phone_number: "09012345678".to_string(),
            email: "tanaka@example.com".to_string(),
            login_id: "tanaka01".to_string(),
            password: None,
        };

        let result = service.edit(42, update).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();
        let record = confirm_and_save(&service, "tanaka01").await;

        assert!(service.delete(record.id().value()).await.unwrap());
        assert!(!service.delete(record.id().value()).await.unwrap());
        assert!(service.get(record.id().value()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_password_standard_policy_applies() {
        let service = create_service();

        let mut submission = sample_submission("tanaka01");
        // Valid under Standard (no special character), invalid under Strict
        submission.password = "Abcdef12".to_string();
        submission.confirm_password = "Abcdef12".to_string();
        assert!(!PasswordPolicy::Strict.satisfied_by(&submission.password));

        let outcome = service.confirm_as_of(submission, today()).await.unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Confirmed(_)));
    }
}
