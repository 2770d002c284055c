//! PostgreSQL profile repository
//!
//! All statements are hand-written and parameterized. Insert and update run
//! in a transaction together with the linked account row, so a profile and
//! its credential either both change or neither does.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::profile::{
    ProfileDraft, ProfileId, ProfileRecord, ProfileRepository, ProfileUpdate,
};
use crate::domain::DomainError;

/// PostgreSQL implementation of ProfileRepository
#[derive(Debug, Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PROFILE_COLUMNS: &str =
    "id, name, kana, gender, birthdate, phone_number, email, login_id, created_at, updated_at";

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn list(&self) -> Result<Vec<ProfileRecord>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM profiles ORDER BY id",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list profiles: {}", e)))?;

        rows.iter().map(row_to_profile).collect()
    }

    async fn get(&self, id: ProfileId) -> Result<Option<ProfileRecord>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get profile: {}", e)))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn login_id_exists(
        &self,
        login_id: &str,
        exclude: Option<ProfileId>,
    ) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM profiles
                WHERE login_id = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(login_id)
        .bind(exclude.map(|id| id.value()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check login id: {}", e)))?;

        Ok(exists)
    }

    async fn insert(
        &self,
        draft: &ProfileDraft,
        password_hash: &str,
    ) -> Result<ProfileRecord, DomainError> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO profiles (name, kana, gender, birthdate, phone_number, email,
                                  login_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.kana)
        .bind(&draft.gender)
        .bind(draft.birthdate)
        .bind(&draft.phone_number)
        .bind(&draft.email)
        .bind(&draft.login_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &draft.login_id))?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, login_id, email, password_hash, email_confirmed,
                                  created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, FALSE, $5, $5, NULL)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&draft.login_id)
        .bind(&draft.email)
        .bind(password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &draft.login_id))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit insert: {}", e)))?;

        Ok(ProfileRecord::from_parts(
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
        ))
    }

    async fn update(
        &self,
        update: &ProfileUpdate,
        password_hash: Option<&str>,
    ) -> Result<ProfileRecord, DomainError> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let existing = sqlx::query("SELECT login_id, created_at FROM profiles WHERE id = $1")
            .bind(update.id.value())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to load profile: {}", e)))?
            .ok_or_else(|| {
                DomainError::not_found(format!("Profile '{}' not found", update.id))
            })?;

        let old_login_id: String = existing.get("login_id");
        let created_at: chrono::DateTime<Utc> = existing.get("created_at");

        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET name = $2, kana = $3, gender = $4, birthdate = $5, phone_number = $6,
                email = $7, login_id = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(update.id.value())
        .bind(&update.name)
        .bind(&update.kana)
        .bind(&update.gender)
        .bind(update.birthdate)
        .bind(&update.phone_number)
        .bind(&update.email)
        .bind(&update.login_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &update.login_id))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Profile '{}' not found",
                update.id
            )));
        }

        sqlx::query(
            r#"
            UPDATE accounts
            SET login_id = $2, email = $3,
                password_hash = COALESCE($4, password_hash),
                updated_at = $5
            WHERE login_id = $1
            "#,
        )
        .bind(&old_login_id)
        .bind(&update.login_id)
        .bind(&update.email)
        .bind(password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &update.login_id))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit update: {}", e)))?;

        Ok(ProfileRecord::from_parts(
            update.id,
            update.name.clone(),
            update.kana.clone(),
            update.gender.clone(),
            update.birthdate,
            update.phone_number.clone(),
            update.email.clone(),
            update.login_id.clone(),
            created_at,
            now,
        ))
    }

    async fn delete(&self, id: ProfileId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete profile: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count profiles: {}", e)))?;

        Ok(count as usize)
    }
}

/// Unique-constraint violations on the login id become conflicts; the
/// workflow layer maps those to the field-scoped duplicate error.
fn map_unique_violation(e: sqlx::Error, login_id: &str) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        DomainError::conflict(format!("Login ID '{}' already exists", login_id))
    } else {
        DomainError::storage(format!("Failed to write profile: {}", e))
    }
}

fn row_to_profile(row: &sqlx::postgres::PgRow) -> Result<ProfileRecord, DomainError> {
    Ok(ProfileRecord::from_parts(
        ProfileId::new(row.get("id")),
        row.get("name"),
        row.get("kana"),
        row.get("gender"),
        row.get("birthdate"),
        row.get("phone_number"),
        row.get("email"),
        row.get("login_id"),
        row.get("created_at"),
        row.get("updated_at"),
    ))
}
