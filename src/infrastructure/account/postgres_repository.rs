//! PostgreSQL account repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, login_id, email, password_hash, email_confirmed, created_at, updated_at, last_login_at";

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.map(|r| row_to_account(&r)).transpose()
    }

    async fn get_by_login_id(&self, login_id: &str) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE login_id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(login_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to get account by login id: {}", e))
        })?;

        row.map(|r| row_to_account(&r)).transpose()
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, login_id, email, password_hash, email_confirmed,
                                  created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id().as_str())
        .bind(account.login_id())
        .bind(account.email())
        .bind(account.password_hash())
        .bind(account.email_confirmed())
        .bind(account.created_at())
        .bind(account.updated_at())
        .bind(account.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_account_insert_error(e, account.login_id()))?;

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET login_id = $2, email = $3, password_hash = $4, email_confirmed = $5,
                updated_at = $6, last_login_at = $7
            WHERE id = $1
            "#,
        )
        .bind(account.id().as_str())
        .bind(account.login_id())
        .bind(account.email())
        .bind(account.password_hash())
        .bind(account.email_confirmed())
        .bind(account.updated_at())
        .bind(account.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_account_insert_error(e, account.login_id()))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                account.id()
            )));
        }

        Ok(account.clone())
    }

    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE accounts SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                id
            )));
        }

        Ok(())
    }
}

/// Map a unique-constraint violation on the login id to a conflict the
/// workflow layer can turn into the user-facing duplicate error.
fn map_account_insert_error(e: sqlx::Error, login_id: &str) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        DomainError::conflict(format!("Login ID '{}' already exists", login_id))
    } else {
        DomainError::storage(format!("Failed to write account: {}", e))
    }
}

fn row_to_account(row: &sqlx::postgres::PgRow) -> Result<Account, DomainError> {
    let id: String = row.get("id");

    let account_id = AccountId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid account ID in database: {}", e)))?;

    Ok(Account::from_parts(
        account_id,
        row.get("login_id"),
        row.get("email"),
        row.get("password_hash"),
        row.get("email_confirmed"),
        row.get("created_at"),
        row.get("updated_at"),
        row.get("last_login_at"),
    ))
}
