//! User Registry API
//!
//! A user registration and profile management service:
//! - account sign-up and login with argon2-hashed credentials and JWT sessions
//! - profile records managed through a confirm-before-save workflow
//! - structured field validation with localized messages
//! - PostgreSQL persistence behind repository traits

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use infrastructure::account::{AccountService, Argon2Hasher, PostgresAccountRepository};
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::profile::{PostgresProfileRepository, ProfileService};
use infrastructure::storage::{self, PostgresMigrator};

/// Create the application state with all services wired to PostgreSQL
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Connecting to PostgreSQL");
    let pool = storage::connect(&config.database).await?;
    info!("PostgreSQL connection established");

    // Schema is applied on startup; already-applied versions are skipped
    let migrator = PostgresMigrator::new(pool.clone());
    migrator.run_all().await?;

    let password_hasher = Arc::new(Argon2Hasher::new());

    let account_repository = Arc::new(PostgresAccountRepository::new(pool.clone()));
    let account_service: Arc<dyn api::state::AccountServiceTrait> = Arc::new(
        AccountService::new(account_repository, password_hasher.clone()),
    );

    let profile_repository = Arc::new(PostgresProfileRepository::new(pool));
    let profile_service: Arc<dyn api::state::ProfileServiceTrait> = Arc::new(
        ProfileService::new(profile_repository, password_hasher),
    );

    let jwt_service: Arc<dyn infrastructure::auth::JwtGenerator> =
        Arc::new(JwtService::new(JwtConfig::new(
            &config.auth.jwt_secret,
            config.auth.jwt_expiration_hours,
            config.auth.remember_me_expiration_hours,
        )));

    Ok(AppState::new(
        account_service,
        profile_service,
        jwt_service,
        config.auth.external_schemes.clone(),
    ))
}

/// Create application state backed by in-memory repositories.
///
/// Used by tests and usable for local development without a database.
pub fn create_in_memory_app_state(config: &AppConfig) -> AppState {
    use infrastructure::account::InMemoryAccountRepository;
    use infrastructure::profile::InMemoryProfileRepository;

    let password_hasher = Arc::new(Argon2Hasher::new());

    let account_repository = Arc::new(InMemoryAccountRepository::new());
    let profile_repository = Arc::new(InMemoryProfileRepository::new(account_repository.clone()));

    let account_service: Arc<dyn api::state::AccountServiceTrait> = Arc::new(
        AccountService::new(account_repository, password_hasher.clone()),
    );
    let profile_service: Arc<dyn api::state::ProfileServiceTrait> = Arc::new(
        ProfileService::new(profile_repository, password_hasher),
    );

    let jwt_service: Arc<dyn infrastructure::auth::JwtGenerator> =
        Arc::new(JwtService::new(JwtConfig::new(
            &config.auth.jwt_secret,
            config.auth.jwt_expiration_hours,
            config.auth.remember_me_expiration_hours,
        )));

    AppState::new(
        account_service,
        profile_service,
        jwt_service,
        config.auth.external_schemes.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_state_wiring() {
        let state = create_in_memory_app_state(&AppConfig::default());

        assert!(state.external_schemes.is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_state_serves_workflows() {
        use infrastructure::account::RegisterAccountRequest;

        let state = create_in_memory_app_state(&AppConfig::default());

        let account = state
            .account_service
            .register(RegisterAccountRequest {
                login_id: "tanaka01".to_string(),
                email: "tanaka@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await
            .unwrap();

        let token = state.jwt_service.generate(&account, false).unwrap();
        let claims = state.jwt_service.validate(&token).unwrap();

        assert_eq!(claims.login_id, "tanaka01");
    }
}
