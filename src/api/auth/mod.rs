//! Authentication endpoints
//!
//! Registration, login, logout, session introspection, and the external
//! login scheme listing.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ValidationErrorResponse};
use crate::domain::account::{validate_login, validate_registration, Account};
use crate::domain::validation::{ErrorKind, Field, FieldError};
use crate::domain::DomainError;
use crate::infrastructure::account::RegisterAccountRequest;

/// Single message for every failed login, never revealing which part was wrong
const LOGIN_FAILED_MESSAGE: &str = "無効なログイン試行です。";

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_account))
        .route("/external", get(list_external_schemes))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub login_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub return_url: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login_id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
    #[serde(default)]
    pub return_url: Option<String>,
}

/// Session response returned by register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub account: AccountResponse,
    pub expires_at: String,
    /// Safe local path the client should navigate to next
    pub redirect_to: String,
}

/// Account response (safe to expose)
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub login_id: String,
    pub email: String,
    pub email_confirmed: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl AccountResponse {
    fn from_account(account: &Account) -> Self {
        Self {
            id: account.id().as_str().to_string(),
            login_id: account.login_id().to_string(),
            email: account.email().to_string(),
            email_confirmed: account.email_confirmed(),
            created_at: account.created_at().to_rfc3339(),
            last_login_at: account.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Register a new account
///
/// POST /auth/register
///
/// On success the new account is signed in immediately with the standard
/// (non-persistent) token lifetime.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    debug!(login_id = %request.login_id, "Registration requested");

    let report = validate_registration(
        &request.login_id,
        &request.email,
        &request.password,
        &request.confirm_password,
    );

    if !report.is_valid() {
        return Ok(ValidationErrorResponse::from_report(&report).into_response());
    }

    let account = state
        .account_service
        .register(RegisterAccountRequest {
            login_id: request.login_id,
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(|e| match e {
            // Store-level failures surface as one form-level message
            DomainError::Conflict { .. } => ApiError::conflict(
                FieldError::new(Field::LoginId, ErrorKind::Duplicate).message(),
            ),
            other => ApiError::internal(other.to_string()),
        })?;

    let session = build_session(&state, &account, false, request.return_url.as_deref())?;

    Ok((StatusCode::CREATED, Json(session)).into_response())
}

/// Login with login id and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let report = validate_login(&request.login_id, &request.password);

    if !report.is_valid() {
        return Ok(ValidationErrorResponse::from_report(&report).into_response());
    }

    let account = state
        .account_service
        .authenticate(&request.login_id, &request.password)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized(LOGIN_FAILED_MESSAGE))?;

    let session = build_session(
        &state,
        &account,
        request.remember_me,
        request.return_url.as_deref(),
    )?;

    Ok(Json(session).into_response())
}

fn build_session(
    state: &AppState,
    account: &Account,
    remember_me: bool,
    return_url: Option<&str>,
) -> Result<SessionResponse, ApiError> {
    let token = state
        .jwt_service
        .generate(account, remember_me)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let expires_at =
        Utc::now() + Duration::hours(state.jwt_service.expiration_hours(remember_me) as i64);

    Ok(SessionResponse {
        token,
        account: AccountResponse::from_account(account),
        expires_at: expires_at.to_rfc3339(),
        redirect_to: sanitize_return_url(return_url),
    })
}

/// Only local paths may be used as a post-login redirect; anything else
/// falls back to the site root
fn sanitize_return_url(return_url: Option<&str>) -> String {
    match return_url {
        Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\") => {
            url.to_string()
        }
        _ => "/".to_string(),
    }
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Logout (client-side only for stateless tokens)
///
/// POST /auth/logout
pub async fn logout(_user: RequireUser) -> Result<Json<LogoutResponse>, ApiError> {
    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Get the currently authenticated account
///
/// GET /auth/me
pub async fn get_current_account(
    RequireUser(account): RequireUser,
) -> Result<Json<AccountResponse>, ApiError> {
    Ok(Json(AccountResponse::from_account(&account)))
}

/// External login schemes response
#[derive(Debug, Serialize)]
pub struct ExternalSchemesResponse {
    pub schemes: Vec<String>,
}

/// List configured external login schemes
///
/// GET /auth/external
pub async fn list_external_schemes(
    State(state): State<AppState>,
) -> Result<Json<ExternalSchemesResponse>, ApiError> {
    Ok(Json(ExternalSchemesResponse {
        schemes: state.external_schemes.as_ref().clone(),
    }))
}
