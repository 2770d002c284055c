//! Profile management endpoints
//!
//! The two-step confirm-before-save workflow plus list/detail/edit/delete.
//! Every endpoint requires an authenticated session. Confirm never writes;
//! save never re-runs the field rules.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{field_error_bodies, ApiError, FieldErrorBody, Json, ValidationErrorResponse};
use crate::domain::profile::{ProfileDraft, ProfileRecord, ProfileSubmission, ProfileUpdate};
use crate::domain::validation::{ErrorKind, Field, FieldError};
use crate::domain::DomainError;
use crate::infrastructure::profile::{ConfirmOutcome, EditOutcome};

const SAVE_SUCCESS_MESSAGE: &str = "ユーザー情報が正常に保存されました。";
const SAVE_ERROR_MESSAGE: &str = "ユーザー情報の保存中にエラーが発生しました。";
const EDIT_SUCCESS_MESSAGE: &str = "ユーザー情報が正常に編集されました。";
const EDIT_ERROR_MESSAGE: &str = "ユーザー情報の編集中にエラーが発生しました。";
const DELETE_SUCCESS_MESSAGE: &str = "ユーザー情報が正常に削除されました。";
const DELETE_ERROR_MESSAGE: &str = "ユーザー情報の削除中にエラーが発生しました。";

/// Create the profiles router
pub fn create_profiles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(save_profile))
        .route("/confirm", post(confirm_profile))
        .route(
            "/{id}",
            get(get_profile).put(edit_profile).delete(delete_profile),
        )
}

/// Profile response
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    pub kana: String,
    pub gender: String,
    pub birthdate: String,
    pub phone_number: String,
    pub email: String,
    pub login_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ProfileRecord> for ProfileResponse {
    fn from(record: &ProfileRecord) -> Self {
        Self {
            id: record.id().value(),
            name: record.name().to_string(),
            kana: record.kana().to_string(),
            gender: record.gender().to_string(),
            birthdate: record.birthdate().to_string(),
            phone_number: record.phone_number().to_string(),
            email: record.email().to_string(),
            login_id: record.login_id().to_string(),
            created_at: record.created_at().to_rfc3339(),
            updated_at: record.updated_at().to_rfc3339(),
        }
    }
}

/// List profiles response
#[derive(Debug, Serialize)]
pub struct ListProfilesResponse {
    pub profiles: Vec<ProfileResponse>,
    pub total: usize,
}

/// Confirm response: the validated pending record, or the failed rules.
/// Mirrors re-rendering the form with errors, so the status is 200 either way.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDraft>,
    pub errors: Vec<FieldErrorBody>,
}

/// Save request: a previously confirmed record, without the transient
/// confirmation field
#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub name: String,
    pub kana: String,
    pub gender: String,
    pub birthdate: chrono::NaiveDate,
    pub phone_number: String,
    pub email: String,
    pub login_id: String,
    pub password: String,
}

impl From<SaveProfileRequest> for ProfileDraft {
    fn from(request: SaveProfileRequest) -> Self {
        Self {
            name: request.name,
            kana: request.kana,
            gender: request.gender,
            birthdate: request.birthdate,
            phone_number: request.phone_number,
            email: request.email,
            login_id: request.login_id,
            password: request.password,
        }
    }
}

/// Mutation response carrying the localized banner
#[derive(Debug, Serialize)]
pub struct ProfileMutationResponse {
    pub message: String,
    pub profile: ProfileResponse,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteProfileResponse {
    pub message: String,
    pub deleted: bool,
    pub id: i64,
}

/// GET /profiles
pub async fn list_profiles(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
) -> Result<Json<ListProfilesResponse>, ApiError> {
    debug!(user = %account.login_id(), "Profile list accessed");

    let records = state.profile_service.list().await.map_err(ApiError::from)?;

    let profiles: Vec<ProfileResponse> = records.iter().map(ProfileResponse::from).collect();
    let total = profiles.len();

    Ok(Json(ListProfilesResponse { profiles, total }))
}

/// GET /profiles/{id}
///
/// Details view; also the fetch behind the edit and delete confirmation
/// screens, so a missing id is reported as not-found here.
pub async fn get_profile(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(id): Path<i64>,
) -> Result<Json<ProfileResponse>, ApiError> {
    debug!(user = %account.login_id(), id, "Profile details accessed");

    let record = state
        .profile_service
        .get(id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Profile '{}' not found", id)))?;

    Ok(Json(ProfileResponse::from(&record)))
}

/// POST /profiles/confirm
///
/// The confirm step: every rule runs, nothing is persisted.
pub async fn confirm_profile(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Json(submission): Json<ProfileSubmission>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    debug!(user = %account.login_id(), "Confirm step requested");

    let outcome = state
        .profile_service
        .confirm(submission)
        .await
        .map_err(ApiError::from)?;

    let response = match outcome {
        ConfirmOutcome::Confirmed(draft) => ConfirmResponse {
            valid: true,
            profile: Some(draft),
            errors: Vec::new(),
        },
        ConfirmOutcome::Invalid(report) => ConfirmResponse {
            valid: false,
            profile: None,
            errors: field_error_bodies(&report),
        },
    };

    Ok(Json(response))
}

/// POST /profiles
///
/// The save step: insert a confirmed record. Field rules are not re-run;
/// the storage uniqueness constraint decides late duplicates.
pub async fn save_profile(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Json(request): Json<SaveProfileRequest>,
) -> Result<Response, ApiError> {
    debug!(user = %account.login_id(), login_id = %request.login_id, "Save step requested");

    let record = state
        .profile_service
        .save(request.into())
        .await
        .map_err(|e| match e {
            DomainError::Conflict { .. } => ApiError::conflict(
                FieldError::new(Field::LoginId, ErrorKind::Duplicate).message(),
            )
            .with_param("login_id"),
            other => {
                error!(error = %other, "Failed to save profile record");
                ApiError::internal(SAVE_ERROR_MESSAGE)
            }
        })?;

    let response = ProfileMutationResponse {
        message: SAVE_SUCCESS_MESSAGE.to_string(),
        profile: ProfileResponse::from(&record),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// PUT /profiles/{id}
///
/// The edit step: path and body ids must match, the imperative rules are
/// re-run, and zero affected rows is not-found.
pub async fn edit_profile(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(id): Path<i64>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Response, ApiError> {
    debug!(user = %account.login_id(), id, "Edit step requested");

    let outcome = state
        .profile_service
        .edit(id, update)
        .await
        .map_err(|e| match e {
            DomainError::NotFound { message } => ApiError::not_found(message),
            DomainError::Conflict { .. } => ApiError::conflict(
                FieldError::new(Field::LoginId, ErrorKind::Duplicate).message(),
            )
            .with_param("login_id"),
            other => {
                error!(error = %other, id, "Failed to edit profile record");
                ApiError::internal(EDIT_ERROR_MESSAGE)
            }
        })?;

    match outcome {
        EditOutcome::Updated(record) => {
            let response = ProfileMutationResponse {
                message: EDIT_SUCCESS_MESSAGE.to_string(),
                profile: ProfileResponse::from(&record),
            };
            Ok(Json(response).into_response())
        }
        EditOutcome::Invalid(report) => {
            Ok(ValidationErrorResponse::from_report(&report).into_response())
        }
    }
}

/// DELETE /profiles/{id}
pub async fn delete_profile(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(id): Path<i64>,
) -> Result<Json<DeleteProfileResponse>, ApiError> {
    debug!(user = %account.login_id(), id, "Delete requested");

    let deleted = state.profile_service.delete(id).await.map_err(|e| {
        error!(error = %e, id, "Failed to delete profile record");
        ApiError::internal(DELETE_ERROR_MESSAGE)
    })?;

    if !deleted {
        return Err(ApiError::not_found(format!("Profile '{}' not found", id)));
    }

    Ok(Json(DeleteProfileResponse {
        message: DELETE_SUCCESS_MESSAGE.to_string(),
        deleted: true,
        id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_save_request_into_draft() {
        let request = SaveProfileRequest {
            name: "田中太郎".to_string(),
            kana: "タナカ タロウ".to_string(),
            gender: "男性".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
            phone_number: "09012345678".to_string(),
            email: "tanaka@example.com".to_string(),
            login_id: "tanaka01".to_string(),
            password: "Passw0rd".to_string(),
        };

        let draft: ProfileDraft = request.into();
        assert_eq!(draft.login_id, "tanaka01");
        assert_eq!(draft.password, "Passw0rd");
    }

    #[test]
    fn test_save_request_has_no_confirm_password_field() {
        // The transient confirmation field belongs to the confirm step only
        let json = r#"{
            "name": "田中太郎",
            "kana": "タナカ",
            "gender": "男性",
            "birthdate": "1990-04-01",
            "phone_number": "09012345678",
            "email": "tanaka@example.com",
            "login_id": "tanaka01",
            "password": "Passw0rd"
        }"#;

        let request: SaveProfileRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.birthdate, NaiveDate::from_ymd_opt(1990, 4, 1).unwrap());
    }

    #[test]
    fn test_confirm_response_serialization() {
        let response = ConfirmResponse {
            valid: false,
            profile: None,
            errors: vec![FieldErrorBody {
                field: "login_id",
                code: "duplicate",
                message: "このログインIDはすでに使用されています。別のIDを入力してください。",
            }],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"valid\":false"));
        assert!(!json.contains("\"profile\""));
        assert!(json.contains("duplicate"));
    }

    #[test]
    fn test_mutation_messages() {
        assert_eq!(SAVE_SUCCESS_MESSAGE, "ユーザー情報が正常に保存されました。");
        assert_eq!(EDIT_SUCCESS_MESSAGE, "ユーザー情報が正常に編集されました。");
        assert_eq!(DELETE_SUCCESS_MESSAGE, "ユーザー情報が正常に削除されました。");
    }
}
