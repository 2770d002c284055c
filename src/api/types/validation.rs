//! Wire representation of validation failures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::validation::{FieldError, ValidationReport};

/// One failed rule on the wire: field name, machine code, localized message
#[derive(Debug, Clone, Serialize)]
pub struct FieldErrorBody {
    pub field: &'static str,
    pub code: &'static str,
    pub message: &'static str,
}

impl From<&FieldError> for FieldErrorBody {
    fn from(error: &FieldError) -> Self {
        Self {
            field: error.field.as_str(),
            code: error.kind.code(),
            message: error.message(),
        }
    }
}

/// Convert a report into wire bodies, preserving rule order
pub fn field_error_bodies(report: &ValidationReport) -> Vec<FieldErrorBody> {
    report.errors().iter().map(FieldErrorBody::from).collect()
}

/// Response for submissions rejected by field validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldErrorBody>,
}

impl ValidationErrorResponse {
    pub fn from_report(report: &ValidationReport) -> Self {
        Self {
            errors: field_error_bodies(report),
        }
    }
}

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}
