//! API wire types

pub mod error;
pub mod json;
pub mod validation;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use validation::{field_error_bodies, FieldErrorBody, ValidationErrorResponse};
