//! Profile record domain
//!
//! The personal-details half of the system: the "UserInfo" record managed
//! through the list/detail/confirm/save/edit/delete workflow. A submission
//! becomes a draft at the confirm step and a stored record at the save step.

mod entity;
mod repository;
mod validation;

pub use entity::{ProfileDraft, ProfileId, ProfileRecord, ProfileSubmission, ProfileUpdate};
pub use repository::ProfileRepository;
pub use validation::{birthdate_is_valid, validate_submission};
