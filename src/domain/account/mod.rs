//! Credential account domain
//!
//! The identity half of the system: login name, password hash, and email,
//! looked up at login and provisioned at registration or profile save.

mod entity;
mod repository;
mod validation;

pub use entity::{Account, AccountId};
pub use repository::AccountRepository;
pub use validation::{validate_login, validate_registration};
