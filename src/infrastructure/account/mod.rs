//! Account infrastructure
//!
//! Argon2 hashing, the Postgres and in-memory repository implementations,
//! and the registration/authentication service.

pub mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresAccountRepository;
pub use repository::InMemoryAccountRepository;
pub use service::{AccountService, RegisterAccountRequest};
