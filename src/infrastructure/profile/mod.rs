//! Profile infrastructure
//!
//! Postgres and in-memory repository implementations plus the workflow
//! service driving the confirm/save/edit/delete lifecycle.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresProfileRepository;
pub use repository::InMemoryProfileRepository;
pub use service::{ConfirmOutcome, EditOutcome, ProfileService};
