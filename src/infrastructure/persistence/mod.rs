//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgRedirectRepository`] - Redirect record storage and lookup

pub mod pg_redirect_repository;

pub use pg_redirect_repository::{DEFAULT_QUERY_TIMEOUT, PgRedirectRepository};
