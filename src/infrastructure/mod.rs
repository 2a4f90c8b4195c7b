//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - In-memory redirect cache
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod persistence;
