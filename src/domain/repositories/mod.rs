//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`RedirectRepository`] - Redirect record lookup and CRUD

pub mod redirect_repository;

pub use redirect_repository::RedirectRepository;

#[cfg(test)]
pub use redirect_repository::MockRedirectRepository;
