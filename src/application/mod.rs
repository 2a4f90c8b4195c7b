//! Application layer services.
//!
//! Services consume repository traits and the cache, and provide a clean API
//! for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::resolver::RedirectResolver`] - Cache-aside key resolution
//! - [`services::redirect_service::RedirectService`] - Redirect CRUD with cache eviction
//! - [`services::auth_service::AuthService`] - Admin bearer token check

pub mod services;
