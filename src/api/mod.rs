//! HTTP layer: request/response handling for the redirect and admin endpoints.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, rate limiting and tracing middleware
//! - [`routes`] - Admin route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
