//! Core domain entities.
//!
//! - [`Redirect`] - a stored key → destination record
//! - [`NewRedirect`] - input for creating one

pub mod redirect;

pub use redirect::{NewRedirect, Redirect};
