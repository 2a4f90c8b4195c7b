//! Domain layer: entities and repository interfaces.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits are implemented in [`crate::infrastructure`].

pub mod entities;
pub mod repositories;
