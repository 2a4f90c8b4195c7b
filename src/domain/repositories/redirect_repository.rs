//! Repository trait for redirect records: the persistent store.

use crate::domain::entities::{NewRedirect, Redirect};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface over the durable redirect table.
///
/// The resolver only calls [`RedirectRepository::find_by_key`]; everything
/// else serves the administration surface.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRedirectRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_redirect.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Looks up the record for a redirect key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Redirect))` if found
    /// - `Ok(None)` if no record has this key
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors or timeouts. A missing
    /// key is never reported as an error.
    async fn find_by_key(&self, key: &str) -> Result<Option<Redirect>, AppError>;

    /// Finds a record by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Redirect>, AppError>;

    /// Creates a redirect record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the key already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_redirect: NewRedirect) -> Result<Redirect, AppError>;

    /// Lists records ordered by id, optionally filtered by a literal,
    /// case-insensitive key substring.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(
        &self,
        name: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Redirect>, AppError>;

    /// Counts records matching the same filter as [`RedirectRepository::list`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, name: Option<String>) -> Result<i64, AppError>;

    /// Points a record at a new destination.
    ///
    /// The current active destination becomes the previous one in the same
    /// statement. Returns `Ok(None)` if no record has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_destination(
        &self,
        id: i64,
        destination: String,
    ) -> Result<Option<Redirect>, AppError>;

    /// Deletes a record, returning it so callers can evict its key.
    ///
    /// Returns `Ok(None)` if no record has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<Option<Redirect>, AppError>;

    /// Checks that the backing store answers queries.
    async fn ping(&self) -> Result<(), AppError>;
}
