//! Redirect administration: CRUD over records with cache eviction on write.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{NewRedirect, Redirect};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheStore;

/// Service for managing redirect records.
///
/// Updates and deletes evict the key from the cache after the database write
/// commits, so the next resolution reloads the current destination instead of
/// serving the old one for the rest of the process lifetime.
pub struct RedirectService<R: RedirectRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<CacheStore>,
}

impl<R: RedirectRepository + ?Sized> RedirectService<R> {
    /// Creates a new redirect service.
    pub fn new(repository: Arc<R>, cache: Arc<CacheStore>) -> Self {
        Self { repository, cache }
    }

    /// Creates a redirect record.
    ///
    /// Nothing is written to the cache; the first resolution populates it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the key is already taken.
    pub async fn create(&self, new_redirect: NewRedirect) -> Result<Redirect, AppError> {
        let redirect = self.repository.create(new_redirect).await?;
        info!(id = redirect.id, key = %redirect.key, "Redirect created");
        Ok(redirect)
    }

    /// Retrieves a redirect by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn get(&self, id: i64) -> Result<Redirect, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| redirect_not_found(id))
    }

    /// Lists redirects matching an optional key substring.
    ///
    /// Returns the requested page together with the total match count.
    pub async fn list(
        &self,
        name: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Redirect>, i64), AppError> {
        let name = name.filter(|n| !n.is_empty());
        let items = self.repository.list(name.clone(), offset, limit).await?;
        let total = self.repository.count(name).await?;
        Ok((items, total))
    }

    /// Points a redirect at a new destination and evicts its cache entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn update_destination(
        &self,
        id: i64,
        destination: String,
    ) -> Result<Redirect, AppError> {
        let redirect = self
            .repository
            .update_destination(id, destination)
            .await?
            .ok_or_else(|| redirect_not_found(id))?;

        self.evict(&redirect.key);
        info!(id, key = %redirect.key, "Redirect destination updated");

        Ok(redirect)
    }

    /// Deletes a redirect and evicts its cache entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn delete(&self, id: i64) -> Result<Redirect, AppError> {
        let redirect = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| redirect_not_found(id))?;

        self.evict(&redirect.key);
        info!(id, key = %redirect.key, "Redirect deleted");

        Ok(redirect)
    }

    /// Checks the persistent store.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    fn evict(&self, key: &str) {
        if self.cache.update(|tx| tx.remove(key)) {
            debug!(key, "Cache INVALIDATE");
        }
    }
}

fn redirect_not_found(id: i64) -> AppError {
    AppError::not_found("Redirect not found", json!({ "id": id }))
}
