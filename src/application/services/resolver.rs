//! Cache-aside redirect resolution.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, error};

use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheStore;

/// Outcome of a successful resolution.
///
/// A failed persistent-store lookup is not a variant: it is returned as the
/// `Err` side of [`RedirectResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Served from the in-memory cache.
    Hit(String),
    /// Loaded from the persistent store and now cached.
    Miss(String),
    /// No record has this key. Nothing was cached.
    NotFound,
}

impl Resolution {
    /// The destination to redirect to, if any.
    pub fn destination(&self) -> Option<&str> {
        match self {
            Resolution::Hit(destination) | Resolution::Miss(destination) => Some(destination),
            Resolution::NotFound => None,
        }
    }

    /// Short label used for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Hit(_) => "hit",
            Resolution::Miss(_) => "miss",
            Resolution::NotFound => "not_found",
        }
    }
}

/// Resolves redirect keys, preferring the cache and populating it on miss.
///
/// Negative results are never cached: a key created right after a failed
/// lookup becomes resolvable on the very next request. Cached entries are
/// only replaced by another population or removed by the admin service.
pub struct RedirectResolver<R: RedirectRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<CacheStore>,
}

impl<R: RedirectRepository + ?Sized> RedirectResolver<R> {
    /// Creates a resolver over the given persistent store and cache.
    pub fn new(repository: Arc<R>, cache: Arc<CacheStore>) -> Self {
        Self { repository, cache }
    }

    /// Resolves `key` to its active destination.
    ///
    /// # Flow
    ///
    /// 1. Read transaction on the cache; a hit returns immediately
    /// 2. On miss, query the persistent store
    /// 3. Found: write transaction caching the destination, return [`Resolution::Miss`].
    ///    The write is skipped if an eviction ran while the lookup was in flight,
    ///    so a record deleted or changed meanwhile is never cached
    /// 4. Not found: return [`Resolution::NotFound`] without caching
    ///
    /// # Errors
    ///
    /// Returns the repository's error unchanged when the lookup fails. Nothing
    /// is cached in that case.
    pub async fn resolve(&self, key: &str) -> Result<Resolution, AppError> {
        let (cached, generation) = self.cache.view(|tx| (tx.get(key), tx.generation()));
        if let Some(destination) = cached {
            debug!(key, "Cache HIT");
            counter!("redirect_resolutions_total", "outcome" => "hit").increment(1);
            return Ok(Resolution::Hit(destination));
        }

        debug!(key, "Cache MISS");

        let record = match self.repository.find_by_key(key).await {
            Ok(record) => record,
            Err(e) => {
                error!(key, error = %e, "Redirect lookup failed");
                counter!("redirect_resolutions_total", "outcome" => "failure").increment(1);
                return Err(e);
            }
        };

        let Some(record) = record else {
            debug!(key, "Redirect not found");
            counter!("redirect_resolutions_total", "outcome" => "not_found").increment(1);
            return Ok(Resolution::NotFound);
        };

        let populated = self.cache.update(|tx| {
            if tx.generation() != generation {
                return false;
            }
            tx.set(key, record.active_destination.as_str());
            true
        });
        if !populated {
            debug!(key, "Cache invalidated during lookup, not populating");
        }
        counter!("redirect_resolutions_total", "outcome" => "miss").increment(1);

        Ok(Resolution::Miss(record.active_destination))
    }
}
