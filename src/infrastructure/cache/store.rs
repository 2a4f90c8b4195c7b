//! In-process cache store guarded by a single readers-writer lock.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use super::transaction::{CacheState, ReadTransaction, WriteTransaction};

/// In-memory mapping from redirect key to active destination.
///
/// One coarse [`RwLock`] guards the whole map: any number of read transactions
/// may run together, a write transaction excludes everything else. The store
/// is created once at startup and shared behind an `Arc`; entries are never
/// expired, only overwritten or removed through a [`WriteTransaction`].
///
/// Every removal bumps an invalidation generation kept under the same lock.
/// A caller that reads the generation, leaves the lock to consult the
/// database, and comes back to populate can compare it and skip a write that
/// an eviction has since made stale.
///
/// Lock acquisition blocks the calling thread with no deadline. Transactions
/// are meant to be short and synchronous; never hold one across an `.await`.
#[derive(Debug, Default)]
pub struct CacheStore {
    state: RwLock<CacheState>,
}

impl CacheStore {
    /// Creates a new, empty store.
    pub fn open() -> Self {
        debug!("Opening in-memory redirect cache");
        Self::default()
    }

    /// Acquires the shared lock and returns a read-only transaction.
    ///
    /// A panic inside an earlier transaction poisons the lock; the guard is
    /// recovered here so a failed caller cannot wedge the store.
    pub fn begin_read(&self) -> ReadTransaction<'_> {
        let guard = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        ReadTransaction::new(guard)
    }

    /// Acquires the exclusive lock and returns a read-write transaction.
    pub fn begin_write(&self) -> WriteTransaction<'_> {
        let guard = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        WriteTransaction::new(guard)
    }

    /// Runs `f` inside a read transaction.
    ///
    /// The lock is released when `f` returns or unwinds. Whatever `f` returns,
    /// including an `Err`, is handed back unchanged.
    pub fn view<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&ReadTransaction<'_>) -> T,
    {
        let tx = self.begin_read();
        f(&tx)
    }

    /// Runs `f` inside a write transaction.
    ///
    /// Same release and propagation rules as [`CacheStore::view`].
    pub fn update<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut WriteTransaction<'_>) -> T,
    {
        let mut tx = self.begin_write();
        f(&mut tx)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.view(|tx| tx.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
