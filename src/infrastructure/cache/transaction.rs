//! Read and write transactions over a [`super::CacheStore`].
//!
//! A transaction wraps the lock guard itself, so it cannot outlive the
//! acquisition that created it and dropping it is the release. Read and write
//! capabilities are separate types: there is no `set` on [`ReadTransaction`].

use std::collections::HashMap;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

/// Everything the store's lock guards.
#[derive(Debug, Default)]
pub(super) struct CacheState {
    entries: HashMap<String, String>,
    generation: u64,
}

/// Holds the store's shared lock for its whole lifetime.
pub struct ReadTransaction<'a> {
    state: RwLockReadGuard<'a, CacheState>,
}

impl<'a> ReadTransaction<'a> {
    pub(super) fn new(state: RwLockReadGuard<'a, CacheState>) -> Self {
        Self { state }
    }

    /// Returns an owned copy of the destination cached for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.state.entries.get(key).cloned()
    }

    /// Invalidation generation; advances on every [`WriteTransaction::remove`].
    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn len(&self) -> usize {
        self.state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.is_empty()
    }

    /// Releases the shared lock.
    pub fn end(self) {}
}

/// Holds the store's exclusive lock for its whole lifetime.
pub struct WriteTransaction<'a> {
    state: RwLockWriteGuard<'a, CacheState>,
}

impl<'a> WriteTransaction<'a> {
    pub(super) fn new(state: RwLockWriteGuard<'a, CacheState>) -> Self {
        Self { state }
    }

    /// Returns an owned copy of the destination cached for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.state.entries.get(key).cloned()
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    /// Inserts or overwrites the destination for `key`.
    pub fn set(&mut self, key: impl Into<String>, destination: impl Into<String>) {
        self.state.entries.insert(key.into(), destination.into());
    }

    /// Drops the entry for `key`. Returns `true` if one was present.
    ///
    /// The generation advances even when nothing was cached: a lookup that
    /// read the database before the removal may still be about to populate.
    pub fn remove(&mut self, key: &str) -> bool {
        self.state.generation = self.state.generation.wrapping_add(1);
        self.state.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.is_empty()
    }

    /// Releases the exclusive lock.
    pub fn end(self) {}
}
