//! In-memory cache for fast redirect lookups.
//!
//! - [`CacheStore`] - the key → destination map and the lock guarding it
//! - [`ReadTransaction`] / [`WriteTransaction`] - scoped handles holding that lock

mod store;
mod transaction;

pub use store::CacheStore;
pub use transaction::{ReadTransaction, WriteTransaction};
