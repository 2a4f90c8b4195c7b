//! Redirect entity: a key and the destination it currently points at.

use chrono::{DateTime, Utc};

/// A stored redirect record.
///
/// `key` is the identifier clients request; `active_destination` is where it
/// redirects today. When the destination changes, the old value moves to
/// `previous_destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub id: i64,
    pub key: String,
    pub active_destination: String,
    pub previous_destination: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Redirect {
    /// Creates a new Redirect instance.
    pub fn new(
        id: i64,
        key: String,
        active_destination: String,
        previous_destination: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            key,
            active_destination,
            previous_destination,
            created_at,
            updated_at,
        }
    }

    /// Returns true if the destination has been changed at least once.
    pub fn has_history(&self) -> bool {
        self.previous_destination.is_some()
    }
}

/// Input data for creating a new redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRedirect {
    pub key: String,
    pub active_destination: String,
}
