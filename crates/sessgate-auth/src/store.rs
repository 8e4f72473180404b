//! Session store trait and an in-memory implementation.
//!
//! The authenticator only ever reads from the store: one `get` per request,
//! keyed by `sessionIDPrefix + sessionID`. Implementations must be safe for
//! concurrent use from many request tasks.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;

/// Read access to serialized session records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be queried. A missing key
    /// is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

/// A concurrent in-memory session store.
///
/// Suitable for tests and local development. Values can be inserted and
/// removed while requests are in flight.
///
/// # Examples
///
/// ```
/// use sessgate_auth::MemorySessionStore;
///
/// let store = MemorySessionStore::new();
/// store.insert("sess:abc", r#"{"user":"alice"}"#);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: DashMap<String, Vec<u8>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.records.insert(key.into(), value.into());
    }

    /// Remove the value under `key`.
    pub fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.records.remove(key).map(|(_, v)| v)
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(String, Vec<u8>)> for MemorySessionStore {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.get(key).map(|v| v.value().clone()))
    }
}
