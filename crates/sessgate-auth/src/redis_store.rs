//! Redis-backed session store.
//!
//! [`RedisSessionStore`] holds a [`ConnectionManager`], which multiplexes
//! requests over one connection and reconnects after failures. Each lookup
//! works on a cheap clone of the manager, so concurrent requests never wait
//! on each other and an abandoned lookup leaves nothing behind.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use sessgate_core::StoreSettings;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::SessionStore;

/// Session store reading records from Redis with `GET`.
#[derive(Clone)]
pub struct RedisSessionStore {
    manager: ConnectionManager,
    url: String,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl RedisSessionStore {
    /// Connect to the Redis server described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the URL is invalid or the initial
    /// connection cannot be established.
    pub async fn connect(settings: &StoreSettings) -> Result<Self, StoreError> {
        let url = settings.url();
        let client = redis::Client::open(url.as_str())?;
        let manager = ConnectionManager::new(client).await?;

        info!(host = settings.host(), port = settings.port(), "connected to session store");

        Ok(Self { manager, url })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        debug!(found = value.is_some(), "session store lookup");
        Ok(value)
    }
}
