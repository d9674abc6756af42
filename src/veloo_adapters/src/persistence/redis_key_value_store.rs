use std::sync::Arc;

use redis::{Commands, Connection};
use tokio::sync::RwLock;
use veloo_core::{KeyValueStore, KeyValueStoreError};

use crate::config::constants::storage::KEY_PREFIX;

/// Keys are namespaced with a prefix so onboarding state can share a database.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    conn: Arc<RwLock<Connection>>,
    key_prefix: String,
}

impl RedisKeyValueStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self::with_prefix(conn, KEY_PREFIX)
    }

    pub fn with_prefix(conn: Arc<RwLock<Connection>>, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    fn get_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let key = self.get_key(key);
        let mut conn = self.conn.write().await;
        conn.get::<_, Option<String>>(&key)
            .map_err(|e| KeyValueStoreError::Unavailable(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let key = self.get_key(key);
        let mut conn = self.conn.write().await;
        conn.set::<_, _, ()>(&key, value)
            .map_err(|e| KeyValueStoreError::Unavailable(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let key = self.get_key(key);
        let mut conn = self.conn.write().await;
        conn.del::<_, ()>(&key)
            .map_err(|e| KeyValueStoreError::Unavailable(e.to_string()))
    }
}

