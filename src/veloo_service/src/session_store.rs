use veloo_adapters::{FileKeyValueStore, HashMapKeyValueStore, RedisKeyValueStore};
use veloo_core::{KeyValueStore, KeyValueStoreError};

/// The key-value backend picked in the settings.
#[derive(Clone)]
pub enum SessionStore {
    Memory(HashMapKeyValueStore),
    File(FileKeyValueStore),
    Redis(RedisKeyValueStore),
}

impl SessionStore {
    pub fn backend_name(&self) -> &'static str {
        match self {
            SessionStore::Memory(_) => "memory",
            SessionStore::File(_) => "file",
            SessionStore::Redis(_) => "redis",
        }
    }

    fn inner(&self) -> &dyn KeyValueStore {
        match self {
            SessionStore::Memory(store) => store,
            SessionStore::File(store) => store,
            SessionStore::Redis(store) => store,
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        self.inner().get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.inner().set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.inner().remove(key).await
    }
}
