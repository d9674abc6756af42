pub mod config;
pub mod gateway;
pub mod persistence;

pub use config::{ApiSettings, OnboardingSettings, SettingsError, StorageBackend, StorageSettings};
pub use gateway::{HttpRequestGateway, MockRequestGateway};
pub use persistence::{FileKeyValueStore, HashMapKeyValueStore, RedisKeyValueStore};
