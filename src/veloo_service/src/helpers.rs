use std::sync::Arc;

use redis::{Client, RedisResult};
use reqwest::Client as HttpClient;
use tokio::sync::RwLock;
use veloo_adapters::{
    ApiSettings, FileKeyValueStore, HashMapKeyValueStore, HttpRequestGateway, MockRequestGateway,
    RedisKeyValueStore, StorageBackend, StorageSettings,
};
use veloo_core::{Endpoint, RequestGateway};

use crate::ServiceError;
use crate::session_store::SessionStore;

/// Build the gateway described by the API settings
///
/// # Arguments
/// * `settings` - API location, endpoint paths and timeout
///
/// # Returns
/// The HTTP gateway, or a mock answering every call with success when
/// `use_mock` is set
pub fn configure_gateway(settings: &ApiSettings) -> Result<Arc<dyn RequestGateway>, ServiceError> {
    if settings.use_mock {
        tracing::warn!("Using the mock gateway, no requests will leave this process");
        return Ok(Arc::new(MockRequestGateway::new()));
    }

    let http_client = HttpClient::builder().timeout(settings.timeout()).build()?;
    let gateway = HttpRequestGateway::new(settings.base_url.clone(), http_client)
        .with_path(Endpoint::Registration, settings.registration_path.clone())
        .with_path(Endpoint::VerifyEmailOtp, settings.verify_otp_path.clone());
    Ok(Arc::new(gateway))
}

/// Open the key-value store selected in the storage settings
///
/// # Arguments
/// * `settings` - Backend choice and its location
pub fn configure_store(settings: &StorageSettings) -> Result<SessionStore, ServiceError> {
    let store = match settings.backend {
        StorageBackend::Memory => SessionStore::Memory(HashMapKeyValueStore::new()),
        StorageBackend::File => SessionStore::File(FileKeyValueStore::new(settings.path.clone())),
        StorageBackend::Redis => {
            let conn = get_redis_client(&settings.redis_host_name)?.get_connection()?;
            SessionStore::Redis(RedisKeyValueStore::with_prefix(
                Arc::new(RwLock::new(conn)),
                settings.key_prefix.clone(),
            ))
        }
    };
    Ok(store)
}

/// Create a Redis client
///
/// # Arguments
/// * `redis_hostname` - Redis server hostname
pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    Client::open(redis_url)
}
