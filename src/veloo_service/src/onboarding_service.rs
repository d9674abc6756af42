use std::sync::Arc;

use thiserror::Error;
use veloo_adapters::{OnboardingSettings, SettingsError};
use veloo_application::{FlowHandle, spawn};
use veloo_core::RequestGateway;

use crate::helpers::{configure_gateway, configure_store};
use crate::session_store::SessionStore;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Failed to connect to Redis: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Onboarding flow wired to the gateway and storage named in the settings
pub struct OnboardingService {
    gateway: Arc<dyn RequestGateway>,
    store: SessionStore,
    dashboard_url: String,
}

impl OnboardingService {
    /// Create a new OnboardingService from explicit parts
    ///
    /// # Arguments
    /// * `gateway` - Transport for registration and OTP calls
    /// * `store` - Where an unfinished verification is kept between runs
    /// * `dashboard_url` - Where the seller goes once verified
    pub fn new(
        gateway: Arc<dyn RequestGateway>,
        store: SessionStore,
        dashboard_url: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            store,
            dashboard_url: dashboard_url.into(),
        }
    }

    /// Create an OnboardingService from loaded settings
    #[tracing::instrument(name = "OnboardingService::from_settings", skip_all)]
    pub fn from_settings(settings: &OnboardingSettings) -> Result<Self, ServiceError> {
        let gateway = configure_gateway(&settings.api)?;
        let store = configure_store(&settings.storage)?;
        tracing::info!(
            api = %settings.api.base_url,
            storage = store.backend_name(),
            "Onboarding service configured"
        );
        Ok(Self::new(gateway, store, settings.dashboard_url.clone()))
    }

    /// Load settings from the environment and build the service
    pub fn configure() -> Result<Self, ServiceError> {
        let settings = OnboardingSettings::load()?;
        Self::from_settings(&settings)
    }

    pub fn dashboard_url(&self) -> &str {
        &self.dashboard_url
    }

    /// Mount the flow, restoring any unfinished verification, and start
    /// driving it
    ///
    /// # Returns
    /// The handle the host feeds events into
    pub async fn start(&self) -> FlowHandle {
        spawn(Arc::clone(&self.gateway), self.store.clone()).await
    }
}
