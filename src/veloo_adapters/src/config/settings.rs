use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use super::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_DASHBOARD_URL, REGISTRATION_PATH, VERIFY_EMAIL_OTP_PATH, api,
    env, storage,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid onboarding configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingSettings {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub dashboard_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub registration_path: String,
    pub verify_otp_path: String,
    pub timeout_in_millis: u64,
    /// Answer every call locally instead of contacting the API.
    #[serde(default)]
    pub use_mock: bool,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: PathBuf,
    pub redis_host_name: String,
    pub key_prefix: String,
}

impl OnboardingSettings {
    /// Loads settings from defaults, the optional config file and `VELOO__*`
    /// environment variables, later sources winning.
    ///
    /// A `.env` file is read first. The config file location can be changed
    /// with `VELOO_CONFIG_FILE`.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        let config_file = std::env::var(env::CONFIG_FILE_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(config_file)
    }

    /// Same as [`OnboardingSettings::load`] with an explicit config file,
    /// which may be missing. The format follows the file extension.
    pub fn load_from(config_file: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let config_file = config_file.as_ref().to_string_lossy().into_owned();

        let settings = Config::builder()
            .set_default("api.base_url", api::BASE_URL)?
            .set_default("api.registration_path", REGISTRATION_PATH)?
            .set_default("api.verify_otp_path", VERIFY_EMAIL_OTP_PATH)?
            .set_default("api.timeout_in_millis", api::TIMEOUT_IN_MILLIS)?
            .set_default("api.use_mock", false)?
            .set_default("storage.backend", storage::BACKEND)?
            .set_default("storage.path", storage::PATH)?
            .set_default("storage.redis_host_name", storage::REDIS_HOST_NAME)?
            .set_default("storage.key_prefix", storage::KEY_PREFIX)?
            .set_default("dashboard_url", DEFAULT_DASHBOARD_URL)?
            .add_source(File::with_name(&config_file).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}
