pub mod constants;
pub mod settings;

pub use settings::{ApiSettings, OnboardingSettings, SettingsError, StorageBackend, StorageSettings};
