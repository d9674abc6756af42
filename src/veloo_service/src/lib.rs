mod helpers;
mod onboarding_service;
mod session_store;
pub mod terminal;
mod tracing;

pub use helpers::{configure_gateway, configure_store, get_redis_client};
pub use onboarding_service::{OnboardingService, ServiceError};
pub use session_store::SessionStore;
pub use tracing::init_tracing;
