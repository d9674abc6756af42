//! # Veloo Onboarding - Seller Signup and Email Verification
//!
//! This is a facade crate that re-exports all public APIs from the onboarding components.
//! Use this crate to get access to the whole signup-to-verification flow in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! veloo_onboarding = { path = "../veloo_onboarding" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `FormData`, `Email`, `OtpInput`, `PasswordStrength`, etc.
//! - **Ports**: `KeyValueStore`, `RequestGateway`
//! - **Application**: `SignupController`, `VerificationController`, `OnboardingFlow`, `spawn`
//! - **Adapters**: `FileKeyValueStore`, `RedisKeyValueStore`, `HttpRequestGateway`, etc.
//! - **Service**: `OnboardingService` - wires everything from `OnboardingSettings`

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types, validation and ports
pub mod core {
    pub use veloo_core::*;
}

// Re-export most commonly used core types at the root level
pub use veloo_core::{
    BusinessType, Email, EmailError, Field, FormData, FormEdit, FormErrors, Location, OtpInput,
    PasswordStrength, StrengthLabel, is_valid_email, score_password, validate,
};

// ============================================================================
// Ports
// ============================================================================

/// Port trait definitions
pub mod ports {
    pub use veloo_core::{
        Encoding, Endpoint, GatewayError, GatewayRequest, KeyValueStore, KeyValueStoreError,
        Method, Payload, RequestGateway,
    };
}

// Re-export port traits at root level
pub use ports::{GatewayError, KeyValueStore, KeyValueStoreError, RequestGateway};

// ============================================================================
// Application Layer
// ============================================================================

/// Controllers, persistence and the flow runtime
pub mod application {
    pub use veloo_application::*;
}

// Re-export the flow API at root level
pub use veloo_application::{
    FlowHandle, FlowSignal, FlowSnapshot, OnboardingFlow, SignupController, UiEvent,
    VerificationController, VerificationStore, spawn,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Key-value store implementations
    pub mod persistence {
        pub use veloo_adapters::persistence::*;
    }

    /// Request gateway implementations
    pub mod gateway {
        pub use veloo_adapters::gateway::*;
    }

    /// Configuration
    pub mod config {
        pub use veloo_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use veloo_adapters::{
    FileKeyValueStore, HashMapKeyValueStore, HttpRequestGateway, MockRequestGateway,
    OnboardingSettings, RedisKeyValueStore,
};

// ============================================================================
// Onboarding Service (Main Entry Point)
// ============================================================================

/// Main onboarding service
pub use veloo_service::{OnboardingService, ServiceError, SessionStore, init_tracing};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for reading the form password
pub use secrecy::{ExposeSecret, Secret};
