pub mod domain;
pub mod ports;
pub mod validation;

// Re-export commonly used types for convenience
pub use domain::{
    email::{Email, EmailError},
    form::{BusinessType, DEFAULT_STATE, Field, FormData, FormEdit, Location},
    form_errors::FormErrors,
    otp::{OTP_LENGTH, OtpInput},
    password_strength::{PasswordStrength, StrengthLabel},
};

pub use ports::{
    gateway::{Encoding, Endpoint, GatewayError, GatewayRequest, Method, Payload, RequestGateway},
    storage::{KeyValueStore, KeyValueStoreError},
};

pub use validation::{MIN_PASSWORD_SCORE, is_valid_email, score_password, validate};
