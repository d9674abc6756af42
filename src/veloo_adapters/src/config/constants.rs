pub mod env {
    pub const ENV_PREFIX: &str = "VELOO";
    pub const ENV_SEPARATOR: &str = "__";
    pub const CONFIG_FILE_ENV_VAR: &str = "VELOO_CONFIG_FILE";
}

pub const DEFAULT_CONFIG_FILE: &str = "config/onboarding";
pub const DEFAULT_DASHBOARD_URL: &str = "http://app.seller.velooapp.com";

pub mod api {
    pub const BASE_URL: &str = "http://localhost:4000/api/v1";
    pub const TIMEOUT_IN_MILLIS: u64 = 10_000;
}

pub const REGISTRATION_PATH: &str = "/sellers/auth/register_email";
pub const VERIFY_EMAIL_OTP_PATH: &str = "/sellers/auth/verify_email_otp";

pub mod storage {
    pub const BACKEND: &str = "file";
    pub const PATH: &str = ".veloo/onboarding.json";
    pub const REDIS_HOST_NAME: &str = "127.0.0.1";
    pub const KEY_PREFIX: &str = "onboarding:";
}
