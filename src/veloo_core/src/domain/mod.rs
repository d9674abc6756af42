pub mod email;
pub mod form;
pub mod form_errors;
pub mod otp;
pub mod password_strength;
