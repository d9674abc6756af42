use secrecy::ExposeSecret;
use serde::Serialize;
use veloo_core::{FormErrors, OTP_LENGTH, PasswordStrength};

use crate::controllers::{SignupController, VerificationController, VerificationState};
use crate::dropdown::Dropdowns;

const PASSWORD_MASK: char = '•';

/// Everything a host needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum FlowSnapshot {
    Signup(SignupView),
    Verification(VerificationView),
}

impl FlowSnapshot {
    pub fn is_signup(&self) -> bool {
        matches!(self, FlowSnapshot::Signup(_))
    }

    pub fn as_verification(&self) -> Option<&VerificationView> {
        match self {
            FlowSnapshot::Verification(view) => Some(view),
            FlowSnapshot::Signup(_) => None,
        }
    }

    pub fn as_signup(&self) -> Option<&SignupView> {
        match self {
            FlowSnapshot::Signup(view) => Some(view),
            FlowSnapshot::Verification(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupView {
    pub first_name: String,
    pub last_name: String,
    pub business_email: String,
    /// Masked unless the seller asked to see it.
    pub password: String,
    pub phone_number: String,
    pub business_type: Option<&'static str>,
    pub state: String,
    pub location: Option<&'static str>,
    pub agree_to_terms: bool,
    pub errors: FormErrors,
    pub password_strength: Option<PasswordStrength>,
    pub dropdowns: Dropdowns,
    pub show_password: bool,
    pub submitting: bool,
}

impl From<&SignupController> for SignupView {
    fn from(controller: &SignupController) -> Self {
        let form = controller.form();
        let password = form.password().expose_secret();
        let password = if controller.show_password() {
            password.clone()
        } else {
            std::iter::repeat_n(PASSWORD_MASK, password.chars().count()).collect()
        };

        Self {
            first_name: form.first_name().to_string(),
            last_name: form.last_name().to_string(),
            business_email: form.business_email().to_string(),
            password,
            phone_number: form.phone_number().to_string(),
            business_type: form.selected_business_type().map(|kind| kind.label()),
            state: form.state().to_string(),
            location: form.selected_location().map(|location| location.label()),
            agree_to_terms: form.agree_to_terms(),
            errors: controller.errors().clone(),
            password_strength: controller.password_strength(),
            dropdowns: controller.dropdowns(),
            show_password: controller.show_password(),
            submitting: controller.is_submitting(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationView {
    pub email: String,
    pub slots: [String; OTP_LENGTH],
    pub focus: usize,
    pub error: Option<String>,
    pub state: VerificationState,
    pub seconds_remaining: u32,
    /// `m:ss`
    pub countdown: String,
    pub can_resend: bool,
    pub email_draft: Option<String>,
}

impl From<&VerificationController> for VerificationView {
    fn from(controller: &VerificationController) -> Self {
        let countdown = controller.countdown();
        Self {
            email: controller.email().to_string(),
            slots: controller.otp().as_strings(),
            focus: controller.otp().focus(),
            error: controller.error().map(str::to_string),
            state: controller.state(),
            seconds_remaining: countdown.remaining(),
            countdown: countdown.formatted(),
            can_resend: countdown.can_resend(),
            email_draft: controller.email_draft().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veloo_core::{BusinessType, Email, FormData, FormEdit};

    #[test]
    fn test_password_masked_until_revealed() {
        let mut controller = SignupController::new();
        controller.edit(FormEdit::Password("abc1".into()));

        let view = SignupView::from(&controller);
        assert_eq!(view.password, "••••");
        assert_eq!(view.password_strength.map(|s| s.score), Some(2));

        controller.toggle_password_visibility();
        assert_eq!(SignupView::from(&controller).password, "abc1");
    }

    #[test]
    fn test_selection_shown_by_label() {
        let mut controller = SignupController::new();
        controller.select_business_type(BusinessType::ServiceProvider);

        let view = SignupView::from(&controller);
        assert_eq!(view.business_type, Some("Service Provider"));
        assert_eq!(view.location, None);
        assert_eq!(view.state, "kwara");
    }

    #[test]
    fn test_verification_view() {
        let email = Email::parse("ada@shop.ng").unwrap();
        let mut controller = VerificationController::new(email, FormData::new());
        controller.input_digit(0, "7");

        let view = VerificationView::from(&controller);
        assert_eq!(view.slots[0], "7");
        assert_eq!(view.slots[1], "");
        assert_eq!(view.focus, 1);
        assert_eq!(view.countdown, "1:00");
        assert!(!view.can_resend);
        assert_eq!(view.state, VerificationState::Entering);
    }
}
