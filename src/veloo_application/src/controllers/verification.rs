use serde::Serialize;
use thiserror::Error;
use veloo_core::{
    Email, Endpoint, FormData, FormEdit, GatewayError, GatewayRequest, OtpInput, Payload,
};

use crate::countdown::ResendCountdown;
use crate::ticket::{InFlight, PendingRequest, RequestKind, RequestTicket};

pub const INCOMPLETE_CODE_MESSAGE: &str = "Please enter the complete 5-digit code";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// What the verification screen is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationState {
    Entering,
    Verifying,
    Resending,
    EditingEmail,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Entering,
    EditingEmail { draft: String },
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyRejected {
    #[error("Email is already verified")]
    Complete,
    #[error("Finish editing the email address first")]
    EditingEmail,
    #[error("A verification request is already in flight")]
    AlreadyPending,
    #[error("{INCOMPLETE_CODE_MESSAGE}")]
    IncompleteCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResendRejected {
    #[error("Email is already verified")]
    Complete,
    #[error("Finish editing the email address first")]
    EditingEmail,
    #[error("A new code can be requested in {0} seconds")]
    CooldownActive(u32),
    #[error("A resend request is already in flight")]
    AlreadyPending,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailUpdateRejected {
    #[error("The email address is not being edited")]
    NotEditing,
    #[error("{INVALID_EMAIL_MESSAGE}")]
    InvalidEmail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    Failed(GatewayError),
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendOutcome {
    Sent,
    Failed(GatewayError),
    Stale,
}

/// The address the seller switched to and the form snapshot that now carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailChange {
    pub email: Email,
    pub form: FormData,
}

/// Verification controller - code entry, resend cooldown and email correction
#[derive(Debug)]
pub struct VerificationController {
    email: Email,
    form: FormData,
    otp: OtpInput,
    error: Option<String>,
    countdown: ResendCountdown,
    mode: Mode,
    verifying: InFlight,
    resending: InFlight,
}

impl VerificationController {
    pub fn new(email: Email, form: FormData) -> Self {
        Self {
            email,
            form,
            otp: OtpInput::new(),
            error: None,
            countdown: ResendCountdown::new(),
            mode: Mode::Entering,
            verifying: InFlight::default(),
            resending: InFlight::default(),
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn otp(&self) -> &OtpInput {
        &self.otp
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn countdown(&self) -> &ResendCountdown {
        &self.countdown
    }

    pub fn email_draft(&self) -> Option<&str> {
        match &self.mode {
            Mode::EditingEmail { draft } => Some(draft),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.mode == Mode::Complete
    }

    pub fn state(&self) -> VerificationState {
        match self.mode {
            Mode::Complete => VerificationState::Complete,
            Mode::EditingEmail { .. } => VerificationState::EditingEmail,
            Mode::Entering if self.verifying.is_pending() => VerificationState::Verifying,
            Mode::Entering if self.resending.is_pending() => VerificationState::Resending,
            Mode::Entering => VerificationState::Entering,
        }
    }

    pub fn input_digit(&mut self, index: usize, value: &str) -> bool {
        !self.is_complete() && self.after_edit(|otp| otp.input(index, value))
    }

    pub fn backspace(&mut self, index: usize) -> bool {
        !self.is_complete() && self.after_edit(|otp| otp.backspace(index))
    }

    pub fn paste(&mut self, text: &str) -> bool {
        !self.is_complete() && self.after_edit(|otp| otp.paste(text))
    }

    pub fn focus_slot(&mut self, index: usize) {
        self.otp.focus_slot(index);
    }

    fn after_edit(&mut self, edit: impl FnOnce(&mut OtpInput) -> bool) -> bool {
        let edited = edit(&mut self.otp);
        if edited {
            self.error = None;
        }
        edited
    }

    /// One second of the resend cooldown. Returns false once it has run out.
    pub fn tick(&mut self) -> bool {
        self.countdown.tick()
    }

    pub fn begin_verify(&mut self) -> Result<PendingRequest, VerifyRejected> {
        match self.mode {
            Mode::Complete => return Err(VerifyRejected::Complete),
            Mode::EditingEmail { .. } => return Err(VerifyRejected::EditingEmail),
            Mode::Entering => {}
        }
        if self.verifying.is_pending() {
            return Err(VerifyRejected::AlreadyPending);
        }
        let Some(code) = self.otp.code() else {
            self.error = Some(INCOMPLETE_CODE_MESSAGE.to_string());
            return Err(VerifyRejected::IncompleteCode);
        };

        let ticket = self
            .verifying
            .begin()
            .ok_or(VerifyRejected::AlreadyPending)?;
        self.error = None;

        let payload = Payload::new()
            .with("email", self.email.as_str())
            .with("otp", code);
        Ok(PendingRequest {
            ticket,
            kind: RequestKind::Verify,
            request: GatewayRequest::post_form(Endpoint::VerifyEmailOtp, payload),
        })
    }

    pub fn finish_verify(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<(), GatewayError>,
    ) -> VerifyOutcome {
        if !self.verifying.settle(ticket) {
            tracing::debug!(%ticket, "Ignoring stale verification response");
            return VerifyOutcome::Stale;
        }

        match outcome {
            Ok(()) => {
                self.mode = Mode::Complete;
                self.resending.abandon();
                VerifyOutcome::Verified
            }
            Err(e) => VerifyOutcome::Failed(e),
        }
    }

    /// Requests a new code by registering the original form again.
    pub fn begin_resend(&mut self) -> Result<PendingRequest, ResendRejected> {
        match self.mode {
            Mode::Complete => return Err(ResendRejected::Complete),
            Mode::EditingEmail { .. } => return Err(ResendRejected::EditingEmail),
            Mode::Entering => {}
        }
        if !self.countdown.can_resend() {
            return Err(ResendRejected::CooldownActive(self.countdown.remaining()));
        }

        let ticket = self
            .resending
            .begin()
            .ok_or(ResendRejected::AlreadyPending)?;
        self.error = None;

        Ok(PendingRequest {
            ticket,
            kind: RequestKind::Resend,
            request: GatewayRequest::post_form(Endpoint::Registration, self.form.to_payload()),
        })
    }

    /// Applies the resend response. The cooldown is left as it is either way.
    pub fn finish_resend(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<(), GatewayError>,
    ) -> ResendOutcome {
        if !self.resending.settle(ticket) {
            tracing::debug!(%ticket, "Ignoring stale resend response");
            return ResendOutcome::Stale;
        }

        match outcome {
            Ok(()) => ResendOutcome::Sent,
            Err(e) => ResendOutcome::Failed(e),
        }
    }

    pub fn start_email_edit(&mut self) -> bool {
        if self.mode != Mode::Entering {
            return false;
        }
        self.mode = Mode::EditingEmail {
            draft: self.email.as_str().to_string(),
        };
        true
    }

    pub fn set_email_draft(&mut self, text: impl Into<String>) {
        if let Mode::EditingEmail { draft } = &mut self.mode {
            *draft = text.into();
        }
    }

    /// Switches verification to the drafted address.
    ///
    /// On success the code and cooldown start over and any in-flight verify
    /// or resend response is dropped, since it belongs to the old address.
    pub fn update_email(&mut self) -> Result<EmailChange, EmailUpdateRejected> {
        let Mode::EditingEmail { draft } = &self.mode else {
            return Err(EmailUpdateRejected::NotEditing);
        };
        let email = match Email::parse(draft.clone()) {
            Ok(email) => email,
            Err(_) => {
                self.error = Some(INVALID_EMAIL_MESSAGE.to_string());
                return Err(EmailUpdateRejected::InvalidEmail);
            }
        };

        self.email = email.clone();
        self.form
            .apply(FormEdit::BusinessEmail(email.as_str().to_string()));
        self.otp.reset();
        self.countdown.reset();
        self.verifying.abandon();
        self.resending.abandon();
        self.error = None;
        self.mode = Mode::Entering;

        Ok(EmailChange {
            email,
            form: self.form.clone(),
        })
    }

    pub fn cancel_email_edit(&mut self) {
        if matches!(self.mode, Mode::EditingEmail { .. }) {
            self.mode = Mode::Entering;
            self.error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> VerificationController {
        let form = FormData::new()
            .with(FormEdit::BusinessEmail("ada@shop.ng".into()))
            .with(FormEdit::Password("Market#2024".into()));
        VerificationController::new(Email::parse("ada@shop.ng").unwrap(), form)
    }

    fn expire_cooldown(controller: &mut VerificationController) {
        while controller.tick() {}
    }

    #[test]
    fn test_incomplete_code_sets_error_without_request() {
        let mut controller = controller();
        for (index, digit) in ["1", "2", "3"].into_iter().enumerate() {
            controller.input_digit(index, digit);
        }

        assert_eq!(controller.begin_verify(), Err(VerifyRejected::IncompleteCode));
        assert_eq!(controller.error(), Some(INCOMPLETE_CODE_MESSAGE));
        assert_eq!(controller.state(), VerificationState::Entering);
    }

    #[test]
    fn test_edit_clears_error() {
        let mut controller = controller();
        let _ = controller.begin_verify();
        assert!(controller.error().is_some());

        controller.input_digit(0, "4");
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_ignored_paste_keeps_error() {
        let mut controller = controller();
        let _ = controller.begin_verify();
        assert!(!controller.paste("12"));
        assert!(controller.error().is_some());
    }

    #[test]
    fn test_verify_sends_email_and_code() {
        let mut controller = controller();
        controller.paste("54321");
        let pending = controller.begin_verify().unwrap();

        assert_eq!(pending.request.endpoint, Endpoint::VerifyEmailOtp);
        assert_eq!(pending.request.payload.get("email"), Some("ada@shop.ng"));
        assert_eq!(pending.request.payload.get("otp"), Some("54321"));
        assert_eq!(controller.state(), VerificationState::Verifying);
        assert_eq!(controller.begin_verify(), Err(VerifyRejected::AlreadyPending));

        assert_eq!(controller.finish_verify(pending.ticket, Ok(())), VerifyOutcome::Verified);
        assert_eq!(controller.state(), VerificationState::Complete);
        assert!(!controller.input_digit(0, "1"));
    }

    #[test]
    fn test_failed_verify_returns_to_entering() {
        let mut controller = controller();
        controller.paste("54321");
        let pending = controller.begin_verify().unwrap();

        let outcome = controller.finish_verify(
            pending.ticket,
            Err(GatewayError::Rejected {
                status: 400,
                message: "Invalid OTP".into(),
            }),
        );
        assert!(matches!(outcome, VerifyOutcome::Failed(_)));
        assert_eq!(controller.state(), VerificationState::Entering);
        assert!(controller.error().is_none());
        assert_eq!(controller.otp().code().as_deref(), Some("54321"));
    }

    #[test]
    fn test_resend_waits_for_cooldown() {
        let mut controller = controller();
        assert_eq!(
            controller.begin_resend(),
            Err(ResendRejected::CooldownActive(60))
        );

        expire_cooldown(&mut controller);
        let pending = controller.begin_resend().unwrap();
        assert_eq!(pending.request.endpoint, Endpoint::Registration);
        assert_eq!(pending.request.payload.get("password"), Some("Market#2024"));
        assert_eq!(controller.state(), VerificationState::Resending);
        assert_eq!(controller.begin_resend(), Err(ResendRejected::AlreadyPending));
    }

    #[test]
    fn test_resend_outcome_never_resets_cooldown() {
        let mut controller = controller();
        expire_cooldown(&mut controller);

        let pending = controller.begin_resend().unwrap();
        assert_eq!(controller.finish_resend(pending.ticket, Ok(())), ResendOutcome::Sent);
        assert!(controller.countdown().can_resend());

        let pending = controller.begin_resend().unwrap();
        let outcome =
            controller.finish_resend(pending.ticket, Err(GatewayError::Transport("reset".into())));
        assert!(matches!(outcome, ResendOutcome::Failed(_)));
        assert!(controller.countdown().can_resend());
        assert_eq!(controller.state(), VerificationState::Entering);
    }

    #[test]
    fn test_invalid_email_update_stays_editing() {
        let mut controller = controller();
        assert!(controller.start_email_edit());
        assert_eq!(controller.email_draft(), Some("ada@shop.ng"));

        controller.set_email_draft("   ");
        assert_eq!(controller.update_email(), Err(EmailUpdateRejected::InvalidEmail));
        assert_eq!(controller.error(), Some(INVALID_EMAIL_MESSAGE));
        assert_eq!(controller.state(), VerificationState::EditingEmail);
    }

    #[test]
    fn test_email_update_resets_code_and_cooldown() {
        let mut controller = controller();
        expire_cooldown(&mut controller);
        controller.paste("11111");
        controller.focus_slot(3);

        controller.start_email_edit();
        controller.set_email_draft("ada@market.ng");
        let change = controller.update_email().unwrap();

        assert_eq!(change.email.as_str(), "ada@market.ng");
        assert_eq!(change.form.business_email(), "ada@market.ng");
        assert_eq!(controller.email().as_str(), "ada@market.ng");
        assert_eq!(controller.otp(), &OtpInput::new());
        assert_eq!(controller.otp().focus(), 0);
        assert_eq!(controller.countdown(), &ResendCountdown::new());
        assert_eq!(controller.state(), VerificationState::Entering);
    }

    #[test]
    fn test_email_update_drops_in_flight_verify() {
        let mut controller = controller();
        controller.paste("11111");
        let pending = controller.begin_verify().unwrap();

        controller.start_email_edit();
        controller.set_email_draft("ada@market.ng");
        controller.update_email().unwrap();

        assert_eq!(controller.finish_verify(pending.ticket, Ok(())), VerifyOutcome::Stale);
        assert_eq!(controller.state(), VerificationState::Entering);
    }

    #[test]
    fn test_cancel_email_edit_keeps_code_and_cooldown() {
        let mut controller = controller();
        controller.paste("12345");
        controller.tick();

        controller.start_email_edit();
        controller.set_email_draft("not-an-email");
        let _ = controller.update_email();
        controller.cancel_email_edit();

        assert_eq!(controller.state(), VerificationState::Entering);
        assert!(controller.error().is_none());
        assert_eq!(controller.email().as_str(), "ada@shop.ng");
        assert_eq!(controller.otp().code().as_deref(), Some("12345"));
        assert_eq!(controller.countdown().remaining(), 59);

        controller.start_email_edit();
        assert_eq!(controller.email_draft(), Some("ada@shop.ng"));
    }
}
