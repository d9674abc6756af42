use secrecy::ExposeSecret;
use thiserror::Error;
use veloo_core::{
    BusinessType, Email, Endpoint, FormData, FormEdit, FormErrors, GatewayError, GatewayRequest,
    Location, PasswordStrength, score_password, validate,
};

use crate::dropdown::{DropdownKind, Dropdowns};
use crate::ticket::{InFlight, PendingRequest, RequestKind, RequestTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupPhase {
    Editing,
    /// Registration went through; the code was sent to `email`.
    AwaitingVerification { email: Email },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("Signup is already awaiting verification")]
    NotEditing,
    #[error("A signup request is already in flight")]
    AlreadyPending,
    #[error("{0} field(s) failed validation")]
    Invalid(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { email: Email, form: FormData },
    Failed(GatewayError),
    Stale,
}

/// Signup controller - owns the registration form until it is accepted
#[derive(Debug)]
pub struct SignupController {
    form: FormData,
    errors: FormErrors,
    phase: SignupPhase,
    submission: InFlight,
    dropdowns: Dropdowns,
    show_password: bool,
}

impl SignupController {
    pub fn new() -> Self {
        Self::with_form(FormData::new())
    }

    pub fn with_form(form: FormData) -> Self {
        Self {
            form,
            errors: FormErrors::new(),
            phase: SignupPhase::Editing,
            submission: InFlight::default(),
            dropdowns: Dropdowns::default(),
            show_password: false,
        }
    }

    /// Controller for a session restored from storage, skipping submission.
    pub fn restored(email: Email, form: FormData) -> Self {
        Self {
            phase: SignupPhase::AwaitingVerification { email },
            ..Self::with_form(form)
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn phase(&self) -> &SignupPhase {
        &self.phase
    }

    pub fn is_editing(&self) -> bool {
        self.phase == SignupPhase::Editing
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_pending()
    }

    pub fn dropdowns(&self) -> Dropdowns {
        self.dropdowns
    }

    pub fn show_password(&self) -> bool {
        self.show_password
    }

    /// Strength meter for the current password, hidden while it is empty.
    pub fn password_strength(&self) -> Option<PasswordStrength> {
        let password = self.form.password().expose_secret();
        (!password.is_empty()).then(|| score_password(password))
    }

    /// Applies a field edit and clears that field's error.
    ///
    /// Full validation only runs on submit. Edits are refused once the form
    /// is submitted or while a submission is in flight.
    pub fn edit(&mut self, edit: FormEdit) -> bool {
        if !self.is_editing() || self.is_submitting() {
            return false;
        }
        let field = edit.field();
        if !self.form.apply(edit) {
            return false;
        }
        self.errors.clear(field);
        true
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn toggle_dropdown(&mut self, kind: DropdownKind) {
        if self.is_editing() {
            self.dropdowns.toggle(kind);
        }
    }

    pub fn select_business_type(&mut self, business_type: BusinessType) -> bool {
        self.dropdowns.close(DropdownKind::BusinessType);
        self.edit(FormEdit::BusinessType(business_type.value().to_string()))
    }

    pub fn select_location(&mut self, location: Location) -> bool {
        self.dropdowns.close(DropdownKind::Location);
        self.edit(FormEdit::Location(location.value().to_string()))
    }

    pub fn close_dropdowns(&mut self) {
        self.dropdowns.close_all();
    }

    /// Validates the form and, if it passes, marks a registration call as in
    /// flight.
    pub fn begin_submit(&mut self) -> Result<PendingRequest, SubmitRejected> {
        if !self.is_editing() {
            return Err(SubmitRejected::NotEditing);
        }
        if self.is_submitting() {
            return Err(SubmitRejected::AlreadyPending);
        }

        self.errors = validate(&self.form);
        if !self.errors.is_empty() {
            tracing::debug!(fields = self.errors.len(), "Signup form failed validation");
            return Err(SubmitRejected::Invalid(self.errors.len()));
        }

        let ticket = self
            .submission
            .begin()
            .ok_or(SubmitRejected::AlreadyPending)?;

        Ok(PendingRequest {
            ticket,
            kind: RequestKind::Submit,
            request: GatewayRequest::post_form(Endpoint::Registration, self.form.to_payload()),
        })
    }

    /// Applies the registration response for `ticket`.
    pub fn finish_submit(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<(), GatewayError>,
    ) -> SubmitOutcome {
        if !self.submission.settle(ticket) {
            tracing::debug!(%ticket, "Ignoring stale signup response");
            return SubmitOutcome::Stale;
        }

        if let Err(e) = outcome {
            return SubmitOutcome::Failed(e);
        }

        // The form passed validation, so the address is well formed.
        match Email::parse(self.form.business_email()) {
            Ok(email) => {
                self.phase = SignupPhase::AwaitingVerification {
                    email: email.clone(),
                };
                self.dropdowns.close_all();
                SubmitOutcome::Accepted {
                    email,
                    form: self.form.clone(),
                }
            }
            Err(e) => SubmitOutcome::Failed(GatewayError::InvalidRequest(e.to_string())),
        }
    }

    /// Replaces the address awaiting verification, keeping the rest of the form.
    pub fn change_email(&mut self, email: Email) -> FormData {
        self.form.apply(FormEdit::BusinessEmail(email.as_str().to_string()));
        if !self.is_editing() {
            self.phase = SignupPhase::AwaitingVerification { email };
        }
        self.form.clone()
    }

    /// Back to editing with the form as it was submitted.
    pub fn return_to_editing(&mut self) {
        self.phase = SignupPhase::Editing;
        self.submission.abandon();
    }
}

impl Default for SignupController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veloo_core::{Encoding, Field, Method};

    fn filled_controller() -> SignupController {
        let mut controller = SignupController::new();
        for edit in [
            FormEdit::FirstName("Ada".into()),
            FormEdit::LastName("Obi".into()),
            FormEdit::BusinessEmail("ada@shop.ng".into()),
            FormEdit::Password("Market#2024".into()),
            FormEdit::PhoneNumber("08031234567".into()),
            FormEdit::AgreeToTerms(true),
        ] {
            assert!(controller.edit(edit));
        }
        controller.select_business_type(BusinessType::Shop);
        controller.select_location(Location::Ilorin);
        controller
    }

    #[test]
    fn test_invalid_form_issues_no_request() {
        let mut controller = SignupController::new();
        let result = controller.begin_submit();

        assert_eq!(result, Err(SubmitRejected::Invalid(8)));
        assert_eq!(controller.errors().len(), 8);
        assert!(!controller.is_submitting());
        assert!(controller.is_editing());
    }

    #[test]
    fn test_edit_clears_only_touched_field() {
        let mut controller = SignupController::new();
        let _ = controller.begin_submit();

        controller.edit(FormEdit::FirstName("A".into()));
        assert!(!controller.errors().contains(Field::FirstName));
        assert!(controller.errors().contains(Field::LastName));

        // Clearing is optimistic: an invalid value does not bring the error back.
        controller.edit(FormEdit::BusinessEmail("nope".into()));
        assert!(!controller.errors().contains(Field::BusinessEmail));
        assert_eq!(controller.errors().len(), 6);
    }

    #[test]
    fn test_submit_builds_registration_request() {
        let mut controller = filled_controller();
        let pending = controller.begin_submit().unwrap();

        assert_eq!(pending.kind, RequestKind::Submit);
        assert_eq!(pending.request.method, Method::Post);
        assert_eq!(pending.request.endpoint, Endpoint::Registration);
        assert_eq!(pending.request.encoding, Encoding::UrlEncoded);
        assert_eq!(pending.request.payload.get("businessEmail"), Some("ada@shop.ng"));
        assert!(controller.is_submitting());
        assert_eq!(controller.begin_submit(), Err(SubmitRejected::AlreadyPending));
    }

    #[test]
    fn test_accepted_submission_awaits_verification() {
        let mut controller = filled_controller();
        let pending = controller.begin_submit().unwrap();

        let outcome = controller.finish_submit(pending.ticket, Ok(()));
        let email = Email::parse("ada@shop.ng").unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Accepted {
                email: email.clone(),
                form: controller.form().clone()
            }
        );
        assert_eq!(controller.phase(), &SignupPhase::AwaitingVerification { email });
        assert!(!controller.is_submitting());
        assert!(!controller.edit(FormEdit::FirstName("Changed".into())));
    }

    #[test]
    fn test_failed_submission_returns_to_editing() {
        let mut controller = filled_controller();
        let pending = controller.begin_submit().unwrap();

        let outcome =
            controller.finish_submit(pending.ticket, Err(GatewayError::Transport("offline".into())));
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(controller.is_editing());
        assert!(!controller.is_submitting());
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn test_edits_refused_while_submitting() {
        let mut controller = filled_controller();
        let _pending = controller.begin_submit().unwrap();
        assert!(!controller.edit(FormEdit::FirstName("Late".into())));
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut controller = filled_controller();
        let pending = controller.begin_submit().unwrap();
        controller.return_to_editing();

        assert_eq!(
            controller.finish_submit(pending.ticket, Ok(())),
            SubmitOutcome::Stale
        );
        assert!(controller.is_editing());
    }

    #[test]
    fn test_selection_closes_dropdown() {
        let mut controller = SignupController::new();
        controller.toggle_dropdown(DropdownKind::Location);
        assert!(controller.dropdowns().is_open(DropdownKind::Location));

        controller.select_location(Location::Malete);
        assert!(!controller.dropdowns().is_open(DropdownKind::Location));
        assert_eq!(controller.form().selected_location(), Some(Location::Malete));
    }

    #[test]
    fn test_password_strength_hidden_when_empty() {
        let mut controller = SignupController::new();
        assert!(controller.password_strength().is_none());
        controller.edit(FormEdit::Password("abc".into()));
        assert_eq!(controller.password_strength().map(|s| s.score), Some(1));
    }

    #[test]
    fn test_change_email_updates_snapshot() {
        let email = Email::parse("ada@shop.ng").unwrap();
        let form = filled_controller().form().clone();
        let mut controller = SignupController::restored(email, form);

        let new_email = Email::parse("ada@market.ng").unwrap();
        let snapshot = controller.change_email(new_email.clone());
        assert_eq!(snapshot.business_email(), "ada@market.ng");
        assert_eq!(
            controller.phase(),
            &SignupPhase::AwaitingVerification { email: new_email }
        );
    }
}
