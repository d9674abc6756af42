//! The composed onboarding flow.
//!
//! [`OnboardingFlow`] owns both screen controllers and decides which one is
//! live. It is the only place that touches the verification store, starts and
//! stops the resend countdown and subscribes to document clicks.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use veloo_core::{BusinessType, FormEdit, KeyValueStore, Location, RequestGateway};

use crate::controllers::{
    ResendOutcome, SignupController, SubmitOutcome, VerificationController, VerifyOutcome,
};
use crate::countdown::{CountdownTick, CountdownTimer};
use crate::dropdown::{DocumentClick, DocumentClicks, DropdownKind, OutsideClickSubscription};
use crate::persistence::{StoredSession, VerificationStore};
use crate::snapshot::FlowSnapshot;
use crate::ticket::{PendingRequest, RequestKind, Settled};

/// Input from the host's UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Edit(FormEdit),
    TogglePasswordVisibility,
    ToggleDropdown(DropdownKind),
    SelectBusinessType(BusinessType),
    SelectLocation(Location),
    Submit,
    OtpInput { index: usize, value: String },
    OtpBackspace { index: usize },
    OtpPaste(String),
    FocusOtpSlot(usize),
    Verify,
    Resend,
    StartEmailEdit,
    SetEmailDraft(String),
    UpdateEmail,
    CancelEmailEdit,
    BackToSignup,
}

/// Outward notifications for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSignal {
    /// The email was verified. Emitted once; the host should move on to the
    /// dashboard.
    VerificationComplete,
    BackToSignup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Signup,
    Verification,
}

/// Result of handling one [`UiEvent`].
#[derive(Debug, Default)]
pub struct Step {
    /// Gateway call to run. Its result goes back through [`OnboardingFlow::settle`].
    pub dispatch: Option<PendingRequest>,
    pub signal: Option<FlowSignal>,
}

impl Step {
    fn dispatch(pending: PendingRequest) -> Self {
        Self {
            dispatch: Some(pending),
            signal: None,
        }
    }

    fn signal(signal: FlowSignal) -> Self {
        Self {
            dispatch: None,
            signal: Some(signal),
        }
    }
}

pub struct OnboardingFlow<G: ?Sized, S> {
    gateway: Arc<G>,
    store: VerificationStore<S>,
    signup: SignupController,
    verification: Option<VerificationController>,
    ticks: mpsc::UnboundedSender<CountdownTick>,
    timer: Option<CountdownTimer>,
    timer_generation: u64,
    clicks: DocumentClicks,
    click_subscription: Option<OutsideClickSubscription>,
}

impl<G, S> OnboardingFlow<G, S>
where
    G: RequestGateway + ?Sized + 'static,
    S: KeyValueStore,
{
    /// Builds the flow, restoring an unfinished verification from `store`.
    ///
    /// This is the only read of persisted state.
    ///
    /// # Arguments
    /// * `gateway` - Transport for registration and OTP calls
    /// * `store` - Durable key-value storage
    /// * `clicks` - Document click source owned by the host
    /// * `ticks` - Where countdown ticks are delivered
    #[tracing::instrument(name = "OnboardingFlow::mount", skip_all)]
    pub async fn mount(
        gateway: Arc<G>,
        store: S,
        clicks: DocumentClicks,
        ticks: mpsc::UnboundedSender<CountdownTick>,
    ) -> Self {
        let store = VerificationStore::new(store);
        let restored = store.load().await;

        let mut flow = Self {
            gateway,
            store,
            signup: SignupController::new(),
            verification: None,
            ticks,
            timer: None,
            timer_generation: 0,
            clicks,
            click_subscription: None,
        };

        match restored {
            Some(StoredSession { email, form }) => {
                flow.signup = SignupController::restored(email.clone(), form.clone());
                flow.enter_verification(VerificationController::new(email, form));
            }
            None => flow.show_signup(),
        }
        flow
    }

    pub fn screen(&self) -> Screen {
        match self.verification {
            Some(_) => Screen::Verification,
            None => Screen::Signup,
        }
    }

    pub fn signup(&self) -> &SignupController {
        &self.signup
    }

    pub fn verification(&self) -> Option<&VerificationController> {
        self.verification.as_ref()
    }

    pub fn store(&self) -> &VerificationStore<S> {
        &self.store
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        match &self.verification {
            Some(verification) => FlowSnapshot::Verification(verification.into()),
            None => FlowSnapshot::Signup((&self.signup).into()),
        }
    }

    pub async fn handle(&mut self, event: UiEvent) -> Step {
        match event {
            UiEvent::Edit(edit) => {
                self.signup.edit(edit);
            }
            UiEvent::TogglePasswordVisibility => self.signup.toggle_password_visibility(),
            UiEvent::ToggleDropdown(kind) => self.signup.toggle_dropdown(kind),
            UiEvent::SelectBusinessType(business_type) => {
                self.signup.select_business_type(business_type);
            }
            UiEvent::SelectLocation(location) => {
                self.signup.select_location(location);
            }
            UiEvent::Submit => match self.signup.begin_submit() {
                Ok(pending) => return Step::dispatch(pending),
                Err(e) => tracing::debug!(reason = %e, "Signup not submitted"),
            },
            UiEvent::BackToSignup => return self.back_to_signup().await,
            UiEvent::UpdateEmail => self.update_email().await,
            event => return self.handle_verification(event),
        }
        Step::default()
    }

    fn handle_verification(&mut self, event: UiEvent) -> Step {
        let Some(verification) = self.verification.as_mut() else {
            tracing::debug!("Verification event while on the signup screen");
            return Step::default();
        };

        match event {
            UiEvent::OtpInput { index, value } => {
                verification.input_digit(index, &value);
            }
            UiEvent::OtpBackspace { index } => {
                verification.backspace(index);
            }
            UiEvent::OtpPaste(text) => {
                verification.paste(&text);
            }
            UiEvent::FocusOtpSlot(index) => verification.focus_slot(index),
            UiEvent::Verify => match verification.begin_verify() {
                Ok(pending) => return Step::dispatch(pending),
                Err(e) => tracing::debug!(reason = %e, "Code not submitted"),
            },
            UiEvent::Resend => match verification.begin_resend() {
                Ok(pending) => return Step::dispatch(pending),
                Err(e) => tracing::debug!(reason = %e, "Resend not requested"),
            },
            UiEvent::StartEmailEdit => {
                verification.start_email_edit();
            }
            UiEvent::SetEmailDraft(text) => verification.set_email_draft(text),
            UiEvent::CancelEmailEdit => verification.cancel_email_edit(),
            _ => {}
        }
        Step::default()
    }

    async fn update_email(&mut self) {
        let Some(verification) = self.verification.as_mut() else {
            return;
        };
        let change = match verification.update_email() {
            Ok(change) => change,
            Err(e) => {
                tracing::debug!(reason = %e, "Email not updated");
                return;
            }
        };

        tracing::info!(email = %change.email, "Verification email changed");
        self.signup.change_email(change.email.clone());
        self.store.save(&change.email, &change.form).await;
        self.restart_timer();
    }

    async fn back_to_signup(&mut self) -> Step {
        match &self.verification {
            Some(verification) if !verification.is_complete() => {}
            _ => return Step::default(),
        }

        self.store.clear().await;
        self.verification = None;
        self.timer = None;
        self.signup.return_to_editing();
        self.show_signup();
        tracing::info!("Returned to signup");
        Step::signal(FlowSignal::BackToSignup)
    }

    /// Runs `pending` against the gateway. The returned future is independent
    /// of the flow so it can be spawned.
    pub fn perform(&self, pending: PendingRequest) -> impl Future<Output = Settled> + Send + 'static {
        let gateway = Arc::clone(&self.gateway);
        async move {
            let outcome = gateway.request(pending.request.clone()).await;
            pending.settled(outcome)
        }
    }

    /// Applies a finished gateway call.
    #[tracing::instrument(name = "OnboardingFlow::settle", skip_all, fields(ticket = %settled.ticket, kind = ?settled.kind))]
    pub async fn settle(&mut self, settled: Settled) -> Option<FlowSignal> {
        let Settled {
            ticket,
            kind,
            outcome,
        } = settled;

        match kind {
            RequestKind::Submit => match self.signup.finish_submit(ticket, outcome) {
                SubmitOutcome::Accepted { email, form } => {
                    tracing::info!(%email, "Signup accepted, awaiting verification");
                    self.store.save(&email, &form).await;
                    self.enter_verification(VerificationController::new(email, form));
                }
                SubmitOutcome::Failed(e) => tracing::debug!(error = %e, "Signup failed"),
                SubmitOutcome::Stale => {}
            },
            RequestKind::Verify => {
                let verification = self.verification.as_mut()?;
                match verification.finish_verify(ticket, outcome) {
                    VerifyOutcome::Verified => {
                        tracing::info!(email = %verification.email(), "Email verified");
                        self.timer = None;
                        self.store.clear().await;
                        return Some(FlowSignal::VerificationComplete);
                    }
                    VerifyOutcome::Failed(e) => tracing::debug!(error = %e, "Verification failed"),
                    VerifyOutcome::Stale => {}
                }
            }
            RequestKind::Resend => {
                let verification = self.verification.as_mut()?;
                match verification.finish_resend(ticket, outcome) {
                    ResendOutcome::Sent => tracing::info!("Verification code resent"),
                    ResendOutcome::Failed(e) => tracing::debug!(error = %e, "Resend failed"),
                    ResendOutcome::Stale => {}
                }
            }
        }
        None
    }

    /// Handles `event` and, if it issued a request, awaits it in place.
    pub async fn process(&mut self, event: UiEvent) -> Option<FlowSignal> {
        let step = self.handle(event).await;
        match step.dispatch {
            Some(pending) => {
                let settled = self.perform(pending).await;
                self.settle(settled).await.or(step.signal)
            }
            None => step.signal,
        }
    }

    /// Advances the resend countdown. Returns false for ticks of a timer that
    /// has since been replaced or stopped.
    pub fn on_tick(&mut self, tick: CountdownTick) -> bool {
        let current = self.timer.as_ref().map(CountdownTimer::generation);
        let Some(verification) = self.verification.as_mut() else {
            return false;
        };
        if current != Some(tick.generation) {
            tracing::debug!(generation = tick.generation, "Ignoring stale countdown tick");
            return false;
        }

        if !verification.tick() {
            tracing::debug!("Resend countdown finished");
            self.timer = None;
        }
        true
    }

    /// Waits for a document click while the signup screen is shown. Pending
    /// forever otherwise.
    pub async fn next_outside_click(&mut self) -> Option<DocumentClick> {
        match self.click_subscription.as_mut() {
            Some(subscription) => subscription.next_click().await,
            None => std::future::pending().await,
        }
    }

    pub fn close_dropdowns(&mut self) {
        self.signup.close_dropdowns();
    }

    pub fn is_listening_for_clicks(&self) -> bool {
        self.click_subscription.is_some()
    }

    fn show_signup(&mut self) {
        if self.click_subscription.is_none() {
            self.click_subscription = Some(self.clicks.subscribe());
        }
    }

    fn enter_verification(&mut self, verification: VerificationController) {
        self.click_subscription = None;
        self.signup.close_dropdowns();
        self.verification = Some(verification);
        self.restart_timer();
    }

    fn restart_timer(&mut self) {
        // The old ticker must be gone before the next one is started.
        self.timer = None;
        self.timer_generation += 1;
        self.timer = Some(CountdownTimer::start(
            self.timer_generation,
            self.ticks.clone(),
        ));
    }
}
