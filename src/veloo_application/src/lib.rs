pub mod controllers;
pub mod countdown;
pub mod dropdown;
pub mod flow;
pub mod persistence;
pub mod runtime;
pub mod snapshot;
pub mod ticket;

// Re-export commonly used types for convenience
pub use controllers::{
    EmailChange, EmailUpdateRejected, INCOMPLETE_CODE_MESSAGE, INVALID_EMAIL_MESSAGE,
    ResendOutcome, ResendRejected, SignupController, SignupPhase, SubmitOutcome, SubmitRejected,
    VerificationController, VerificationState, VerifyOutcome, VerifyRejected,
};
pub use countdown::{CountdownTick, CountdownTimer, RESEND_COOLDOWN_SECS, ResendCountdown};
pub use dropdown::{DocumentClick, DocumentClicks, DropdownKind, Dropdowns, OutsideClickSubscription};
pub use flow::{FlowSignal, OnboardingFlow, Screen, Step, UiEvent};
pub use persistence::{
    FORM_DATA_KEY, SESSION_FLAG_KEY, StoredSession, VERIFIED_EMAIL_KEY, VerificationStore,
};
pub use runtime::{FlowHandle, FlowStopped, spawn};
pub use snapshot::{FlowSnapshot, SignupView, VerificationView};
pub use ticket::{InFlight, PendingRequest, RequestKind, RequestTicket, Settled};
