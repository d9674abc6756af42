//! Screen controllers.
//!
//! Controllers never perform I/O. Each request is split into `begin_*`, which
//! hands back a [`PendingRequest`](crate::PendingRequest) for the caller to
//! run, and `finish_*`, which applies the gateway's answer.

pub mod signup;
pub mod verification;

pub use signup::{SignupController, SignupPhase, SubmitOutcome, SubmitRejected};
pub use verification::{
    EmailChange, EmailUpdateRejected, INCOMPLETE_CODE_MESSAGE, INVALID_EMAIL_MESSAGE,
    ResendOutcome, ResendRejected, VerificationController, VerificationState, VerifyOutcome,
    VerifyRejected,
};
