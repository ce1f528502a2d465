//! Client-side session state coordination for the HiLi account service.
//!
//! This crate provides:
//! - [`SessionManager`]: current-user cache with in-flight deduplication
//!   and a single refresh-then-retry on authorization failure
//! - [`AuthController`]: login/logout orchestration and the UI flag set
//! - [`HintStore`]: the persisted, non-authoritative login rendering hint
//! - [`EmailVerification`]: the registration email-verification state machine
//! - [`GoogleConsent`]: explicit two-phase Google consent flow
//! - Form validation for the account pages

mod controller;
mod email;
mod error;
mod google;
mod hint;
mod session;
mod validation;

pub use controller::{AuthController, AuthState};
pub use email::{EmailFlowError, EmailVerification, VerifyState, RESEND_COOLDOWN_SECS};
pub use error::SessionError;
pub use google::{
    ConsentPhase, GoogleConsent, DEFAULT_CALLBACK_PORT, DEFAULT_CONSENT_TIMEOUT_SECS,
};
pub use hint::{HintStore, SessionHint};
pub use session::SessionManager;
pub use validation::{
    user_id_available, validate_email, validate_registration, validate_user_id,
    RegistrationDraft, ValidationError, MIN_USER_ID_LEN,
};
