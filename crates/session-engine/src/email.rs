//! Registration email-verification state machine.

use crate::error::SessionError;
use account_client::ApiClient;
use thiserror::Error;
use tracing::debug;

/// Seconds before a verification code may be re-requested.
pub const RESEND_COOLDOWN_SECS: u32 = 60;

/// Verification progress for one email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyState {
    /// No code requested yet.
    Unsent,
    /// A code is out. `token` pairs the mailed code with the verify call;
    /// `cooldown` disables re-requesting until it reaches 0.
    Sent { token: String, cooldown: u32 },
    /// The code checked out; `token` must accompany the registration.
    Verified { token: String },
}

/// Errors from the verification flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailFlowError {
    /// A code must be requested before it can be submitted.
    #[error("request a verification code first")]
    NotRequested,

    /// Re-sending is throttled; the payload is the remaining seconds.
    #[error("re-send available in {0}s")]
    CooldownActive(u32),

    /// The email is already verified; nothing to re-send or submit.
    #[error("email already verified")]
    AlreadyVerified,

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] SessionError),
}

/// Drives the request-code / submit-code flow for a registration page.
///
/// The verification token lives only inside this value; it is discarded
/// with the page. The cooldown is pure UI throttling; the tick comes from
/// the page's clock, one per second.
#[derive(Debug, Clone)]
pub struct EmailVerification {
    state: VerifyState,
}

impl EmailVerification {
    pub fn new() -> Self {
        Self {
            state: VerifyState::Unsent,
        }
    }

    pub fn state(&self) -> &VerifyState {
        &self.state
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.state, VerifyState::Verified { .. })
    }

    /// Remaining cooldown seconds (0 when not throttled).
    pub fn cooldown(&self) -> u32 {
        match &self.state {
            VerifyState::Sent { cooldown, .. } => *cooldown,
            _ => 0,
        }
    }

    /// Whether the request-code action is currently enabled.
    pub fn can_request(&self) -> bool {
        match &self.state {
            VerifyState::Unsent => true,
            VerifyState::Sent { cooldown, .. } => *cooldown == 0,
            VerifyState::Verified { .. } => false,
        }
    }

    /// The verification token, once one exists.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            VerifyState::Unsent => None,
            VerifyState::Sent { token, .. } | VerifyState::Verified { token } => Some(token),
        }
    }

    /// Advance the cooldown by one second.
    pub fn tick(&mut self) {
        if let VerifyState::Sent { cooldown, .. } = &mut self.state {
            *cooldown = cooldown.saturating_sub(1);
        }
    }

    /// Request a verification code for `email`.
    ///
    /// Re-requesting replaces the previous token; the old code becomes
    /// useless. Throttled while the cooldown runs.
    pub async fn request_code(
        &mut self,
        api: &ApiClient,
        email: &str,
    ) -> Result<(), EmailFlowError> {
        match &self.state {
            VerifyState::Verified { .. } => return Err(EmailFlowError::AlreadyVerified),
            VerifyState::Sent { cooldown, .. } if *cooldown > 0 => {
                return Err(EmailFlowError::CooldownActive(*cooldown));
            }
            _ => {}
        }

        let response = api
            .request_email_code(email)
            .await
            .map_err(SessionError::from)?;

        debug!(email = %email, "verification code requested");
        self.state = VerifyState::Sent {
            token: response.token,
            cooldown: RESEND_COOLDOWN_SECS,
        };
        Ok(())
    }

    /// Submit the mailed code. A wrong code leaves the flow in `Sent` so
    /// the user can try again or re-request once the cooldown expires.
    pub async fn submit_code(&mut self, api: &ApiClient, code: &str) -> Result<(), EmailFlowError> {
        let token = match &self.state {
            VerifyState::Sent { token, .. } => token.clone(),
            VerifyState::Verified { .. } => return Err(EmailFlowError::AlreadyVerified),
            VerifyState::Unsent => return Err(EmailFlowError::NotRequested),
        };

        api.verify_email_code(&token, code)
            .await
            .map_err(SessionError::from)?;

        debug!("email verified");
        self.state = VerifyState::Verified { token };
        Ok(())
    }
}

impl Default for EmailVerification {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn starts_unsent_with_request_enabled() {
        let flow = EmailVerification::new();
        assert_eq!(flow.state(), &VerifyState::Unsent);
        assert!(flow.can_request());
        assert!(!flow.is_verified());
        assert!(flow.token().is_none());
    }

    #[test]
    fn tick_counts_the_cooldown_down() {
        let mut flow = EmailVerification::new();
        flow.state = VerifyState::Sent {
            token: "tok".into(),
            cooldown: 2,
        };

        assert!(!flow.can_request());
        flow.tick();
        assert_eq!(flow.cooldown(), 1);
        flow.tick();
        assert_eq!(flow.cooldown(), 0);
        assert!(flow.can_request());

        // Ticking past zero stays at zero
        flow.tick();
        assert_eq!(flow.cooldown(), 0);
    }

    #[test]
    fn submit_without_request_is_rejected_locally() {
        let mut flow = EmailVerification::new();
        let api = ApiClient::new("https://api.hili.app").unwrap();

        let err = futures_util::future::FutureExt::now_or_never(
            flow.submit_code(&api, "123456"),
        )
        .expect("local rejection resolves immediately")
        .unwrap_err();
        assert_eq!(err, EmailFlowError::NotRequested);
    }

    #[tokio::test]
    async fn request_code_enters_sent_with_full_cooldown() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/email"))
            .and(body_json(serde_json::json!({ "email": "user@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "verify-tok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri()).unwrap();
        let mut flow = EmailVerification::new();

        flow.request_code(&api, "user@example.com").await.unwrap();

        assert_eq!(flow.cooldown(), RESEND_COOLDOWN_SECS);
        assert!(!flow.can_request());
        assert_eq!(flow.token(), Some("verify-tok"));
    }

    #[tokio::test]
    async fn request_during_cooldown_is_throttled_without_network() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "verify-tok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri()).unwrap();
        let mut flow = EmailVerification::new();

        flow.request_code(&api, "user@example.com").await.unwrap();
        let err = flow
            .request_code(&api, "user@example.com")
            .await
            .unwrap_err();
        assert_eq!(err, EmailFlowError::CooldownActive(RESEND_COOLDOWN_SECS));
    }

    #[tokio::test]
    async fn correct_code_reaches_verified() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "verify-tok"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/email/verify"))
            .and(body_json(serde_json::json!({
                "token": "verify-tok",
                "code": "123456"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri()).unwrap();
        let mut flow = EmailVerification::new();

        flow.request_code(&api, "user@example.com").await.unwrap();
        flow.submit_code(&api, "123456").await.unwrap();

        assert!(flow.is_verified());
        assert_eq!(flow.token(), Some("verify-tok"));
        // Re-requesting after verification makes no sense
        assert!(!flow.can_request());
    }

    #[tokio::test]
    async fn wrong_code_stays_sent() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "verify-tok"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/email/verify"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "detail": "Invalid verification code."
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri()).unwrap();
        let mut flow = EmailVerification::new();

        flow.request_code(&api, "user@example.com").await.unwrap();
        let err = flow.submit_code(&api, "000000").await.unwrap_err();

        match err {
            EmailFlowError::Api(SessionError::Server { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid verification code.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!flow.is_verified());
        assert!(matches!(flow.state(), VerifyState::Sent { .. }));
    }
}
