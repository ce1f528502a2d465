//! Login/logout orchestration and the UI flag set.

use crate::error::SessionError;
use crate::hint::HintStore;
use crate::session::SessionManager;
use account_client::ApiClient;
use std::sync::Arc;
use tracing::{debug, info};

/// Flag set exposed to the views.
///
/// Deliberately not an enum: intermediate combinations (an error while the
/// previous session is still rendered as logged in) are representable.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub logged_in: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Orchestrates login and logout against the account API and keeps the
/// flag set the views render from.
pub struct AuthController {
    api: Arc<ApiClient>,
    session: SessionManager,
    hints: HintStore,
    state: AuthState,
}

impl AuthController {
    /// Create a controller. The initial `logged_in` flag is seeded from the
    /// persisted hint so the first paint matches the previous run.
    pub fn new(api: Arc<ApiClient>, session: SessionManager, hints: HintStore) -> Self {
        let state = AuthState {
            logged_in: hints.load().is_logged_in(),
            loading: false,
            error: None,
        };
        Self {
            api,
            session,
            hints,
            state,
        }
    }

    /// Current flag set.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.logged_in
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.state.error = error;
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Mark the session live after an out-of-band authentication
    /// (e.g. the Google exchange endpoint set the cookies).
    pub fn mark_logged_in(&mut self) {
        self.hints.set(true);
        self.state.logged_in = true;
        self.state.error = None;
    }

    /// Mark the session logged out after an out-of-band invalidation
    /// (e.g. a revalidation returned Unauthorized). Symmetric to
    /// [`mark_logged_in`](Self::mark_logged_in).
    pub fn mark_logged_out(&mut self) {
        self.hints.set(false);
        self.state.logged_in = false;
    }

    /// Log in with a credential pair.
    ///
    /// On success the hint is persisted and the current-user cache is warmed
    /// best-effort; a failed profile fetch does not fail the login. On
    /// failure the human-readable message lands in the flag set and the
    /// error is returned so the form stays open.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        self.state.loading = true;
        self.state.error = None;

        match self.api.login(username, password).await {
            Ok(_) => {
                info!(username = %username, "login succeeded");
                self.hints.set(true);
                self.state.logged_in = true;
                self.state.loading = false;

                if let Err(err) = self.session.fetch_current_user(true).await {
                    debug!(error = %err, "profile warm-up after login failed");
                }

                Ok(())
            }
            Err(err) => {
                let err = SessionError::from(err);
                debug!(error = %err, "login failed");
                self.state.loading = false;
                self.state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Log out. Never fails: the server-side revocation is best-effort, the
    /// local teardown always happens.
    pub async fn logout(&mut self) {
        if let Err(err) = self.api.logout().await {
            debug!(error = %err, "server-side logout failed; clearing local session anyway");
        }

        self.hints.clear();
        self.session.invalidate();
        self.state = AuthState::default();
        info!("logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionHint;
    use std::net::TcpListener;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn controller_for(server: &MockServer) -> (AuthController, HintStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let hints = HintStore::at_path(dir.path().join("session"));
        let api = Arc::new(ApiClient::new(&server.uri()).unwrap());
        let session = SessionManager::new(Arc::clone(&api), hints.clone());
        (
            AuthController::new(api, session, hints.clone()),
            hints,
            dir,
        )
    }

    fn token_body() -> serde_json::Value {
        serde_json::json!({ "access_token": "abc", "token_type": "bearer" })
    }

    #[tokio::test]
    async fn login_sets_flags_hint_and_warms_cache() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/token"))
            .and(body_string_contains("username=alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "username": "alice",
                "email": "alice@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (mut controller, hints, _dir) = controller_for(&server);

        controller.login("alice", "secret").await.unwrap();

        assert!(controller.is_logged_in());
        assert!(!controller.loading());
        assert!(controller.error().is_none());
        assert_eq!(hints.load(), SessionHint::LoggedIn);
    }

    #[tokio::test]
    async fn login_survives_profile_fetch_failure() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/me"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (mut controller, _hints, _dir) = controller_for(&server);

        // Profile warm-up fails but login still succeeds
        controller.login("alice", "secret").await.unwrap();
        assert!(controller.is_logged_in());
    }

    #[tokio::test]
    async fn login_failure_keeps_form_open_with_detail() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/token"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "detail": "Invalid password."
            })))
            .mount(&server)
            .await;

        let (mut controller, hints, _dir) = controller_for(&server);

        let result = controller.login("alice", "wrong").await;
        assert!(result.is_err());
        assert!(!controller.is_logged_in());
        assert!(!controller.loading());
        assert_eq!(controller.error(), Some("Invalid password."));
        // A failed login writes nothing to the hint
        assert_eq!(hints.load(), SessionHint::Unknown);
    }

    #[tokio::test]
    async fn logout_clears_everything_even_when_server_fails() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "username": "alice",
                "email": "alice@example.com"
            })))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let (mut controller, hints, _dir) = controller_for(&server);

        controller.login("alice", "secret").await.unwrap();
        controller.logout().await;

        assert!(!controller.is_logged_in());
        assert!(!hints.load().is_logged_in());
    }

    #[test]
    fn initial_state_seeds_from_hint() {
        let dir = TempDir::new().unwrap();
        let hints = HintStore::at_path(dir.path().join("session"));
        hints.set(true);

        let api = Arc::new(ApiClient::new("https://api.hili.app").unwrap());
        let session = SessionManager::new(Arc::clone(&api), hints.clone());
        let controller = AuthController::new(api, session, hints);

        assert!(controller.is_logged_in());
    }

    #[test]
    fn setters_update_flags_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let hints = HintStore::at_path(dir.path().join("session"));
        let api = Arc::new(ApiClient::new("https://api.hili.app").unwrap());
        let session = SessionManager::new(Arc::clone(&api), hints.clone());
        let mut controller = AuthController::new(api, session, hints.clone());

        controller.set_loading(true);
        assert!(controller.loading());

        controller.set_error(Some("boom".into()));
        assert_eq!(controller.error(), Some("boom"));

        controller.clear_error();
        assert!(controller.error().is_none());

        // None of the setters touch the persisted hint
        assert_eq!(hints.load(), SessionHint::Unknown);
    }
}
