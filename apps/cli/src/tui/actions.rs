//! Async operations behind the TUI pages.
//!
//! Short calls are awaited inline from the key handlers. Long-running work
//! (session re-validation, profile load, browser consent) runs in spawned
//! tasks whose results come back through the event channel tagged with the
//! navigation generation; a result from a superseded page is dropped.

use super::app::{App, Page, Route, SessionEvent};
use account_client::RegisterRequest;
use session_engine::{
    user_id_available, validate_email, validate_registration, validate_user_id, GoogleConsent,
    RegistrationDraft, SessionError,
};
use std::sync::Arc;
use tracing::debug;

/// Run one browser consent round and return the authorization code.
async fn run_consent(client_id: String) -> Result<String, SessionError> {
    let mut consent = GoogleConsent::with_defaults(client_id);
    consent.initialize()?;

    let url = consent.consent_url();
    if let Err(e) = open::that(&url) {
        debug!(error = %e, "failed to open browser; user must open the consent URL manually");
    }

    consent.request_code().await
}

impl App {
    /// Landing mount: re-validate the session in the background.
    pub(super) fn spawn_revalidate(&mut self) {
        if let Page::Landing(page) = &mut self.page {
            page.checking = true;
        }

        let session = self.session.clone();
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = session.revalidate().await;
            let _ = tx
                .send((generation, SessionEvent::Revalidated(outcome)))
                .await;
        });
    }

    /// Profile mount / refresh: load the current user through the cache.
    pub(super) fn spawn_profile_load(&mut self, force: bool) {
        if let Page::Profile(page) = &mut self.page {
            page.loading = true;
        }

        let session = self.session.clone();
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = session.fetch_current_user(force).await;
            let _ = tx
                .send((generation, SessionEvent::ProfileLoaded(outcome)))
                .await;
        });
    }

    /// Apply a background result, unless its page has been superseded.
    pub fn handle_session_event(&mut self, generation: u64, event: SessionEvent) {
        if generation != self.generation {
            debug!("dropping session event from a superseded page");
            return;
        }

        match event {
            SessionEvent::Revalidated(outcome) => {
                if let Page::Landing(page) = &mut self.page {
                    page.checking = false;
                    match outcome {
                        Ok(user) => {
                            page.user = Some(user);
                            self.auth.mark_logged_in();
                        }
                        Err(err) if err.is_unauthorized() => {
                            self.auth.mark_logged_out();
                        }
                        Err(err) => {
                            self.auth.mark_logged_out();
                            self.status_message = Some(err.user_message());
                        }
                    }
                }
            }
            SessionEvent::ProfileLoaded(outcome) => {
                if let Page::Profile(page) = &mut self.page {
                    page.loading = false;
                    match outcome {
                        Ok(user) => page.user = Some(user),
                        Err(err) => page.error = Some(err.user_message()),
                    }
                }
            }
            SessionEvent::GoogleExchanged(outcome) => match outcome {
                Ok(()) => {
                    self.auth.mark_logged_in();
                    self.navigate(Route::Landing);
                }
                Err(err) => {
                    if let Page::Login(page) = &mut self.page {
                        page.busy = false;
                        page.error = Some(err.user_message());
                    }
                }
            },
            SessionEvent::GoogleLinked(outcome) => {
                if let Page::Profile(page) = &mut self.page {
                    page.busy = false;
                    match outcome {
                        Ok(user) => {
                            page.user = Some(user);
                            page.notice = Some("Google account linked".to_string());
                            page.error = None;
                        }
                        Err(err) => page.error = Some(err.user_message()),
                    }
                }
            }
        }
    }

    /// Submit the login form.
    pub async fn submit_login(&mut self) {
        let (username, password) = match &self.page {
            Page::Login(page) => (
                page.username.trim().to_string(),
                page.password.clone(),
            ),
            _ => return,
        };

        if username.is_empty() || password.is_empty() {
            if let Page::Login(page) = &mut self.page {
                page.error = Some("Identifier and password are required".to_string());
            }
            return;
        }
        if let Page::Login(page) = &mut self.page {
            page.error = None;
        }

        // A failed login keeps the form open; the controller carries the
        // message the page renders.
        if self.auth.login(&username, &password).await.is_ok() {
            self.navigate(Route::Landing);
        }
    }

    /// Start a Google sign-in round from the login page.
    pub fn start_google_sign_in(&mut self) {
        match &mut self.page {
            Page::Login(page) if !page.busy => {
                page.busy = true;
                page.error = None;
            }
            _ => return,
        }

        let client_id = self.config.google_client_id.clone();
        let api = Arc::clone(&self.api);
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = match run_consent(client_id).await {
                Ok(code) => api.google_login(&code).await.map_err(SessionError::from),
                Err(err) => Err(err),
            };
            let _ = tx
                .send((generation, SessionEvent::GoogleExchanged(outcome)))
                .await;
        });
    }

    /// Run the local availability check for the chosen identifier.
    pub fn check_availability(&mut self) {
        if let Page::Register(page) = &mut self.page {
            let user_id = page.user_id.trim().to_string();
            match user_id_available(&user_id) {
                Some(available) => {
                    page.availability = Some(available);
                    page.error = None;
                }
                None => {
                    // The check stays disabled until the identifier passes
                    // basic validation
                    page.availability = None;
                    page.error = validate_user_id(&user_id).err().map(|e| e.to_string());
                }
            }
        }
    }

    /// Request an email verification code for the address in the form.
    pub async fn request_email_code(&mut self) {
        let api = Arc::clone(&self.api);
        if let Page::Register(page) = &mut self.page {
            let email = page.email.trim().to_string();
            if let Err(e) = validate_email(&email) {
                page.error = Some(e.to_string());
                return;
            }

            match page.verification.request_code(&api, &email).await {
                Ok(()) => {
                    page.error = None;
                    page.notice = Some(format!("Verification code sent to {}", email));
                }
                Err(e) => page.error = Some(e.to_string()),
            }
        }
    }

    /// Check the code the user typed against the pending verification.
    pub async fn verify_email_code(&mut self) {
        let api = Arc::clone(&self.api);
        if let Page::Register(page) = &mut self.page {
            let code = page.code.trim().to_string();
            if code.is_empty() {
                page.error = Some("Enter the verification code".to_string());
                return;
            }

            match page.verification.submit_code(&api, &code).await {
                Ok(()) => {
                    page.error = None;
                    page.notice = Some("Email verified".to_string());
                }
                Err(e) => page.error = Some(e.to_string()),
            }
        }
    }

    /// Validate and submit the registration form.
    pub async fn submit_registration(&mut self) {
        let api = Arc::clone(&self.api);
        let request = match &mut self.page {
            Page::Register(page) => {
                let draft = RegistrationDraft {
                    user_id: page.user_id.trim(),
                    password: &page.password,
                    password_confirm: &page.confirm,
                    email: page.email.trim(),
                    email_verified: page.verification.is_verified(),
                };
                if let Err(e) = validate_registration(&draft) {
                    page.error = Some(e.to_string());
                    return;
                }

                let Some(token) = page.verification.token() else {
                    return;
                };
                let user_id = page.user_id.trim().to_string();
                let name = page.name.trim();
                let phone = page.phone.trim();
                RegisterRequest {
                    token: token.to_string(),
                    user_name: if name.is_empty() {
                        user_id.clone()
                    } else {
                        name.to_string()
                    },
                    user_id,
                    password: page.password.clone(),
                    email: page.email.trim().to_string(),
                    phone_number: if phone.is_empty() {
                        None
                    } else {
                        Some(phone.to_string())
                    },
                }
            }
            _ => return,
        };

        match api.register(&request).await {
            Ok(()) => {
                self.navigate(Route::Login);
                self.set_status_message("Account created. Please log in.".to_string());
            }
            Err(e) => {
                if let Page::Register(page) = &mut self.page {
                    page.error = Some(SessionError::from(e).user_message());
                }
            }
        }
    }

    /// Find-ID submit: local validation plus a confirmation message.
    pub fn submit_find_id(&mut self) {
        if let Page::FindId(page) = &mut self.page {
            match validate_email(page.email.trim()) {
                Ok(()) => {
                    page.error = None;
                    page.result = Some(
                        "If that email is registered, the identifier has been sent to it."
                            .to_string(),
                    );
                }
                Err(e) => {
                    page.result = None;
                    page.error = Some(e.to_string());
                }
            }
        }
    }

    /// Password-reset submit: local validation plus a confirmation message.
    pub fn submit_password_reset(&mut self) {
        if let Page::PasswordReset(page) = &mut self.page {
            match validate_email(page.email.trim()) {
                Ok(()) => {
                    page.error = None;
                    page.status =
                        Some("A password reset link has been sent to your email.".to_string());
                }
                Err(e) => {
                    page.status = None;
                    page.error = Some(e.to_string());
                }
            }
        }
    }

    /// Upload the avatar named in the form, then refresh the profile.
    pub async fn upload_avatar(&mut self) {
        let path = match &mut self.page {
            Page::Profile(page) => {
                let path = page.avatar_path.trim().to_string();
                if path.is_empty() {
                    page.error = Some("Enter the path of an image file".to_string());
                    return;
                }
                page.busy = true;
                page.error = None;
                page.notice = None;
                path
            }
            _ => return,
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if let Page::Profile(page) = &mut self.page {
                    page.busy = false;
                    page.error = Some(format!("Could not read {}: {}", path, e));
                }
                return;
            }
        };
        let file_name = std::path::Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("avatar")
            .to_string();

        let outcome = self.api.upload_avatar(&file_name, bytes).await;
        if let Page::Profile(page) = &mut self.page {
            page.busy = false;
            match outcome {
                Ok(()) => {
                    page.notice = Some("Avatar updated".to_string());
                    page.avatar_path.clear();
                }
                Err(e) => {
                    page.error = Some(SessionError::from(e).user_message());
                    return;
                }
            }
        }

        // The profile now carries a new avatar URL; force-refresh the cache
        self.spawn_profile_load(true);
    }

    /// Link or unlink the Google account, depending on the current state.
    pub async fn toggle_google_link(&mut self) {
        let linked = match &self.page {
            Page::Profile(page) => page.google_linked(),
            _ => return,
        };

        if linked {
            let outcome = self.api.google_unlink().await;
            if let Page::Profile(page) = &mut self.page {
                match outcome {
                    Ok(()) => {
                        self.session.invalidate();
                        if let Some(user) = &mut page.user {
                            user.google_linked = false;
                        }
                        page.notice = Some("Google account unlinked".to_string());
                        page.error = None;
                    }
                    Err(e) => page.error = Some(SessionError::from(e).user_message()),
                }
            }
        } else {
            self.start_google_link();
        }
    }

    /// Start a consent round to link the Google account.
    fn start_google_link(&mut self) {
        match &mut self.page {
            Page::Profile(page) if !page.busy => {
                page.busy = true;
                page.error = None;
                page.notice = None;
            }
            _ => return,
        }

        let client_id = self.config.google_client_id.clone();
        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = match run_consent(client_id).await {
                Ok(code) => api.google_login(&code).await.map_err(SessionError::from),
                Err(err) => Err(err),
            };
            let refreshed = match outcome {
                Ok(()) => {
                    session.invalidate();
                    session.fetch_current_user(true).await
                }
                Err(err) => Err(err),
            };
            let _ = tx
                .send((generation, SessionEvent::GoogleLinked(refreshed)))
                .await;
        });
    }

    /// Log out and return to the login page.
    pub async fn logout(&mut self) {
        self.auth.logout().await;
        self.navigate(Route::Login);
    }
}
