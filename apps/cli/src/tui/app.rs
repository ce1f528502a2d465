//! Application state and routing for the TUI.

use super::pages::{
    FindIdPage, LandingPage, LoginPage, PasswordResetPage, ProfilePage, RegisterPage,
};
use super::theme::{Theme, ThemeMode};
use crate::commands::Context;
use account_client::{ApiClient, CurrentUser};
use hili_core::Config;
use session_engine::{AuthController, SessionError, SessionManager};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Screens reachable in the client, addressed by the account app's paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Landing,
    Login,
    Register,
    FindId,
    PasswordReset,
    Profile,
}

impl Route {
    /// Map a path to its screen.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Landing),
            "/account/login" => Some(Route::Login),
            "/account/register" => Some(Route::Register),
            "/account/find-id" => Some(Route::FindId),
            "/account/password-reset" => Some(Route::PasswordReset),
            "/account/profile" => Some(Route::Profile),
            _ => None,
        }
    }

    /// The path this screen is addressed by.
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/account/login",
            Route::Register => "/account/register",
            Route::FindId => "/account/find-id",
            Route::PasswordReset => "/account/password-reset",
            Route::Profile => "/account/profile",
        }
    }

    /// Title shown in the header bar.
    pub fn title(self) -> &'static str {
        match self {
            Route::Landing => "Home",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::FindId => "Find ID",
            Route::PasswordReset => "Password Reset",
            Route::Profile => "Profile",
        }
    }
}

/// The active page. Recreated on navigation, so form drafts die with the
/// page they belong to.
pub enum Page {
    Landing(LandingPage),
    Login(LoginPage),
    Register(RegisterPage),
    FindId(FindIdPage),
    PasswordReset(PasswordResetPage),
    Profile(ProfilePage),
}

impl Page {
    fn for_route(route: Route) -> Self {
        match route {
            Route::Landing => Page::Landing(LandingPage::new()),
            Route::Login => Page::Login(LoginPage::new()),
            Route::Register => Page::Register(RegisterPage::new()),
            Route::FindId => Page::FindId(FindIdPage::new()),
            Route::PasswordReset => Page::PasswordReset(PasswordResetPage::new()),
            Route::Profile => Page::Profile(ProfilePage::new()),
        }
    }
}

/// Result of a background session task, tagged with the navigation
/// generation it belongs to.
pub enum SessionEvent {
    Revalidated(Result<CurrentUser, SessionError>),
    ProfileLoaded(Result<CurrentUser, SessionError>),
    GoogleExchanged(Result<(), SessionError>),
    GoogleLinked(Result<CurrentUser, SessionError>),
}

/// Main application state.
pub struct App {
    // Navigation
    pub route: Route,
    pub page: Page,
    pub should_quit: bool,

    // Session stack
    pub config: Config,
    pub api: Arc<ApiClient>,
    pub session: SessionManager,
    pub auth: AuthController,

    // UI state
    pub theme: Theme,
    pub status_message: Option<String>,
    pub spinner_frame: usize,

    // Background task plumbing. Results carry the generation they were
    // spawned under; anything from a superseded page is dropped.
    pub(super) generation: u64,
    pub(super) event_tx: mpsc::Sender<(u64, SessionEvent)>,
    pub(super) event_rx: mpsc::Receiver<(u64, SessionEvent)>,
}

impl App {
    /// Create the application state and mount the landing page.
    pub fn new(theme_mode: ThemeMode, ctx: Context) -> Self {
        let (event_tx, event_rx) = mpsc::channel(16);

        let mut app = Self {
            route: Route::Landing,
            page: Page::for_route(Route::Landing),
            should_quit: false,

            config: ctx.config,
            api: ctx.api,
            session: ctx.session,
            auth: ctx.controller,

            theme: Theme::from_mode(theme_mode),
            status_message: None,
            spinner_frame: 0,

            generation: 0,
            event_tx,
            event_rx,
        };
        app.mount_current_page();
        app
    }

    /// Switch to another screen. The previous page's draft state is dropped.
    pub fn navigate(&mut self, route: Route) {
        self.generation = self.generation.wrapping_add(1);
        self.route = route;
        self.page = Page::for_route(route);
        self.status_message = None;
        self.auth.clear_error();
        self.mount_current_page();
    }

    /// Kick off the on-mount work for the current page.
    fn mount_current_page(&mut self) {
        match self.route {
            Route::Landing => self.spawn_revalidate(),
            Route::Profile => self.spawn_profile_load(false),
            _ => {}
        }
    }

    /// Set a status message.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Clear the status message.
    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    /// Whether anything on the current page is animating.
    pub fn animating(&self) -> bool {
        match &self.page {
            Page::Landing(page) => page.checking,
            Page::Profile(page) => page.loading || page.busy,
            Page::Login(page) => page.busy || self.auth.loading(),
            _ => false,
        }
    }

    /// Get the current spinner character for loading animation.
    pub fn spinner_char(&self) -> char {
        const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Advance the spinner frame (call on each render while checking).
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// One-second tick: drives the email re-send cooldown.
    pub fn on_tick(&mut self) {
        if let Page::Register(page) = &mut self.page {
            page.verification.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_path_roundtrip() {
        for route in [
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::FindId,
            Route::PasswordReset,
            Route::Profile,
        ] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_unknown_path_has_no_route() {
        assert_eq!(Route::from_path("/account/unknown"), None);
        assert_eq!(Route::from_path(""), None);
    }
}
