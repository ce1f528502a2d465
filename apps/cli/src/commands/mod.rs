//! CLI command implementations.

mod account;
mod auth;

pub use account::{avatar, google_link, google_unlink, profile};
pub use auth::{login, logout, status};

use account_client::ApiClient;
use anyhow::Result;
use hili_core::{Config, Paths};
use session_engine::{AuthController, HintStore, SessionManager};
use std::sync::Arc;

/// Everything a command needs: config plus the session stack wired to one
/// API client.
pub struct Context {
    pub config: Config,
    pub api: Arc<ApiClient>,
    pub hints: HintStore,
    pub session: SessionManager,
    pub controller: AuthController,
}

/// Build the command context from the on-disk configuration.
pub fn build_context() -> Result<Context> {
    let paths = Paths::new()?;
    let config = Config::load(&paths)?;

    let api = Arc::new(ApiClient::new(&config.api_url)?);
    let hints = HintStore::new(&paths);
    let session = SessionManager::new(Arc::clone(&api), hints.clone());
    let controller = AuthController::new(Arc::clone(&api), session.clone(), hints.clone());

    Ok(Context {
        config,
        api,
        hints,
        session,
        controller,
    })
}
