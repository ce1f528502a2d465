//! Current-user cache with in-flight request deduplication.

use crate::error::SessionError;
use crate::hint::HintStore;
use account_client::{ApiClient, CurrentUser};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// The pending-fetch marker: a shared future every concurrent caller can
/// await, so one network request serves all of them.
type FetchFuture = Shared<BoxFuture<'static, Result<CurrentUser, SessionError>>>;

#[derive(Default)]
struct CacheState {
    user: Option<CurrentUser>,
    inflight: Option<FetchFuture>,
}

/// Owner of the current-user record and the pending-fetch marker.
///
/// Cheap to clone; all clones share one cache. Create exactly one at
/// application start and pass it to every consumer; the at-most-one-
/// outstanding-request guarantee is scoped to this instance, not to any
/// module-level global.
#[derive(Clone)]
pub struct SessionManager {
    api: Arc<ApiClient>,
    hints: HintStore,
    state: Arc<Mutex<CacheState>>,
}

impl SessionManager {
    /// Create a new session manager over the given API client.
    pub fn new(api: Arc<ApiClient>, hints: HintStore) -> Self {
        Self {
            api,
            hints,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// The current login hint.
    pub fn hint(&self) -> crate::SessionHint {
        self.hints.load()
    }

    /// Snapshot of the cached record, if any. No network call.
    pub fn cached_user(&self) -> Option<CurrentUser> {
        self.state.lock().unwrap().user.clone()
    }

    /// Fetch the current user.
    ///
    /// Returns the cached record unless `force` is set. If a fetch is
    /// already pending, every caller joins it and observes the same
    /// resolution. Otherwise a new request starts; its success stores the
    /// record and marks the hint logged-in, an authorization failure marks
    /// the hint logged-out, and either way the pending marker is gone
    /// before any waiter resumes.
    pub async fn fetch_current_user(&self, force: bool) -> Result<CurrentUser, SessionError> {
        let fetch = {
            let mut state = self.state.lock().unwrap();
            if !force {
                if let Some(user) = &state.user {
                    return Ok(user.clone());
                }
            }
            match &state.inflight {
                Some(pending) => pending.clone(),
                None => {
                    let fetch = self.start_fetch();
                    state.inflight = Some(fetch.clone());
                    fetch
                }
            }
        };
        fetch.await
    }

    fn start_fetch(&self) -> FetchFuture {
        let api = Arc::clone(&self.api);
        let hints = self.hints.clone();
        let state = Arc::clone(&self.state);

        debug!("starting current-user fetch");

        async move {
            let result = api
                .current_user()
                .await
                .map_err(SessionError::from);

            // Clear the marker and apply side effects under the lock, before
            // this future yields its value: a waiter resuming must never see
            // a finished fetch still registered as pending.
            let mut guard = state.lock().unwrap();
            guard.inflight = None;
            match &result {
                Ok(user) => {
                    guard.user = Some(user.clone());
                    hints.set(true);
                }
                Err(err) if err.is_unauthorized() => {
                    hints.set(false);
                }
                Err(_) => {}
            }
            drop(guard);

            result
        }
        .boxed()
        .shared()
    }

    /// Drop the cached record without touching the network or the hint.
    pub fn invalidate(&self) {
        self.state.lock().unwrap().user = None;
    }

    /// Re-validate the session after a page load.
    ///
    /// On an authorization failure, makes exactly one refresh call and one
    /// forced retry; a second failure of any kind is terminal for this
    /// attempt. Non-authorization failures are returned as-is, since there
    /// is nothing a refresh could fix.
    pub async fn revalidate(&self) -> Result<CurrentUser, SessionError> {
        match self.fetch_current_user(false).await {
            Ok(user) => Ok(user),
            Err(err) if err.is_unauthorized() => {
                debug!("current-user check unauthorized; attempting refresh");
                self.api.refresh().await.map_err(SessionError::from)?;
                self.fetch_current_user(true).await
            }
            Err(err) => Err(err),
        }
    }
}
