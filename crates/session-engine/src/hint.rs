//! Persisted login rendering hint.

use hili_core::Paths;
use std::path::PathBuf;
use tracing::debug;

/// Tri-state hint of login state.
///
/// Only ever a rendering hint for the moment before the authoritative
/// current-user check resolves. Never an authorization input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionHint {
    /// Nothing recorded (fresh install, or cleared by logout).
    #[default]
    Unknown,
    /// The last authoritative check saw a live session.
    LoggedIn,
    /// The last authoritative check was rejected.
    LoggedOut,
}

impl SessionHint {
    /// Whether the hint suggests rendering the logged-in state.
    pub fn is_logged_in(self) -> bool {
        matches!(self, SessionHint::LoggedIn)
    }
}

/// File-backed store for the login hint (`~/.hili/session`).
///
/// Writes are best-effort: losing the hint degrades first-paint rendering
/// and nothing else, so IO failures are logged and swallowed.
#[derive(Debug, Clone)]
pub struct HintStore {
    path: PathBuf,
}

impl HintStore {
    /// Create a store at the standard location.
    pub fn new(paths: &Paths) -> Self {
        Self {
            path: paths.session_hint_file(),
        }
    }

    /// Create a store at an explicit path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the current hint. Absent or unreadable file means Unknown.
    pub fn load(&self) -> SessionHint {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match content.trim() {
                "true" => SessionHint::LoggedIn,
                "false" => SessionHint::LoggedOut,
                _ => SessionHint::Unknown,
            },
            Err(_) => SessionHint::Unknown,
        }
    }

    /// Overwrite the hint with the outcome of an authoritative check.
    pub fn set(&self, logged_in: bool) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let value = if logged_in { "true" } else { "false" };
        if let Err(err) = std::fs::write(&self.path, value) {
            debug!(error = %err, path = %self.path.display(), "failed to persist session hint");
        }
    }

    /// Drop the hint entirely (logout).
    pub fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                debug!(error = %err, path = %self.path.display(), "failed to clear session hint");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_absent_file_is_unknown() {
        let dir = tempdir().unwrap();
        let store = HintStore::at_path(dir.path().join("session"));
        assert_eq!(store.load(), SessionHint::Unknown);
    }

    #[test]
    fn test_set_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = HintStore::at_path(dir.path().join("session"));

        store.set(true);
        assert_eq!(store.load(), SessionHint::LoggedIn);
        assert!(store.load().is_logged_in());

        store.set(false);
        assert_eq!(store.load(), SessionHint::LoggedOut);
        assert!(!store.load().is_logged_in());
    }

    #[test]
    fn test_clear_returns_to_unknown() {
        let dir = tempdir().unwrap();
        let store = HintStore::at_path(dir.path().join("session"));

        store.set(true);
        store.clear();
        assert_eq!(store.load(), SessionHint::Unknown);

        // Clearing an already-cleared store is fine
        store.clear();
        assert_eq!(store.load(), SessionHint::Unknown);
    }

    #[test]
    fn test_garbage_content_is_unknown() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "maybe").unwrap();

        let store = HintStore::at_path(path);
        assert_eq!(store.load(), SessionHint::Unknown);
    }

    #[test]
    fn test_set_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = HintStore::at_path(dir.path().join("nested").join("session"));

        store.set(true);
        assert_eq!(store.load(), SessionHint::LoggedIn);
    }
}
