//! Session-layer error type.

use account_client::ApiError;
use thiserror::Error;

/// Errors surfaced by the session layer.
///
/// `Clone` on purpose: one in-flight fetch resolves for every concurrent
/// waiter, so its failure must be deliverable more than once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The API rejected the session's credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The API answered with a non-2xx status other than 401.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),

    /// The browser consent flow failed (bind, timeout, denied).
    #[error("consent flow error: {0}")]
    Consent(String),
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => SessionError::Unauthorized,
            ApiError::Server { status, detail } => SessionError::Server {
                status,
                message: detail,
            },
            ApiError::Network(e) => SessionError::Network(e.to_string()),
            ApiError::InvalidUrl(e) => SessionError::Network(e.to_string()),
        }
    }
}

impl SessionError {
    /// Whether this error is an authorization failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Unauthorized)
    }

    /// Message suitable for display next to a form.
    ///
    /// Server-provided detail is shown verbatim; transport failures get a
    /// generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Unauthorized => "Session expired. Please log in again.".to_string(),
            SessionError::Server { message, .. } => message.clone(),
            SessionError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            SessionError::Consent(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message_is_detail() {
        let err = SessionError::Server {
            status: 422,
            message: "Invalid password.".into(),
        };
        assert_eq!(err.user_message(), "Invalid password.");
    }

    #[test]
    fn test_network_error_message_is_generic() {
        let err = SessionError::Network("connection refused".into());
        assert!(err.user_message().contains("try again"));
    }

    #[test]
    fn test_from_api_error_unauthorized() {
        let err = SessionError::from(ApiError::Unauthorized);
        assert!(err.is_unauthorized());
    }
}
