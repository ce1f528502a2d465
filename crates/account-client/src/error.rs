//! Error taxonomy for account API calls.

use thiserror::Error;

/// Errors produced by [`crate::ApiClient`] calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API rejected the caller's credentials (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The API answered with a non-2xx status other than 401.
    /// `detail` carries the human-readable message from the response body
    /// when one was present.
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// The request never completed (connect, timeout, decode).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Whether this error is an authorization failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
