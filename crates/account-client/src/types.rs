//! Wire types for the account API.

use serde::{Deserialize, Serialize};

/// Profile of the active session, as returned by `GET /api/v1/accounts/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Login identifier.
    pub username: String,
    /// Account email address.
    pub email: String,
    /// Avatar image URL, if one has been uploaded.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Whether a Google account is linked.
    #[serde(default)]
    pub google_linked: bool,
    /// Phone number, if provided at registration.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Response of the token endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Response of `POST /api/v1/auth/email`: the opaque verification token
/// that must accompany the code check and the final registration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailToken {
    pub token: String,
}

/// Payload of `POST /api/v1/accounts`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Email verification token obtained through the verify flow.
    pub token: String,
    pub user_id: String,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub phone_number: Option<String>,
}
