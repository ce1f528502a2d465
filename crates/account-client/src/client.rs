//! HTTP client for the account API.

use crate::error::{ApiError, ApiResult};
use crate::types::{CurrentUser, EmailToken, RegisterRequest, TokenResponse};
use reqwest::StatusCode;
use url::Url;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("hili-client/", env!("CARGO_PKG_VERSION"));

/// Pull the FastAPI-style `{"detail": ...}` message out of an error body.
fn extract_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    match json.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Map a non-2xx response to an [`ApiError`], consuming the body.
async fn error_for_response(response: reqwest::Response, context: &'static str) -> ApiError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        tracing::debug!(status = %status, context, "request unauthorized");
        return ApiError::Unauthorized;
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::error!(status = %status, detail = %detail, context, "request failed");
    ApiError::Server {
        status: status.as_u16(),
        detail,
    }
}

/// Cookie-backed client for the account API.
///
/// The server manages access and refresh credentials as HttpOnly cookies;
/// the embedded cookie store carries them across calls, so no token ever
/// passes through this layer explicitly.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the given API base URL.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        // Validate early so a bad config fails at startup, not mid-flow
        let parsed = Url::parse(base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Build the full URL for an API path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in with a form-encoded credential pair (`POST /api/v1/auth/token`).
    ///
    /// On success the server sets the session cookies; the returned access
    /// token is informational only.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenResponse> {
        let url = self.endpoint("/api/v1/auth/token");
        tracing::debug!(username = %username, "requesting session tokens");

        let response = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "login").await);
        }

        Ok(response.json().await?)
    }

    /// Rotate the session using the server-held refresh credential
    /// (`POST /api/v1/auth/token/refresh`).
    pub async fn refresh(&self) -> ApiResult<TokenResponse> {
        let url = self.endpoint("/api/v1/auth/token/refresh");
        tracing::debug!("refreshing session tokens");

        let response = self.http.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "refresh").await);
        }

        Ok(response.json().await?)
    }

    /// Invalidate the server-side session (`DELETE /api/v1/auth/logout`).
    pub async fn logout(&self) -> ApiResult<()> {
        let url = self.endpoint("/api/v1/auth/logout");
        tracing::debug!("revoking session");

        let response = self.http.delete(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "logout").await);
        }

        Ok(())
    }

    /// Fetch the profile of the active session (`GET /api/v1/accounts/me`).
    pub async fn current_user(&self) -> ApiResult<CurrentUser> {
        let url = self.endpoint("/api/v1/accounts/me");

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "current_user").await);
        }

        Ok(response.json().await?)
    }

    /// Submit a registration payload (`POST /api/v1/accounts`).
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        let url = self.endpoint("/api/v1/accounts");
        tracing::debug!(user_id = %request.user_id, "submitting registration");

        let response = self.http.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "register").await);
        }

        tracing::info!(user_id = %request.user_id, "account created");
        Ok(())
    }

    /// Upload a new avatar image (`POST /api/v1/accounts/avatar`, multipart
    /// part `avatar`).
    pub async fn upload_avatar(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<()> {
        let url = self.endpoint("/api/v1/accounts/avatar");
        tracing::debug!(file_name = %file_name, size = bytes.len(), "uploading avatar");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("avatar", part);

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "upload_avatar").await);
        }

        Ok(())
    }

    /// Request an email verification code (`POST /api/v1/auth/email`).
    ///
    /// Returns the opaque token that pairs the mailed code with the later
    /// verify call and the final registration.
    pub async fn request_email_code(&self, email: &str) -> ApiResult<EmailToken> {
        let url = self.endpoint("/api/v1/auth/email");
        tracing::debug!(email = %email, "requesting email verification code");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "request_email_code").await);
        }

        Ok(response.json().await?)
    }

    /// Check a verification code against its token
    /// (`POST /api/v1/auth/email/verify`).
    pub async fn verify_email_code(&self, token: &str, code: &str) -> ApiResult<()> {
        let url = self.endpoint("/api/v1/auth/email/verify");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "token": token, "code": code }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "verify_email_code").await);
        }

        Ok(())
    }

    /// Exchange a Google authorization code for a session
    /// (`POST /api/v1/auth/google/login`).
    pub async fn google_login(&self, code: &str) -> ApiResult<()> {
        let url = self.endpoint("/api/v1/auth/google/login");
        tracing::debug!("forwarding Google authorization code");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "google_login").await);
        }

        Ok(())
    }

    /// Remove the linked Google account (`POST /api/v1/auth/google/unlink`).
    pub async fn google_unlink(&self) -> ApiResult<()> {
        let url = self.endpoint("/api/v1/auth/google/unlink");

        let response = self.http.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_for_response(response, "google_unlink").await);
        }

        Ok(())
    }
}
