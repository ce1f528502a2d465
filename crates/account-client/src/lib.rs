//! Typed HTTP client for the HiLi account API.
//!
//! This crate provides:
//! - A cookie-backed [`ApiClient`] covering every account endpoint
//!   (login, refresh, logout, profile, registration, avatar upload,
//!   email verification, Google OAuth exchange)
//! - Structured response types for profile and token payloads
//! - An error taxonomy that separates authorization failures from
//!   transport and server failures
//!
//! All credentials live in server-managed HttpOnly cookies; this layer
//! never sees or stores a token beyond the cookie jar inside the
//! underlying `reqwest` client.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use types::{CurrentUser, EmailToken, RegisterRequest, TokenResponse};
