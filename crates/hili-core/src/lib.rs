//! Shared configuration, filesystem paths and the core error type for the
//! HiLi client workspace.

mod config;
mod error;
mod paths;

pub use config::{Config, DEFAULT_API_URL, DEFAULT_GOOGLE_CLIENT_ID, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use paths::Paths;
