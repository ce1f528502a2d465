//! Profile and linked-account commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use session_engine::GoogleConsent;
use std::path::Path;
use tracing::debug;

/// Show the current profile.
pub async fn profile(ctx: Context, format: &OutputFormat) -> Result<()> {
    match ctx.session.fetch_current_user(false).await {
        Ok(user) => match format {
            OutputFormat::Text => {
                output::print_row("User", &user.username);
                output::print_row("Email", &user.email);
                output::print_row(
                    "Avatar",
                    user.avatar_url.as_deref().unwrap_or("(none)"),
                );
                output::print_row(
                    "Google",
                    if user.google_linked { "linked" } else { "not linked" },
                );
                if let Some(phone) = &user.phone_number {
                    output::print_row("Phone", phone);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
        },
        Err(e) => {
            output::print_error(&e.user_message(), format);
        }
    }

    Ok(())
}

/// Upload a new avatar image.
pub async fn avatar(ctx: Context, path: &str, format: &OutputFormat) -> Result<()> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("avatar");

    match ctx.api.upload_avatar(file_name, bytes).await {
        Ok(()) => {
            // The profile now carries a new avatar URL; refetch it
            if let Err(e) = ctx.session.fetch_current_user(true).await {
                debug!(error = %e, "profile refresh after avatar upload failed");
            }
            output::print_success("Avatar updated", format);
        }
        Err(e) => {
            output::print_error(&format!("Avatar upload failed: {}", e), format);
        }
    }

    Ok(())
}

/// Link a Google account via browser consent.
pub async fn google_link(ctx: Context, format: &OutputFormat) -> Result<()> {
    let mut consent = GoogleConsent::with_defaults(ctx.config.google_client_id.clone());
    consent.initialize()?;

    let consent_url = consent.consent_url();
    println!("Opening browser for Google consent...");
    println!("If it does not open, visit:\n  {}", consent_url);
    if let Err(e) = open::that(&consent_url) {
        debug!(error = %e, "failed to open browser");
    }

    let code = consent.request_code().await?;

    match ctx.api.google_login(&code).await {
        Ok(()) => {
            ctx.session.invalidate();
            output::print_success("Google account linked", format);
        }
        Err(e) => {
            output::print_error(&format!("Google link failed: {}", e), format);
        }
    }

    Ok(())
}

/// Remove the linked Google account.
pub async fn google_unlink(ctx: Context, format: &OutputFormat) -> Result<()> {
    match ctx.api.google_unlink().await {
        Ok(()) => {
            ctx.session.invalidate();
            output::print_success("Google account unlinked", format);
        }
        Err(e) => {
            output::print_error(&format!("Google unlink failed: {}", e), format);
        }
    }

    Ok(())
}
