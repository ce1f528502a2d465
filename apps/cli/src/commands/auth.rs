//! Authentication commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use std::io::{self, Write};

/// Login with identifier and password.
pub async fn login(mut ctx: Context, format: &OutputFormat) -> Result<()> {
    // A cached session that still validates means no prompt is needed
    if ctx.hints.load().is_logged_in() {
        if let Ok(user) = ctx.session.revalidate().await {
            output::print_success(&format!("Already logged in as {}", user.username), format);
            return Ok(());
        }
    }

    // Prompt for identifier
    print!("Identifier: ");
    io::stdout().flush()?;
    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    let username = username.trim().to_string();

    if username.is_empty() {
        output::print_error("Identifier is required", format);
        return Ok(());
    }

    // Prompt for password (hidden)
    let password = rpassword::prompt_password("Password: ")?;

    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(());
    }

    println!("Logging in...");

    match ctx.controller.login(&username, &password).await {
        Ok(()) => {
            let display = ctx
                .session
                .cached_user()
                .map(|u| u.username)
                .unwrap_or(username);
            output::print_success(&format!("Logged in as {}", display), format);
        }
        Err(e) => {
            output::print_error(&format!("Login failed: {}", e.user_message()), format);
        }
    }

    Ok(())
}

/// Logout and clear the session.
pub async fn logout(mut ctx: Context, format: &OutputFormat) -> Result<()> {
    ctx.controller.logout().await;
    output::print_success("Logged out successfully", format);
    Ok(())
}

/// Check session status.
pub async fn status(ctx: Context, format: &OutputFormat) -> Result<()> {
    match ctx.session.revalidate().await {
        Ok(user) => match format {
            OutputFormat::Text => {
                println!("Auth:     logged in");
                output::print_row("User", &user.username);
                output::print_row("Email", &user.email);
                if user.google_linked {
                    output::print_row("Google", "linked");
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "logged_in": true,
                    "username": user.username,
                    "email": user.email,
                    "google_linked": user.google_linked,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        },
        Err(e) if e.is_unauthorized() => match format {
            OutputFormat::Text => {
                println!("Auth:     not logged in");
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "logged_in": false }));
            }
        },
        Err(e) => match format {
            OutputFormat::Text => {
                println!("Auth:     unknown ({})", e.user_message());
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "logged_in": null,
                    "error": e.user_message(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        },
    }

    Ok(())
}
