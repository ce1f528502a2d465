//! HiLi CLI - account management client for the HiLi service.

mod commands;
mod output;
mod tui;

use clap::{Parser, Subcommand};

/// HiLi CLI - manage your HiLi account from the terminal.
#[derive(Parser)]
#[command(name = "hili")]
#[command(about = "HiLi account management client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Launch the interactive terminal UI
    #[arg(long)]
    ui: bool,

    /// Use terminal-adaptive colors instead of the HiLi theme (only with --ui)
    #[arg(long)]
    terminal_colors: bool,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with identifier and password
    Login,

    /// Logout and clear the session
    Logout,

    /// Check session status
    Status,

    /// Show the current profile
    Profile,

    /// Upload a new avatar image
    Avatar {
        /// Path to the image file
        path: String,
    },

    /// Manage the linked Google account
    Google {
        #[command(subcommand)]
        command: GoogleCommands,
    },
}

#[derive(Subcommand)]
enum GoogleCommands {
    /// Link a Google account via browser consent
    Link,
    /// Remove the linked Google account
    Unlink,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging via observability crate
    observability::init_with_config(observability::LogConfig {
        service_name: "cli".into(),
        default_level: cli.log_level.clone(),
        also_stderr: false, // CLI doesn't need stderr output by default
        ..Default::default()
    });

    let ctx = match commands::build_context() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = if cli.ui && cli.command.is_none() {
        let theme_mode = if cli.terminal_colors {
            tui::ThemeMode::Terminal
        } else {
            tui::ThemeMode::Hili
        };
        tui::run(theme_mode, ctx).await
    } else if let Some(command) = cli.command {
        match command {
            Commands::Login => commands::login(ctx, &cli.format).await,
            Commands::Logout => commands::logout(ctx, &cli.format).await,
            Commands::Status => commands::status(ctx, &cli.format).await,
            Commands::Profile => commands::profile(ctx, &cli.format).await,
            Commands::Avatar { path } => commands::avatar(ctx, &path, &cli.format).await,
            Commands::Google { command } => match command {
                GoogleCommands::Link => commands::google_link(ctx, &cli.format).await,
                GoogleCommands::Unlink => commands::google_unlink(ctx, &cli.format).await,
            },
        }
    } else {
        // Default: no command, no --ui flag - just report session status
        commands::status(ctx, &cli.format).await
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
