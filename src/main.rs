//! Campmate - campus assistant terminal client
//!
#![doc = "Main entry point for the Campmate chat client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use campmate::cli::{AuthCommand, Cli, Commands, SessionCommand};
use campmate::commands;
use campmate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load and validate configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { session } => {
            tracing::info!("Starting interactive chat");
            if let Some(s) = &session {
                tracing::debug!("Resuming session: {}", s);
            }
            commands::chat::run_chat(config, session).await?;
            Ok(())
        }
        Commands::Sessions { command } => match command {
            SessionCommand::List { json } => {
                commands::sessions::list_sessions(&config, json).await?;
                Ok(())
            }
            SessionCommand::Rename { id, title } => {
                commands::sessions::rename_session(&config, &id, &title).await?;
                Ok(())
            }
            SessionCommand::Pin { id } => {
                commands::sessions::set_pinned(&config, &id, true).await?;
                Ok(())
            }
            SessionCommand::Unpin { id } => {
                commands::sessions::set_pinned(&config, &id, false).await?;
                Ok(())
            }
            SessionCommand::Delete { id } => {
                commands::sessions::delete_session(&config, &id).await?;
                Ok(())
            }
            SessionCommand::Clear { yes } => {
                commands::sessions::clear_sessions(&config, yes).await?;
                Ok(())
            }
        },
        Commands::Auth { command } => match command {
            AuthCommand::Login { token } => {
                commands::auth::login(token)?;
                Ok(())
            }
            AuthCommand::Logout => {
                commands::auth::logout()?;
                Ok(())
            }
            AuthCommand::Status => {
                commands::auth::status()?;
                Ok(())
            }
        },
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "campmate=debug" } else { "campmate=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
