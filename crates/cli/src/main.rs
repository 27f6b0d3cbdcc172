//! Mural CLI - command-line client for the Mural social feed

mod commands;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use commands::Commands;
use mural_core::FileStore;
use mural_http::{ApiClient, ClientError};
use mural_session::{Session, SessionError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "mural")]
#[command(about = "Command-line client for the Mural social feed")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (defaults to <config_dir>/mural/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for the session file and logs
    #[arg(short = 'd', long, global = true, env = "MURAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(config::default_data_dir);
    logging::init_logging(cli.log_level.into(), &data_dir, cli.no_file_log)?;

    let config = config::ClientConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    let session = build_session(&config, &data_dir)?;

    if let Err(e) = cli.command.execute(&session, &config).await {
        error!("Command failed: {e:#}");
        eprintln!("Error: {}", failure_message(&e));
        if needs_login(&e) {
            eprintln!("Run `mural login` to sign in again");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn build_session(config: &config::ClientConfig, data_dir: &std::path::Path) -> Result<Session> {
    let mut builder = ApiClient::builder().base_url(&config.api.base_url);
    if config.api.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.api.timeout_secs));
    }
    let client = builder.build().context("Failed to build API client")?;

    let store_path = config.store_path(data_dir);
    debug!(path = %store_path.display(), "Using session store");

    Ok(Session::new(client, Arc::new(FileStore::new(store_path))))
}

/// The server's explanation when there is one, otherwise the full error chain
fn failure_message(err: &anyhow::Error) -> String {
    let server_message = err.chain().find_map(|cause| {
        // `SessionError::Api` is transparent, so its `ClientError` is not a separate link
        if let Some(SessionError::Api(api)) = cause.downcast_ref::<SessionError>() {
            return api.user_message();
        }
        cause
            .downcast_ref::<ClientError>()
            .and_then(ClientError::user_message)
    });

    match server_message {
        Some(message) => message.to_string(),
        None => format!("{err:#}"),
    }
}

fn needs_login(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<SessionError>()
            .is_some_and(SessionError::requires_login)
    })
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mural_session::AuthError;

    #[test]
    fn test_rejected_login_shows_server_message() {
        let err = anyhow::Error::from(SessionError::Api(ClientError::AuthenticationFailed(
            "Credenciales inválidas".to_string(),
        )));

        assert_eq!(failure_message(&err), "Credenciales inválidas");
        assert!(needs_login(&err));
    }

    #[test]
    fn test_missing_session_asks_for_login() {
        let err = anyhow::Error::from(SessionError::NotAuthenticated(AuthError::NoRefreshToken))
            .context("Publishing failed");

        assert!(needs_login(&err));
        assert!(failure_message(&err).starts_with("Publishing failed: Not authenticated"));
    }

    #[test]
    fn test_feed_error_uses_server_message_through_context() {
        let err = anyhow::Error::from(ClientError::ServerError {
            status: 503,
            message: "mantenimiento".to_string(),
        })
        .context("Failed to load publications");

        assert_eq!(failure_message(&err), "mantenimiento");
        assert!(!needs_login(&err));
    }

    #[test]
    fn test_local_error_keeps_full_chain() {
        let err = anyhow::Error::from(SessionError::Validation(
            "required fields missing: title".to_string(),
        ));

        assert_eq!(
            failure_message(&err),
            "Invalid input: required fields missing: title"
        );
        assert!(!needs_login(&err));
    }
}
