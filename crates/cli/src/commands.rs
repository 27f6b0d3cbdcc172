//! CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use mural_http::types::Publication;
use mural_session::{PublicationDraft, Session};
use std::path::PathBuf;
use tracing::info;
use url::Url;

use crate::config::ClientConfig;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        username: String,

        /// Password (or set MURAL_PASSWORD)
        #[arg(long, env = "MURAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a new account
    Register {
        username: String,

        /// Password (or set MURAL_PASSWORD)
        #[arg(long, env = "MURAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Report whether the stored session is still valid, refreshing it if expired
    Status,

    /// Exchange the stored refresh token for a new access token
    Refresh,

    /// Show the signed-in username
    Whoami,

    /// List recent publications
    Feed {
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,

        /// Publications per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Create a publication
    Publish {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Free-text place or a Google Maps link
        #[arg(long)]
        location: String,

        /// Publication category
        #[arg(long)]
        kind: Option<String>,

        #[arg(long, default_value = "")]
        date: String,

        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Register a device push-notification token with the signed-in user
    PushToken { token: String },
}

impl Commands {
    pub async fn execute(self, session: &Session, config: &ClientConfig) -> Result<()> {
        match self {
            Commands::Login { username, password } => {
                let response = session.login(&username, &password).await?;
                let name = response.username.unwrap_or(username);
                println!("Logged in as {name}");
                if response.refresh_token.is_none() {
                    info!("Server issued no refresh token; re-login will be needed on expiry");
                }
                Ok(())
            }
            Commands::Register { username, password } => {
                let message = session.register(&username, &password).await?;
                println!(
                    "{}",
                    message.unwrap_or_else(|| format!("Account {username} created, you can now log in"))
                );
                Ok(())
            }
            Commands::Logout => {
                session.logout().await?;
                println!("Logged out");
                Ok(())
            }
            Commands::Status => {
                if session.is_authenticated().await {
                    println!("authenticated");
                } else {
                    println!("not authenticated");
                }
                Ok(())
            }
            Commands::Refresh => {
                session
                    .authenticator()
                    .try_refresh()
                    .await
                    .context("Token refresh failed, please log in again")?;
                println!("Access token refreshed");
                Ok(())
            }
            Commands::Whoami => {
                match session.username().await? {
                    Some(name) => println!("{name}"),
                    None => println!("not logged in"),
                }
                Ok(())
            }
            Commands::Feed { pages, page_size } => {
                show_feed(session, pages, page_size.unwrap_or(config.feed.page_size)).await
            }
            Commands::Publish {
                title,
                description,
                location,
                kind,
                date,
                image,
            } => {
                session
                    .publish(PublicationDraft {
                        kind,
                        title,
                        description,
                        location,
                        date,
                        image,
                    })
                    .await?;
                println!("Publication created");
                Ok(())
            }
            Commands::PushToken { token } => {
                if session.register_push_token(&token).await? {
                    println!("Push token registered");
                } else {
                    println!("Not logged in, push token not registered");
                }
                Ok(())
            }
        }
    }
}

async fn show_feed(session: &Session, pages: u32, page_size: u32) -> Result<()> {
    let mut feed = session.feed(page_size);
    feed.refresh().await.context("Failed to load publications")?;

    for _ in 1..pages {
        if feed.load_more().await.context("Failed to load publications")? == 0 {
            break;
        }
    }

    let base = Url::parse(session.client().base_url()).ok();
    for publication in feed.publications() {
        print_publication(publication, base.as_ref());
    }

    println!(
        "-- page {} of {}",
        feed.current_page(),
        feed.total_pages()
    );
    Ok(())
}

fn print_publication(publication: &Publication, base: Option<&Url>) {
    println!("{}", publication.title);
    if let Some(author) = publication.author() {
        println!("  by {author}");
    }
    println!("  {}", publication.description);
    println!("  {} ({})", publication.location, publication.maps_url());
    if let Some(image) = base.and_then(|b| publication.image_url(b)) {
        println!("  image: {image}");
    }
    println!();
}
