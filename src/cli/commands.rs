use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::render::{message_line, render_view};
use crate::config::{ClientConfig, SendOrdering};
use crate::error::ChatError;
use crate::presentation::format_clock_time;
use crate::service::InMemoryConversationService;
use crate::session::{FileIdentityStore, Identity, IdentityStore};
use crate::sync::{ChatSession, SendOutcome};

#[derive(Parser)]
#[command(name = "chat-sync")]
#[command(version = "0.1.0")]
#[command(about = "Chat with the AI assistant from the terminal", long_about = None)]
pub struct Cli {
    /// Conversation service base URL (overrides config and CHAT_SYNC_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to a config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Queue sends so replies land in the order messages were sent
    #[arg(long, global = true)]
    pub serialize_sends: bool,

    /// Use a throwaway in-memory backend instead of the HTTP service
    #[arg(long, global = true)]
    pub offline: bool,

    /// Email for this run, instead of the saved one
    #[arg(long, global = true)]
    pub email: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the saved email address, or save a new one
    Identity { email: Option<String> },
    /// Forget the saved email address and start a new chat next time
    Logout,
    /// Print the conversation history
    History,
    /// Send one message and print the reply
    Send {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Interactive chat (one message per line, /reload, /quit)
    Chat,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let identity_store = FileIdentityStore::in_config_dir()?;

    match &cli.command {
        Some(Commands::Identity { email: Some(email) }) => {
            let identity = Identity::parse(email).map_err(user_error)?;
            identity_store.set(&identity)?;
            println!("Saved email: {}", identity);
        }
        Some(Commands::Identity { email: None }) => match identity_store.get()? {
            Some(identity) => println!("{}", identity),
            None => println!("No email saved. Run `chat-sync identity <EMAIL>` to set one."),
        },
        Some(Commands::Logout) => {
            identity_store.clear()?;
            println!("Signed out. The next chat starts fresh.");
        }
        Some(Commands::History) => {
            let session = open_session(&cli, &identity_store).await?;
            println!("{}", render_view(&session.view()));
        }
        Some(Commands::Send { text }) => {
            let session = open_session(&cli, &identity_store).await?;
            send_once(&session, &text.join(" ")).await?;
        }
        Some(Commands::Chat) => {
            let session = open_session(&cli, &identity_store).await?;
            chat_loop(&session).await?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Config file + environment, then command-line overrides
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_layers(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs;
    }
    if cli.serialize_sends {
        config.send_ordering = SendOrdering::Serialized;
    }
    config.validate()?;
    Ok(config)
}

fn resolve_identity(cli: &Cli, identity_store: &dyn IdentityStore) -> Result<Identity> {
    if let Some(email) = &cli.email {
        return Identity::parse(email).map_err(user_error);
    }
    match identity_store.get()? {
        Some(identity) => Ok(identity),
        None => bail!("No email set. Run `chat-sync identity <EMAIL>` or pass --email."),
    }
}

/// Build the session and load history for the resolved identity
async fn open_session(cli: &Cli, identity_store: &dyn IdentityStore) -> Result<ChatSession> {
    let config = resolve_config(cli)?;
    let identity = resolve_identity(cli, identity_store)?;

    let session = if cli.offline {
        ChatSession::new(Arc::new(InMemoryConversationService::new()), config.send_ordering)
    } else {
        ChatSession::from_config(&config).context("Failed to create HTTP client")?
    };
    debug!(api_url = %config.api_url, offline = cli.offline, "Opening session");

    session.select_identity(identity.as_str()).await.map_err(user_error)?;
    Ok(session)
}

async fn send_once(session: &ChatSession, text: &str) -> Result<()> {
    match session.send(text).await.map_err(user_error)? {
        SendOutcome::Confirmed { user, assistant } => {
            println!("{}", message_line(&format_clock_time(&user.created_at, &Local), &user));
            println!(
                "{}",
                message_line(&format_clock_time(&assistant.created_at, &Local), &assistant)
            );
        }
        SendOutcome::Ignored => bail!("Nothing to send: message is empty"),
        other => debug!(?other, "Send settled without a reply to show"),
    }
    Ok(())
}

async fn chat_loop(session: &ChatSession) -> Result<()> {
    if let Some(identity) = session.identity() {
        println!("Chatting as {}. Type /reload to refresh, /quit to exit.", identity);
    }
    println!("{}", render_view(&session.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/reload" => {
                session.dismiss_error();
                match session.reload().await {
                    Ok(_) => println!("{}", render_view(&session.view())),
                    Err(e) => eprintln!("{}", describe(&e)),
                }
            }
            _ => {
                session.set_input(line);
                match session.submit().await {
                    Ok(SendOutcome::Confirmed { assistant, .. }) => println!(
                        "{}",
                        message_line(&format_clock_time(&assistant.created_at, &Local), &assistant)
                    ),
                    Ok(SendOutcome::Ignored) => {}
                    Ok(other) => debug!(?other, "Send settled without a reply to show"),
                    Err(e) => eprintln!("{}", describe(&e)),
                }
            }
        }
    }

    Ok(())
}

/// Banner text for user-facing errors, the full message otherwise
fn describe(e: &ChatError) -> String {
    match e.kind() {
        Some(kind) => kind.reason().to_string(),
        None => e.to_string(),
    }
}

/// Put the banner text on top of the error chain
fn user_error(e: ChatError) -> anyhow::Error {
    if !e.is_user_facing() {
        return e.into();
    }
    let banner = describe(&e);
    anyhow::Error::new(e).context(banner)
}
