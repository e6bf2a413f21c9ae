use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use universe_client::{Config, FileStore, QueryParams, QueryValue, UniverseClient};

#[derive(Debug, Parser)]
#[command(name = "universe-client", version, about = "Query the Universe ticketing API")]
struct Cli {
    /// Token storage file (defaults to UNIVERSE_STORAGE_PATH or the local data dir)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Exchange the client credentials for an access token and store it
    Token,
    /// Fetch the guest list (limit, offset, since, event_id, listing_id)
    Guestlists {
        #[arg(value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Fetch the authenticated user
    CurrentUser,
    /// Fetch listings
    Listings {
        #[arg(value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// GET an arbitrary endpoint relative to the base URL
    Get {
        endpoint: String,
        #[arg(value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "universe_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    let storage_path = match cli.storage.clone().or_else(|| config.storage_path.clone()) {
        Some(path) => path,
        None => FileStore::default_path()?,
    };
    let storage = FileStore::open(&storage_path)
        .with_context(|| format!("Failed to open token storage {}", storage_path.display()))?;
    info!("Token storage: {}", storage.path().display());

    let client = UniverseClient::new(Arc::new(config), Arc::new(storage))?;

    match cli.command {
        Command::Token => {
            let record = client.acquire_token().await?;
            if let Some(issued_at) = record.issued_at() {
                info!("Token issued at {}", issued_at);
            }
            print_json(&record)
        }
        Command::Guestlists { params } => {
            print_json(&client.get_guest_lists::<Value>(&parse_params(&params)?).await?)
        }
        Command::CurrentUser => {
            print_json(&client.get_current_user::<Value>(&QueryParams::new()).await?)
        }
        Command::Listings { params } => {
            print_json(&client.get_listings::<Value>(&parse_params(&params)?).await?)
        }
        Command::Get { endpoint, params } => {
            print_json(&client.send_raw(&endpoint, &parse_params(&params)?).await?)
        }
    }
}

fn parse_params(raw: &[String]) -> Result<QueryParams> {
    let mut params = QueryParams::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Expected KEY=VALUE, got '{}'", pair);
        };
        params.insert(key, QueryValue::parse_lossy(value));
    }
    Ok(params)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
