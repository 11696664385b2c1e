//! Vortex KV command line client.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vortex_client::metrics::register_cache_metrics;
use vortex_client::{ClientSettings, ConfigClient};
use vortex_core::RawValue;

#[derive(Debug, Parser)]
#[command(name = "vortex-kv", version, about = "Read and write configuration in a remote KV store")]
struct Cli {
    /// Settings file (toml, yaml or json)
    #[arg(short, long, env = "VORTEX_KV_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the value stored under KEY
    Get { key: String },
    /// Store a JSON VALUE under KEY
    Set { key: String, value: String },
    /// List every key
    Keys,
    /// Print every key with its value
    All,
    /// Exit with status 0 if KEY exists, 1 otherwise
    Exists { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    register_cache_metrics();

    let settings = ClientSettings::load(cli.config.as_deref())?;
    tracing::info!(
        base_url = %settings.store.base_url,
        cache_enabled = settings.cache.enabled,
        ttl_ms = settings.cache.ttl.as_millis() as u64,
        "Starting vortex-kv v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = ConfigClient::from_settings(&settings)?;
    let status = run(&client, cli.command, &mut std::io::stdout().lock()).await?;

    Ok(ExitCode::from(status))
}

/// Ejecuta un comando y escribe su salida JSON en `out`.
///
/// Retorna el exit status del proceso.
async fn run(client: &ConfigClient, command: Command, out: &mut impl Write) -> anyhow::Result<u8> {
    match command {
        Command::Get { key } => match client.get::<RawValue>(&key).await {
            Some(value) => writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?,
            None => bail!("key '{key}' not found or unreadable"),
        },
        Command::Set { key, value } => {
            let value: RawValue = serde_json::from_str(&value)
                .with_context(|| format!("value for '{key}' is not valid JSON"))?;
            client.set(&key, &value).await?;
        },
        Command::Keys => {
            let keys = client.get_all_keys().await;
            writeln!(out, "{}", serde_json::to_string_pretty(&keys)?)?;
        },
        Command::All => {
            writeln!(out, "{}", serde_json::to_string_pretty(&client.get_all().await)?)?;
        },
        Command::Exists { key } => {
            if !client.exists(&key).await {
                return Ok(1);
            }
        },
    }

    Ok(0)
}
