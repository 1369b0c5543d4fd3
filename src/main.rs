use anyhow::Result;
use clap::Parser;
use network_exporter::{
    config::Config, device::JsonRpcConnector, dispatcher::Dispatcher, metrics, server,
};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Address to bind to (overrides config)
    #[arg(short, long, env = "EXPORTER_ADDR")]
    addr: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "EXPORTER_PORT")]
    port: Option<u16>,

    /// Path under which to expose metrics (overrides config)
    #[arg(long, env = "EXPORTER_TELEMETRY_PATH")]
    telemetry_path: Option<String>,

    /// Timeout in seconds for every device request (overrides config)
    #[arg(long, env = "EXPORTER_TIMEOUT")]
    timeout: Option<u64>,

    /// Minimum seconds between two polls of the same node (overrides config)
    #[arg(long, env = "EXPORTER_POLL_INTERVAL")]
    poll_interval: Option<u64>,

    /// Inventory file (overrides config)
    #[arg(long, env = "EXPORTER_INVENTORY")]
    inventory: Option<String>,

    /// Vault file (overrides config)
    #[arg(long, env = "EXPORTER_VAULT")]
    vault: Option<String>,

    /// Access token required on every request (replaces configured tokens)
    #[arg(long, env = "EXPORTER_TOKEN")]
    token: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the metric catalog and exit
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    if args.metrics {
        print!("{}", metrics::catalog_table());
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Network Device Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = args.telemetry_path {
        config.server.telemetry_path = path;
    }
    if let Some(timeout) = args.timeout {
        config.device.timeout_seconds = timeout;
    }
    if let Some(interval) = args.poll_interval {
        config.device.poll_interval_seconds = interval;
    }
    if let Some(inventory) = args.inventory {
        config.inventory.inventory_file = inventory;
    }
    if let Some(vault) = args.vault {
        config.inventory.vault_file = vault;
    }
    if let Some(token) = args.token {
        config.auth.tokens = vec![SecretString::from(token)];
    }

    info!("Configuration loaded successfully");
    info!("Supported modules: {}", config.modules.join(", "));

    let connector = Arc::new(JsonRpcConnector::new(
        Duration::from_secs(config.device.timeout_seconds),
        config.device.verify_tls,
    ));
    let dispatcher = Arc::new(
        Dispatcher::new(
            connector,
            config.modules.clone(),
            config.device.poll_interval_seconds,
        )
        .with_tokens(config.auth.tokens.clone()),
    );

    match server::load_inventory(&config, &dispatcher).await {
        Ok(added) => info!("Loaded {} nodes from {}", added, config.inventory.inventory_file),
        Err(e) => {
            error!("Failed to load inventory: {}", e);
            std::process::exit(1);
        }
    }

    // Start the metrics server
    if let Err(e) = server::start(config, dispatcher).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
