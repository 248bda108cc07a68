//! Color rotation service.
//!
//! Serves colors from a fixed palette in round-robin order and keeps a
//! per-color visit count in SQLite.
//!
//! ```text
//!     Client ──▶ GET /random-color ──▶ rotation engine ──▶ SQLite
//!                                        cursor + counts    colors.db
//!     Client ──▶ GET /color-stats  ──▶ visit table
//!     Client ──▶ anything else     ──▶ 404
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use color_rotator::config::{resolve_config, ConfigOverrides};
use color_rotator::lifecycle::{open_engine, Shutdown};
use color_rotator::observability::{logging, metrics};
use color_rotator::HttpServer;

#[derive(Parser)]
#[command(name = "color-rotator")]
#[command(about = "Serve palette colors in rotation and count visits", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:3000.
    #[arg(short, long)]
    bind: Option<String>,

    /// SQLite database file.
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let overrides = ConfigOverrides {
        bind_address: args.bind,
        database: args.database,
    };
    let config = resolve_config(args.config.as_deref(), &overrides)?;

    logging::init_logging(&config.observability);

    tracing::info!("color-rotator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.store.path.display(),
        palette_len = config.rotation.palette.len(),
        atomic_rotation = config.rotation.atomic,
        "Configuration loaded"
    );

    let engine = open_engine(&config)?;

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Held for the process lifetime; only OS signals stop the binary.
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, engine);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
