//! oscgaze daemon - Main entry point
//!
//! Runs the OSC gaze tracker standalone: binds the listener, then polls the
//! snapshot store and logs availability transitions and gaze samples until
//! interrupted.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oscgaze::config::PORT_ENV_VAR;
use oscgaze::{create_etvr_tracker, Config, EyeTracker, SessionHandle};

/// Command-line arguments for the oscgaze daemon
#[derive(Parser, Debug)]
#[command(name = "oscgaze")]
#[command(about = "OSC gaze tracker daemon")]
#[command(version)]
struct Args {
    /// UDP port to listen on (overrides environment and config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep the vertical channel latched across fuses
    #[arg(long)]
    latch_eyes_y: bool,

    /// Gaze poll interval in milliseconds
    #[arg(long, default_value = "250")]
    poll_interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oscgaze=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    config.port = config.resolve_port(args.port, PORT_ENV_VAR);
    config.latch_eyes_y = config.latch_eyes_y || args.latch_eyes_y;

    info!("Starting OSC gaze tracker on port {}", config.port);

    let mut tracker = create_etvr_tracker(&config)
        .await
        .context("Failed to create tracker (is the port already in use?)")?;
    info!("Tracker bound on {}", tracker.local_addr());

    tracker.start(SessionHandle(0)).await;

    let mut ticker = interval(Duration::from_millis(args.poll_interval_ms.max(1)));
    let mut was_available = false;

    loop {
        tokio::select! {
            _ = shutdown_signal() => break,
            _ = ticker.tick() => {
                let now = Instant::now();
                let available = tracker.is_gaze_available(now);
                if available != was_available {
                    if available {
                        info!("gaze available");
                    } else {
                        info!("gaze lost (stale)");
                    }
                    was_available = available;
                }
                if let Some(gaze) = tracker.gaze(now) {
                    debug!("gaze ({:.3}, {:.3}, {:.3})", gaze.x, gaze.y, gaze.z);
                }
            }
        }
    }

    info!("Shutting down");
    tracker.stop().await;
    info!("Shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
