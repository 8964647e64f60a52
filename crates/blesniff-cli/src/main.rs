use anyhow::{Context, Result};
use blesniff_core::{AddressFilter, Reporter, Sniffer};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blesniff")]
#[command(author, version, about = "Sniff nearby BLE advertisement packets", long_about = None)]
struct Cli {
    /// Filter devices by address (partial match, case insensitive)
    #[arg(short, long, value_name = "SUBSTRING")]
    addr: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    let filter = cli
        .addr
        .as_deref()
        .map(AddressFilter::new)
        .unwrap_or_else(AddressFilter::match_all);

    let sniffer = Sniffer::new(filter)
        .await
        .context("failed to create bluetooth sniffer")?;

    tracing::info!("Starting Bluetooth advertisement scanner...");
    if !sniffer.filter().is_empty() {
        tracing::info!(
            "Filtering devices containing address: {}",
            sniffer.filter().needle()
        );
    }
    tracing::info!("Press Ctrl+C to stop");

    let mut reporter = Reporter::stdout();
    sniffer
        .run(&mut reporter, cancel)
        .await
        .context("failed to run sniffer")?;

    tracing::info!("Bluetooth sniffer stopped.");
    Ok(())
}

/// Cancel the token on SIGINT, or SIGTERM where it exists.
fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        eprintln!("\nShutting down...");
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!("failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
