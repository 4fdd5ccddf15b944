//! jolokia-exec - Batching Jolokia exec collector
//!
//! Loads the configuration, then runs gather cycles on a fixed interval and
//! writes the resulting records to stdout as JSON lines.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use jolokia_exec::cli::Cli;
use jolokia_exec::collector::Source;
use jolokia_exec::config::Config;
use jolokia_exec::output::JsonLinesSink;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    jolokia_exec::init_logging(&cli.log_level.to_string(), cli.log_format)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting jolokia-exec");

    // Load configuration
    let mut config = Config::load(&cli.config)?;
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
        config.validate()?;
    }

    if cli.validate {
        println!(
            "Configuration is valid: {} metric(s) via {}",
            config.metrics.len(),
            if config.proxy.is_some() { "proxy" } else { "agent" }
        );
        return Ok(());
    }

    let source = Source::from_config(&config)?;
    let mut sink = JsonLinesSink::new(std::io::stdout());

    if cli.once {
        source.gather(&mut sink).await?;
        return Ok(());
    }

    let mut ticker = jolokia_exec::gather_ticker(Duration::from_secs(config.interval_secs));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // The next tick is the only retry.
                if let Err(e) = source.gather(&mut sink).await {
                    error!(error = %e, "Gather cycle failed");
                }
                let stats = source.stats();
                info!(
                    cycles = stats.cycles_total,
                    failures = stats.cycle_failures_total,
                    records = stats.records_total,
                    last_duration_ms = stats.last_duration_ms,
                    "Gather cycle finished"
                );
            }
            _ = &mut shutdown => break,
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
