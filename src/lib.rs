//! jolokia-exec library
//!
//! This crate provides a batching Jolokia exec client: it expands MBean
//! operation definitions into one request batch per cycle, optionally relayed
//! through a Jolokia proxy, and turns the responses into tagged records.

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod output;
pub mod stats;

use std::time::Duration;

use anyhow::Result;
use tokio::time::{Interval, MissedTickBehavior};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormat;

/// Initialize the logging subsystem
///
/// # Arguments
/// * `level` - Log level string (trace, debug, info, warn, error)
/// * `format` - Plain text or JSON lines
///
/// # Errors
/// Returns an error if the logging system fails to initialize
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr; stdout carries records.
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Ticker driving the gather loop
///
/// A cycle that overruns the period pushes the schedule back instead of
/// firing the missed ticks back to back.
pub fn gather_ticker(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gather_ticker_delays_missed_ticks() {
        let ticker = gather_ticker(Duration::from_secs(30));
        assert_eq!(ticker.period(), Duration::from_secs(30));
        assert_eq!(ticker.missed_tick_behavior(), MissedTickBehavior::Delay);
    }
}
