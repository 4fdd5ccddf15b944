//! CLI argument parsing for jolokia-exec
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: JOLOKIA_EXEC_CONFIG)
//! - `--interval` / `-i`: Seconds between gather cycles (overrides config file, env: JOLOKIA_EXEC_INTERVAL)
//! - `--once`: Run a single gather cycle and exit
//! - `--validate`: Validate configuration without gathering
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: JOLOKIA_EXEC_LOG_LEVEL)
//! - `--log-format`: Log output format (text/json, env: JOLOKIA_EXEC_LOG_FORMAT)
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// jolokia-exec - Batching Jolokia exec collector
///
/// Invokes MBean operations through a Jolokia agent or proxy and writes
/// one JSON record per response to stdout.
#[derive(Parser, Debug)]
#[command(name = "jolokia-exec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "JOLOKIA_EXEC_CONFIG"
    )]
    pub config: PathBuf,

    /// Seconds between gather cycles (overrides config file)
    #[arg(short, long, value_name = "SECS", env = "JOLOKIA_EXEC_INTERVAL")]
    pub interval: Option<u64>,

    /// Run a single gather cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Validate configuration without gathering
    #[arg(long)]
    pub validate: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "JOLOKIA_EXEC_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "JOLOKIA_EXEC_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log output format
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["jolokia-exec"]);
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.interval, None);
        assert!(!cli.once);
        assert!(!cli.validate);
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_cli_with_options() {
        let cli = Cli::parse_from([
            "jolokia-exec",
            "-c",
            "custom.yaml",
            "-i",
            "15",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--once",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.yaml"));
        assert_eq!(cli.interval, Some(15));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.once);
    }
}
