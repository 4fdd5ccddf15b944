//! Configuration management for jolokia-exec
//!
//! Handles loading and validating configuration from YAML files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::collector::{
    format_exec_url, ClientConfig, Metric, MetricConfig, NamingDefaults, ProxyConfig, TlsConfig,
};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between gather cycles
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default)]
    pub default_field_prefix: String,

    #[serde(default = "default_field_separator")]
    pub default_field_separator: String,

    #[serde(default)]
    pub default_tag_prefix: String,

    /// Direct agent endpoints
    #[serde(default)]
    pub agent: Option<AgentConfig>,

    /// Proxy endpoint and its targets
    #[serde(default)]
    pub proxy: Option<JolokiaProxyConfig>,

    /// Exec metric definitions
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
}

/// Direct agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Jolokia agent URLs, gathered one after another
    pub urls: Vec<String>,

    /// Optional username for basic auth
    #[serde(default)]
    pub username: String,

    /// Optional password for basic auth
    #[serde(default)]
    pub password: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub response_timeout_ms: u64,

    #[serde(default)]
    pub tls: TlsConfig,
}

/// Proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JolokiaProxyConfig {
    /// Jolokia proxy URL
    pub url: String,

    /// Basic auth towards the proxy itself
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub response_timeout_ms: u64,

    #[serde(default)]
    pub tls: TlsConfig,

    /// Default target credentials and the target list
    #[serde(flatten)]
    pub targets: ProxyConfig,
}

// Default value functions
fn default_interval() -> u64 {
    60
}

fn default_timeout() -> u64 {
    5000
}

fn default_field_separator() -> String {
    ".".to_string()
}

impl AgentConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            response_timeout: Duration::from_millis(self.response_timeout_ms),
            username: self.username.clone(),
            password: self.password.clone(),
            tls: self.tls.clone(),
        }
    }
}

impl JolokiaProxyConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            response_timeout: Duration::from_millis(self.response_timeout_ms),
            username: self.username.clone(),
            password: self.password.clone(),
            tls: self.tls.clone(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn naming_defaults(&self) -> NamingDefaults {
        NamingDefaults {
            field_prefix: self.default_field_prefix.clone(),
            field_separator: self.default_field_separator.clone(),
            tag_prefix: self.default_tag_prefix.clone(),
        }
    }

    /// Metric definitions with naming defaults applied
    pub fn metrics(&self) -> Vec<Metric> {
        let defaults = self.naming_defaults();
        self.metrics
            .iter()
            .cloned()
            .map(|m| Metric::new(m, &defaults))
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(invalid("interval_secs must be greater than 0"));
        }

        match (&self.agent, &self.proxy) {
            (Some(_), Some(_)) => {
                return Err(invalid("configure either 'agent' or 'proxy', not both"));
            }
            (None, None) => return Err(invalid("one of 'agent' or 'proxy' is required")),
            (Some(agent), None) => {
                if agent.urls.is_empty() {
                    return Err(invalid("agent.urls must not be empty"));
                }
                for url in &agent.urls {
                    check_url(url)?;
                }
            }
            (None, Some(proxy)) => {
                check_url(&proxy.url)?;
                if proxy.targets.targets.is_empty() {
                    return Err(invalid("proxy.targets must not be empty"));
                }
                if proxy.targets.targets.iter().any(|t| t.url.is_empty()) {
                    return Err(invalid("every proxy target needs a url"));
                }
            }
        }

        if self.metrics.is_empty() {
            return Err(invalid("at least one metric is required"));
        }

        for (index, metric) in self.metrics.iter().enumerate() {
            if metric.name.is_empty() {
                return Err(invalid(&format!("metric {} has no name", index)));
            }
            if metric.mbean.is_empty() {
                return Err(invalid(&format!("metric '{}' has no mbean", metric.name)));
            }
        }

        Ok(())
    }
}

fn check_url(url: &str) -> Result<(), ConfigError> {
    format_exec_url(url, "", "").map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    // Credentials embedded in the URL would never be sent and would end up in tags.
    match Url::parse(url) {
        Ok(parsed) if !parsed.username().is_empty() || parsed.password().is_some() => Err(invalid(
            "URLs must not embed credentials; set username and password instead",
        )),
        _ => Ok(()),
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
