//! Agent and proxy sources
//!
//! A source owns the clients and the gatherer built from one configuration and
//! runs a full gather cycle over them. Clients are gathered one after another.

use std::time::Instant;

use tracing::{error, info};

use super::client::{redact, ClientConfig, JolokiaClient};
use super::gatherer::{Gatherer, Sink};
use super::metric::Metric;
use super::planner::ProxyConfig;
use crate::config::Config;
use crate::error::{AppError, AppResult, GatherResult};
use crate::stats::{GatherStats, StatsSnapshot};

/// Configured collection source
pub struct Source {
    clients: Vec<JolokiaClient>,
    gatherer: Gatherer,
    stats: GatherStats,
}

impl Source {
    /// One client per agent URL, no proxy targets
    pub fn agent(urls: &[String], config: &ClientConfig, metrics: Vec<Metric>) -> GatherResult<Self> {
        let clients = urls
            .iter()
            .map(|url| JolokiaClient::new(url, config))
            .collect::<GatherResult<Vec<_>>>()?;

        Ok(Self {
            clients,
            gatherer: Gatherer::new(metrics, None),
            stats: GatherStats::new(),
        })
    }

    /// A single proxy client fanning out over `proxy.targets`
    pub fn proxy(
        url: &str,
        config: &ClientConfig,
        proxy: &ProxyConfig,
        metrics: Vec<Metric>,
    ) -> GatherResult<Self> {
        Ok(Self {
            clients: vec![JolokiaClient::new(url, config)?],
            gatherer: Gatherer::new(metrics, Some(proxy)),
            stats: GatherStats::new(),
        })
    }

    /// Build the source described by a validated configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let metrics = config.metrics();

        let source = match (&config.agent, &config.proxy) {
            (_, Some(proxy)) => Self::proxy(
                &proxy.url,
                &proxy.client_config(),
                &proxy.targets,
                metrics,
            )?,
            (Some(agent), None) => Self::agent(&agent.urls, &agent.client_config(), metrics)?,
            (None, None) => {
                return Err(AppError::Config(crate::config::ConfigError::ValidationError(
                    "one of 'agent' or 'proxy' is required".to_string(),
                )))
            }
        };

        for client in &source.clients {
            info!(
                url = %redact(client.exec_url()),
                proxied = source.gatherer.planner().is_proxied(),
                metrics = source.gatherer.planner().metrics().len(),
                "Configured Jolokia source"
            );
        }

        Ok(source)
    }

    pub fn clients(&self) -> &[JolokiaClient] {
        &self.clients
    }

    pub fn gatherer(&self) -> &Gatherer {
        &self.gatherer
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Run one gather cycle over every client.
    ///
    /// A failing client does not stop the others. With a single client its
    /// error is returned as-is; otherwise failures are summarized.
    pub async fn gather<S>(&self, sink: &mut S) -> AppResult<usize>
    where
        S: Sink + ?Sized,
    {
        let mut records = 0;
        let mut failures = Vec::new();

        for client in &self.clients {
            let start = Instant::now();
            match self.gatherer.gather(client, sink).await {
                Ok(count) => {
                    self.stats.record_success(count, start.elapsed());
                    records += count;
                }
                Err(e) => {
                    self.stats.record_failure(start.elapsed());
                    error!(
                        url = %client.base_url(),
                        kind = ?e.kind(),
                        error = %e,
                        "Gather cycle failed"
                    );
                    failures.push(e);
                }
            }
        }

        match failures.len() {
            0 => Ok(records),
            1 if self.clients.len() == 1 => Err(AppError::Gather(failures.remove(0))),
            failed => Err(AppError::PartialFailure {
                failed,
                total: self.clients.len(),
            }),
        }
    }
}
