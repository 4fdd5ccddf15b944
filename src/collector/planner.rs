//! Exec 요청 계획
//!
//! Expands metric definitions into the flat request batch sent in one round trip,
//! fanning out across proxy targets when a proxy is configured.

use serde::{Deserialize, Serialize};

use super::metric::Metric;
use super::protocol::{WireRequest, WireTarget};

/// JMX endpoint reached through the proxy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTarget {
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Proxy-level target settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Used for targets that leave `username` empty
    #[serde(default)]
    pub default_target_username: String,
    /// Used for targets that leave `password` empty
    #[serde(default)]
    pub default_target_password: String,
    #[serde(default)]
    pub targets: Vec<ProxyTarget>,
}

impl ProxyConfig {
    /// Targets with the default credentials filled in.
    pub fn resolved_targets(&self) -> Vec<ProxyTarget> {
        self.targets
            .iter()
            .map(|target| {
                let mut target = target.clone();
                if target.username.is_empty() {
                    target.username = self.default_target_username.clone();
                }
                if target.password.is_empty() {
                    target.password = self.default_target_password.clone();
                }
                target
            })
            .collect()
    }
}

/// Request planner
///
/// Target credentials are resolved once at construction; `plan` builds a fresh
/// batch for every gather cycle.
#[derive(Debug, Clone)]
pub struct RequestPlanner {
    metrics: Vec<Metric>,
    targets: Option<Vec<ProxyTarget>>,
}

impl RequestPlanner {
    pub fn new(metrics: Vec<Metric>, proxy: Option<&ProxyConfig>) -> Self {
        Self {
            metrics,
            targets: proxy.map(ProxyConfig::resolved_targets),
        }
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Whether requests are relayed through a proxy
    pub fn is_proxied(&self) -> bool {
        self.targets.is_some()
    }

    /// Build the request batch.
    ///
    /// Without a proxy there is one request per metric. With a proxy the batch is
    /// target-major: every metric for the first target, then every metric for the
    /// next, for |metrics| x |targets| requests in total.
    pub fn plan(&self) -> Vec<WireRequest> {
        match &self.targets {
            None => self.metrics.iter().map(exec_request).collect(),
            Some(targets) => targets
                .iter()
                .flat_map(|target| {
                    let wire_target = WireTarget {
                        url: target.url.clone(),
                        user: target.username.clone(),
                        password: target.password.clone(),
                    };
                    self.metrics
                        .iter()
                        .map(move |metric| exec_request(metric).with_target(wire_target.clone()))
                })
                .collect(),
        }
    }
}

fn exec_request(metric: &Metric) -> WireRequest {
    WireRequest::exec(&metric.mbean, &metric.operation, &metric.arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::metric::{MetricConfig, NamingDefaults};
    use crate::collector::protocol::Argument;

    fn metric(name: &str, mbean: &str, arguments: &[&str]) -> Metric {
        Metric::new(
            MetricConfig {
                name: name.to_string(),
                mbean: mbean.to_string(),
                operation: "poll".to_string(),
                arguments: arguments.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            &NamingDefaults::default(),
        )
    }

    fn target(url: &str, username: &str, password: &str) -> ProxyTarget {
        ProxyTarget {
            url: url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_plan_without_proxy() {
        let planner = RequestPlanner::new(
            vec![
                metric("object", "test:foo=bar", &[]),
                metric("object_with_an_argument", "test:foo=bar", &["biz"]),
                metric("object_with_arguments", "test:foo=bar", &["baz", "biz"]),
            ],
            None,
        );

        let requests = planner.plan();
        assert!(!planner.is_proxied());
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.target.is_none()));
        assert!(requests.iter().all(|r| r.operation.as_deref() == Some("poll")));
        assert_eq!(requests[0].argument, Argument::Absent);
        assert_eq!(requests[1].argument, Argument::Scalar("biz".to_string()));
        assert_eq!(
            requests[2].argument,
            Argument::List(vec!["baz".to_string(), "biz".to_string()])
        );
    }

    #[test]
    fn test_plan_fans_out_over_targets() {
        let proxy = ProxyConfig {
            default_target_username: "sally".to_string(),
            default_target_password: "seashore".to_string(),
            targets: vec![
                target("service:jmx:a", "", ""),
                target("service:jmx:b", "jack", "benimble"),
                target("service:jmx:c", "jill", ""),
            ],
        };
        let planner = RequestPlanner::new(
            vec![metric("one", "a:x=1", &[]), metric("two", "b:y=2", &[])],
            Some(&proxy),
        );

        let requests = planner.plan();
        assert!(planner.is_proxied());
        assert_eq!(requests.len(), 6);

        let creds: Vec<(&str, &str, &str, &str)> = requests
            .iter()
            .map(|r| {
                let t = r.target.as_ref().unwrap();
                (r.mbean.as_str(), t.url.as_str(), t.user.as_str(), t.password.as_str())
            })
            .collect();
        assert_eq!(
            creds,
            vec![
                ("a:x=1", "service:jmx:a", "sally", "seashore"),
                ("b:y=2", "service:jmx:a", "sally", "seashore"),
                ("a:x=1", "service:jmx:b", "jack", "benimble"),
                ("b:y=2", "service:jmx:b", "jack", "benimble"),
                ("a:x=1", "service:jmx:c", "jill", "seashore"),
                ("b:y=2", "service:jmx:c", "jill", "seashore"),
            ]
        );
    }

    #[test]
    fn test_proxy_without_targets_plans_nothing() {
        let planner = RequestPlanner::new(
            vec![metric("one", "a:x=1", &[])],
            Some(&ProxyConfig::default()),
        );
        assert!(planner.plan().is_empty());
    }

    #[test]
    fn test_resolved_targets_keep_explicit_credentials() {
        let proxy = ProxyConfig {
            default_target_username: "sally".to_string(),
            default_target_password: "seashore".to_string(),
            targets: vec![target("service:jmx:b", "jack", "benimble")],
        };
        assert_eq!(
            proxy.resolved_targets(),
            vec![target("service:jmx:b", "jack", "benimble")]
        );
    }
}
