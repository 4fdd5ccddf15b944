//! Exec 메트릭 정의
//!
//! `MetricConfig` is the on-disk form with optional naming overrides.
//! `Metric` is the resolved, read-only definition the collector works from.

use serde::{Deserialize, Serialize};

use super::object_name::MbeanObjectName;

/// 설정 파일 형태의 메트릭 정의
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricConfig {
    /// Logical metric name
    pub name: String,

    /// MBean ObjectName to invoke the operation on
    pub mbean: String,

    /// Operation name (e.g. "dumpAllThreads")
    #[serde(default)]
    pub operation: String,

    /// Ordered operation arguments
    #[serde(default)]
    pub arguments: Vec<String>,

    #[serde(default)]
    pub field_name: Option<String>,

    #[serde(default)]
    pub field_prefix: Option<String>,

    #[serde(default)]
    pub field_separator: Option<String>,

    #[serde(default)]
    pub tag_prefix: Option<String>,

    #[serde(default)]
    pub tag_keys: Vec<String>,
}

/// Fallback naming options applied when a metric leaves them unset
#[derive(Debug, Clone, PartialEq)]
pub struct NamingDefaults {
    pub field_prefix: String,
    pub field_separator: String,
    pub tag_prefix: String,
}

impl Default for NamingDefaults {
    fn default() -> Self {
        Self {
            field_prefix: String::new(),
            field_separator: ".".to_string(),
            tag_prefix: String::new(),
        }
    }
}

/// 해석된 메트릭 정의
#[derive(Debug, Clone)]
pub struct Metric {
    pub name: String,
    pub mbean: String,
    pub operation: String,
    pub arguments: Vec<String>,
    pub field_name: String,
    pub field_prefix: String,
    pub field_separator: String,
    pub tag_prefix: String,
    pub tag_keys: Vec<String>,
    object_name: MbeanObjectName,
}

impl Metric {
    /// Resolve a config entry against the naming defaults.
    pub fn new(config: MetricConfig, defaults: &NamingDefaults) -> Self {
        let object_name = MbeanObjectName::parse(&config.mbean);

        Self {
            name: config.name,
            mbean: config.mbean,
            operation: config.operation,
            arguments: config.arguments,
            field_name: config.field_name.unwrap_or_default(),
            field_prefix: config
                .field_prefix
                .unwrap_or_else(|| defaults.field_prefix.clone()),
            field_separator: config
                .field_separator
                .unwrap_or_else(|| defaults.field_separator.clone()),
            tag_prefix: config
                .tag_prefix
                .unwrap_or_else(|| defaults.tag_prefix.clone()),
            tag_keys: config.tag_keys,
            object_name,
        }
    }

    /// MBean 도메인
    pub fn domain(&self) -> &str {
        &self.object_name.domain
    }

    /// Parsed form of `mbean`
    pub fn object_name(&self) -> &MbeanObjectName {
        &self.object_name
    }

    /// Whether a concrete ObjectName refers to this metric's MBean.
    pub fn match_object_name(&self, name: &str) -> bool {
        if name == self.mbean {
            return true;
        }

        self.object_name.matches(&MbeanObjectName::parse(name))
    }
}
