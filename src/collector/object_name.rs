//! MBean ObjectName 파싱 및 매칭
//!
//! An ObjectName is a domain plus an unordered set of `key=value` properties.
//! Two names are considered equal when the domains match and the property sets
//! are identical, regardless of the order the properties were written in.

use std::collections::HashSet;
use std::fmt;

/// MBean ObjectName 구조
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbeanObjectName {
    /// 도메인 (예: "java.lang")
    pub domain: String,
    /// `key=value` 속성 문자열 집합
    pub properties: HashSet<String>,
}

impl MbeanObjectName {
    /// ObjectName 문자열 파싱
    ///
    /// Splits on the first `:`. Input without a `:` is treated as a bare domain
    /// with no properties; parsing never fails.
    pub fn parse(name: &str) -> Self {
        match name.split_once(':') {
            Some((domain, props)) => Self {
                domain: domain.to_string(),
                properties: props.split(',').map(str::to_string).collect(),
            },
            None => Self {
                domain: name.to_string(),
                properties: HashSet::new(),
            },
        }
    }

    /// Order-independent exact match against another name.
    ///
    /// No wildcard support: `java.lang:type=*` only matches itself.
    pub fn matches(&self, candidate: &MbeanObjectName) -> bool {
        if self.domain != candidate.domain {
            return false;
        }

        if self.properties.len() != candidate.properties.len() {
            return false;
        }

        self.properties
            .iter()
            .all(|prop| candidate.properties.contains(prop))
    }
}

impl fmt::Display for MbeanObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.is_empty() {
            return write!(f, "{}", self.domain);
        }

        // Sorted so that logs are stable across runs.
        let mut props: Vec<&String> = self.properties.iter().collect();
        props.sort();
        let joined: Vec<&str> = props.iter().map(|s| s.as_str()).collect();
        write!(f, "{}:{}", self.domain, joined.join(","))
    }
}
