//! Jolokia exec 수집 모듈
//!
//! Plans a batch of exec requests from metric definitions, sends it to a
//! Jolokia agent or proxy in one HTTP round trip, and flattens each response
//! payload into a tagged [`OutputRecord`].
//!
//! # Example
//!
//! ```ignore
//! use jolokia_exec::collector::{ClientConfig, Gatherer, JolokiaClient, OutputRecord};
//!
//! let client = JolokiaClient::new("http://localhost:8778/jolokia", &ClientConfig::default())?;
//! let gatherer = Gatherer::new(metrics, None);
//! let mut records: Vec<OutputRecord> = Vec::new();
//! gatherer.gather(&client, &mut records).await?;
//! ```

mod client;
mod gatherer;
mod metric;
mod object_name;
mod planner;
mod protocol;
mod source;

pub use client::{format_exec_url, redact, ClientConfig, JolokiaClient, TlsConfig};
pub use gatherer::{
    decode_payload, merge_tags, process_responses, FieldValue, Gatherer, OutputRecord, Sink,
    AGENT_URL_TAG, PROXY_URL_TAG, RESPONSE_MEASUREMENT,
};
pub use metric::{Metric, MetricConfig, NamingDefaults};
pub use object_name::MbeanObjectName;
pub use planner::{ProxyConfig, ProxyTarget, RequestPlanner};
pub use protocol::{
    parse_exec_response, Argument, ResolvedResponse, WireRequest, WireResponse, WireTarget,
    EXEC_REQUEST_TYPE,
};
pub use source::Source;
