//! Exec 응답 처리
//!
//! Runs one gather cycle: plan the batch, execute it, then turn every response
//! into an [`OutputRecord`] whose fields are the decoded `value` payload.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::client::JolokiaClient;
use super::metric::Metric;
use super::object_name::MbeanObjectName;
use super::planner::{ProxyConfig, RequestPlanner};
use super::protocol::{ResolvedResponse, WireRequest, WireResponse};
use crate::error::{GatherError, GatherResult};

/// Measurement name of every emitted record
pub const RESPONSE_MEASUREMENT: &str = "response";

/// Source tag used when talking to an agent directly
pub const AGENT_URL_TAG: &str = "jolokia_agent_url";

/// Source tag used when requests are relayed through a proxy
pub const PROXY_URL_TAG: &str = "jolokia_proxy_url";

/// 디코딩된 필드 값
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 정수
    Integer(i64),
    /// 실수
    Float(f64),
    /// 문자열
    String(String),
    /// 불리언
    Boolean(bool),
    /// Null
    Null,
    /// 중첩 객체
    Object(BTreeMap<String, FieldValue>),
    /// 배열
    Array(Vec<FieldValue>),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::String(n.to_string())
                }
            }
            Value::String(s) => FieldValue::String(s),
            Value::Array(arr) => FieldValue::Array(arr.into_iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl FieldValue {
    /// Tag form of the value. Strings are used as-is, `null` becomes `"null"`,
    /// everything else is rendered as compact JSON.
    pub fn to_tag_value(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Null => "null".to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Object(_) | FieldValue::Array(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }
}

/// A tagged fact handed to the sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub measurement: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub tags: BTreeMap<String, String>,
    /// Agent-side timestamp of the response (Unix seconds)
    pub timestamp: u32,
}

/// Destination for records produced by a gather cycle
pub trait Sink {
    fn add_record(&mut self, record: OutputRecord);
}

impl Sink for Vec<OutputRecord> {
    fn add_record(&mut self, record: OutputRecord) {
        self.push(record);
    }
}

/// Gather 실행기
#[derive(Debug, Clone)]
pub struct Gatherer {
    planner: RequestPlanner,
}

impl Gatherer {
    pub fn new(metrics: Vec<Metric>, proxy: Option<&ProxyConfig>) -> Self {
        Self {
            planner: RequestPlanner::new(metrics, proxy),
        }
    }

    pub fn planner(&self) -> &RequestPlanner {
        &self.planner
    }

    /// Identity tags for records coming through `base_url`
    pub fn source_tags(&self, base_url: &str) -> BTreeMap<String, String> {
        let key = if self.planner.is_proxied() {
            PROXY_URL_TAG
        } else {
            AGENT_URL_TAG
        };
        BTreeMap::from([(key.to_string(), base_url.to_string())])
    }

    /// Run one gather cycle against `client`.
    ///
    /// Records reach the sink only after every response decoded; any failure
    /// leaves the sink untouched. Returns the number of records added.
    #[instrument(skip_all, fields(url = %client.base_url()))]
    pub async fn gather<S>(&self, client: &JolokiaClient, sink: &mut S) -> GatherResult<usize>
    where
        S: Sink + ?Sized,
    {
        let tags = self.source_tags(client.base_url());
        let requests = self.planner.plan();
        let responses = client.execute(&requests).await?;
        let records = process_responses(&requests, responses, &tags)?;

        let count = records.len();
        for record in records {
            sink.add_record(record);
        }

        debug!(records = count, "Gather cycle complete");
        Ok(count)
    }
}

/// Turn a response batch into records, all or nothing.
///
/// Responses are matched to `requests` by position. A mismatch in count or
/// mbean is logged but does not stop processing; the echoed request is the
/// source of truth for each record.
pub fn process_responses(
    requests: &[WireRequest],
    responses: Vec<WireResponse>,
    source_tags: &BTreeMap<String, String>,
) -> GatherResult<Vec<OutputRecord>> {
    if responses.len() != requests.len() {
        warn!(
            requests = requests.len(),
            responses = responses.len(),
            "Response count does not match request count"
        );
    }

    responses
        .into_iter()
        .enumerate()
        .map(|(index, response)| -> GatherResult<OutputRecord> {
            if let Some(planned) = requests.get(index) {
                check_order(index, planned, &response);
            }

            let agent_error = response.error.clone();
            let resolved = ResolvedResponse::from(response);
            let fields = decode_payload(&resolved.value).map_err(|e| GatherError::PayloadDecode {
                index,
                mbean: resolved.mbean.clone(),
                status: resolved.status,
                message: match &agent_error {
                    Some(agent_error) => format!("{} (agent error: {})", e, agent_error),
                    None => e.to_string(),
                },
            })?;

            Ok(OutputRecord {
                measurement: RESPONSE_MEASUREMENT.to_string(),
                tags: merge_tags(source_tags, &fields),
                fields,
                timestamp: resolved.timestamp,
            })
        })
        .collect()
}

fn check_order(index: usize, planned: &WireRequest, response: &WireResponse) {
    let echoed = &response.request;
    if planned.mbean == echoed.mbean {
        return;
    }

    if !MbeanObjectName::parse(&planned.mbean).matches(&MbeanObjectName::parse(&echoed.mbean)) {
        warn!(
            index,
            expected = %planned.mbean,
            actual = %echoed.mbean,
            "Response order does not match request order"
        );
    }
}

/// Decode the string-encoded JSON object carried in a response `value`.
///
/// Backslashes are stripped before parsing.
pub fn decode_payload(raw: &str) -> Result<BTreeMap<String, FieldValue>, serde_json::Error> {
    let unescaped = raw.replace('\\', "");
    let object: serde_json::Map<String, Value> = serde_json::from_str(&unescaped)?;

    Ok(object
        .into_iter()
        .map(|(k, v)| (k, FieldValue::from(v)))
        .collect())
}

/// Payload entries as tags, overlaid by the source tags.
pub fn merge_tags(
    source_tags: &BTreeMap<String, String>,
    payload: &BTreeMap<String, FieldValue>,
) -> BTreeMap<String, String> {
    let mut tags: BTreeMap<String, String> = payload
        .iter()
        .map(|(k, v)| (k.clone(), v.to_tag_value()))
        .collect();

    for (k, v) in source_tags {
        tags.insert(k.clone(), v.clone());
    }

    tags
}
