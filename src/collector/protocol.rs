//! Jolokia exec 와이어 포맷
//!
//! Request and response shapes exchanged with the `/exec` endpoint.
//!
//! ```text
//! -> [{"type":"exec","mbean":"java.lang:type=Threading","operation":"dumpAllThreads",
//!      "argument":["true","true"],"target":{"url":"service:jmx:...","user":"jack"}}]
//! <- [{"request":{...echo...},"value":"{\"threads\":12}","status":200,"timestamp":1561057459}]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GatherError, GatherResult};

/// Request type sent for every planned operation
pub const EXEC_REQUEST_TYPE: &str = "exec";

/// Operation argument encoding.
///
/// The remote side interprets arity from the JSON shape, so a single argument
/// must travel as a bare string and two or more as an array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    /// 단일 인자
    Scalar(String),
    /// 복수 인자 (순서 유지)
    List(Vec<String>),
    /// 인자 없음
    #[default]
    Absent,
}

impl Argument {
    /// Encode an ordered argument list by arity.
    pub fn from_arguments(args: &[String]) -> Self {
        match args {
            [] => Argument::Absent,
            [single] => Argument::Scalar(single.clone()),
            many => Argument::List(many.to_vec()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Argument::Absent)
    }

    /// Flatten back to an ordered list.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Argument::Absent => Vec::new(),
            Argument::Scalar(s) => vec![s.clone()],
            Argument::List(list) => list.clone(),
        }
    }
}

/// Proxy target carried in the request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTarget {
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

/// Jolokia exec 요청 구조체
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    pub mbean: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, alias = "arguments", skip_serializing_if = "Argument::is_absent")]
    pub argument: Argument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<WireTarget>,
}

impl WireRequest {
    /// Build an exec request; an empty operation name is omitted from the body.
    pub fn exec(mbean: &str, operation: &str, arguments: &[String]) -> Self {
        Self {
            request_type: EXEC_REQUEST_TYPE.to_string(),
            mbean: mbean.to_string(),
            operation: (!operation.is_empty()).then(|| operation.to_string()),
            argument: Argument::from_arguments(arguments),
            target: None,
        }
    }

    pub fn with_target(mut self, target: WireTarget) -> Self {
        self.target = Some(target);
        self
    }
}

/// Jolokia exec 응답 구조체
///
/// `value` holds a JSON document serialized as a string, not a structured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireResponse {
    /// 요청 에코
    pub request: WireRequest,
    #[serde(default)]
    pub value: String,
    pub status: i32,
    #[serde(default)]
    pub timestamp: u32,
    /// Error text reported by the agent for failed entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A response paired with the request context it echoes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResponse {
    pub status: i32,
    pub value: String,
    pub timestamp: u32,
    pub mbean: String,
    pub operation: String,
    pub arguments: Vec<String>,
    pub target_url: Option<String>,
}

impl From<WireResponse> for ResolvedResponse {
    fn from(response: WireResponse) -> Self {
        let request = response.request;
        Self {
            status: response.status,
            value: response.value,
            timestamp: response.timestamp,
            arguments: request.argument.to_vec(),
            operation: request.operation.unwrap_or_default(),
            target_url: request.target.map(|t| t.url),
            mbean: request.mbean,
        }
    }
}

/// Decode a batch response body.
///
/// The raw body is kept in the error so a malformed reply can be inspected.
pub fn parse_exec_response(body: &str) -> GatherResult<Vec<WireResponse>> {
    serde_json::from_str(body).map_err(|e| GatherError::ResponseDecode {
        message: e.to_string(),
        body: body.to_string(),
    })
}
