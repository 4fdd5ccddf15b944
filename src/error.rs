//! Error types for jolokia-exec
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Error class of a failed gather cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad URL or TLS material; fixing it needs a config change
    Configuration,
    /// Network failure, timeout or non-200 reply
    Transport,
    /// Reply body or embedded payload is not the expected JSON
    Decode,
}

/// Gather 사이클 에러 타입
#[derive(Error, Debug)]
pub enum GatherError {
    /// 잘못된 엔드포인트 URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// TLS 설정 실패 (인증서/키/CA)
    #[error("TLS configuration error for '{path}': {reason}")]
    Tls { path: String, reason: String },

    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// 요청 직렬화 실패
    #[error("Failed to encode request batch: {0}")]
    Encode(#[source] serde_json::Error),

    /// HTTP 요청 실패
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[source] reqwest::Error),

    /// HTTP 응답 읽기 실패
    #[error("Failed to read HTTP response: {0}")]
    HttpResponse(#[source] reqwest::Error),

    /// HTTP 상태 코드 에러
    #[error("Response from '{url}' has status code {status} ({reason}), expected 200 (OK)")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    /// 타임아웃
    /// The value is the configured timeout in milliseconds, if known.
    #[error("Request timed out{}", .0.map(|ms| format!(" after {}ms", ms)).unwrap_or_default())]
    Timeout(Option<u64>),

    /// 연결 실패
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// 응답 배열 디코딩 실패
    #[error("Error decoding JSON response: {message}: {body}")]
    ResponseDecode { message: String, body: String },

    /// 개별 응답의 value 페이로드 디코딩 실패
    #[error("Error decoding payload of response {index} (mbean '{mbean}', status {status}): {message}")]
    PayloadDecode {
        index: usize,
        mbean: String,
        status: i32,
        message: String,
    },
}

impl GatherError {
    /// Error class for reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatherError::InvalidUrl { .. }
            | GatherError::Tls { .. }
            | GatherError::HttpClientInit(_) => ErrorKind::Configuration,
            GatherError::Encode(_)
            | GatherError::HttpRequest(_)
            | GatherError::HttpResponse(_)
            | GatherError::HttpStatus { .. }
            | GatherError::Timeout(_)
            | GatherError::ConnectionFailed(_) => ErrorKind::Transport,
            GatherError::ResponseDecode { .. } | GatherError::PayloadDecode { .. } => {
                ErrorKind::Decode
            }
        }
    }

    /// HTTP 상태 코드 추출
    pub fn http_status(&self) -> Option<u16> {
        match self {
            GatherError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create a Timeout error with known duration
    pub fn timeout_with_duration(ms: u64) -> Self {
        GatherError::Timeout(Some(ms))
    }
}

impl From<reqwest::Error> for GatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatherError::Timeout(None)
        } else if err.is_connect() {
            GatherError::ConnectionFailed(err.to_string())
        } else if err.is_request() {
            GatherError::HttpRequest(err)
        } else {
            GatherError::HttpResponse(err)
        }
    }
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Gather error
    #[error("Gather error: {0}")]
    Gather(#[from] GatherError),

    /// One or more agent URLs failed during a cycle
    #[error("{failed} of {total} sources failed to gather")]
    PartialFailure { failed: usize, total: usize },
}

/// Result type for gather operations
pub type GatherResult<T> = Result<T, GatherError>;

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
