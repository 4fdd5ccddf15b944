//! Jolokia HTTP 클라이언트
//!
//! Sends one batched exec request per call with a single end-to-end timeout.
//! No retries: a failed call is reported and the next gather cycle tries again.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client, ClientBuilder, Identity, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::protocol::{parse_exec_response, WireRequest, WireResponse};
use crate::error::{GatherError, GatherResult};

/// Query flag asking the agent to report per-request failures inline
const IGNORE_ERRORS_PARAM: (&str, &str) = ("ignoreErrors", "true");

/// TLS 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// PEM CA bundle used to verify the server
    #[serde(default)]
    pub ca_file: Option<PathBuf>,

    /// PEM client certificate
    #[serde(default)]
    pub cert_file: Option<PathBuf>,

    /// PEM private key for `cert_file`
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Skip server certificate and hostname verification
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

/// 클라이언트 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Covers connect, response headers and body
    pub response_timeout: Duration,
    /// Basic auth username (may be empty)
    pub username: String,
    /// Basic auth password (may be empty)
    pub password: String,
    pub tls: TlsConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_millis(5000),
            username: String::new(),
            password: String::new(),
            tls: TlsConfig::default(),
        }
    }
}

/// Jolokia HTTP 클라이언트
#[derive(Clone)]
pub struct JolokiaClient {
    client: Client,
    base_url: String,
    exec_url: Url,
    timeout: Duration,
    auth: Option<(String, String)>,
}

impl JolokiaClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `base_url` - Jolokia 엔드포인트 URL (예: "http://localhost:8778/jolokia")
    /// * `config` - timeout, basic auth and TLS settings
    ///
    /// # Errors
    /// Fails on a malformed URL or unreadable TLS material.
    pub fn new(base_url: &str, config: &ClientConfig) -> GatherResult<Self> {
        let exec_url = format_exec_url(base_url, &config.username, &config.password)?;

        let builder = ClientBuilder::new()
            .timeout(config.response_timeout)
            .connect_timeout(config.response_timeout);
        let client = apply_tls(builder, &config.tls)?
            .build()
            .map_err(GatherError::HttpClientInit)?;

        let auth = (!config.username.is_empty() || !config.password.is_empty())
            .then(|| (config.username.clone(), config.password.clone()));

        Ok(Self {
            client,
            base_url: strip_user_info(base_url),
            exec_url,
            timeout: config.response_timeout,
            auth,
        })
    }

    /// URL as configured minus any user-info, used for source tags, logs and errors
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exec endpoint, including any basic auth user-info
    pub fn exec_url(&self) -> &Url {
        &self.exec_url
    }

    /// Batch exec 요청
    ///
    /// Responses come back in request order; nothing in the format ties an entry
    /// to its request other than its position.
    #[instrument(skip(self, requests), fields(url = %redact(&self.exec_url), count = requests.len()))]
    pub async fn execute(&self, requests: &[WireRequest]) -> GatherResult<Vec<WireResponse>> {
        let body = serde_json::to_vec(requests).map_err(GatherError::Encode)?;

        debug!(bytes = body.len(), "Sending Jolokia exec batch");

        let mut req = self
            .client
            .post(self.request_url())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some((username, password)) = &self.auth {
            req = req.basic_auth(username, Some(password));
        }

        let response = req.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GatherError::HttpStatus {
                url: self.base_url.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        let responses = parse_exec_response(&body)?;
        debug!(responses = responses.len(), "Received Jolokia exec batch");
        Ok(responses)
    }

    /// Exec URL with the user-info moved out; credentials travel in the header.
    fn request_url(&self) -> Url {
        let mut url = self.exec_url.clone();
        let _ = url.set_username("");
        let _ = url.set_password(None);
        url
    }

    fn transport_error(&self, err: reqwest::Error) -> GatherError {
        if err.is_timeout() {
            GatherError::timeout_with_duration(self.timeout.as_millis() as u64)
        } else {
            GatherError::from(err)
        }
    }
}

/// Build the exec endpoint from a configured base URL.
///
/// Keeps scheme, host, port and path, drops query, fragment and any user-info of
/// the base URL, embeds `username`/`password` when either is set, appends the
/// `exec` path segment and the `ignoreErrors=true` flag.
pub fn format_exec_url(base_url: &str, username: &str, password: &str) -> GatherResult<Url> {
    let invalid = |reason: String| GatherError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || !url.has_host() {
        return Err(invalid("URL has no host".to_string()));
    }

    url.set_query(None);
    url.set_fragment(None);
    url.set_username("")
        .map_err(|_| invalid("URL cannot carry credentials".to_string()))?;
    url.set_password(None)
        .map_err(|_| invalid("URL cannot carry credentials".to_string()))?;

    let path = format!("{}/exec", url.path().trim_end_matches('/'));
    url.set_path(&path);

    if !username.is_empty() || !password.is_empty() {
        url.set_username(username)
            .map_err(|_| invalid("URL cannot carry credentials".to_string()))?;
        url.set_password(Some(password))
            .map_err(|_| invalid("URL cannot carry credentials".to_string()))?;
    }

    url.query_pairs_mut()
        .append_pair(IGNORE_ERRORS_PARAM.0, IGNORE_ERRORS_PARAM.1);

    Ok(url)
}

fn strip_user_info(base_url: &str) -> String {
    match Url::parse(base_url) {
        Ok(mut url) if !url.username().is_empty() || url.password().is_some() => {
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        _ => base_url.to_string(),
    }
}

/// URL with the password masked, for logs
pub fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    if shown.password().is_some() {
        let _ = shown.set_password(Some("xxxxx"));
    }
    shown.to_string()
}

fn apply_tls(mut builder: ClientBuilder, tls: &TlsConfig) -> GatherResult<ClientBuilder> {
    if let Some(ca_file) = &tls.ca_file {
        let pem = read_pem(ca_file)?;
        let cert = Certificate::from_pem(&pem).map_err(|e| tls_error(ca_file, e))?;
        builder = builder.add_root_certificate(cert);
    }

    match (&tls.cert_file, &tls.key_file) {
        (Some(cert_file), Some(key_file)) => {
            let mut pem = read_pem(cert_file)?;
            pem.push(b'\n');
            pem.extend(read_pem(key_file)?);
            let identity = Identity::from_pem(&pem).map_err(|e| tls_error(cert_file, e))?;
            builder = builder.identity(identity);
        }
        (Some(path), None) | (None, Some(path)) => {
            return Err(GatherError::Tls {
                path: path.display().to_string(),
                reason: "client certificate and key must be configured together".to_string(),
            });
        }
        (None, None) => {}
    }

    if tls.insecure_skip_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder)
}

fn read_pem(path: &Path) -> GatherResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| tls_error(path, e))
}

fn tls_error(path: &Path, err: impl std::fmt::Display) -> GatherError {
    GatherError::Tls {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
