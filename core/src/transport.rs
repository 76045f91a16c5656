//! Transport client: base-URL joining, default headers, timeouts and
//! status-code-to-error translation.
//!
//! # Design
//! `ApiClient` owns everything that is shared across calls (base URL, session
//! headers, default timeout) and is never mutated by a request. The actual
//! round-trip is delegated to a [`Transport`], so tests can swap the network
//! for an in-memory double. [`UreqTransport`] is the blocking implementation
//! used in production.

use std::{sync::Arc, time::Duration};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP round-trip.
///
/// Implementations must return 4xx/5xx responses as data; turning them into
/// errors is [`ApiClient`]'s job.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a pooled `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
    max_response_size: u64,
}

impl UreqTransport {
    /// A transport with no cap on response body size.
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: build_agent(timeout),
            timeout,
            max_response_size: u64::MAX,
        }
    }

    /// Reject response bodies larger than `limit` bytes.
    pub fn with_max_response_size(mut self, limit: u64) -> Self {
        self.max_response_size = limit;
        self
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    // Allows error responses to be read as data.
    let cfg = ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout));
    ureq::Agent::new_with_config(cfg.build())
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let timeout = request.timeout.unwrap_or(self.timeout);

        // Overrides get a one-off agent so the shared one keeps its settings.
        let one_off;
        let agent = if timeout == self.timeout {
            &self.agent
        } else {
            one_off = build_agent(timeout);
            &one_off
        };

        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let req = builder
            .body(request.body.unwrap_or_default())
            .map_err(ApiError::InvalidRequest)?;

        let resp = agent.run(req).map_err(|e| map_ureq_error(e, timeout))?;
        let (parts, mut body) = resp.into_parts();
        let body = body
            .with_config()
            .limit(self.max_response_size)
            .read_to_string()
            .map_err(|e| map_ureq_error(e, timeout))?;

        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Ok(HttpResponse {
            status: parts.status.as_u16(),
            headers,
            body,
        })
    }
}

fn map_ureq_error(err: ureq::Error, timeout: Duration) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::Timeout(timeout),
        other => ApiError::Transport(other),
    }
}

/// Per-call overrides. Neither field outlives the call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Session-style HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    base_url: String,
    timeout: Duration,
    headers: Vec<(String, String)>,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Validate `config` and build a client over a fresh `ureq` agent.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        config.validate()?;
        let transport = UreqTransport::new(config.timeout)
            .with_max_response_size(config.max_response_size);
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: &Config, transport: T) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            headers: config.default_headers(),
            transport,
        }
    }

    /// Merge `headers` into the session headers, replacing same-named ones.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            set_header(&mut self.headers, name.into(), value.into());
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Join `endpoint` onto the base URL. Every trailing `/` of the base and
    /// every leading `/` of the endpoint is dropped, then one `/` is inserted.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Send one request. Statuses of 400 and above become
    /// [`ApiError::HttpStatus`]; anything else is returned as-is.
    pub fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(ApiError::Serialization)?;

        let mut headers = self.headers.clone();
        for (name, value) in options.headers {
            set_header(&mut headers, name, value);
        }

        let request = HttpRequest {
            method,
            url: self.url_for(endpoint),
            headers,
            body,
            timeout: Some(options.timeout.unwrap_or(self.timeout)),
        };

        debug!(%method, url = %request.url, "sending request");
        let response = self.transport.send(request)?;
        debug!(%method, endpoint, status = response.status, "received response");

        if response.status >= 400 {
            warn!(%method, endpoint, status = response.status, "request failed");
            return Err(ApiError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response)
    }

    pub fn get(&self, endpoint: &str) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Get, endpoint, None, RequestOptions::default())
    }

    pub fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Post, endpoint, body, RequestOptions::default())
    }

    pub fn put(&self, endpoint: &str, body: Option<&Value>) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Put, endpoint, body, RequestOptions::default())
    }

    pub fn patch(&self, endpoint: &str, body: Option<&Value>) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Patch, endpoint, body, RequestOptions::default())
    }

    pub fn delete(&self, endpoint: &str) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Delete, endpoint, None, RequestOptions::default())
    }

    pub fn options(&self, endpoint: &str) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Options, endpoint, None, RequestOptions::default())
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
        Some(slot) => *slot = (name, value),
        None => headers.push((name, value)),
    }
}
