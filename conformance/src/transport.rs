//! Transport adapter: performs one HTTP round trip per request.
//!
//! # Design
//! `Transport::execute` only fails when no response came back at all. Status
//! interpretation is layered on top in `Transport::send`, so every
//! implementation classifies failures the same way.

use std::time::Duration;

use tracing::debug;

use crate::error::ConformanceError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Upper bound on a single request, generous enough for a backend that has
/// to cold-start before answering.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub trait Transport {
    /// Executes `request`, returning whatever response the server sent,
    /// whatever its status. Errors only when no response was received.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ConformanceError>;

    /// Executes `request` and rejects any non-2xx answer as `HttpFailure`.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ConformanceError> {
        let response = self.execute(request)?;
        check_status(request, response)
    }
}

fn check_status(
    request: &HttpRequest,
    response: HttpResponse,
) -> Result<HttpResponse, ConformanceError> {
    if response.is_success() {
        return Ok(response);
    }
    Err(ConformanceError::http_failure(
        request.method,
        request.url.clone(),
        response.status,
        response.status_text,
        &response.body,
    ))
}

/// Blocking transport backed by a ureq agent.
///
/// The agent returns 4xx/5xx responses as data, so status handling stays
/// with [`Transport::send`].
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    /// Upper bound on one request, from connect to the end of the body.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn unreachable(request: &HttpRequest, source: ureq::Error) -> ConformanceError {
        ConformanceError::Unreachable {
            method: request.method,
            url: request.url.clone(),
            source,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Response text as a browser would decode it, with U+FFFD for invalid bytes.
fn body_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ConformanceError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), headers).call(),
            HttpMethod::Options => with_headers(self.agent.options(url), headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(url), headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Patch => {
                let builder = with_headers(self.agent.patch(url), headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| Self::unreachable(request, e))?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // Whatever body arrived is kept: no size cap, invalid UTF-8 replaced.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| Self::unreachable(request, e))?;
        let body = body_text(bytes);

        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
