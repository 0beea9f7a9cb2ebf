//! Error types for the conformance client and suite.
//!
//! # Design
//! Every failure a scenario can hit is one `ConformanceError`. Transport and
//! HTTP failures render a banner naming the method and url so a failed
//! scenario points straight at the offending request. Underlying causes stay
//! reachable through `source()`.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::http::HttpMethod;

#[derive(Debug, Error)]
pub enum ConformanceError {
    /// No response at all: connection refused, DNS failure or timeout.
    #[error(
        "\n\n{method} {url}\nFAILED\n\n\
         The request never produced a response.\n\
         Either the url cannot be reached over the network, or the server is\n\
         not answering cross-origin requests properly. Make sure it sends:\n  \
         - an `access-control-allow-origin: *` header on every response\n  \
         - an `access-control-allow-headers` header listing headers such as \"Content-Type\"\n\
         \n\
         It must also answer OPTIONS preflight requests.\n"
    )]
    Unreachable {
        method: HttpMethod,
        url: String,
        #[source]
        source: ureq::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("\n\n{method} {url}\nFAILED\n\n{status}: {status_text} ({body})\n\n")]
    HttpFailure {
        method: HttpMethod,
        url: String,
        status: u16,
        status_text: String,
        body: String,
    },

    /// The response body is not JSON.
    #[error("{method} {url} answered with a body that is not JSON")]
    Decode {
        method: HttpMethod,
        url: String,
        #[source]
        source: DecodeError,
    },

    /// The body is JSON but not the expected representation.
    #[error("{method} {url} did not answer with a valid {expected}")]
    Shape {
        method: HttpMethod,
        url: String,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A url handed out by the server cannot be resolved against the API root.
    #[error("cannot resolve url `{url}` against the API root")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not serialize request body")]
    Encode(#[source] serde_json::Error),

    /// An expectation of a scenario did not hold.
    #[error("{0}")]
    Assertion(String),
}

impl ConformanceError {
    /// Builds the `HttpFailure` variant, trimming trailing newlines off the body.
    pub fn http_failure(
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        body: &str,
    ) -> Self {
        ConformanceError::HttpFailure {
            method,
            url: url.into(),
            status,
            status_text: status_text.into(),
            body: body.trim_end_matches(['\n', '\r']).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_failure_message_names_request_status_and_body() {
        let err = ConformanceError::http_failure(
            HttpMethod::Patch,
            "http://localhost:3000/todos/1",
            500,
            "Internal Server Error",
            "boom\n\n",
        );
        let message = err.to_string();
        assert!(message.contains("PATCH http://localhost:3000/todos/1\nFAILED"));
        assert!(message.contains("500: Internal Server Error (boom)"));
    }

    #[test]
    fn http_failure_keeps_inner_newlines() {
        let err = ConformanceError::http_failure(
            HttpMethod::Get,
            "http://localhost:3000/todos/",
            404,
            "Not Found",
            "line one\nline two\n",
        );
        assert!(matches!(
            err,
            ConformanceError::HttpFailure { ref body, .. } if body == "line one\nline two"
        ));
    }

    #[test]
    fn assertion_message_is_verbatim() {
        let err = ConformanceError::Assertion("expected 1 todo, got 0".to_string());
        assert_eq!(err.to_string(), "expected 1 todo, got 0");
    }
}
