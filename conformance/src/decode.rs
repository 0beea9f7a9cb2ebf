//! Response body decoding.

use serde_json::Value;
use thiserror::Error;

/// The response text was not valid JSON.
///
/// The message is stable; the parser's own diagnostic (line, column, what it
/// expected) is kept as the error's `source()`.
#[derive(Debug, Error)]
#[error("Could not parse response as JSON")]
pub struct DecodeError {
    #[source]
    source: serde_json::Error,
}

impl DecodeError {
    pub fn parse_error(&self) -> &serde_json::Error {
        &self.source
    }
}

/// Parses a raw response body as a JSON value.
pub fn decode(raw: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(raw).map_err(|source| DecodeError { source })
}
