//! FreeNAS client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for FreeNAS API calls.
#[derive(Debug, Error)]
pub enum FreenasError {
    /// The server answered with a status other than the one the operation
    /// defines as success.
    #[error("unexpected status code: {status}, body: {body}")]
    UnexpectedStatus {
        /// Status returned by the server.
        status: StatusCode,
        /// Raw response body, kept for diagnosis.
        body: String,
    },

    /// The request never produced a response (connect, TLS, timeout...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request record could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body was not the expected record.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl FreenasError {
    /// Create a [`FreenasError::UnexpectedStatus`].
    pub fn unexpected_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_display() {
        let err = FreenasError::unexpected_status(StatusCode::CONFLICT, "{\"error\":\"exists\"}");
        assert_eq!(
            err.to_string(),
            "unexpected status code: 409 Conflict, body: {\"error\":\"exists\"}"
        );
    }

    #[test]
    fn decode_error_keeps_source() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = FreenasError::Decode(source);
        assert!(err.to_string().starts_with("failed to decode response: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}
