use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

/// Relay failures that end in a client-visible error response
#[derive(Debug, Error)]
pub enum RelayError {
    /// Inbound body exceeded the configured limit
    #[error("Request body is too large")]
    PayloadTooLarge,

    /// Upstream could not be reached or the exchange broke off
    #[error("Transcription service unreachable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream did not answer within the configured timeout
    #[error("Transcription service timed out")]
    UpstreamTimeout,

    /// Upstream answered with a body that is not JSON
    #[error("Transcription service returned an invalid response ({status}): {detail}")]
    MalformedUpstreamResponse { status: u16, detail: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal server error; details stay in the logs
    #[error("Internal server error")]
    InternalError,
}

impl RelayError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamUnavailable(_) | Self::MalformedUpstreamResponse { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::ConfigError(_) | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string for the response
    pub fn error_type(&self) -> &str {
        match self {
            Self::PayloadTooLarge => "payload_too_large",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::UpstreamTimeout => "upstream_timeout",
            Self::MalformedUpstreamResponse { .. } => "upstream_invalid_response",
            Self::ConfigError(_) | Self::InternalError => "internal_error",
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::InternalError | Self::ConfigError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Status the upstream answered with, when it answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::MalformedUpstreamResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error envelope returned to callers
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    r#type: String,
    message: String,
    #[serde(rename = "upstreamStatus", skip_serializing_if = "Option::is_none")]
    upstream_status: Option<u16>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = ErrorResponse {
            status: status.as_u16(),
            r#type: self.error_type().to_string(),
            message: self.client_message(),
            upstream_status: self.upstream_status(),
        };

        (status, Json(error_response)).into_response()
    }
}
