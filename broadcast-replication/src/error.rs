//! Error types shared by the propagator and the HTTP coordinator.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Why a single replication attempt to a peer failed.
///
/// Transport failures and non-OK answers are kept apart: the first points at
/// the network or a dead process, the second at a live peer rejecting writes.
#[derive(Error, Debug)]
pub enum PropagateError {
    #[error("could not reach peer: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("peer did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("peer answered with non-OK status: {0}")]
    Status(reqwest::StatusCode),
}

impl PropagateError {
    /// Short label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            PropagateError::Transport(_) => "transport",
            PropagateError::Timeout(_) => "timeout",
            PropagateError::Status(_) => "status",
        }
    }
}

/// Client-facing request failures. Each maps to a 4xx response.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("node address must not be empty")]
    EmptyAddress,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "rejecting request");
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_are_bad_requests() {
        let err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::EmptyAddress.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_propagate_error_names_the_cause() {
        let status = PropagateError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status.kind(), "status");
        assert!(status.to_string().contains("503"));

        let timeout = PropagateError::Timeout(std::time::Duration::from_millis(250));
        assert_eq!(timeout.kind(), "timeout");
        assert!(timeout.to_string().contains("250ms"));
    }
}
