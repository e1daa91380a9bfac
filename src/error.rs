use axum::http::StatusCode;
use thiserror::Error;

pub const PUBLISH_TRANSPORT_MESSAGE: &str = "Failed to create ADO work item";

/// Failures of a single webhook delivery. Every variant aborts the batch.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid JSON")]
    MalformedPayload,

    #[error("No ticket ID")]
    MissingTicketId,

    #[error("HubSpot ticket lookup failed: {0}")]
    EnrichmentFailed(String),

    #[error("Failed to create ADO work item: {0}")]
    PublishTransportFailed(String),

    #[error("ADO rejected work item: {0}")]
    PublishRejected(String),

    #[error("{0}")]
    Unclassified(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MalformedPayload | RelayError::MissingTicketId => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text returned to the webhook caller.
    pub fn response_body(&self) -> String {
        match self {
            RelayError::PublishTransportFailed(_) => PUBLISH_TRANSPORT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
