use http::StatusCode;
use thiserror::Error;

use crate::models::SessionRecord;

/// What the session endpoint said about the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Valid(SessionRecord),
    /// Non-success status, or a success status with an empty or malformed body.
    Invalid { status: StatusCode, reason: String },
}

/// Failures that never reached a usable HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("error sending request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("error reading response body: {0}")]
    Body(reqwest::Error),
    #[error("invalid session service url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// The two calls the client makes against the backend session service.
/// Implementations attach the ambient session credentials to every request.
#[async_trait::async_trait]
pub trait SessionTransport: Send + Sync {
    fn get_name(&self) -> &str;
    async fn check_session(&self) -> Result<SessionCheck, TransportError>;
    /// Returns the raw status; `204 No Content` confirms the session ended.
    async fn end_session(&self) -> Result<StatusCode, TransportError>;
}
