use thiserror::Error;

/// Failures surfaced by the backup API client.
///
/// `Display` yields the exact message handed back to the calling agent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiClientError {
    /// No HTTP response was obtained (DNS, refused connection, timeout).
    #[error("Network error: {0}")]
    Network(String),
    /// The body was non-empty but not JSON. Holds the first 100 characters.
    #[error("Invalid JSON response: {0}")]
    ResponseFormat(String),
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl ApiClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
