use super::ApiClientError;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    Denied,
    NotFound,
    Conflict,
    Retryable,
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
            retryable: matches!(kind, ToolErrorKind::Retryable),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, "NOT_FOUND", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<ApiClientError> for ToolError {
    fn from(err: ApiClientError) -> Self {
        let message = err.to_string();
        match err {
            ApiClientError::Network(_) => {
                Self::new(ToolErrorKind::Retryable, "NETWORK_ERROR", message)
                    .with_hint("Check that the backup service is reachable at the configured URL.")
            }
            ApiClientError::ResponseFormat(_) => {
                Self::new(ToolErrorKind::Internal, "RESPONSE_FORMAT_ERROR", message)
            }
            ApiClientError::Api { status, .. } => {
                let kind = match status {
                    400 | 422 => ToolErrorKind::InvalidParams,
                    401 | 403 => ToolErrorKind::Denied,
                    404 => ToolErrorKind::NotFound,
                    409 => ToolErrorKind::Conflict,
                    _ => ToolErrorKind::Internal,
                };
                Self::new(kind, "API_ERROR", message)
                    .with_details(serde_json::json!({ "status": status }))
            }
        }
    }
}
