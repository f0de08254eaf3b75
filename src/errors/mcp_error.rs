use super::{ToolError, ToolErrorKind};
use thiserror::Error;

/// JSON-RPC 2.0 error codes used by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
        }
    }
}

/// Protocol-level failure, returned in the `error` member of a response
/// rather than as a tool result.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct McpError {
    pub code: ErrorCode,
    pub message: String,
}

impl McpError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let code = match err.kind {
            ToolErrorKind::InvalidParams | ToolErrorKind::NotFound => ErrorCode::InvalidParams,
            _ => ErrorCode::InternalError,
        };
        let message = match err.hint {
            Some(hint) => format!("{}. {}", err.message, hint),
            None => err.message,
        };
        Self::new(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_folds_hint_into_message() {
        let err = McpError::from(
            ToolError::not_found("Unknown tool: stat").with_hint("Did you mean: stats"),
        );
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert_eq!(err.message, "Unknown tool: stat. Did you mean: stats");
        assert_eq!(err.code.as_i32(), -32602);
    }

    #[test]
    fn default_messages_follow_code() {
        let err = McpError::from_code(ErrorCode::MethodNotFound);
        assert_eq!(err.to_string(), "Method not found");
        assert_eq!(err.code.as_i32(), -32601);
    }
}
