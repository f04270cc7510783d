//! Outcome envelope returned by the authority for every request.

use serde::{Deserialize, Serialize};

// =============================================================================
// Response Result
// =============================================================================

/// Result of an authority operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseResult {
    /// Operation succeeded
    Success {
        /// Optional data payload (varies by operation)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// Operation failed
    Error {
        /// Error classification code
        code: ErrorCode,
        /// Human-readable error message
        message: String,
    },
    /// Unknown response type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ResponseResult {
    /// Create a success response with data
    pub fn success<T: Serialize>(data: T) -> Self {
        ResponseResult::Success {
            data: Some(serde_json::to_value(data).unwrap_or_default()),
        }
    }

    /// Create a success response without data
    pub fn success_empty() -> Self {
        ResponseResult::Success { data: None }
    }

    /// Create an error response
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ResponseResult::Error {
            code,
            message: message.into(),
        }
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseResult::Success { .. })
    }

    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        matches!(self, ResponseResult::Error { .. })
    }

    /// Error code, if this is an error response
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ResponseResult::Error { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Participant lacks the authority role
    Forbidden,
    /// Actor or item does not resolve
    NotFound,
    /// No handler registered for the operation
    UnknownOperation,
    /// Handler failed while applying the change
    InternalError,
    /// Unknown code for forward compatibility
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Forbidden => write!(f, "forbidden"),
            ErrorCode::NotFound => write!(f, "not_found"),
            ErrorCode::UnknownOperation => write!(f, "unknown_operation"),
            ErrorCode::InternalError => write!(f, "internal_error"),
            ErrorCode::Unknown => write!(f, "unknown"),
        }
    }
}
