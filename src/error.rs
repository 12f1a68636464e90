//! Client error type
//!
//! Every fallible core operation returns `ClientResult<T>`. The status
//! decides how the UI reacts; the message is what a user may see; the span
//! trail says where the failure travelled, for the console.

use std::fmt;

use serde::{Deserialize, Serialize};

// =========================================================
// Error status
// =========================================================

/// Error category, mirroring how the UI reacts to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientErrorStatus {
    /// Local input check failed; no request was sent.
    Validation,
    /// 401/403 or missing token.
    Unauthorized,
    /// Transport failure (DNS, CORS, connection reset...).
    Network,
    /// Client-side deadline elapsed.
    Timeout,
    /// 404: unknown resource.
    NotFound,
    /// Backend answered `success: false` or an unexpected status.
    Rejected,
    /// Body could not be decoded.
    Serialization,
    /// Owning view went away before completion.
    Cancelled,
}

impl ClientErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorStatus::Validation => "VALIDATION_FAILED",
            ClientErrorStatus::Unauthorized => "UNAUTHORIZED",
            ClientErrorStatus::Network => "NETWORK_ERROR",
            ClientErrorStatus::Timeout => "TIMEOUT",
            ClientErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
            ClientErrorStatus::Rejected => "REJECTED",
            ClientErrorStatus::Serialization => "JSON_PARSE_ERROR",
            ClientErrorStatus::Cancelled => "CANCELLED",
        }
    }

    /// Maps a non-2xx HTTP status.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => ClientErrorStatus::Unauthorized,
            404 => ClientErrorStatus::NotFound,
            _ => ClientErrorStatus::Rejected,
        }
    }
}

// =========================================================
// Error context
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// Operation name, e.g. "api.run_agent"
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// Core error type
// =========================================================

/// Client error.
///
/// Carries a category, a message, an optional source and the trail of
/// operations it passed through.
#[derive(Debug)]
pub struct ClientError {
    pub status: ClientErrorStatus,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(status: ClientErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Unauthorized, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Timeout, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::NotFound, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Rejected, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Serialization, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Cancelled, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::serialization(e.to_string()).with_source(e)
    }
}

impl From<futures::future::Aborted> for ClientError {
    fn from(_: futures::future::Aborted) -> Self {
        ClientError::cancelled("view closed before the request settled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_trace() {
        let err = ClientError::not_found("no such report")
            .in_op("api.send")
            .in_op_with("api.report", "r-1");
        assert_eq!(
            err.to_string(),
            "[RESOURCE_NOT_FOUND] no such report | trace: api.send -> api.report(r-1)"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn http_status_mapping() {
        assert_eq!(
            ClientErrorStatus::from_http_status(401),
            ClientErrorStatus::Unauthorized
        );
        assert_eq!(
            ClientErrorStatus::from_http_status(404),
            ClientErrorStatus::NotFound
        );
        assert_eq!(
            ClientErrorStatus::from_http_status(500),
            ClientErrorStatus::Rejected
        );
    }

    #[test]
    fn json_errors_keep_source() {
        let e = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = ClientError::from(e);
        assert_eq!(err.status, ClientErrorStatus::Serialization);
        assert!(std::error::Error::source(&err).is_some());
    }
}
