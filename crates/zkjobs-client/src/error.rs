//! Client error types.
//!
//! Transport failures are described by [`TransportError`], which keeps the
//! low-level detail for logs. The service façade turns them into
//! [`ServiceError`], which only exposes an [`ErrorKind`] and a message that is
//! safe to show in the UI.

use std::fmt;

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Error kind
// =============================================================================

/// Error taxonomy shared by every layer. Displays as `network`,
/// `http:<status>`, `decode`, `unmocked` or `validation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was received
    Network,
    /// The server answered with a non-2xx status
    Http(u16),
    /// The response body could not be used
    Decode,
    /// The mock network saw a request it has no handler for
    Unmocked,
    /// The caller passed an invalid argument
    Validation,
}

impl ErrorKind {
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ErrorKind::Http(status) => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ErrorKind::Http(404))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Http(status) => write!(f, "http:{}", status),
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Unmocked => write!(f, "unmocked"),
            ErrorKind::Validation => write!(f, "validation"),
        }
    }
}

// =============================================================================
// Transport errors
// =============================================================================

/// Errors produced by a [`Transport`](crate::transport::Transport) or while
/// decoding its response.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No mock handler for {method} {path}")]
    Unmocked { method: String, path: String },

    #[error("Invalid request: {0}")]
    Validation(String),
}

impl TransportError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Network(_) => ErrorKind::Network,
            TransportError::Http { status, .. } => ErrorKind::Http(*status),
            TransportError::Decode(_) => ErrorKind::Decode,
            TransportError::Unmocked { .. } => ErrorKind::Unmocked,
            TransportError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Service errors
// =============================================================================

/// Normalized error handed to UI code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind.is_not_found()
    }
}

impl From<TransportError> for ServiceError {
    fn from(error: TransportError) -> Self {
        let message = match &error {
            TransportError::Network(_) => "Could not reach the job service".to_string(),
            TransportError::Http { status: 404, .. } => "The requested job was not found".to_string(),
            TransportError::Http { status, .. } => {
                format!("The job service returned an error (HTTP {})", status)
            }
            TransportError::Decode(_) => {
                "The job service sent a response that could not be read".to_string()
            }
            // Kept verbatim so missing mocks are obvious during development.
            TransportError::Unmocked { .. } => error.to_string(),
            TransportError::Validation(msg) => msg.clone(),
        };

        Self::new(error.kind(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::Network.to_string(), "network");
        assert_eq!(ErrorKind::Http(500).to_string(), "http:500");
        assert_eq!(ErrorKind::Decode.to_string(), "decode");
        assert_eq!(ErrorKind::Unmocked.to_string(), "unmocked");
        assert_eq!(ErrorKind::Validation.to_string(), "validation");
    }

    #[test]
    fn test_transport_error_kinds() {
        let err = TransportError::Http {
            status: 503,
            body: "upstream down".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Http(503));
        assert_eq!(err.kind().http_status(), Some(503));
        assert_eq!(TransportError::network("refused").kind(), ErrorKind::Network);
    }

    #[test]
    fn test_service_error_drops_transport_detail() {
        let err: ServiceError = TransportError::Http {
            status: 500,
            body: "stack trace at line 42".into(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Http(500));
        assert!(!err.message.contains("stack trace"));
        assert_eq!(err.to_string(), "http:500: The job service returned an error (HTTP 500)");
    }

    #[test]
    fn test_not_found_is_preserved() {
        let err: ServiceError = TransportError::Http {
            status: 404,
            body: String::new(),
        }
        .into();
        assert!(err.is_not_found());

        let err: ServiceError = TransportError::Http {
            status: 410,
            body: String::new(),
        }
        .into();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_unmocked_message_names_route() {
        let err: ServiceError = TransportError::Unmocked {
            method: "GET".into(),
            path: "/companies".into(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Unmocked);
        assert!(err.message.contains("GET /companies"));
    }
}
