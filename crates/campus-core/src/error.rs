//! Error types for the campus client.
//!
//! One error type covers every failure a store action can surface, with
//! explicit variants for transport, server-signaled, local validation and
//! mock-mode failures.

use std::fmt;

use thiserror::Error;

/// The unified error type for campus operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (connection, DNS, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server responded with a failure status.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// A local check failed before any network call was made.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The mock backend was asked for a path it does not model.
    #[error("mock backend does not implement {path}")]
    MockUnsupported { path: String },

    /// A response body did not have the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Reading or writing persisted session state failed.
    #[error("session storage error: {message}")]
    Storage { message: String },
}

impl Error {
    /// Returns true when the server rejected the call with HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Http(err) if err.status == 401)
    }

    /// Returns the HTTP status when the server signaled the failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(err) => Some(err.status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode {
            message: err.to_string(),
        }
    }
}

/// Transport-level errors: the request never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Any other failure while sending the request.
    #[error("request failed: {message}")]
    Request { message: String },
}

/// A failure status returned by the server.
#[derive(Debug, Clone)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Response body, parsed as JSON when possible and kept as a string otherwise.
    pub body: serde_json::Value,
}

impl HttpError {
    /// Create a new HTTP error.
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Returns the server's `message` field, if the body carries one.
    pub fn message(&self) -> Option<&str> {
        match &self.body {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            serde_json::Value::Object(map) => map.get("message").and_then(|m| m.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(message) = self.message() {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

/// Local validation errors, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The course has no free seats.
    #[error("Course is full")]
    CourseFull { course_id: u64 },

    /// No course with this id is known locally.
    #[error("Course not found")]
    CourseNotFound { course_id: u64 },

    /// An input field failed its check.
    #[error("invalid {field}: {reason}")]
    Field { field: &'static str, reason: String },
}

impl ValidationError {
    pub(crate) fn field(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Field {
            field,
            reason: reason.into(),
        }
    }
}
