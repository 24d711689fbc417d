//! Error types for mariadb-backend

use thiserror::Error;

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Message used when a driver reports a failure without any text at all.
const UNKNOWN_DRIVER_ERROR: &str = "unknown database error";

/// The single error kind surfaced by the backend.
///
/// Raised only when the database driver reports a failure while acquiring a
/// cursor, executing a statement or fetching rows. The underlying driver error
/// type never leaks to callers; only its best diagnostic text does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Create a backend error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self {
                message: UNKNOWN_DRIVER_ERROR.to_string(),
            };
        }
        Self { message }
    }

    /// Translate a driver error, preferring its structured diagnostic.
    pub fn from_driver(err: &DriverError) -> Self {
        Self::new(err.diagnostic())
    }

    /// Human-readable diagnostic text (never empty).
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DriverError> for BackendError {
    fn from(err: DriverError) -> Self {
        Self::from_driver(&err)
    }
}

/// An error reported by a database driver implementation.
///
/// Drivers fill in `message` with the error's display form and, when the
/// server returned one, attach the raw diagnostic payload. The payload is
/// decoded lazily by [`DriverError::diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    code: Option<u16>,
    payload: Option<Vec<u8>>,
}

impl DriverError {
    /// Create a driver error with only a display message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            payload: None,
        }
    }

    /// Create a driver error carrying a server error code and raw diagnostic payload.
    pub fn server(message: impl Into<String>, code: u16, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
            payload: Some(payload.into()),
        }
    }

    /// Server error code, if the failure came from the server.
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// Raw diagnostic payload, if any.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Most specific diagnostic available.
    ///
    /// The structured payload is decoded as UTF-8 and its last non-empty line
    /// is used. Any decoding problem falls back to the display form.
    pub fn diagnostic(&self) -> String {
        self.decoded_payload().unwrap_or_else(|| self.to_string())
    }

    fn decoded_payload(&self) -> Option<String> {
        let payload = self.payload.as_deref()?;
        let text = std::str::from_utf8(payload).ok()?;
        text.lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }
}
