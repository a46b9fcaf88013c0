//! Backend boundary errors.

use thiserror::Error;

/// Errors crossing the backend boundary.
///
/// Every store catches these at its edge and converts them to a
/// store-local error message; none propagates into rendering code.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform returned a non-success response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The referenced document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The identity provider rejected the credentials.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    AlreadyExists,

    /// The backend is unavailable (used by failure injection in tests).
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
