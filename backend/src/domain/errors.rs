//! Domain error type shared by every service.
//!
//! Each variant carries the user-facing message; `io::rest::error` decides the
//! HTTP status from the variant alone.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// No signed-in session, or bad credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Signed in, but acting on someone else's resource
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate username, or already a room member
    #[error("{0}")]
    Conflict(String),

    #[error("Financial data generation failed: {0}")]
    Generator(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Returns the trimmed value when it is present and non-empty
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
