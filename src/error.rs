//! Error types shared by the client, sessions and coordinator.

use thiserror::Error;

/// Failure of a single call to the analysis service.
///
/// Transport-level failures (network, HTTP status, non-JSON body) and
/// malformed-but-valid JSON are kept apart so callers can tell them
/// apart with [`ServiceError::kind`]. Both are reported the same way to
/// the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Service unreachable: {0}")]
    Unreachable(String),
    #[error("Service responded with HTTP {status}")]
    Status { status: u16 },
    #[error("Service response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Malformed service response: {0}")]
    Malformed(String),
}

/// Coarse classification of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Transport,
    MalformedResponse,
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            ServiceError::Malformed(_) => ServiceErrorKind::MalformedResponse,
            _ => ServiceErrorKind::Transport,
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        ServiceError::Malformed(detail.into())
    }
}

/// Locally detected invalid input. Never sent to the service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Password must not be empty")]
    EmptyPassword,
    #[error("Length must be between {min} and {max}, got {value}")]
    LengthOutOfRange { value: u32, min: u32, max: u32 },
    #[error("Count must be between {min} and {max}, got {value}")]
    CountOutOfRange { value: u32, min: u32, max: u32 },
    #[error("Number of words must be between {min} and {max}, got {value}")]
    WordCountOutOfRange { value: u32, min: u32, max: u32 },
    #[error("Select at least one character class")]
    NoCharacterClass,
}

/// Clipboard write failure. Does not affect any session state.
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("No candidate at index {index} ({len} available)")]
    NoSuchCandidate { index: usize, len: usize },
    #[error("No clipboard tool available")]
    Unavailable,
    #[error("Clipboard command failed: {0}")]
    CommandFailed(String),
    #[error("Failed to write to clipboard: {0}")]
    Io(#[from] std::io::Error),
}

/// User-visible notice attached to a session after a failed operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Request failed: {0}")]
    FetchFailed(#[from] ServiceError),
}
