// src/services/error.rs
use std::fmt;

/// Failure classes for calls against the fare analytics service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The request never produced a response (connect, send, or read failure).
    Transport,
    /// The service answered with a failure, carrying its `{error}` body
    /// message when one was present.
    Api,
    /// The response body could not be decoded into the expected shape.
    Decode,
}

#[derive(Debug, Clone)]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn transport(message: impl Into<String>) -> Self {
        ServiceError {
            kind: ServiceErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        ServiceError {
            kind: ServiceErrorKind::Api,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ServiceError {
            kind: ServiceErrorKind::Decode,
            message: message.into(),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ServiceError {}
