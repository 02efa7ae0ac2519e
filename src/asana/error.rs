//! Errors returned by the Asana client.

use std::fmt;

/// Broad category of a failed Asana call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsanaErrorKind {
    /// 401: token missing or invalid
    Unauthorized,
    /// 403: token lacks access to the resource
    Forbidden,
    /// 404: no such resource
    NotFound,
    /// 429: rate limited
    RateLimited,
    /// Other 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// Connection or timeout failure
    Network,
    /// Response body did not match the expected shape
    Parse,
}

impl fmt::Display for AsanaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not found"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::ClientError => write!(f, "client error"),
            Self::ServerError => write!(f, "server error"),
            Self::Network => write!(f, "network error"),
            Self::Parse => write!(f, "parse error"),
        }
    }
}

/// Map an HTTP status code to an error kind.
pub fn classify_http_status(status: u16) -> AsanaErrorKind {
    match status {
        401 => AsanaErrorKind::Unauthorized,
        403 => AsanaErrorKind::Forbidden,
        404 => AsanaErrorKind::NotFound,
        429 => AsanaErrorKind::RateLimited,
        400..=499 => AsanaErrorKind::ClientError,
        _ => AsanaErrorKind::ServerError,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Asana {kind}: {message}")]
pub struct AsanaError {
    pub kind: AsanaErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl AsanaError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: classify_http_status(status),
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: AsanaErrorKind::Network,
            status: None,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: AsanaErrorKind::Parse,
            status: None,
            message: message.into(),
        }
    }
}
