//! Error types for chat sessions

use std::fmt;

use thiserror::Error;

/// Classification of a failed request to the remote chat API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// Connection failures, timeouts, unreadable bodies
    Network,
    /// Rejected credentials (401, 403)
    Auth,
    /// Rate limited or out of quota (429)
    Quota,
    /// The API refused the request as malformed (400, 404)
    InvalidRequest,
    /// Upstream failure (5xx)
    Server,
    /// The API answered with something we can't use
    InvalidResponse,
}

impl fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "Network",
            Self::Auth => "Authentication",
            Self::Quota => "Quota",
            Self::InvalidRequest => "Invalid request",
            Self::Server => "Server",
            Self::InvalidResponse => "Invalid response",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or placeholder credentials. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote model could not be set up. Fatal at startup.
    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    /// A single exchange failed. Recovered by the session.
    #[error("{kind} error: {message}")]
    Request {
        kind: RequestErrorKind,
        message: String,
    },
}

impl ChatError {
    pub fn request(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self::Request {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::request(RequestErrorKind::Network, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::request(RequestErrorKind::InvalidResponse, message)
    }

    /// Configuration and model setup problems stop the process from
    /// ever serving a conversation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::ModelInit(_))
    }

    #[cfg(test)]
    pub(crate) fn request_kind(&self) -> Option<RequestErrorKind> {
        match self {
            Self::Request { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
