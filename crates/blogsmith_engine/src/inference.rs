use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceFailureKind {
    /// Missing, invalid or rejected credential.
    Auth,
    /// Connection or IO failure before a response arrived.
    Transport,
    Timeout,
    RateLimited,
    HttpStatus(u16),
    /// The endpoint answered but generated no text.
    EmptyResponse,
    /// The response body was not in the expected shape.
    InvalidResponse,
    /// The client could not be built from its settings.
    Configuration,
}

impl fmt::Display for InferenceFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceFailureKind::Auth => write!(f, "authentication failed"),
            InferenceFailureKind::Transport => write!(f, "network error"),
            InferenceFailureKind::Timeout => write!(f, "timeout"),
            InferenceFailureKind::RateLimited => write!(f, "rate limited"),
            InferenceFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            InferenceFailureKind::EmptyResponse => write!(f, "empty response"),
            InferenceFailureKind::InvalidResponse => write!(f, "invalid response"),
            InferenceFailureKind::Configuration => write!(f, "invalid client configuration"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct InferenceError {
    pub kind: InferenceFailureKind,
    pub message: String,
}

impl InferenceError {
    pub(crate) fn new(kind: InferenceFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether trying the same call again later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            InferenceFailureKind::Transport
                | InferenceFailureKind::Timeout
                | InferenceFailureKind::RateLimited
                | InferenceFailureKind::HttpStatus(500..=599)
        )
    }
}

/// One prompt in, one completion out. Implementations hold no per-call state.
#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}
