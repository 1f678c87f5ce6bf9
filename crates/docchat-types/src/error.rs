use thiserror::Error;

/// Every failure the orchestration layer can surface to its caller.
///
/// Transport covers anything where the request was never effected or its
/// outcome is unknown: network failure, non-2xx status, timeout, or a body
/// that could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Busy: {0}")]
    Busy(String),
}

impl ClientError {
    pub fn timeout(ms: u64) -> Self {
        ClientError::Transport(format!("request timed out after {}ms", ms))
    }

    pub fn http_status(status: u16, body: &str) -> Self {
        ClientError::Transport(format!("HTTP {}: {}", status, body))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ClientError::Busy(_))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Transport(format!("invalid response body: {}", e))
    }
}
