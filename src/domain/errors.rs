use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    InvalidUri(String),
    Transport(String),
    Status { status: u16, url: String },
    Protocol(String),
    Deserialize(String),
    Authentication(String),
    Config(String),
    Timeout,
    Cancelled,
}

impl ClientError {
    /// Status code of a rejected request, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUri(msg) => write!(f, "Invalid URI: {}", msg),
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::Status { status, url } => write!(f, "Request to {} failed with status {}", url, status),
            ClientError::Protocol(msg) => write!(f, "Unexpected server response: {}", msg),
            ClientError::Deserialize(msg) => write!(f, "Invalid JSON payload: {}", msg),
            ClientError::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            ClientError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ClientError::Timeout => write!(f, "Operation timed out"),
            ClientError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Deserialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = ClientError::Status {
            status: 404,
            url: "http://ci.example.com/job/missing/".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(ClientError::Timeout.status(), None);
    }

    #[test]
    fn test_display_mentions_url_and_status() {
        let err = ClientError::Status {
            status: 503,
            url: "http://ci.example.com/api/json".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("http://ci.example.com/api/json"));
    }
}
