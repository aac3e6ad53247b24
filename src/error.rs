use thiserror::Error;

// Error handling for LCU operations

pub type Result<T> = std::result::Result<T, LcuError>;

#[derive(Error, Debug)]
pub enum LcuError {
    #[error("League client not found")]
    ClientNotFound,

    #[error("Not connected to the League client")]
    NotConnected,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LCU API returned {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Request timed out")]
    Timeout,

    #[error("not in champion select")]
    NotInChampSelect,

    #[error("no pick action")]
    NoPickAction,

    #[error("failed to select skin: {source}")]
    SelectSkin { source: Box<LcuError> },

    #[error("failed to connect to League client: {source}")]
    Connect { source: Box<LcuError> },

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LcuError {
    pub fn select_skin(source: LcuError) -> Self {
        Self::SelectSkin {
            source: Box::new(source),
        }
    }

    pub fn connect(source: LcuError) -> Self {
        Self::Connect {
            source: Box::new(source),
        }
    }

    /// Errors that mean the client is unreachable rather than that a request was rejected.
    pub fn is_connection_error(&self) -> bool {
        match self {
            Self::ClientNotFound
            | Self::NotConnected
            | Self::Http(_)
            | Self::WebSocket(_)
            | Self::Timeout => true,
            Self::Connect { .. } => true,
            Self::SelectSkin { source } => source.is_connection_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_skin_error_carries_cause() {
        let err = LcuError::select_skin(LcuError::Status {
            path: "/lol-champ-select/v1/session/my-selection".to_string(),
            status: 500,
        });
        let msg = err.to_string();
        assert!(msg.starts_with("failed to select skin: "));
        assert!(msg.contains("500"));
        assert!(msg.contains("/lol-champ-select/v1/session/my-selection"));
    }

    #[test]
    fn test_connection_error_classification() {
        assert!(LcuError::ClientNotFound.is_connection_error());
        assert!(LcuError::select_skin(LcuError::NotConnected).is_connection_error());
        assert!(!LcuError::NotInChampSelect.is_connection_error());
        assert!(!LcuError::select_skin(LcuError::NoPickAction).is_connection_error());
    }
}
