/// Result type alias for cognition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the cognitive scheduler core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate path id: {0}")]
    DuplicateId(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Conversation turn not found: {0}")]
    TurnNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl Error {
    /// Check if this error is recoverable (can retry with backoff)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Transient-external errors: retry or degrade locally
            Error::Storage(_) | Error::Io(_) | Error::Search(_) | Error::Llm(_) => true,
            // Data-shape and configuration errors: retrying cannot help
            Error::Serialization(_)
            | Error::DuplicateId(_)
            | Error::PathNotFound(_)
            | Error::TurnNotFound(_)
            | Error::Configuration(_)
            | Error::InvalidInput(_)
            | Error::Scheduler(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors_are_recoverable() {
        assert!(Error::Storage("disk full".to_string()).is_recoverable());
        assert!(Error::Search("backend down".to_string()).is_recoverable());
        assert!(Error::Llm("rate limited".to_string()).is_recoverable());
    }

    #[test]
    fn test_data_shape_errors_are_not_recoverable() {
        assert!(!Error::DuplicateId("p1".to_string()).is_recoverable());
        assert!(!Error::PathNotFound("p2".to_string()).is_recoverable());
        assert!(!Error::Configuration("bad interval".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::DuplicateId("p1".to_string());
        assert_eq!(err.to_string(), "Duplicate path id: p1");

        let err = Error::PathNotFound("missing".to_string());
        assert!(err.to_string().contains("missing"));
    }
}
