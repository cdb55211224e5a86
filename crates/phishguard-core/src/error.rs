//! Error types for PhishGuard

/// Result type alias using PhishGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for PhishGuard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model artifact is malformed or unsupported
    #[error("model error: {0}")]
    Model(String),

    /// The feature vector does not match the canonical schema
    #[error("Expected {expected} features, got {actual}")]
    Schema { expected: usize, actual: usize },

    /// Inference failed on an otherwise valid input
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new schema mismatch error
    pub fn schema(expected: usize, actual: usize) -> Self {
        Self::Schema { expected, actual }
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_message_names_counts() {
        let err = Error::schema(77, 3);
        assert_eq!(err.to_string(), "Expected 77 features, got 3");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("missing.json"));
    }
}
