/*!
 * Error Handling for the JWKS Manager
 *
 * Provides the error type shared by the codec, the key stores and the
 * lifecycle manager, with convenience constructors and conversions from
 * the underlying IO and serialization errors.
 */

use thiserror::Error;

/// Error type for all key lifecycle operations
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key material not found: {resource}")]
    NotFound { resource: String },

    #[error("invalid key format: {detail} - {cause}")]
    InvalidKeyFormat { detail: String, cause: String },

    #[error("key generation failed: {algorithm} - {cause}")]
    GenerationError { algorithm: String, cause: String },

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl KeyError {
    /// Get the error category as a string, for log lines
    pub fn error_type(&self) -> &'static str {
        match self {
            KeyError::NotFound { .. } => "NotFound",
            KeyError::InvalidKeyFormat { .. } => "InvalidKeyFormat",
            KeyError::GenerationError { .. } => "GenerationError",
            KeyError::SerializationError(_) => "SerializationError",
            KeyError::IoError(_) => "IoError",
        }
    }
}

/// Convenience constructors for common error cases
impl KeyError {
    pub fn not_found(resource: &str) -> Self {
        KeyError::NotFound {
            resource: resource.to_string(),
        }
    }

    pub fn invalid_format(detail: &str, cause: &str) -> Self {
        KeyError::InvalidKeyFormat {
            detail: detail.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn generation_error(algorithm: &str, cause: &str) -> Self {
        KeyError::GenerationError {
            algorithm: algorithm.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn io_error(cause: &str) -> Self {
        KeyError::IoError(cause.to_string())
    }
}

// From implementations for automatic error conversion
impl From<std::io::Error> for KeyError {
    fn from(err: std::io::Error) -> Self {
        KeyError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for KeyError {
    fn from(err: serde_json::Error) -> Self {
        KeyError::SerializationError(err.to_string())
    }
}

/// Result type alias for key lifecycle operations
pub type KeyResult<T> = Result<T, KeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_variants() {
        let error = KeyError::not_found("current signing key");
        assert_eq!(error.error_type(), "NotFound");
        assert!(error.to_string().contains("current signing key"));
    }

    #[test]
    fn test_invalid_format_message() {
        let error = KeyError::invalid_format("rsa private components", "missing dq");
        assert_eq!(error.error_type(), "InvalidKeyFormat");
        let message = error.to_string();
        assert!(message.contains("rsa private components"));
        assert!(message.contains("missing dq"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: KeyError = io.into();
        assert_eq!(error.error_type(), "IoError");
        assert!(error.to_string().contains("denied"));
    }

    #[test]
    fn test_serde_conversion() {
        let bad = serde_json::from_str::<serde_json::Value>("not json");
        let error: KeyError = bad.unwrap_err().into();
        assert_eq!(error.error_type(), "SerializationError");
    }
}
