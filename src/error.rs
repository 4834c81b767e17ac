use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sentim
#[derive(Error, Debug)]
pub enum SentimError {
    /// The pasted link does not contain a recognizable video identifier
    #[error("Invalid video URL")]
    InvalidVideoUrl,

    /// The video has no top-level comments (or comments are disabled)
    #[error("No comments found or comments are disabled")]
    NoComments,

    /// A call to the comment API or the analysis backend failed
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// The access credential environment variable is missing or empty
    #[error("Credential not available: environment variable {env} is not set")]
    MissingCredential { env: String },

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a failure, as shown to the person running an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unparseable video URL
    InvalidInput,
    /// Zero comments returned
    EmptyResult,
    /// Network, status, decode or timeout failure of an external service
    UpstreamFailure,
    /// Bad or missing configuration, including the credential
    Configuration,
    /// Local IO and everything else
    Internal,
}

impl SentimError {
    /// Build an upstream failure for the named service
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidVideoUrl => ErrorKind::InvalidInput,
            Self::NoComments => ErrorKind::EmptyResult,
            Self::Upstream { .. } => ErrorKind::UpstreamFailure,
            Self::MissingCredential { .. }
            | Self::Config(_)
            | Self::ConfigValidation { .. }
            | Self::ConfigNotFound { .. }
            | Self::InvalidConfigValue { .. }
            | Self::Toml(_)
            | Self::TomlSerialization(_) => ErrorKind::Configuration,
            Self::Io { .. } | Self::Json { .. } | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for sentim operations
pub type Result<T> = std::result::Result<T, SentimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_failure_messages() {
        assert_eq!(SentimError::InvalidVideoUrl.to_string(), "Invalid video URL");
        assert_eq!(
            SentimError::NoComments.to_string(),
            "No comments found or comments are disabled"
        );
        assert_eq!(
            SentimError::upstream("comment API", "HTTP 403").to_string(),
            "comment API request failed: HTTP 403"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(SentimError::InvalidVideoUrl.kind(), ErrorKind::InvalidInput);
        assert_eq!(SentimError::NoComments.kind(), ErrorKind::EmptyResult);
        assert_eq!(
            SentimError::upstream("classifier", "boom").kind(),
            ErrorKind::UpstreamFailure
        );
        assert_eq!(
            SentimError::MissingCredential {
                env: "YOUTUBE_API_KEY".to_string()
            }
            .kind(),
            ErrorKind::Configuration
        );
    }
}
