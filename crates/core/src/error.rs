//! Error types for s5-core
//!
//! A single error enum shared by every component. Backend failures are kept
//! apart from `NotFound` so callers can tell "confirmed absent" from
//! "could not determine".

use thiserror::Error;

/// Result type alias for s5-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s5-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed command arguments or path
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Bucket or key does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication or permission failure
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Conflict with existing state (bucket exists, bucket not empty)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other failure reported by the storage backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 2,               // UsageError
            Error::Config(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::Network(_) => 3,                       // NetworkError
            Error::Auth(_) => 4,                          // AuthError
            Error::NotFound(_) => 5,                      // NotFound
            Error::Conflict(_) => 6,                      // Conflict
            _ => 1,                                       // GeneralError
        }
    }

    /// Whether the storage backend, rather than the user's input, caused this error
    pub const fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Auth(_) | Error::Backend(_)
        )
    }

    /// Only transient network failures are worth retrying
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
