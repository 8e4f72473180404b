//! Error types for option loading and validation.

/// Startup-time configuration error.
///
/// Raised while loading or validating [`AuthOptions`](crate::AuthOptions).
/// These are fatal: a process that hits one must not serve requests.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required option was not provided.
    #[error("missing required option: {0}")]
    MissingOption(&'static str),

    /// An option was provided with an unacceptable value.
    #[error("invalid value for option {option}: {reason}")]
    InvalidOption {
        /// The option name as it appears in the options object.
        option: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The options document could not be deserialized.
    #[error("failed to parse options: {0}")]
    Parse(#[from] serde_json::Error),

    /// The options file could not be read.
    #[error("failed to read options file {path}: {source}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

/// Convenience result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
