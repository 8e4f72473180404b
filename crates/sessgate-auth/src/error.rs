//! Error types for session cookie authentication.
//!
//! [`AuthError`] is the request-time rejection classification. Each variant
//! is terminal for the request and is turned into a
//! [`Rejection`](crate::Rejection) rather than propagated. [`StoreError`]
//! describes failures of the session store itself.

/// Why a request was not authenticated.
///
/// Variants are mutually exclusive and are produced in the priority order
/// listed here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No cookie, a cookie without the expected prefix, no session record,
    /// or a session record without a truthy user field.
    #[error("Missing credentials")]
    MissingCredentials,

    /// The cookie's HMAC signature did not verify.
    #[error("Invalid cookie signature")]
    InvalidSignature,

    /// The session store could not be queried.
    #[error("Session store error: {0}")]
    Store(String),

    /// The stored session value is not valid JSON.
    #[error("Corrupt session data")]
    CorruptSessionData,
}

impl AuthError {
    /// Short machine-readable name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::InvalidSignature => "invalid_signature",
            Self::Store(_) => "store_error",
            Self::CorruptSessionData => "corrupt_session_data",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

/// Failure talking to the session store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached, or the connection failed mid-request.
    #[error("store connection failed: {0}")]
    Connection(String),

    /// The store answered with an error.
    #[error("store command failed: {0}")]
    Command(String),
}

impl From<::redis::RedisError> for StoreError {
    fn from(err: ::redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            Self::Connection(err.to_string())
        } else {
            Self::Command(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_name_each_kind() {
        assert_eq!(AuthError::MissingCredentials.kind(), "missing_credentials");
        assert_eq!(AuthError::InvalidSignature.kind(), "invalid_signature");
        assert_eq!(AuthError::Store("down".into()).kind(), "store_error");
        assert_eq!(AuthError::CorruptSessionData.kind(), "corrupt_session_data");
    }

    #[test]
    fn test_should_keep_store_message() {
        let err = AuthError::from(StoreError::Connection("refused".into()));
        assert_eq!(err, AuthError::Store("store connection failed: refused".into()));
    }
}
