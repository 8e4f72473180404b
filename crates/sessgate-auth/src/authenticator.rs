//! Session cookie authentication.
//!
//! [`Authenticator::authenticate`] runs the whole check for one request:
//!
//! 1. Reject a missing or empty cookie.
//! 2. Decode the value and require the configured prefix.
//! 3. Verify the signature to recover the session ID.
//! 4. `GET sessionIDPrefix + sessionID` from the store.
//! 5. Parse the record as JSON and require a truthy user field.
//!
//! Every failure becomes a [`Rejection`]; nothing is retried and nothing
//! escapes as an error.

use std::sync::Arc;

use serde_json::Value;
use sessgate_core::Settings;
use tracing::{debug, warn};

use crate::cookie::decode_cookie_value;
use crate::error::AuthError;
use crate::redirect::build_redirect_uri;
use crate::signature::unsign;
use crate::store::SessionStore;

/// A decoded session record: field name to JSON value.
pub type SessionRecord = serde_json::Map<String, Value>;

/// The decoded session handed to downstream authorization logic.
///
/// `credentials` and `artifacts` are two names for the same record.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    /// The full session record.
    pub credentials: SessionRecord,
    /// The full session record, again.
    pub artifacts: SessionRecord,
}

/// A rejected authentication attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Why the request was rejected.
    pub reason: AuthError,
    /// Where to redirect the client, if a redirect target is configured.
    pub redirect_uri: Option<String>,
    /// Whether the caller should expire the session cookie.
    pub clear_cookie: bool,
}

/// The result of one authentication attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The session is valid and carries a user.
    Accepted(Credentials),
    /// The request is not authenticated.
    Rejected(Rejection),
}

impl AuthOutcome {
    /// Whether the request was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The rejection reason, if rejected.
    #[must_use]
    pub fn reason(&self) -> Option<&AuthError> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(rejection) => Some(&rejection.reason),
        }
    }
}

/// Verifies signed session cookies against a [`SessionStore`].
///
/// Cheap to clone; clones share the settings and the store handle.
#[derive(Clone)]
pub struct Authenticator {
    settings: Arc<Settings>,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("settings", &self.settings)
            .field("store", &"...")
            .finish()
    }
}

impl Authenticator {
    /// Create an authenticator from validated settings and a store.
    pub fn new(settings: Arc<Settings>, store: Arc<dyn SessionStore>) -> Self {
        Self { settings, store }
    }

    /// The settings this authenticator was built with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Authenticate a request.
    ///
    /// `cookie` is the raw value of the configured cookie, if the request
    /// carried one. `path` is the request path used for the `next` parameter
    /// of the redirect.
    pub async fn authenticate(&self, cookie: Option<&str>, path: &str) -> AuthOutcome {
        match self.validate(cookie).await {
            Ok(record) => {
                debug!("session cookie accepted");
                AuthOutcome::Accepted(Credentials {
                    credentials: record.clone(),
                    artifacts: record,
                })
            }
            Err(reason) => AuthOutcome::Rejected(self.reject(reason, path)),
        }
    }

    async fn validate(&self, cookie: Option<&str>) -> Result<SessionRecord, AuthError> {
        let raw = cookie
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingCredentials)?;

        let decoded = decode_cookie_value(raw).ok_or(AuthError::MissingCredentials)?;
        let signed = decoded
            .strip_prefix(self.settings.cookie_value_prefix())
            .ok_or(AuthError::MissingCredentials)?;

        let session_id = unsign(signed, self.settings.secret()).ok_or(AuthError::InvalidSignature)?;

        let key = self.settings.session_key(session_id);
        let data = self
            .store
            .get(&key)
            .await
            .inspect_err(|e| warn!(error = %e, "session store lookup failed"))?
            .ok_or(AuthError::MissingCredentials)?;

        let record = parse_session_record(&data)?;

        if !record
            .get(self.settings.user_prop())
            .is_some_and(is_truthy)
        {
            return Err(AuthError::MissingCredentials);
        }

        Ok(record)
    }

    fn reject(&self, reason: AuthError, path: &str) -> Rejection {
        let clear_cookie =
            matches!(reason, AuthError::InvalidSignature) && self.settings.clear_invalid();

        let redirect_uri = self
            .settings
            .redirect_to()
            .map(|target| build_redirect_uri(target, self.settings.append_next(), path));

        debug!(
            reason = reason.kind(),
            clear_cookie,
            redirect = redirect_uri.is_some(),
            "session cookie rejected"
        );

        Rejection {
            reason,
            redirect_uri,
            clear_cookie,
        }
    }
}

/// Parse a stored session value.
///
/// Text that is not JSON is corrupt. JSON that is not an object has no user
/// field, so it is treated as missing credentials.
fn parse_session_record(data: &[u8]) -> Result<SessionRecord, AuthError> {
    match serde_json::from_slice::<Value>(data) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(AuthError::MissingCredentials),
        Err(e) => {
            warn!(error = %e, "stored session is not valid JSON");
            Err(AuthError::CorruptSessionData)
        }
    }
}

/// JavaScript truthiness for a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
