//! Signed session cookie authentication for Sessgate.
//!
//! This crate verifies express-style session cookies: a cookie value of the
//! form `s:<session id>.<base64 HMAC-SHA256 tag>` whose session ID points at
//! a JSON session record in an external key-value store.
//!
//! # Overview
//!
//! Authentication is a strict linear sequence that stops at the first
//! failure:
//!
//! 1. Decode the raw cookie value (percent-decoding, trimming, unquoting).
//! 2. Check and strip the configured value prefix.
//! 3. Verify the HMAC signature and recover the session ID.
//! 4. Look the session record up in the [`SessionStore`].
//! 5. Parse the record as JSON and require a truthy user field.
//!
//! The result is an [`AuthOutcome`]: the decoded record on success, or a
//! [`Rejection`] carrying the [`AuthError`] classification, an optional
//! redirect URI and a cookie-clearing instruction.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sessgate_auth::{AuthOutcome, Authenticator, MemorySessionStore, sign};
//! use sessgate_core::AuthOptions;
//!
//! # tokio_test_block_on(async {
//! let settings = AuthOptions::builder()
//!     .cookie_name("sid")
//!     .secret("abc")
//!     .build()
//!     .validate()
//!     .unwrap();
//!
//! let store = MemorySessionStore::new();
//! store.insert("sess:xyz123", r#"{"user":"alice"}"#);
//!
//! let auth = Authenticator::new(Arc::new(settings), Arc::new(store));
//! let cookie = format!("s:{}", sign("xyz123", "abc"));
//! let outcome = auth.authenticate(Some(&cookie), "/").await;
//! assert!(matches!(outcome, AuthOutcome::Accepted(_)));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! # Modules
//!
//! - [`authenticator`] - The authentication sequence and its outcome types
//! - [`cookie`] - Raw cookie value decoding
//! - [`error`] - Rejection classifications and store errors
//! - [`redirect`] - Redirect URI construction for rejected requests
//! - [`redis_store`] - Redis-backed session store
//! - [`signature`] - `cookie-signature` compatible HMAC signing
//! - [`store`] - The session store trait and an in-memory implementation

pub mod authenticator;
pub mod cookie;
pub mod error;
pub mod redirect;
pub mod redis_store;
pub mod signature;
pub mod store;

pub use authenticator::{AuthOutcome, Authenticator, Credentials, Rejection, SessionRecord};
pub use error::{AuthError, StoreError};
pub use redis_store::RedisSessionStore;
pub use signature::{sign, unsign};
pub use store::{MemorySessionStore, SessionStore};
