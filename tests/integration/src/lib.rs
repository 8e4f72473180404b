//! Integration tests for the Sessgate server.
//!
//! These tests require a running Sessgate server at `localhost:4180` backed
//! by a Redis instance the tests can write to. The server must be started
//! with `SESSION_COOKIE_NAME` and `SESSION_SECRET` matching the values used
//! here, and without `SESSION_REDIRECT_TO`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p sessgate-integration -- --ignored
//! ```

use std::sync::Once;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use redis::AsyncCommands;

static INIT: Once = Once::new();

/// Characters `encodeURIComponent` leaves alone, as used by cookie writers.
const COOKIE_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    env_or("SESSGATE_ENDPOINT_URL", "http://localhost:4180")
}

/// Session cookie name the server was started with.
#[must_use]
pub fn cookie_name() -> String {
    env_or("SESSION_COOKIE_NAME", "connect.sid")
}

/// Signing secret the server was started with.
#[must_use]
pub fn secret() -> String {
    env_or("SESSION_SECRET", "keyboard-cat")
}

/// HTTP client that does not follow redirects.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();

    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap_or_else(|e| panic!("failed to build HTTP client: {e}"))
}

/// Open a connection to the Redis instance backing the server.
pub async fn redis_connection() -> redis::aio::MultiplexedConnection {
    let url = env_or("REDIS_URL", "redis://127.0.0.1:6379/");
    let client = redis::Client::open(url.as_str())
        .unwrap_or_else(|e| panic!("invalid redis url {url}: {e}"));
    client
        .get_multiplexed_async_connection()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to redis at {url}: {e}"))
}

/// Generate a unique session id for a test.
#[must_use]
pub fn test_session_id(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{id}")
}

/// Store raw session data under `sess:{id}`. Caller is responsible for cleanup.
pub async fn put_session(id: &str, data: &str) {
    let mut conn = redis_connection().await;
    let key = format!("sess:{id}");
    let () = conn
        .set(&key, data)
        .await
        .unwrap_or_else(|e| panic!("failed to store session {key}: {e}"));
}

/// Create a session holding `record` and return its id.
pub async fn create_session(prefix: &str, record: &serde_json::Value) -> String {
    let id = test_session_id(prefix);
    put_session(&id, &record.to_string()).await;
    id
}

/// Delete a session created by a test.
pub async fn cleanup_session(id: &str) {
    let mut conn = redis_connection().await;
    let _: Result<(), _> = conn.del(format!("sess:{id}")).await;
}

/// `Cookie` header value carrying a signed session id, encoded the way a
/// browser would send it.
#[must_use]
pub fn session_cookie(id: &str) -> String {
    let value = format!("s:{}", sessgate_auth::sign(id, &secret()));
    format!(
        "{}={}",
        cookie_name(),
        utf8_percent_encode(&value, COOKIE_COMPONENT)
    )
}

mod test_auth;
mod test_health;
