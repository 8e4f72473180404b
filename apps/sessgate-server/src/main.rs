//! Sessgate Server - forward-auth endpoint for signed session cookies.
//!
//! A fronting proxy (for example nginx `auth_request`) sends each incoming
//! request's headers here. The server verifies the session cookie against
//! Redis and answers `200` with the session record, `302` to the login page,
//! or `401`.
//!
//! # Usage
//!
//! ```text
//! SESSION_COOKIE_NAME=connect.sid SESSION_SECRET=keyboard-cat sessgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:4180` | Bind address |
//! | `SESSGATE_CONFIG` | *(unset)* | JSON options file, overridden by the variables below |
//! | `SESSION_COOKIE_NAME` | *(required)* | Session cookie name |
//! | `SESSION_SECRET` | *(required)* | Cookie signing secret |
//! | `SESSION_COOKIE_PREFIX` | `s:` | Prefix before the signed value |
//! | `SESSION_ID_PREFIX` | `sess:` | Prefix of session keys in Redis |
//! | `SESSION_USER_PROP` | `user` | Session field required to authenticate |
//! | `SESSION_CLEAR_INVALID` | `false` | Clear cookies with bad signatures |
//! | `SESSION_REDIRECT_TO` | *(unset)* | Redirect target for rejected requests |
//! | `SESSION_APPEND_NEXT` | *(unset)* | `true` or a query parameter name |
//! | `REDIS_HOST` | `127.0.0.1` | Redis host |
//! | `REDIS_PORT` | `6379` | Redis port |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `json` for structured log lines |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use sessgate_auth::{Authenticator, RedisSessionStore};
use sessgate_core::AuthOptions;
use sessgate_http::{HEALTH_CHECK_PATH, SessionAuthService};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address.
const DEFAULT_LISTEN: &str = "0.0.0.0:4180";

/// How long `--health-check` waits for the server to answer.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` value.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

/// Resolve when the process is asked to stop: Ctrl-C, or SIGTERM on Unix
/// (what container runtimes send).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!(signal = "SIGINT", "received shutdown signal"),
        () = terminate => info!(signal = "SIGTERM", "received shutdown signal"),
    }
}

/// Accept connections and authenticate their requests until `shutdown`
/// resolves, then let in-flight requests finish.
async fn serve<F>(listener: TcpListener, service: SessionAuthService, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer_addr) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let conn = http
                    .serve_connection(TokioIo::new(stream), service.clone())
                    .into_owned();
                let conn = graceful.watch(conn);

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        debug!(%peer_addr, error = %e, "connection closed with error");
                    }
                });
            }

            () = &mut shutdown => break,
        }
    }

    info!("draining in-flight auth requests");
    graceful.shutdown().await;
    info!("stopped");

    Ok(())
}

/// Status code from the status line of a raw HTTP/1.x response.
fn status_code(response: &str) -> Option<u16> {
    let line = response.lines().next()?;
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("HTTP/1.") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Ask a running server at `addr` whether it is healthy.
async fn run_health_check(addr: &str) -> Result<()> {
    let probe = async {
        let mut stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("cannot connect to {addr}"))?;

        let request = format!(
            "GET {HEALTH_CHECK_PATH} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
        );
        stream.write_all(request.as_bytes()).await?;

        let mut response = String::new();
        stream.read_to_string(&mut response).await?;
        anyhow::Ok(response)
    };

    let response = tokio::time::timeout(HEALTH_CHECK_TIMEOUT, probe)
        .await
        .with_context(|| format!("health check against {addr} timed out"))??;

    match status_code(&response) {
        Some(200) if response.contains("\"running\"") => Ok(()),
        status => anyhow::bail!("unhealthy response from {addr}: status {status:?}"),
    }
}

/// Read the listen address from the environment.
fn gateway_listen_addr() -> String {
    std::env::var("GATEWAY_LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN.to_owned())
}

/// Read the log level from the environment.
fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned())
}

/// Whether JSON log output was requested.
fn log_json() -> bool {
    std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let listen_addr = gateway_listen_addr();

    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = listen_addr.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&log_level(), log_json())?;

    let settings = AuthOptions::from_env()
        .and_then(AuthOptions::validate)
        .context("invalid authentication options")?;
    let settings = Arc::new(settings);

    info!(
        cookie_name = settings.cookie_name(),
        session_id_prefix = settings.session_id_prefix(),
        user_prop = settings.user_prop(),
        clear_invalid = settings.clear_invalid(),
        redirect_to = settings.redirect_to(),
        append_next = settings.append_next(),
        "loaded authentication settings",
    );

    let store = RedisSessionStore::connect(settings.store())
        .await
        .with_context(|| format!("failed to connect to session store at {}", settings.store().url()))?;

    let authenticator = Authenticator::new(Arc::clone(&settings), Arc::new(store));
    let service = SessionAuthService::new(authenticator);

    let addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("invalid bind address: {listen_addr}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting Sessgate Server");

    serve(listener, service, shutdown_signal()).await
}
