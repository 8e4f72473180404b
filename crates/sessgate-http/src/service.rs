//! Session authentication service implementing the hyper `Service` trait.
//!
//! Each request is handled independently:
//!
//! 1. `GET /_sessgate/health` is answered directly.
//! 2. The configured cookie is read from the `Cookie` headers.
//! 3. The original request path is taken from `X-Original-URI` or
//!    `X-Forwarded-Uri` (set by a fronting proxy), falling back to the
//!    request's own path and query.
//! 4. The authenticator decides, and the outcome is rendered as a response.
//!
//! The request body is never read.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use sessgate_auth::Authenticator;
use tracing::debug;

use crate::body::AuthResponseBody;
use crate::cookie::find_cookie;
use crate::response::{health_check_response, outcome_to_response};

/// Path of the service's own health endpoint.
///
/// Namespaced so it never shadows a protected application route of the
/// same name.
pub const HEALTH_CHECK_PATH: &str = "/_sessgate/health";

/// Headers a fronting proxy uses to pass the original request URI.
const ORIGINAL_URI_HEADERS: [&str; 2] = ["x-original-uri", "x-forwarded-uri"];

/// Hyper `Service` that authenticates requests by session cookie.
#[derive(Debug, Clone)]
pub struct SessionAuthService {
    authenticator: Authenticator,
}

impl SessionAuthService {
    /// Create a new `SessionAuthService`.
    #[must_use]
    pub fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }
}

impl<B> hyper::service::Service<http::Request<B>> for SessionAuthService {
    type Response = http::Response<AuthResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let request_id = uuid::Uuid::new_v4().to_string();
        let (parts, _body) = req.into_parts();

        Box::pin(async move {
            let response = process_request(&parts, &authenticator).await;
            let response = add_common_headers(response, &request_id);
            Ok(response)
        })
    }
}

/// Run one request through the authentication pipeline.
async fn process_request(
    parts: &http::request::Parts,
    authenticator: &Authenticator,
) -> http::Response<AuthResponseBody> {
    if is_health_check(&parts.method, parts.uri.path()) {
        return health_check_response();
    }

    let cookie_name = authenticator.settings().cookie_name();
    let cookie = find_cookie(&parts.headers, cookie_name);
    let path = original_path(parts);

    let outcome = authenticator.authenticate(cookie, path).await;
    let response = outcome_to_response(&outcome, cookie_name);

    debug!(
        method = %parts.method,
        path,
        status = response.status().as_u16(),
        "authentication request handled"
    );

    response
}

/// The path the client originally asked for.
fn original_path(parts: &http::request::Parts) -> &str {
    ORIGINAL_URI_HEADERS
        .iter()
        .filter_map(|name| parts.headers.get(*name))
        .filter_map(|v| v.to_str().ok())
        .find(|v| !v.is_empty())
        .or_else(|| parts.uri.path_and_query().map(http::uri::PathAndQuery::as_str))
        .unwrap_or("/")
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && path == HEALTH_CHECK_PATH
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<AuthResponseBody>,
    request_id: &str,
) -> http::Response<AuthResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }

    headers.insert(
        http::header::CACHE_CONTROL,
        http::HeaderValue::from_static("no-store"),
    );
    headers.insert("server", http::HeaderValue::from_static("Sessgate"));

    response
}
