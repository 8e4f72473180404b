//! Authentication outcome to HTTP response conversion.

use http::{HeaderValue, StatusCode, header};
use sessgate_auth::{AuthOutcome, Credentials, Rejection};
use tracing::error;

use crate::body::AuthResponseBody;
use crate::cookie::clear_cookie_value;

/// Content type of JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Body sent with redirect responses.
pub const REDIRECT_BODY: &str = "You are being redirected...";

const UNAUTHORIZED_BODY: &str = r#"{"statusCode":401,"error":"Unauthorized"}"#;
const INTERNAL_ERROR_BODY: &str = r#"{"statusCode":500,"error":"Internal Server Error"}"#;

/// Render an authentication outcome.
///
/// - Accepted: `200 OK` with the session record as JSON.
/// - Rejected with a redirect: `302 Found` with `Location`.
/// - Rejected otherwise: `401 Unauthorized` with `WWW-Authenticate: Cookie`.
///
/// A rejection that asks for the cookie to be cleared also carries a
/// `Set-Cookie` header expiring `cookie_name`.
#[must_use]
pub fn outcome_to_response(
    outcome: &AuthOutcome,
    cookie_name: &str,
) -> http::Response<AuthResponseBody> {
    match outcome {
        AuthOutcome::Accepted(credentials) => accepted_response(credentials),
        AuthOutcome::Rejected(rejection) => rejected_response(rejection, cookie_name),
    }
}

fn accepted_response(credentials: &Credentials) -> http::Response<AuthResponseBody> {
    match serde_json::to_vec(&credentials.credentials) {
        Ok(json) => http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(AuthResponseBody::from_bytes(json))
            .expect("static accepted response should be valid"),
        Err(e) => {
            error!(error = %e, "failed to serialize session record");
            internal_error_response()
        }
    }
}

fn rejected_response(rejection: &Rejection, cookie_name: &str) -> http::Response<AuthResponseBody> {
    let mut response = match rejection.redirect_uri.as_deref() {
        Some(uri) => redirect_response(uri).unwrap_or_else(|| {
            error!(uri, "redirect URI is not a valid header value");
            unauthorized_response()
        }),
        None => unauthorized_response(),
    };

    if rejection.clear_cookie {
        if let Ok(hv) = HeaderValue::from_str(&clear_cookie_value(cookie_name)) {
            response.headers_mut().append(header::SET_COOKIE, hv);
        }
    }

    response
}

fn redirect_response(uri: &str) -> Option<http::Response<AuthResponseBody>> {
    let location = HeaderValue::from_str(uri).ok()?;
    let response = http::Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(AuthResponseBody::from_static(REDIRECT_BODY))
        .expect("static redirect response should be valid");
    Some(response)
}

/// `401 Unauthorized` with a generic body.
#[must_use]
pub fn unauthorized_response() -> http::Response<AuthResponseBody> {
    http::Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(header::WWW_AUTHENTICATE, "Cookie")
        .header(header::CONTENT_TYPE, CONTENT_TYPE)
        .body(AuthResponseBody::from_static(UNAUTHORIZED_BODY))
        .expect("static unauthorized response should be valid")
}

fn internal_error_response() -> http::Response<AuthResponseBody> {
    http::Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, CONTENT_TYPE)
        .body(AuthResponseBody::from_static(INTERNAL_ERROR_BODY))
        .expect("static internal error response should be valid")
}

/// Health check response.
#[must_use]
pub fn health_check_response() -> http::Response<AuthResponseBody> {
    http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, CONTENT_TYPE)
        .body(AuthResponseBody::from_static(r#"{"status":"running"}"#))
        .expect("static health response should be valid")
}
