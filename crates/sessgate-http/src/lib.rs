//! HTTP binding for Sessgate session cookie authentication.
//!
//! This crate adapts the authenticator to hyper, providing:
//!
//! - **Cookie helpers**: Reads the configured cookie from `Cookie` headers and
//!   formats the cookie-clearing `Set-Cookie` value
//! - **Service**: Hyper `Service` that authenticates each request
//! - **Response helpers**: Turns an authentication outcome into a 200, 302, or
//!   401 response
#![allow(missing_docs)]

pub mod body;
pub mod cookie;
pub mod response;
pub mod service;

pub use body::AuthResponseBody;
pub use service::{HEALTH_CHECK_PATH, SessionAuthService};
