//! Cookie header helpers.

use http::HeaderMap;
use http::header::COOKIE;

/// Find the raw value of cookie `name` in the request's `Cookie` headers.
///
/// Pairs are separated by `;`. The first pair with a matching name wins,
/// across all `Cookie` header lines. The value is returned as sent; decoding
/// is left to the authenticator.
///
/// Lines are split on raw bytes, so a pair carrying non-ASCII or invalid
/// UTF-8 only hides itself, not its neighbours.
#[must_use]
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .flat_map(|line| line.as_bytes().split(|b| *b == b';'))
        .filter_map(|pair| std::str::from_utf8(pair).ok())
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim())
}

/// `Set-Cookie` value that expires cookie `name` immediately.
#[must_use]
pub fn clear_cookie_value(name: &str) -> String {
    format!("{name}=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/; HttpOnly")
}
