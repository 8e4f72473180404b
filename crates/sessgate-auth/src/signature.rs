//! `cookie-signature` compatible signing.
//!
//! A signed value has the form:
//!
//! ```text
//! <value>.<Base64(HMAC-SHA256(secret, value)) without "=" padding>
//! ```
//!
//! Unsigning splits at the last `.`, re-signs the value part and compares the
//! result with the input in constant time.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Sign `value` with `secret`.
///
/// # Examples
///
/// ```
/// use sessgate_auth::sign;
///
/// assert_eq!(
///     sign("hello", "tobiiscool"),
///     "hello.DGDUkGlIkCzPz+C0B064FNgHdEjox7ch8tOBGslZ5QI"
/// );
/// ```
#[must_use]
pub fn sign(value: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can accept keys of any length");
    mac.update(value.as_bytes());
    let tag = BASE64.encode(mac.finalize().into_bytes());
    format!("{value}.{tag}")
}

/// Verify a signed value and return the original value.
///
/// Returns `None` when the input has no `.` separator or the signature does
/// not match.
///
/// # Examples
///
/// ```
/// use sessgate_auth::{sign, unsign};
///
/// let signed = sign("xyz123", "abc");
/// assert_eq!(unsign(&signed, "abc"), Some("xyz123"));
/// assert_eq!(unsign(&signed, "wrong"), None);
/// ```
#[must_use]
pub fn unsign<'a>(input: &'a str, secret: &str) -> Option<&'a str> {
    let (value, _) = input.rsplit_once('.')?;
    let expected = sign(value, secret);

    if expected.as_bytes().ct_eq(input.as_bytes()).into() {
        Some(value)
    } else {
        None
    }
}
