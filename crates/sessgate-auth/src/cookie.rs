//! Raw cookie value decoding.

use percent_encoding::percent_decode_str;

/// Decode a raw cookie value.
///
/// Percent-decodes the value (`+` is left alone), trims surrounding
/// whitespace, and strips one pair of enclosing double quotes. Returns `None`
/// when the decoded bytes are not UTF-8.
///
/// # Examples
///
/// ```
/// use sessgate_auth::cookie::decode_cookie_value;
///
/// assert_eq!(decode_cookie_value("s%3Aabc.def").as_deref(), Some("s:abc.def"));
/// assert_eq!(decode_cookie_value(" \"s:abc\" ").as_deref(), Some("s:abc"));
/// ```
#[must_use]
pub fn decode_cookie_value(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let trimmed = decoded.trim();

    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(trimmed);

    Some(unquoted.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_percent_decode() {
        assert_eq!(
            decode_cookie_value("s%3Axyz123.abc%2Bdef").as_deref(),
            Some("s:xyz123.abc+def")
        );
    }

    #[test]
    fn test_should_keep_plus_sign() {
        assert_eq!(decode_cookie_value("a+b").as_deref(), Some("a+b"));
    }

    #[test]
    fn test_should_trim_whitespace() {
        assert_eq!(decode_cookie_value("  s:abc \t").as_deref(), Some("s:abc"));
        assert_eq!(decode_cookie_value("%20s:abc%20").as_deref(), Some("s:abc"));
    }

    #[test]
    fn test_should_strip_enclosing_quotes() {
        assert_eq!(decode_cookie_value("\"s:abc\"").as_deref(), Some("s:abc"));
        assert_eq!(decode_cookie_value("%22s:abc%22").as_deref(), Some("s:abc"));
    }

    #[test]
    fn test_should_strip_only_one_pair_of_quotes() {
        assert_eq!(decode_cookie_value("\"\"s:abc\"\"").as_deref(), Some("\"s:abc\""));
    }

    #[test]
    fn test_should_leave_unbalanced_quote() {
        assert_eq!(decode_cookie_value("\"s:abc").as_deref(), Some("\"s:abc"));
        assert_eq!(decode_cookie_value("\"").as_deref(), Some("\""));
    }

    #[test]
    fn test_should_reject_invalid_utf8() {
        assert_eq!(decode_cookie_value("s:%FF%FE"), None);
    }

    #[test]
    fn test_should_pass_malformed_escape_through() {
        assert_eq!(decode_cookie_value("s:100%").as_deref(), Some("s:100%"));
    }
}
