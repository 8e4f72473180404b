//! Redirect URI construction for rejected requests.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the redirect URI for a rejected request.
///
/// When `next_param` is set, the request path is percent-encoded and appended
/// as a query parameter, joined with `&` if `target` already has a query and
/// `?` otherwise.
///
/// # Examples
///
/// ```
/// use sessgate_auth::redirect::build_redirect_uri;
///
/// assert_eq!(build_redirect_uri("/login", Some("next"), "/dashboard"), "/login?next=%2Fdashboard");
/// assert_eq!(build_redirect_uri("/login", None, "/dashboard"), "/login");
/// ```
#[must_use]
pub fn build_redirect_uri(target: &str, next_param: Option<&str>, path: &str) -> String {
    let Some(param) = next_param else {
        return target.to_owned();
    };

    let separator = if target.contains('?') { '&' } else { '?' };
    let encoded = utf8_percent_encode(path, URI_COMPONENT);
    format!("{target}{separator}{param}={encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_append_next_with_question_mark() {
        assert_eq!(
            build_redirect_uri("/login", Some("next"), "/dashboard"),
            "/login?next=%2Fdashboard"
        );
    }

    #[test]
    fn test_should_append_next_with_ampersand_when_query_present() {
        assert_eq!(
            build_redirect_uri("/login?lang=en", Some("next"), "/dashboard"),
            "/login?lang=en&next=%2Fdashboard"
        );
    }

    #[test]
    fn test_should_use_custom_param_name() {
        assert_eq!(
            build_redirect_uri("https://auth.example.com/", Some("returnTo"), "/a"),
            "https://auth.example.com/?returnTo=%2Fa"
        );
    }

    #[test]
    fn test_should_encode_path_query() {
        assert_eq!(
            build_redirect_uri("/login", Some("next"), "/search?q=a b&x=1"),
            "/login?next=%2Fsearch%3Fq%3Da%20b%26x%3D1"
        );
    }

    #[test]
    fn test_should_leave_unreserved_marks_unescaped() {
        assert_eq!(
            build_redirect_uri("/login", Some("next"), "/a-b_c.d!e~f*g'h(i)"),
            "/login?next=%2Fa-b_c.d!e~f*g'h(i)"
        );
    }

    #[test]
    fn test_should_encode_non_ascii_as_utf8() {
        assert_eq!(
            build_redirect_uri("/login", Some("next"), "/café"),
            "/login?next=%2Fcaf%C3%A9"
        );
    }

    #[test]
    fn test_should_return_target_without_next() {
        assert_eq!(build_redirect_uri("/login", None, "/dashboard"), "/login");
    }
}
