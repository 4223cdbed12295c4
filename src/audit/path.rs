//! Request path helpers.

/// Percent-decode a request path as UTF-8.
///
/// `+` is left alone (it only means space in form data, not in paths) and
/// invalid UTF-8 sequences become U+FFFD.
pub fn decode_path(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

/// Last non-empty segment of an already decoded path.
pub fn file_name(decoded: &str) -> Option<&str> {
    decoded.split('/').filter(|s| !s.is_empty()).last()
}
