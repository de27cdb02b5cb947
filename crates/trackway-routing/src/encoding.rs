//! Percent-encoding for path segments and generated query strings.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in query keys and values.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Decodes a raw path segment. Invalid UTF-8 is replaced, not rejected.
pub fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Encodes a value so it occupies exactly one path segment.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Encodes `key=value` pairs joined with `&`.
///
/// ```
/// use trackway_routing::encoding::urlencode;
///
/// let qs = urlencode([("page", "2"), ("q", "rust & routing")]);
/// assert_eq!(qs, "page=2&q=rust%20%26%20routing");
/// ```
pub fn urlencode<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY),
                utf8_percent_encode(value, QUERY)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_roundtrip() {
        for value in ["plain", "with space", "a/b", "100%", "ünï", "q?x#y"] {
            let encoded = encode_segment(value);
            assert!(!encoded.contains('/'));
            assert_eq!(decode_segment(&encoded), value);
        }
    }

    #[test]
    fn test_encode_segment_leaves_safe_chars() {
        assert_eq!(encode_segment("hello-world_1.2~x"), "hello-world_1.2~x");
        assert_eq!(encode_segment("a b"), "a%20b");
    }

    #[test]
    fn test_decode_plus_is_literal() {
        assert_eq!(decode_segment("a+b"), "a+b");
    }

    #[test]
    fn test_urlencode_empty() {
        assert_eq!(urlencode(std::iter::empty()), "");
    }

    #[test]
    fn test_urlencode_escapes_separators() {
        assert_eq!(urlencode([("a&b", "c=d")]), "a%26b=c%3Dd");
    }
}
