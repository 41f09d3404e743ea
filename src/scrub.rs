use std::borrow::Cow;

/// Drop every byte sequence that is not valid UTF-8.
///
/// Unlike [`String::from_utf8_lossy`], invalid sequences are removed rather than
/// replaced with U+FFFD. Valid input is returned borrowed. Never fails.
///
/// # Examples
///
/// ```
/// use git_diff_parser::scrub_string;
///
/// assert_eq!(scrub_string(b"caf\xc3\xa9"), "café");
/// assert_eq!(scrub_string(b"ab\xffcd"), "abcd");
/// ```
pub fn scrub_string(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()),
    }
}
