//! Pointer grammar for data-model paths.
//!
//! A pointer is a `/`-delimited sequence of segments. A segment may hold any
//! character except `/` and `~`; a `~` is only allowed as part of the escapes
//! `~0` and `~1`. The empty string addresses the whole data model.

use std::sync::LazyLock;

use regex::Regex;

static POINTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:/(?:[^~/]|~[01])*)*$").expect("pointer pattern compiles")
});

/// Returns true if `pointer` matches the pointer grammar.
///
/// # Example
///
/// ```rust
/// use a2ui_guard::is_valid_pointer;
///
/// assert!(is_valid_pointer(""));
/// assert!(is_valid_pointer("/user/name"));
/// assert!(is_valid_pointer("/a~0b/c~1d"));
///
/// assert!(!is_valid_pointer("user/name"));
/// assert!(!is_valid_pointer("/bad/~2"));
/// ```
pub fn is_valid_pointer(pointer: &str) -> bool {
    POINTER_RE.is_match(pointer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pointer_is_valid() {
        assert!(is_valid_pointer(""));
    }

    #[test]
    fn test_plain_segments() {
        assert!(is_valid_pointer("/"));
        assert!(is_valid_pointer("/a/b"));
        assert!(is_valid_pointer("/items/0/title"));
    }

    #[test]
    fn test_empty_segments_are_allowed_after_leading_slash() {
        assert!(is_valid_pointer("//"));
        assert!(is_valid_pointer("/a//b"));
    }

    #[test]
    fn test_escapes() {
        assert!(is_valid_pointer("/a~0b/c~1d"));
        assert!(!is_valid_pointer("/invalid/escape/~2"));
        assert!(!is_valid_pointer("/trailing~"));
        assert!(!is_valid_pointer("/~"));
    }

    #[test]
    fn test_missing_leading_slash() {
        assert!(!is_valid_pointer("invalid//path"));
        assert!(!is_valid_pointer("invalid path with spaces"));
        assert!(!is_valid_pointer("a"));
    }

    #[test]
    fn test_non_ascii_segments() {
        assert!(is_valid_pointer("/ünïcødé/名前"));
    }

    #[test]
    fn test_newline_does_not_end_match() {
        assert!(!is_valid_pointer("/a\nb~"));
        assert!(is_valid_pointer("/a\nb"));
    }

    #[test]
    fn test_pattern_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || is_valid_pointer(&format!("/items/{}", i))))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
