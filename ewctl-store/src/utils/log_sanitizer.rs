//! Log sanitization utilities
//!
//! Keeps API tokens and large response bodies out of debug/error logs.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Characters kept at each end of a masked secret.
const MASK_KEEP: usize = 4;

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Truncate a string for safe logging.
///
/// Strings within the limit are returned unchanged, longer ones keep their
/// first `TRUNCATE_LIMIT` bytes (on a char boundary) plus a length suffix.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret for display: `****` when it has 8 characters or fewer,
/// otherwise the first and last four characters around `****`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= MASK_KEEP * 2 {
        return "****".to_string();
    }
    let head: String = chars[..MASK_KEEP].iter().collect();
    let tail: String = chars[chars.len() - MASK_KEEP..].iter().collect();
    format!("{head}****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        let s = "SELECT 1";
        assert_eq!(truncate_for_log(s), s);
    }

    #[test]
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 10);
        let result = truncate_for_log(&s);
        assert!(result.ends_with(&format!("total {} bytes]", TRUNCATE_LIMIT + 10)));
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "ç".repeat(200);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total 400 bytes]"));
    }

    #[test]
    fn mask_short_secret() {
        assert_eq!(mask_secret(""), "****");
        assert_eq!(mask_secret("12345678"), "****");
    }

    #[test]
    fn mask_long_secret() {
        assert_eq!(mask_secret("abcd1234efgh"), "abcd****efgh");
    }
}
