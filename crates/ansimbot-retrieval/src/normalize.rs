//! Text normalization for matching.

/// Canonicalize text before any lexical comparison: trim, then strip every
/// internal whitespace character.
///
/// `"이상 거래 신고"` → `"이상거래신고"`. Empty input yields an empty
/// string. Pure and deterministic; the index and the query path must both
/// run through this function so vocabulary alignment is exact.
pub fn normalize(text: &str) -> String {
    text.trim().chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_all_whitespace() {
        assert_eq!(normalize("  이상 거래 신고  "), "이상거래신고");
        assert_eq!(normalize("a\tb\nc"), "abc");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn test_idempotent() {
        for s in ["이상 거래", "  x  y  ", "", "한글만", "mixed 한글 text"] {
            assert_eq!(normalize(&normalize(s)), normalize(s));
        }
    }
}
