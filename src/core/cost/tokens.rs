/// Approximate the number of model tokens in `text`.
///
/// Counts characters and assumes roughly four per token, never returning
/// less than 1. This is a heuristic, not a tokenizer.
pub fn estimate_tokens(text: &str) -> u64 {
    let chars = text.chars().count() as u64;
    (chars / 4).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_one_token() {
        assert_eq!(estimate_tokens(""), 1);
    }

    #[test]
    fn short_strings_floor_to_one() {
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
    }

    #[test]
    fn divides_by_four_and_floors() {
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens("abcdefghijk"), 2);
        assert_eq!(estimate_tokens(&"x".repeat(4000)), 1000);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 8 characters, 16 bytes
        assert_eq!(estimate_tokens("éééééééé"), 2);
    }
}
