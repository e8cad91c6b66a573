//! Post slugs

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\-]+").unwrap();
    static ref DASHES: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Turn a post title into a file and URL slug.
///
/// Whitespace runs become `-`, anything other than ASCII word characters
/// and `-` is dropped, repeated dashes collapse.
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let dashed = WHITESPACE.replace_all(&lower, "-");
    let cleaned = NON_WORD.replace_all(&dashed, "");
    DASHES.replace_all(&cleaned, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust   is   fun  "), "rust-is-fun");
        assert_eq!(slugify("What's new in 2024?"), "whats-new-in-2024");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_collapses_dashes() {
        assert_eq!(slugify("A -- B"), "a-b");
        assert_eq!(slugify("Café & Crème"), "caf-crme");
    }
}
