//! Pre-inference text filtering: the English gate and the normalizer.
//!
//! The gate is a heuristic, not language detection: it accepts exactly the
//! strings whose characters all fall in the ASCII range, so romanized
//! non-English text passes. The normalizer lower-cases, strips stop-words,
//! then strips emoji; punctuation and digits are left alone.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Common low-information English words removed before classification.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does",
    "doesn't", "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had",
    "hadn't", "has", "hasn't", "have", "haven't", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "into", "is", "isn't", "it", "its", "itself",
    "let's", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off",
    "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "same", "shan't", "she", "should", "shouldn't", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "were",
    "weren't", "what", "when", "where", "which", "while", "who", "whom", "why", "with", "won't",
    "would", "wouldn't", "you", "your", "yours", "yourself", "yourselves",
];

lazy_static! {
    static ref STOPWORD_SET: HashSet<&'static str> = STOPWORDS.iter().copied().collect();
    // Pictographs plus the joiners/selectors that glue multi-codepoint emoji.
    static ref EMOJI_RE: Regex =
        Regex::new(r"[\p{Extended_Pictographic}\p{Emoji_Presentation}\u{FE0F}\u{200D}]")
            .expect("emoji pattern is valid");
}

/// Returns true when `text` contains only characters in the ASCII range
/// (0x00–0x7F). The empty string passes trivially.
pub fn is_english_text(text: &str) -> bool {
    text.is_ascii()
}

/// Lower-cases `text`, removes stop-words, then removes emoji.
///
/// Tokens are split on whitespace and rejoined with single spaces; within a
/// token everything except emoji is preserved, so punctuation attached to a
/// word keeps that word from matching the stop-word list.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_stopwords = remove_stopwords(&lowered);
    remove_emojis(&without_stopwords)
}

fn remove_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !STOPWORD_SET.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn remove_emojis(text: &str) -> String {
    EMOJI_RE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_accepts_ascii() {
        assert!(is_english_text("Unable to run Speech2Text example in documentation"));
        assert!(is_english_text("punctuation, digits 123, and symbols #!?"));
    }

    #[test]
    fn gate_accepts_empty_string() {
        assert!(is_english_text(""));
    }

    #[test]
    fn gate_rejects_non_ascii() {
        assert!(!is_english_text("请运行这个例子"));
        assert!(!is_english_text("mostly ascii with one é"));
        assert!(!is_english_text("🏷"));
    }

    #[test]
    fn normalize_lowercases() {
        assert_eq!(normalize("Speech2Text FAILS"), "speech2text fails");
    }

    #[test]
    fn normalize_removes_stopwords() {
        assert_eq!(
            normalize("Unable to run Speech2Text example in documentation"),
            "unable run speech2text example documentation"
        );
    }

    #[test]
    fn normalize_removes_emojis() {
        // "on" is a stop-word; the pictograph leaves its joining space behind
        assert_eq!(normalize("crash 💥 on startup"), "crash  startup");
    }

    #[test]
    fn normalize_preserves_punctuation_and_digits() {
        assert_eq!(normalize("error: code 42!"), "error: code 42!");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize("The build FAILS on Windows 11");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_empty_string() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t"), "");
    }

    #[test]
    fn stopword_attached_punctuation_is_kept() {
        // "the," is not a bare stop-word token, so it survives
        assert_eq!(normalize("the, the"), "the,");
    }
}
