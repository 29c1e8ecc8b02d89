//! Word-list profanity filter.
//!
//! Matching is case-insensitive and whole-word; multi-word entries match
//! runs of consecutive words. Common look-alike characters are folded before
//! lookup so `sh1t` and `$hit` hit the same entry as `shit`.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

/// Replacement written over every flagged word or phrase.
pub const CENSOR_MASK: &str = "****";

const BUNDLED_WORDS: &str = include_str!("../resources/censor_words.txt");

#[derive(Debug, Clone, Default)]
pub struct ProfanityFilter {
    words: HashSet<String>,
    max_phrase_words: usize,
}

/// A word of the input text: byte span plus its folded lookup key.
struct Token {
    start: usize,
    end: usize,
    key: String,
}

impl ProfanityFilter {
    /// Filter backed by the word list shipped with this crate.
    pub fn bundled() -> Self {
        Self::from_word_list(BUNDLED_WORDS)
    }

    /// A filter that never changes its input.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Parse a newline-separated word list. Blank lines and `#` comments are
    /// skipped.
    pub fn from_word_list(list: &str) -> Self {
        let words: HashSet<String> = list
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| {
                l.split_whitespace()
                    .map(fold_word)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        let max_phrase_words = words
            .iter()
            .map(|w| w.split(' ').count())
            .max()
            .unwrap_or(0);
        Self {
            words,
            max_phrase_words,
        }
    }

    /// Load the word list at `path`, or the bundled list when `path` is
    /// `None`. An unreadable file yields a pass-through filter.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            let filter = Self::bundled();
            info!(words = filter.len(), "loaded bundled censor word list");
            return filter;
        };
        match std::fs::read_to_string(path) {
            Ok(list) => {
                let filter = Self::from_word_list(&list);
                info!(path = %path.display(), words = filter.len(), "loaded censor word list");
                filter
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "censor word list unavailable; profanity filtering disabled"
                );
                Self::disabled()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Return `text` with every flagged word or phrase replaced by
    /// [`CENSOR_MASK`]. Text without matches comes back unchanged, so callers
    /// detect profanity by comparing input and output.
    pub fn censor(&self, text: &str) -> String {
        if self.words.is_empty() {
            return text.to_owned();
        }

        let tokens = tokenize(text);
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut i = 0;
        while i < tokens.len() {
            match self.longest_match(&tokens[i..]) {
                Some(n) => {
                    out.push_str(&text[cursor..tokens[i].start]);
                    out.push_str(CENSOR_MASK);
                    cursor = tokens[i + n - 1].end;
                    i += n;
                }
                None => i += 1,
            }
        }
        out.push_str(&text[cursor..]);
        out
    }

    fn longest_match(&self, tokens: &[Token]) -> Option<usize> {
        let longest = self.max_phrase_words.min(tokens.len());
        (1..=longest).rev().find(|&n| {
            let key = tokens[..n]
                .iter()
                .map(|t| t.key.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            self.words.contains(&key)
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '@' || c == '$'
}

fn fold_char(c: char) -> char {
    match c {
        '@' | '4' => 'a',
        '3' => 'e',
        '1' => 'i',
        '0' => 'o',
        '$' | '5' => 's',
        '7' => 't',
        c => c,
    }
}

fn fold_word(word: &str) -> String {
    word.chars().flat_map(char::to_lowercase).map(fold_char).collect()
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (idx, c) in text.char_indices() {
        match (is_word_char(c), start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                tokens.push(Token {
                    start: s,
                    end: idx,
                    key: fold_word(&text[s..idx]),
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            start: s,
            end: text.len(),
            key: fold_word(&text[s..]),
        });
    }
    tokens
}

#[cfg(test)]
mod test {
    use super::*;
    use tracing_test::traced_test;

    fn filter() -> ProfanityFilter {
        ProfanityFilter::from_word_list("# test list\nshit\ndamn\n\nson of a bitch\nbitch\n")
    }

    #[test]
    fn clean_text_is_unchanged() {
        let f = filter();
        assert_eq!(f.censor("Great movie!"), "Great movie!");
        assert_eq!(f.censor(""), "");
        // Substrings of longer words are not flagged.
        assert_eq!(f.censor("Amsterdam is shitake-free"), "Amsterdam is shitake-free");
    }

    #[test]
    fn flagged_words_are_masked_case_insensitively() {
        let f = filter();
        assert_eq!(f.censor("Oh SHIT, that ending"), "Oh ****, that ending");
        assert_eq!(f.censor("damn damn"), "**** ****");
    }

    #[test]
    fn look_alike_characters_are_folded() {
        let f = filter();
        assert_eq!(f.censor("what a sh1t plot"), "what a **** plot");
        assert_eq!(f.censor("$hit happens"), "**** happens");
    }

    #[test]
    fn exclamation_mark_ends_a_word() {
        let f = filter();
        assert_eq!(f.censor("damn!"), "****!");
        assert_eq!(f.censor("sh!t"), "sh!t");
    }

    #[test]
    fn longest_phrase_wins() {
        let f = filter();
        assert_eq!(f.censor("you son of a bitch!"), "you ****!");
        assert_eq!(f.censor("a bitch"), "a ****");
    }

    #[test]
    fn multibyte_text_keeps_boundaries() {
        let f = filter();
        assert_eq!(f.censor("café damn ünïcode"), "café **** ünïcode");
    }

    #[test]
    fn bundled_list_flags_common_words() {
        let f = ProfanityFilter::bundled();
        assert!(!f.is_empty());
        assert_ne!(f.censor("this is shit"), "this is shit");
        assert_eq!(f.censor("hello"), "hello");
    }

    #[test]
    fn disabled_filter_passes_through() {
        let f = ProfanityFilter::disabled();
        assert_eq!(f.censor("shit"), "shit");
    }

    #[test]
    #[traced_test]
    fn missing_word_list_disables_filtering() {
        let f = ProfanityFilter::load(Some(Path::new("/nonexistent/censor_words.txt")));
        assert!(f.is_empty());
        assert_eq!(f.censor("damn"), "damn");
        assert!(logs_contain("profanity filtering disabled"));
    }

    #[test]
    fn word_list_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "frak\n").unwrap();
        let f = ProfanityFilter::load(Some(&path));
        assert_eq!(f.len(), 1);
        assert_eq!(f.censor("frak you"), "**** you");
    }
}
