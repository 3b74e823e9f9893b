//! Text normalization for embedding.
//!
//! Lowercases, blanks out ASCII punctuation, digits and CR/TAB/LF one
//! character at a time, splits on whitespace, then drops short tokens and
//! stopwords. Duplicates are kept because frequency weights the centroid.

use crate::stopwords::StopWords;

/// Tokens shorter than this many characters are dropped.
pub const MIN_TOKEN_CHARS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    stopwords: &'a StopWords,
}

impl<'a> Tokenizer<'a> {
    pub fn new(stopwords: &'a StopWords) -> Self {
        Self { stopwords }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if is_separator(c) { ' ' } else { c })
            .collect();

        normalized
            .split_whitespace()
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|token| !self.stopwords.contains(token))
            .map(str::to_owned)
            .collect()
    }
}

fn is_separator(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_ascii_digit() || matches!(c, '\r' | '\t' | '\n')
}
