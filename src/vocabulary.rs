//! Pretrained word vectors keyed by word.
//!
//! The resource is a text file with one `<word> <float> <float> ...` entry per
//! line (the GloVe layout). Stopwords never enter the store, and every vector
//! shares the dimensionality of the first parsed line.

use crate::config::Number;
use crate::error::{DocvecError, Result};
use crate::stopwords::StopWords;
use memmap2::Mmap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    vectors: HashMap<String, Vec<Number>>,
    dimensions: usize,
}

impl Vocabulary {
    /// Memory-maps the file at `path` and parses it in parallel.
    pub fn open<P: AsRef<Path>>(path: P, stopwords: &StopWords) -> Result<Self> {
        let start = Instant::now();
        let file = File::open(path.as_ref())?;

        // Mapping a zero-length file fails on some platforms.
        if file.metadata()?.len() == 0 {
            tracing::warn!("Vocabulary file {} is empty", path.as_ref().display());
            return Ok(Self::default());
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let vocabulary = Self::parse(&mmap, stopwords)?;
        tracing::info!(
            "Loaded {} word vectors ({} dimensions) from {} in {:?}",
            vocabulary.len(),
            vocabulary.dimensions(),
            path.as_ref().display(),
            start.elapsed()
        );
        Ok(vocabulary)
    }

    /// Parses raw vocabulary bytes. Invalid UTF-8 is replaced, not rejected.
    pub fn parse(bytes: &[u8], stopwords: &StopWords) -> Result<Self> {
        let lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
        let parsed: Vec<_> = lines
            .par_iter()
            .enumerate()
            .map(|(i, raw)| {
                let line = i + 1;
                (line, parse_line(line, &String::from_utf8_lossy(raw), stopwords))
            })
            .collect();

        Self::from_entries(parsed)
    }

    /// Reads entries from any line source.
    pub fn load<R: BufRead>(reader: R, stopwords: &StopWords) -> Result<Self> {
        let entries = reader.lines().enumerate().map(|(i, line)| {
            let entry = match line {
                Ok(line) => parse_line(i + 1, &line, stopwords),
                Err(e) => Err(e.into()),
            };
            (i + 1, entry)
        });
        Self::from_entries(entries)
    }

    fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, Result<Option<(String, Vec<Number>)>>)>,
    {
        let mut vectors = HashMap::new();
        let mut dimensions = None;

        for (line, entry) in entries {
            let Some((word, vector)) = entry? else {
                continue;
            };
            match dimensions {
                None => dimensions = Some(vector.len()),
                Some(expected) if expected != vector.len() => {
                    return Err(DocvecError::MalformedVectorLine {
                        line,
                        reason: format!(
                            "expected {} components for '{}', found {}",
                            expected,
                            word,
                            vector.len()
                        ),
                    });
                }
                Some(_) => {}
            }
            vectors.insert(word, vector);
        }

        Ok(Self {
            vectors,
            dimensions: dimensions.unwrap_or(0),
        })
    }

    pub fn get(&self, word: &str) -> Option<&[Number]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }

    /// Dimensionality shared by every vector; 0 for an empty store.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.vectors.keys().map(String::as_str)
    }
}

/// `Ok(None)` for blank lines and stopwords. Stopword components are never parsed.
fn parse_line(
    line: usize,
    text: &str,
    stopwords: &StopWords,
) -> Result<Option<(String, Vec<Number>)>> {
    let mut parts = text.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    if stopwords.contains(word) {
        return Ok(None);
    }

    let vector = parts
        .map(|token| {
            token
                .parse::<Number>()
                .map_err(|e| DocvecError::MalformedVectorLine {
                    line,
                    reason: format!("component '{}' is not a number ({})", token, e),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    if vector.is_empty() {
        return Err(DocvecError::MalformedVectorLine {
            line,
            reason: format!("word '{}' has no components", word),
        });
    }

    Ok(Some((word.to_string(), vector)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "the 0.1 0.2 0.3\n\
                          economy 1.0 0.5 -0.25\n\
                          market 0.75 0.5 0.0\n\
                          \n\
                          and 9 9 9\n";

    #[test]
    fn test_load_skips_stopwords_and_blank_lines() {
        let vocab = Vocabulary::load(Cursor::new(SAMPLE), &StopWords::english()).unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.dimensions(), 3);
        assert!(!vocab.contains("the"));
        assert!(!vocab.contains("and"));
        assert_eq!(vocab.get("economy"), Some(&[1.0, 0.5, -0.25][..]));
        assert!(vocab.words().all(|w| vocab.get(w).unwrap().len() == 3));
    }

    #[test]
    fn test_parse_matches_load() {
        let stop = StopWords::english();
        let from_bytes = Vocabulary::parse(SAMPLE.as_bytes(), &stop).unwrap();
        let from_reader = Vocabulary::load(Cursor::new(SAMPLE), &stop).unwrap();
        assert_eq!(from_bytes.len(), from_reader.len());
        assert_eq!(from_bytes.get("market"), from_reader.get("market"));
    }

    #[test]
    fn test_malformed_component() {
        let text = "economy 1.0 0.5\nmarket 0.75 oops\n";
        let err = Vocabulary::parse(text.as_bytes(), &StopWords::english()).unwrap_err();
        match err {
            DocvecError::MalformedVectorLine { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stopword_line_is_never_parsed() {
        let text = "the not numbers at all\neconomy 1.0 2.0\n";
        let vocab = Vocabulary::parse(text.as_bytes(), &StopWords::english()).unwrap();
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_dimension_mismatch() {
        let text = "economy 1.0 0.5 0.1\nmarket 0.75 0.5\n";
        assert!(matches!(
            Vocabulary::parse(text.as_bytes(), &StopWords::english()),
            Err(DocvecError::MalformedVectorLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_word_without_components() {
        let text = "economy\n";
        assert!(matches!(
            Vocabulary::load(Cursor::new(text), &StopWords::english()),
            Err(DocvecError::MalformedVectorLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_later_duplicate_replaces_earlier() {
        let text = "economy 1.0 1.0\neconomy 2.0 2.0\n";
        let vocab = Vocabulary::parse(text.as_bytes(), &StopWords::english()).unwrap();
        assert_eq!(vocab.get("economy"), Some(&[2.0, 2.0][..]));
    }

    #[test]
    fn test_crlf_and_invalid_utf8() {
        let mut bytes = b"economy 1.0 2.0\r\n".to_vec();
        bytes.extend_from_slice(b"caf\xe9 3.0 4.0\n");
        let vocab = Vocabulary::parse(&bytes, &StopWords::english()).unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get("economy"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        let vocab = Vocabulary::open(&path, &StopWords::english()).unwrap();
        assert_eq!(vocab.len(), 2);

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "").unwrap();
        let vocab = Vocabulary::open(&empty, &StopWords::english()).unwrap();
        assert!(vocab.is_empty());
        assert_eq!(vocab.dimensions(), 0);
    }
}
