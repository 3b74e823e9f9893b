use crate::config::Number;
use crate::error::{DocvecError, Result};
use crate::tokenizer::Tokenizer;
use crate::vector_ops::{add_assign, divide_in_place};
use crate::vocabulary::Vocabulary;

/// Turns text into the centroid of its known word vectors.
#[derive(Debug, Clone, Copy)]
pub struct DocumentEmbedder<'a> {
    tokenizer: Tokenizer<'a>,
    vocabulary: &'a Vocabulary,
}

impl<'a> DocumentEmbedder<'a> {
    pub fn new(tokenizer: Tokenizer<'a>, vocabulary: &'a Vocabulary) -> Self {
        Self {
            tokenizer,
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &'a Vocabulary {
        self.vocabulary
    }

    /// Mean of the vectors of every token found in the vocabulary.
    ///
    /// Unknown tokens are skipped. Fails with [`DocvecError::EmptyEmbedding`]
    /// when no token matches.
    pub fn embed(&self, text: &str) -> Result<Vec<Number>> {
        let mut centroid = vec![0.0; self.vocabulary.dimensions()];
        let mut matched = 0;

        for token in self.tokenizer.tokenize(text) {
            if let Some(vector) = self.vocabulary.get(&token) {
                add_assign(&mut centroid, vector);
                matched += 1;
            }
        }

        if matched == 0 {
            return Err(DocvecError::EmptyEmbedding);
        }
        divide_in_place(&mut centroid, matched);
        Ok(centroid)
    }
}
