use crate::config::Number;
use crate::corpus::CorpusIndex;
use crate::document::{Document, NeighborSummary};
use crate::error::{DocvecError, Result};
use crate::vector_ops::euclidean_distance_simd;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct DistancePair<'a> {
    pub distance: Number,
    pub document: &'a Document,
}

/// Euclidean distance between two documents, `None` if either has no embedding.
pub fn distance(a: &Document, b: &Document) -> Option<Number> {
    euclidean_distance_simd(a.embedding.as_deref()?, b.embedding.as_deref()?)
}

/// Brute-force nearest neighbors over one corpus snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine<'a> {
    corpus: &'a CorpusIndex,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(corpus: &'a CorpusIndex) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &'a CorpusIndex {
        self.corpus
    }

    /// Distance from `document` to every eligible candidate, in corpus order.
    ///
    /// The query itself (matched by identity) and documents without an
    /// embedding are left out.
    pub fn distances(&self, document: &Document) -> Result<Vec<DistancePair<'a>>> {
        if document.embedding.is_none() {
            return Err(DocvecError::EmptyEmbedding);
        }

        let pairs = self
            .corpus
            .documents()
            .par_iter()
            .filter(|candidate| candidate.id != document.id)
            .filter_map(|candidate| {
                distance(document, candidate).map(|distance| DistancePair {
                    distance,
                    document: candidate,
                })
            })
            .collect();
        Ok(pairs)
    }

    /// Candidates by ascending distance; equal distances keep corpus order.
    pub fn ranked(&self, document: &Document) -> Result<Vec<DistancePair<'a>>> {
        let mut pairs = self.distances(document)?;
        pairs.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(pairs)
    }

    /// The `n` nearest other documents.
    ///
    /// Fails with [`DocvecError::InsufficientCorpus`] when fewer than `n`
    /// candidates are eligible.
    pub fn recommend(&self, document: &Document, n: usize) -> Result<Vec<NeighborSummary>> {
        let ranked = self.ranked(document)?;
        if ranked.len() < n {
            return Err(DocvecError::InsufficientCorpus {
                requested: n,
                available: ranked.len(),
            });
        }
        Ok(Self::sort_and_limit_results(ranked, n))
    }

    /// Like [`recommend`](Self::recommend) but returns what is available
    /// instead of failing on a small corpus.
    pub fn recommend_up_to(&self, document: &Document, n: usize) -> Result<Vec<NeighborSummary>> {
        Ok(Self::sort_and_limit_results(self.ranked(document)?, n))
    }

    fn sort_and_limit_results(ranked: Vec<DistancePair<'_>>, limit: usize) -> Vec<NeighborSummary> {
        ranked
            .into_iter()
            .take(limit)
            .map(|pair| pair.document.summary())
            .collect()
    }
}
