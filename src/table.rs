use crate::corpus::CorpusIndex;
use crate::document::{DocumentId, NeighborSummary};
use crate::error::DocvecError;
use crate::recommend::RecommendationEngine;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Per-document neighbor lists for a whole corpus snapshot.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RecommendationTable {
    entries: BTreeMap<DocumentId, Vec<NeighborSummary>>,
}

/// Counts gathered while building a [`RecommendationTable`].
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub documents: usize,
    /// Lists holding the full `top_n` neighbors.
    pub full: usize,
    /// Lists cut short because too few documents were eligible.
    pub short: usize,
    /// Documents without an embedding; their lists are empty.
    pub empty: usize,
    pub recommendations: usize,
}

enum Outcome {
    Full,
    Short,
    Empty,
}

impl RecommendationTable {
    /// Runs the engine for every document in parallel. Every document gets a
    /// key, even when its list ends up empty.
    pub fn build(corpus: &CorpusIndex, top_n: usize) -> (Self, BuildReport) {
        let start = Instant::now();
        let engine = RecommendationEngine::new(corpus);

        let rows: Vec<(DocumentId, Vec<NeighborSummary>, Outcome)> = corpus
            .documents()
            .par_iter()
            .map(|document| {
                let (neighbors, outcome) = match engine.recommend(document, top_n) {
                    Ok(neighbors) => (neighbors, Outcome::Full),
                    Err(DocvecError::InsufficientCorpus {
                        requested,
                        available,
                    }) => {
                        tracing::debug!(
                            "Only {} of {} neighbors available for '{}'",
                            available,
                            requested,
                            document.id
                        );
                        let neighbors = engine
                            .recommend_up_to(document, top_n)
                            .unwrap_or_default();
                        (neighbors, Outcome::Short)
                    }
                    Err(e) => {
                        tracing::debug!("No recommendations for '{}': {}", document.id, e);
                        (Vec::new(), Outcome::Empty)
                    }
                };
                (document.id.clone(), neighbors, outcome)
            })
            .collect();

        let mut report = BuildReport {
            documents: rows.len(),
            ..Default::default()
        };
        let mut entries = BTreeMap::new();
        for (id, neighbors, outcome) in rows {
            match outcome {
                Outcome::Full => report.full += 1,
                Outcome::Short => report.short += 1,
                Outcome::Empty => report.empty += 1,
            }
            report.recommendations += neighbors.len();
            entries.insert(id, neighbors);
        }

        if report.short > 0 {
            tracing::warn!(
                "{} documents have fewer than {} recommendations",
                report.short,
                top_n
            );
        }
        tracing::info!(
            "Computed {} recommendations for {} documents in {:?}",
            report.recommendations,
            report.documents,
            start.elapsed()
        );

        (Self { entries }, report)
    }

    pub fn get(&self, id: &DocumentId) -> Option<&[NeighborSummary]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &[NeighborSummary])> + '_ {
        self.entries.iter().map(|(id, list)| (id, list.as_slice()))
    }
}
