use crate::document::{split_title, Document, DocumentId, RawDocument};
use crate::embedding::DocumentEmbedder;
use crate::error::{DocvecError, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

/// Every document of one corpus snapshot, in input order, unique by identity.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    documents: Vec<Document>,
    positions: HashMap<DocumentId, usize>,
}

impl CorpusIndex {
    /// Embeds each body (never the title) in parallel.
    ///
    /// Documents without an embedding are kept with `embedding: None`.
    /// Fails with [`DocvecError::IdentityCollision`] before any embedding work.
    pub fn build(raw: Vec<RawDocument>, embedder: &DocumentEmbedder<'_>) -> Result<Self> {
        let start = Instant::now();
        let positions = index_positions(raw.iter().map(|r| &r.id))?;

        let documents: Vec<Document> = raw
            .into_par_iter()
            .map(|RawDocument { id, text }| {
                let (title, body) = split_title(&text);
                let embedding = match embedder.embed(&body) {
                    Ok(vector) => Some(vector),
                    Err(DocvecError::EmptyEmbedding) => {
                        tracing::warn!("No vocabulary words in '{}', skipping its embedding", id);
                        None
                    }
                    Err(e) => {
                        tracing::warn!("Failed to embed '{}': {}", id, e);
                        None
                    }
                };
                Document {
                    id,
                    title,
                    body,
                    embedding,
                }
            })
            .collect();

        let corpus = Self {
            documents,
            positions,
        };
        tracing::info!(
            "Indexed {} documents ({} without embedding) in {:?}",
            corpus.len(),
            corpus.skipped_count(),
            start.elapsed()
        );
        Ok(corpus)
    }

    /// Wraps already-built documents.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self> {
        let positions = index_positions(documents.iter().map(|d| &d.id))?;
        Ok(Self {
            documents,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, position: usize) -> Option<&Document> {
        self.documents.get(position)
    }

    pub fn position(&self, id: &DocumentId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn find(&self, id: &DocumentId) -> Option<&Document> {
        self.position(id).map(|i| &self.documents[i])
    }

    pub fn embedded_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.embedding.is_some())
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.len() - self.embedded_count()
    }
}

fn index_positions<'a, I>(ids: I) -> Result<HashMap<DocumentId, usize>>
where
    I: IntoIterator<Item = &'a DocumentId>,
{
    let mut positions = HashMap::new();
    for (i, id) in ids.into_iter().enumerate() {
        if positions.insert(id.clone(), i).is_some() {
            return Err(DocvecError::IdentityCollision {
                topic: id.topic.clone(),
                file_name: id.file_name.clone(),
            });
        }
    }
    Ok(positions)
}
