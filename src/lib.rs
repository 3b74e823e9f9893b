//! Document recommendations from averaged pretrained word vectors.
//!
//! Each document body becomes the centroid of its known word vectors, and
//! every document is recommended its nearest neighbors by Euclidean distance.

pub mod config;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod persistence;
pub mod recommend;
pub mod source;
pub mod stopwords;
pub mod table;
pub mod tokenizer;
pub mod vector_ops;
pub mod vocabulary;

pub use corpus::CorpusIndex;
pub use document::{ArticleSummary, Document, DocumentId, NeighborSummary, RawDocument};
pub use embedding::DocumentEmbedder;
pub use error::{DocvecError, Result};
pub use recommend::RecommendationEngine;
pub use stopwords::StopWords;
pub use table::{BuildReport, RecommendationTable};
pub use tokenizer::Tokenizer;
pub use vocabulary::Vocabulary;
