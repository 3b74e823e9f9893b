use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocvecError>;

#[derive(Debug, Error)]
pub enum DocvecError {
    /// A vocabulary line that cannot become a word vector. Fatal for the run.
    #[error("Malformed vector on line {line}: {reason}")]
    MalformedVectorLine { line: usize, reason: String },

    /// None of the document's tokens are in the vocabulary.
    #[error("Document shares no words with the vocabulary")]
    EmptyEmbedding,

    #[error("Duplicate document identity '{topic}/{file_name}'")]
    IdentityCollision { topic: String, file_name: String },

    #[error("Requested {requested} neighbors but only {available} eligible documents exist")]
    InsufficientCorpus { requested: usize, available: usize },

    #[error("Snapshot is corrupted: {0}")]
    CorruptSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}
