use crate::config::Number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-part document key: the topic folder and the file name inside it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId {
    pub topic: String,
    pub file_name: String,
}

impl DocumentId {
    pub fn new(topic: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            file_name: file_name.into(),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.topic, self.file_name)
    }
}

/// A document as read from the corpus, before the title is split off.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: DocumentId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub body: String,
    /// `None` when no body token is in the vocabulary.
    pub embedding: Option<Vec<Number>>,
}

impl Document {
    pub fn summary(&self) -> NeighborSummary {
        NeighborSummary {
            topic: self.id.topic.clone(),
            file_name: self.id.file_name.clone(),
            title: self.title.clone(),
        }
    }

    pub fn article(&self) -> ArticleSummary {
        ArticleSummary {
            topic: self.id.topic.clone(),
            file_name: self.id.file_name.clone(),
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

/// What a recommendation shows about the recommended document.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NeighborSummary {
    pub topic: String,
    pub file_name: String,
    pub title: String,
}

/// Listing record handed to the display layer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ArticleSummary {
    pub topic: String,
    pub file_name: String,
    pub title: String,
    pub body: String,
}

/// Splits off the first line as the title. Both parts are trimmed; text
/// without a newline is all title.
pub fn split_title(text: &str) -> (String, String) {
    match text.split_once('\n') {
        Some((title, body)) => (title.trim().to_string(), body.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}
