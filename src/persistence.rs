//! Snapshot files for the display layer.
//!
//! Layout: `[bincode payload][magic "DVC1"][SHA-256 of payload, 32 bytes]`.
//! Writes go to a temp file that is renamed into place.

use crate::corpus::CorpusIndex;
use crate::document::ArticleSummary;
use crate::error::{DocvecError, Result};
use crate::table::RecommendationTable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const SNAPSHOT_MAGIC: &[u8; 4] = b"DVC1";
const DIGEST_LEN: usize = 32;
const FOOTER_LEN: usize = SNAPSHOT_MAGIC.len() + DIGEST_LEN;

pub fn save_articles(corpus: &CorpusIndex, path: &Path) -> Result<()> {
    let articles: Vec<ArticleSummary> = corpus.documents().iter().map(|d| d.article()).collect();
    write_snapshot(&articles, path)
}

pub fn load_articles(path: &Path) -> Result<Vec<ArticleSummary>> {
    read_snapshot(path)
}

pub fn save_recommendations(table: &RecommendationTable, path: &Path) -> Result<()> {
    write_snapshot(table, path)
}

pub fn load_recommendations(path: &Path) -> Result<RecommendationTable> {
    read_snapshot(path)
}

fn write_snapshot<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let payload = bincode::serialize(value)?;
    let digest = Sha256::digest(&payload);

    let mut output = Vec::with_capacity(payload.len() + FOOTER_LEN);
    output.extend_from_slice(&payload);
    output.extend_from_slice(SNAPSHOT_MAGIC);
    output.extend_from_slice(&digest);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path(path);
    fs::write(&tmp_path, &output)?;
    fs::rename(&tmp_path, path)?;

    tracing::info!(
        "Saved {} ({} bytes, sha256={})",
        path.display(),
        payload.len(),
        hex(&digest[..8])
    );
    Ok(())
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path)?;
    if raw.len() < FOOTER_LEN {
        return Err(DocvecError::CorruptSnapshot(format!(
            "{} is too short to be a snapshot",
            path.display()
        )));
    }

    let (payload, footer) = raw.split_at(raw.len() - FOOTER_LEN);
    let (magic, stored) = footer.split_at(SNAPSHOT_MAGIC.len());
    if magic != SNAPSHOT_MAGIC {
        return Err(DocvecError::CorruptSnapshot(format!(
            "{} has no snapshot footer",
            path.display()
        )));
    }

    let computed = Sha256::digest(payload);
    if computed.as_slice() != stored {
        return Err(DocvecError::CorruptSnapshot(format!(
            "{} checksum mismatch: expected {}, got {}",
            path.display(),
            hex(stored),
            hex(&computed)
        )));
    }
    tracing::debug!("Snapshot {} verified", path.display());

    Ok(bincode::deserialize(payload)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentId};

    fn corpus() -> CorpusIndex {
        CorpusIndex::from_documents(vec![
            Document {
                id: DocumentId::new("business", "001.txt"),
                title: "Profits up".into(),
                body: "Profits rose.".into(),
                embedding: Some(vec![0.0, 1.0]),
            },
            Document {
                id: DocumentId::new("sport", "001.txt"),
                title: "Cup final".into(),
                body: "A late goal.".into(),
                embedding: Some(vec![1.0, 0.0]),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_articles_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("articles.bin");
        save_articles(&corpus(), &path).unwrap();

        let articles = load_articles(&path).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].topic, "sport");
        assert_eq!(articles[1].body, "A late goal.");
        assert!(!dir.path().join("out").join("articles.bin.tmp").exists());
    }

    #[test]
    fn test_recommendations_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recommended.bin");
        let (table, _) = RecommendationTable::build(&corpus(), 5);
        save_recommendations(&table, &path).unwrap();

        let loaded = load_recommendations(&path).unwrap();
        assert_eq!(loaded, table);
        let neighbors = loaded.get(&DocumentId::new("business", "001.txt")).unwrap();
        assert_eq!(neighbors[0].title, "Cup final");
    }

    #[test]
    fn test_detects_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.bin");
        save_articles(&corpus(), &path).unwrap();

        let mut raw = fs::read(&path).unwrap();
        raw[0] ^= 0xff;
        fs::write(&path, &raw).unwrap();
        assert!(matches!(
            load_articles(&path),
            Err(DocvecError::CorruptSnapshot(_))
        ));

        fs::write(&path, b"short").unwrap();
        assert!(matches!(
            load_articles(&path),
            Err(DocvecError::CorruptSnapshot(_))
        ));
    }
}
