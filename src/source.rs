//! Reads a corpus directory tree into raw documents.
//!
//! Each file is one document whose identity is `(parent folder, file name)`.
//! Files are Latin-1, so every byte decodes to exactly one character and
//! non-UTF-8 content never fails.

use crate::document::{DocumentId, RawDocument};
use crate::error::Result;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Collects every file under `root` whose extension equals `extension`
/// (any file when `None`), sorted by path.
pub fn scan(root: &Path, extension: Option<&str>) -> Result<Vec<RawDocument>> {
    let root = fs::canonicalize(root)?;
    let mut paths = Vec::new();
    collect_files(&root, &mut paths)?;
    paths.retain(|path| matches_extension(path, extension));
    paths.sort();

    tracing::debug!("Found {} corpus files under {}", paths.len(), root.display());

    paths
        .into_par_iter()
        .map(|path| -> Result<RawDocument> {
            let bytes = fs::read(&path)?;
            Ok(RawDocument {
                id: identity(&path),
                text: decode_latin1(&bytes),
            })
        })
        .collect()
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn matches_extension(path: &Path, extension: Option<&str>) -> bool {
    match extension {
        None => true,
        Some(wanted) => path.extension().is_some_and(|ext| ext == wanted),
    }
}

/// The two innermost path components. A file directly under the filesystem
/// root has an empty topic.
pub fn identity(path: &Path) -> DocumentId {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let topic = path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    DocumentId { topic, file_name }
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
