use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::chunk_text::clean_text;
use crate::config::Config;
use crate::error::{Error, Result};

/// A document ready for chunking. `id` is the file's base name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: String,
    pub text: String,
}

pub fn load_document(path: &Path) -> Result<SourceDocument> {
    let text = fs::read_to_string(path).map_err(|source| Error::Load {
        path: path.display().to_string(),
        source,
    })?;
    let id = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SourceDocument {
        id,
        text: clean_text(&text),
    })
}

/// Load every configured path. Directories are walked for files with an
/// included extension. Missing or unreadable paths are logged and skipped.
pub fn scan_files(cfg: &Config) -> Vec<SourceDocument> {
    let mut results = Vec::new();

    for base in &cfg.doc_paths {
        let base = Path::new(base);
        if base.is_file() {
            push_document(base, &mut results);
            continue;
        }
        if !base.is_dir() {
            tracing::warn!(path = %base.display(), "document not found");
            continue;
        }
        let mut files: Vec<_> = WalkDir::new(base)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| is_text_file(entry.path(), &cfg.include_exts))
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        for path in files {
            push_document(&path, &mut results);
        }
    }

    results
}

fn push_document(path: &Path, results: &mut Vec<SourceDocument>) {
    match load_document(path) {
        Ok(doc) if doc.text.is_empty() => {
            tracing::debug!(path = %path.display(), "skipping empty document");
        }
        Ok(doc) => {
            tracing::info!(id = %doc.id, "loaded document");
            results.push(doc);
        }
        Err(err) => tracing::warn!(error = %err, "skipping document"),
    }
}

fn is_text_file(path: &Path, exts: &[String]) -> bool {
    let lower = path.to_string_lossy().to_lowercase();
    exts.iter().any(|ext| lower.ends_with(&ext.to_lowercase()))
}
