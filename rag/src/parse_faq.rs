use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// One numbered question with its answer. The question keeps its ordinal
/// prefix (`"3. How do I ...?"`) exactly as it appeared in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
}

fn entry_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\s").expect("valid entry regex"))
}

fn entry_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^(\d+\.\s+[^?]+\?)\s+(.+)").expect("valid entry regex"))
}

/// Split a flat numbered FAQ document into question/answer records.
///
/// Text before the first `N. ` marker is ignored. Entries that do not have a
/// question ending in `?` followed by an answer are skipped.
pub fn parse_faq(text: &str) -> Vec<FaqRecord> {
    let starts: Vec<usize> = entry_start().find_iter(text).map(|m| m.start()).collect();
    let mut records = Vec::with_capacity(starts.len());

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let entry = text[start..end].trim();
        if entry.is_empty() {
            continue;
        }
        match entry_shape().captures(entry) {
            Some(caps) => records.push(FaqRecord {
                question: caps[1].trim().to_string(),
                answer: caps[2].trim().to_string(),
            }),
            None => tracing::debug!(entry, "skipping malformed FAQ entry"),
        }
    }

    records
}

/// Read and parse the FAQ file. A missing or unreadable file is a load error.
pub fn load_faq(path: impl AsRef<Path>) -> Result<Vec<FaqRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Load {
        path: path.display().to_string(),
        source,
    })?;
    let records = parse_faq(&text);
    tracing::info!(path = %path.display(), count = records.len(), "loaded FAQ");
    Ok(records)
}
