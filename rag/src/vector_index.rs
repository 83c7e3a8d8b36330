//! Vector index seam and the in-process backend.
//!
//! [`InMemoryIndex`] keeps records in insertion order behind an `RwLock` and
//! answers queries by brute-force cosine similarity. Upserting an id that is
//! already present replaces that record in place.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;

/// One embedded chunk as stored in an index.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

pub trait VectorIndex: Send + Sync {
    /// Insert or replace records by id.
    fn upsert(&self, records: &[IndexRecord]) -> Result<()>;

    /// Texts of the `top_k` nearest records, nearest first.
    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<String>>;
}

#[derive(Default)]
pub struct InMemoryIndex {
    records: RwLock<Vec<IndexRecord>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<IndexRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

pub fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

impl VectorIndex for InMemoryIndex {
    fn upsert(&self, records: &[IndexRecord]) -> Result<()> {
        let mut stored = self.records.write().unwrap_or_else(PoisonError::into_inner);
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => stored.push(record.clone()),
            }
        }
        Ok(())
    }

    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<String>> {
        let stored = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut scored: Vec<(f32, &IndexRecord)> = stored
            .iter()
            .map(|r| (cosine_sim(embedding, &r.embedding), r))
            .collect();
        // stable: equal similarity keeps insertion order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, r)| r.text.clone())
            .collect())
    }
}
