use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::http::{get_json, post_json, put_json};
use crate::vector_index::{IndexRecord, VectorIndex};

#[derive(Serialize)]
struct CreateCollection {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: String,
}

#[derive(Serialize, Deserialize)]
struct PointPayload {
    chunk_id: String,
    text: String,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct Point {
    id: String,
    vector: Vec<f32>,
    payload: PointPayload,
}

#[derive(Serialize)]
struct UpsertPoints<'a> {
    points: &'a [Point],
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    result: Option<QueryResult>,
}

#[derive(Deserialize)]
struct QueryResult {
    points: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    payload: Option<PointPayload>,
}

/// Qdrant-backed index. Chunk ids are mapped to UUIDv5 point ids, so
/// upserting the same chunk id overwrites the stored point.
pub struct QdrantIndex {
    base_url: String,
    collection: String,
    distance: String,
    collection_ready: AtomicBool,
}

impl QdrantIndex {
    pub fn new(cfg: &Config) -> Self {
        Self {
            base_url: cfg.qdrant_url.clone(),
            collection: cfg.collection.clone(),
            distance: cfg.distance.clone(),
            collection_ready: AtomicBool::new(false),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    fn ensure_collection(&self, vector_size: usize) -> Result<()> {
        if self.collection_ready.load(Ordering::Acquire) {
            return Ok(());
        }
        let url = self.collection_url();
        if get_json::<Value>(&url).is_err() {
            let body = CreateCollection {
                vectors: VectorParams {
                    size: vector_size,
                    distance: self.distance.clone(),
                },
            };
            let _ = put_json::<Value, _>(&url, &body)?;
            tracing::info!(collection = %self.collection, size = vector_size, "created collection");
        }
        self.collection_ready.store(true, Ordering::Release);
        Ok(())
    }
}

pub fn point_id(chunk_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, chunk_id.as_bytes()).to_string()
}

impl VectorIndex for QdrantIndex {
    fn upsert(&self, records: &[IndexRecord]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        self.ensure_collection(first.embedding.len())?;
        let points: Vec<Point> = records
            .iter()
            .map(|r| Point {
                id: point_id(&r.id),
                vector: r.embedding.clone(),
                payload: PointPayload {
                    chunk_id: r.id.clone(),
                    text: r.text.clone(),
                    metadata: r.metadata.clone(),
                },
            })
            .collect();
        let url = format!("{}/points?wait=true", self.collection_url());
        let _ = put_json::<Value, _>(&url, &UpsertPoints { points: &points })?;
        Ok(())
    }

    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<String>> {
        if embedding.is_empty() {
            return Ok(vec![]);
        }
        let url = format!("{}/points/query", self.collection_url());
        let req = QueryRequest {
            query: embedding,
            limit: top_k,
            with_payload: true,
        };
        let res = post_json::<QueryResponse, _>(&url, &req, None)?;
        Ok(res
            .result
            .map(|r| r.points)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|hit| hit.payload.map(|p| p.text))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::point_id;

    #[test]
    fn point_ids_are_stable_per_chunk() {
        assert_eq!(point_id("faq.txt_chunk_0"), point_id("faq.txt_chunk_0"));
        assert_ne!(point_id("faq.txt_chunk_0"), point_id("faq.txt_chunk_1"));
    }
}
