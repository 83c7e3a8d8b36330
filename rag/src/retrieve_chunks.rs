use crate::embed_chunks::Embedder;
use crate::embed_query::embed_query;
use crate::error::Result;
use crate::vector_index::VectorIndex;

pub fn retrieve_top(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    question: &str,
    top_k: usize,
) -> Result<Vec<String>> {
    let query_vec = embed_query(embedder, question)?;
    let hits = index.query(&query_vec, top_k)?;
    tracing::debug!(question, hits = hits.len(), "retrieved chunks");
    Ok(hits)
}
