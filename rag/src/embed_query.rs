use crate::embed_chunks::Embedder;
use crate::error::{Error, Result};

pub fn embed_query(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
    let vecs = embedder.embed(&[text.to_string()])?;
    vecs.into_iter()
        .next()
        .ok_or_else(|| Error::Embedding("no embedding for query".to_string()))
}
