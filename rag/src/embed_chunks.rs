use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::post_json;

/// Turns texts into fixed-length vectors, one per input, in order.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Serialize)]
struct EmbedLegacyRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Clone, Debug)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(cfg: &Config) -> Self {
        Self {
            base_url: cfg.ollama_url.clone(),
            model: cfg.embed_model.clone(),
        }
    }

    // Older servers only expose /api/embeddings, which takes one prompt per call.
    fn embed_legacy(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let req = EmbedLegacyRequest {
                model: &self.model,
                prompt: text,
            };
            let res = post_json::<Value, _>(&url, &req, None)?;
            out.extend(parse_embeddings(res)?);
        }
        Ok(out)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let url = format!("{}/api/embed", self.base_url);
        let req = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let vectors = match post_json::<Value, _>(&url, &req, None) {
            Ok(res) => parse_embeddings(res)?,
            Err(err) => {
                tracing::debug!(error = %err, "falling back to legacy embeddings endpoint");
                self.embed_legacy(texts)?
            }
        };
        if vectors.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>> {
    if let Some(embeddings) = value.get("embeddings") {
        return parse_embeddings_value(embeddings);
    }
    if let Some(embedding) = value.get("embedding") {
        return parse_embeddings_value(embedding);
    }
    Err(Error::Embedding("no embeddings in response".to_string()))
}

fn parse_embeddings_value(value: &Value) -> Result<Vec<Vec<f32>>> {
    let arr = value
        .as_array()
        .ok_or_else(|| Error::Embedding("invalid embeddings format".to_string()))?;
    if arr.is_empty() {
        return Ok(vec![]);
    }
    if arr[0].is_array() {
        return arr.iter().map(parse_vec).collect();
    }
    Ok(vec![parse_vec(value)?])
}

fn parse_vec(value: &Value) -> Result<Vec<f32>> {
    let arr = value
        .as_array()
        .ok_or_else(|| Error::Embedding("embedding is not an array".to_string()))?;
    arr.iter()
        .map(|v| {
            v.as_f64()
                .map(|n| n as f32)
                .ok_or_else(|| Error::Embedding("embedding value is not a number".to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_batch_and_single_shapes() {
        let batch = parse_embeddings(json!({"embeddings": [[1.0, 2.0], [3.0, 4.5]]})).unwrap();
        assert_eq!(batch, vec![vec![1.0, 2.0], vec![3.0, 4.5]]);

        let single = parse_embeddings(json!({"embedding": [0.5, -1.0]})).unwrap();
        assert_eq!(single, vec![vec![0.5, -1.0]]);
    }

    #[test]
    fn rejects_missing_or_non_numeric_embeddings() {
        assert!(parse_embeddings(json!({"data": []})).is_err());
        assert!(parse_embeddings(json!({"embedding": ["x"]})).is_err());
    }
}
