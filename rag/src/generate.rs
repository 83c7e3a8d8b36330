use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::http::post_json;

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParams {
    pub max_new_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
    /// Per-call limit. `None` uses the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl GenerationParams {
    /// Short rephrasing of an FAQ answer or a handoff note.
    pub fn paraphrase() -> Self {
        Self {
            max_new_tokens: 50,
            temperature: 0.3,
            top_p: 0.9,
            timeout: Some(Duration::from_secs(7)),
        }
    }

    pub fn answer() -> Self {
        Self {
            max_new_tokens: 500,
            temperature: 0.7,
            top_p: 0.9,
            timeout: None,
        }
    }
}

/// Opaque text completion. Callers treat any error as "no usable response".
pub trait CompletionService: Send + Sync {
    fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: usize,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Completion through an Ollama server's `/api/generate`.
#[derive(Clone, Debug)]
pub struct OllamaCompletion {
    url: String,
    model: String,
}

impl OllamaCompletion {
    pub fn new(cfg: &Config) -> Self {
        Self {
            url: format!("{}/api/generate", cfg.ollama_url),
            model: cfg.chat_model.clone(),
        }
    }
}

impl CompletionService for OllamaCompletion {
    fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let req = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: params.max_new_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
            },
        };
        let res = post_json::<GenerateResponse, _>(&self.url, &req, params.timeout)?;
        let text = res.response.unwrap_or_default();
        tracing::debug!(model = %self.model, chars = text.len(), "completion returned");
        Ok(text.trim().to_string())
    }
}
