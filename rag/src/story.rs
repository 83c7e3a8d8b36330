//! Creative-writing requests: stories and sonnets with a word budget.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generate::{CompletionService, GenerationParams};

pub const MIN_WORDS: usize = 50;
pub const MAX_WORDS: usize = 500;
const SONNET_RETRIES: usize = 2;
const SONNET_FALLBACK: &str =
    "Sorry, I couldn't generate a proper sonnet (13-15 lines) after several attempts.";

/// Rough token count, four characters per token.
pub fn estimate_token_count(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Non-blank lines.
pub fn count_lines(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

pub fn parse_word_limit(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (MIN_WORDS..=MAX_WORDS).contains(n))
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "Please enter a valid word count ({}-{}).",
                MIN_WORDS, MAX_WORDS
            ))
        })
}

/// Cut `text` down to `limit` words.
///
/// Prose ends at the last sentence boundary when that falls in the second
/// half of the cut, otherwise gets `...`. Sonnets keep whole lines and let
/// the final line finish.
pub fn truncate_to_word_count(text: &str, limit: usize, sonnet: bool) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return text.to_string();
    }

    if sonnet {
        let lines: Vec<&str> = text.lines().collect();
        let mut used = 0;
        let mut kept: Vec<String> = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let line_words = line.split_whitespace().count();
            if i == lines.len() - 1 && used < limit {
                kept.push(line.to_string());
                break;
            }
            if used + line_words > limit {
                let partial = line
                    .split_whitespace()
                    .take(limit - used)
                    .collect::<Vec<_>>()
                    .join(" ");
                if !partial.is_empty() {
                    kept.push(format!("{}...", partial));
                }
                break;
            }
            kept.push(line.to_string());
            used += line_words;
        }
        return kept.join("\n");
    }

    let truncated = words[..limit].join(" ");
    match truncated.rfind(['.', '!', '?']) {
        Some(boundary) if boundary > truncated.len() / 2 => truncated[..=boundary].to_string(),
        _ => format!("{}...", truncated),
    }
}

/// A validated writing request.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryRequest {
    pub prompt: String,
    pub word_limit: usize,
    pub sonnet: bool,
    pub full_prompt: String,
    pub max_new_tokens: usize,
}

impl StoryRequest {
    pub fn new(prompt: &str, word_limit: usize, context_length: usize) -> Result<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::InvalidInput("Please type what the story should be about.".to_string()));
        }
        if !(MIN_WORDS..=MAX_WORDS).contains(&word_limit) {
            return Err(Error::InvalidInput(format!(
                "Please enter a valid word count ({}-{}).",
                MIN_WORDS, MAX_WORDS
            )));
        }

        let sonnet = prompt.to_lowercase().contains("sonnet");
        let (full_prompt, wanted_tokens) = if sonnet {
            let topic = prompt
                .to_lowercase()
                .replace("write me a sonnet", "")
                .replace("sonnet", "")
                .trim()
                .to_string();
            let topic = if topic.is_empty() { prompt.to_string() } else { topic };
            (
                format!(
                    "Write a 14-line sonnet with an ABAB CDCD EFEF GG rhyme scheme, approximately {} words, describing {}",
                    word_limit, topic
                ),
                (word_limit as f64 * 1.2) as usize + 30,
            )
        } else {
            (
                format!("Write a {}-word story about {}", word_limit, prompt),
                (word_limit as f64 * 1.33) as usize + 50,
            )
        };

        let available = context_length.saturating_sub(estimate_token_count(&full_prompt));
        if available == 0 {
            return Err(Error::InvalidInput(format!(
                "Prompt is too long for the model's context length ({} tokens).",
                context_length
            )));
        }

        Ok(Self {
            prompt: prompt.to_string(),
            word_limit,
            sonnet,
            full_prompt,
            max_new_tokens: wanted_tokens.min(available),
        })
    }

    fn params(&self) -> GenerationParams {
        GenerationParams {
            max_new_tokens: self.max_new_tokens,
            temperature: 0.8,
            top_p: 0.9,
            timeout: None,
        }
    }
}

pub struct StoryWriter {
    service: Arc<dyn CompletionService>,
    context_length: usize,
}

impl StoryWriter {
    pub fn new(service: Arc<dyn CompletionService>, context_length: usize) -> Self {
        Self {
            service,
            context_length,
        }
    }

    pub fn request(&self, prompt: &str, word_limit: usize) -> Result<StoryRequest> {
        StoryRequest::new(prompt, word_limit, self.context_length)
    }

    pub fn write(&self, request: &StoryRequest) -> Result<String> {
        let params = request.params();
        let mut text = self.service.complete(&request.full_prompt, &params)?;
        if request.sonnet {
            let mut attempts = 0;
            while !is_sonnet_shaped(&text) && attempts < SONNET_RETRIES {
                tracing::debug!(lines = count_lines(&text), attempts, "retrying sonnet");
                text = self.service.complete(&request.full_prompt, &params)?;
                attempts += 1;
            }
            if !is_sonnet_shaped(&text) {
                return Ok(SONNET_FALLBACK.to_string());
            }
        }
        let text = truncate_to_word_count(&text, request.word_limit, request.sonnet);
        tracing::info!(words = count_words(&text), chars = text.len(), "story written");
        Ok(text)
    }
}

fn is_sonnet_shaped(text: &str) -> bool {
    (13..=15).contains(&count_lines(text))
}
