use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::dialogue::TimeoutPolicy;

/// Which assistant the shell runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// FAQ answers verbatim, scripted escalation.
    Scripted,
    /// FAQ answers rephrased by the completion service.
    Paraphrase,
    /// Free questions answered from retrieved document chunks.
    Rag,
    /// Creative writing with a word budget.
    Story,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scripted" | "faq" => Ok(Mode::Scripted),
            "paraphrase" | "model" => Ok(Mode::Paraphrase),
            "rag" => Ok(Mode::Rag),
            "story" | "creative" => Ok(Mode::Story),
            other => Err(format!("unknown assistant mode '{}'", other)),
        }
    }
}

impl Mode {
    /// The scripted desk escalates a stalled turn; the model-backed ones end the session.
    pub fn timeout_policy(self) -> TimeoutPolicy {
        match self {
            Mode::Scripted => TimeoutPolicy::Escalate,
            _ => TimeoutPolicy::End,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorStoreKind {
    Memory,
    Qdrant,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mode: Mode,
    pub faq_path: String,
    pub faq_threshold: f64,
    pub doc_paths: Vec<String>,
    pub include_exts: Vec<String>,
    pub chunk_max_length: usize,
    pub top_k: usize,
    pub collection: String,
    pub vector_store: VectorStoreKind,
    pub qdrant_url: String,
    pub distance: String,
    pub ollama_url: String,
    pub embed_model: String,
    pub chat_model: String,
    pub startup_timeout: Duration,
    pub response_timeout: Duration,
    pub history_dir: String,
    pub story_words: usize,
    pub context_length: usize,
    pub log_file: String,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env if present so model and store settings work without manual `source .env`.
        let _ = dotenvy::dotenv();
        let mode = env::var("ASSISTANT_MODE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Mode::Scripted);
        let default_threshold = match mode {
            Mode::Paraphrase => 0.4,
            _ => 0.5,
        };
        let default_response_secs = match mode {
            Mode::Story => 180,
            _ => 120,
        };
        Self {
            mode,
            faq_path: env::var("FAQ_PATH").unwrap_or_else(|_| "./faq/banking_faq.txt".to_string()),
            faq_threshold: parsed("FAQ_THRESHOLD").unwrap_or(default_threshold),
            doc_paths: split_list(&env::var("RAG_DOCS").unwrap_or_else(|_| "./docs".to_string())),
            include_exts: split_list(&env::var("RAG_INCLUDE_EXTS").unwrap_or_else(|_| ".txt,.md".to_string())),
            chunk_max_length: parsed("RAG_CHUNK_MAX").unwrap_or(100),
            top_k: parsed("RAG_TOP_K").unwrap_or(5),
            collection: env::var("RAG_COLLECTION").unwrap_or_else(|_| "faq_docs".to_string()),
            vector_store: match env::var("VECTOR_STORE").unwrap_or_default().to_ascii_lowercase().as_str() {
                "qdrant" => VectorStoreKind::Qdrant,
                _ => VectorStoreKind::Memory,
            },
            qdrant_url: env::var("QDRANT_URL").unwrap_or_else(|_| "http://localhost:6333".to_string()),
            distance: env::var("QDRANT_DISTANCE").unwrap_or_else(|_| "Cosine".to_string()),
            ollama_url: env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string()),
            embed_model: env::var("OLLAMA_EMBED_MODEL").unwrap_or_else(|_| "all-minilm".to_string()),
            chat_model: env::var("OLLAMA_CHAT_MODEL").unwrap_or_else(|_| "mistral".to_string()),
            startup_timeout: Duration::from_secs(parsed("STARTUP_TIMEOUT_SECS").unwrap_or(30)),
            response_timeout: Duration::from_secs(
                parsed("RESPONSE_TIMEOUT_SECS").unwrap_or(default_response_secs),
            ),
            history_dir: env::var("CHAT_HISTORY_DIR").unwrap_or_else(|_| "chat_history".to_string()),
            story_words: parsed("STORY_WORDS").unwrap_or(150),
            context_length: parsed("MODEL_CONTEXT_LENGTH").unwrap_or(2048),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "faqdesk.log".to_string()),
        }
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_aliases() {
        assert_eq!("FAQ".parse::<Mode>(), Ok(Mode::Scripted));
        assert_eq!(" model ".parse::<Mode>(), Ok(Mode::Paraphrase));
        assert_eq!("rag".parse::<Mode>(), Ok(Mode::Rag));
        assert_eq!("creative".parse::<Mode>(), Ok(Mode::Story));
        assert!("voice".parse::<Mode>().is_err());
    }

    #[test]
    fn splits_lists_and_drops_blanks() {
        assert_eq!(split_list(" a.txt, ,docs "), vec!["a.txt".to_string(), "docs".to_string()]);
    }
}
