mod answer_faq;
mod build_prompt;
mod chunk_text;
mod config;
pub mod dialogue;
mod embed_chunks;
mod embed_query;
mod error;
mod generate;
mod http;
mod match_faq;
mod normalize_text;
mod parse_faq;
mod retrieve_chunks;
mod scan_files;
mod store_qdrant;
pub mod story;
pub mod transcript;
mod validate;
mod vector_index;
pub mod worker;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use answer_faq::{Concern, FaqDesk, Paraphraser};
pub use build_prompt::{
    build_handoff_prompt, build_paraphrase_prompt, build_prompt_with_context, format_context, Handoff,
};
pub use chunk_text::{chunk_text, clean_text, split_sentences, Chunk};
pub use config::{Config, Mode, VectorStoreKind};
pub use dialogue::{Dialogue, DialogueState, Step, TimeoutPolicy, TurnReply};
pub use embed_chunks::{Embedder, OllamaEmbedder};
pub use error::{Error, Result};
pub use generate::{CompletionService, GenerationParams, OllamaCompletion};
pub use match_faq::{match_faq, overlap_score, FaqMatch};
pub use normalize_text::normalize_text;
pub use parse_faq::{load_faq, parse_faq, FaqRecord};
pub use scan_files::{load_document, scan_files, SourceDocument};
pub use store_qdrant::QdrantIndex;
pub use story::{StoryRequest, StoryWriter};
pub use transcript::TranscriptStore;
pub use validate::{DenylistValidator, ResponseValidator, DEFAULT_DENYLIST};
pub use vector_index::{cosine_sim, InMemoryIndex, IndexRecord, VectorIndex};

use retrieve_chunks::retrieve_top;

/// Chunk, embed and store documents; answer questions from the nearest chunks.
pub struct RagPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    completion: Arc<dyn CompletionService>,
    chunk_max_length: usize,
    top_k: usize,
    params: GenerationParams,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            embedder,
            index,
            completion,
            chunk_max_length: 100,
            top_k: 5,
            params: GenerationParams::answer(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let index: Arc<dyn VectorIndex> = match cfg.vector_store {
            VectorStoreKind::Memory => Arc::new(InMemoryIndex::new()),
            VectorStoreKind::Qdrant => Arc::new(QdrantIndex::new(cfg)),
        };
        Self::new(
            Arc::new(OllamaEmbedder::new(cfg)),
            index,
            Arc::new(OllamaCompletion::new(cfg)),
        )
        .with_chunk_max_length(cfg.chunk_max_length)
        .with_top_k(cfg.top_k)
    }

    pub fn with_chunk_max_length(mut self, max_length: usize) -> Self {
        self.chunk_max_length = max_length;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Upsert every chunk of `doc`. Re-ingesting the same text overwrites
    /// the same chunk ids. Returns the number of chunks stored.
    pub fn ingest(&self, doc: &SourceDocument) -> Result<usize> {
        let chunks = chunk_text(&doc.id, &doc.text, self.chunk_max_length);
        if chunks.is_empty() {
            return Ok(0);
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed(&texts)?;
        let records: Vec<IndexRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, embedding)| IndexRecord {
                id: chunk.id,
                embedding,
                text: chunk.text,
                metadata: BTreeMap::from([("source".to_string(), chunk.source_id)]),
            })
            .collect();
        self.index.upsert(&records)?;
        tracing::info!(source = %doc.id, chunks = records.len(), "ingested document");
        Ok(records.len())
    }

    pub fn index_corpus(&self, docs: &[SourceDocument]) -> Result<usize> {
        let mut total = 0;
        for doc in docs {
            total += self.ingest(doc)?;
        }
        Ok(total)
    }

    pub fn retrieve(&self, question: &str) -> Result<Vec<String>> {
        retrieve_top(self.embedder.as_ref(), self.index.as_ref(), question, self.top_k)
    }

    /// Returns `(context, answer)`.
    pub fn answer_query(&self, question: &str) -> Result<(String, String)> {
        let hits = self.retrieve(question)?;
        let context = format_context(&hits);
        let prompt = build_prompt_with_context(question, &context);
        let answer = self.completion.complete(&prompt, &self.params)?;
        Ok((context, answer))
    }
}

/// A ready-to-use assistant for the configured mode.
pub enum Assistant {
    Faq(FaqDesk),
    Rag(RagPipeline),
    Story(StoryWriter),
}

/// Load everything a session needs. Fails when a required resource is missing.
pub fn start(cfg: &Config) -> Result<Assistant> {
    match cfg.mode {
        Mode::Scripted => {
            let records = load_faq(&cfg.faq_path)?;
            Ok(Assistant::Faq(FaqDesk::new(records, cfg.faq_threshold)))
        }
        Mode::Paraphrase => {
            let records = load_faq(&cfg.faq_path)?;
            let paraphraser = Paraphraser {
                service: Arc::new(OllamaCompletion::new(cfg)),
                validator: Box::new(DenylistValidator::default()),
                params: GenerationParams::paraphrase(),
            };
            Ok(Assistant::Faq(
                FaqDesk::new(records, cfg.faq_threshold).with_paraphraser(paraphraser),
            ))
        }
        Mode::Rag => {
            let pipeline = RagPipeline::from_config(cfg);
            let docs = scan_files(cfg);
            let stored = pipeline.index_corpus(&docs)?;
            tracing::info!(documents = docs.len(), chunks = stored, "retrieval index ready");
            Ok(Assistant::Rag(pipeline))
        }
        Mode::Story => Ok(Assistant::Story(StoryWriter::new(
            Arc::new(OllamaCompletion::new(cfg)),
            cfg.context_length,
        ))),
    }
}
