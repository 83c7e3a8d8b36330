use std::sync::Arc;

use rand::Rng;

use crate::build_prompt::{build_handoff_prompt, build_paraphrase_prompt, Handoff};
use crate::dialogue::{
    agent_name, case_number, DialogueState, TurnReply, APOLOGY, HELP_CHECK_PROMPT, URGENCY_PROMPT,
};
use crate::generate::{CompletionService, GenerationParams};
use crate::match_faq::{match_faq, FaqMatch};
use crate::parse_faq::FaqRecord;
use crate::validate::ResponseValidator;

const CRITICAL_KEYWORDS: &[&str] = &["fraud", "fraudulent", "stolen", "hacked", "unauthorized"];
const ESCALATION_PHRASES: &[&str] = &["speak to someone", "talk to support", "need help", "escalate"];

/// How a question reads before any FAQ lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Concern {
    pub critical: bool,
    pub escalation: bool,
}

impl Concern {
    pub fn of(input: &str) -> Self {
        let lower = input.to_lowercase();
        Self {
            critical: CRITICAL_KEYWORDS.iter().any(|k| lower.contains(k)),
            escalation: ESCALATION_PHRASES.iter().any(|k| lower.contains(k)),
        }
    }

    pub fn needs_human(&self) -> bool {
        self.critical || self.escalation
    }
}

/// Completion service plus the guard its output must pass.
pub struct Paraphraser {
    pub service: Arc<dyn CompletionService>,
    pub validator: Box<dyn ResponseValidator>,
    pub params: GenerationParams,
}

impl Paraphraser {
    fn generate(&self, prompt: &str) -> Option<String> {
        match self.service.complete(prompt, &self.params) {
            Ok(text) if self.validator.accept(&text) => Some(text.trim().to_string()),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "completion failed");
                None
            }
        }
    }
}

/// Read-only FAQ context shared by every turn of a session.
pub struct FaqDesk {
    records: Vec<FaqRecord>,
    threshold: f64,
    paraphraser: Option<Paraphraser>,
}

impl FaqDesk {
    pub fn new(records: Vec<FaqRecord>, threshold: f64) -> Self {
        Self {
            records,
            threshold,
            paraphraser: None,
        }
    }

    pub fn with_paraphraser(mut self, paraphraser: Paraphraser) -> Self {
        self.paraphraser = Some(paraphraser);
        self
    }

    pub fn records(&self) -> &[FaqRecord] {
        &self.records
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn lookup(&self, question: &str) -> FaqMatch {
        match_faq(question, &self.records)
    }

    /// Answer one question and pick the next dialogue state. Never fails:
    /// collaborator errors fall back to fixed text.
    pub fn answer_turn(&self, question: &str) -> TurnReply {
        let concern = Concern::of(question);
        let found = self.lookup(question);
        tracing::debug!(question, score = found.score, ?concern, "answering turn");

        if let Some(answer) = found.answer.filter(|_| found.score >= self.threshold) {
            let text = match &self.paraphraser {
                Some(p) => p
                    .generate(&build_paraphrase_prompt(&answer))
                    .unwrap_or_else(|| format!("{} Thank you!", answer)),
                None => answer,
            };
            return TurnReply {
                text: format!("{}\n\n{}", text, HELP_CHECK_PROMPT),
                next: DialogueState::HelpCheck,
            };
        }

        if concern.needs_human() {
            return TurnReply {
                text: format!("I see this might need human assistance. {}", URGENCY_PROMPT),
                next: DialogueState::UrgencyCheck,
            };
        }

        let text = match &self.paraphraser {
            Some(p) => {
                let handoff = if rand::thread_rng().gen_bool(0.5) {
                    Handoff::Case(case_number())
                } else {
                    Handoff::Agent(agent_name().to_string())
                };
                p.generate(&build_handoff_prompt(question, &handoff))
                    .unwrap_or_else(|| APOLOGY.to_string())
            }
            None => "Apologies, can't help with that and would recommend human involvement.".to_string(),
        };
        TurnReply {
            text: format!("{}\n\n{}", text, HELP_CHECK_PROMPT),
            next: DialogueState::HelpCheck,
        }
    }
}
