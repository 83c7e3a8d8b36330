//! Scripted conversation flow for the FAQ assistants.
//!
//! ```text
//! asking ──► help_check ──yes──► more_questions ──yes──► asking
//!   │            │ no                 │ no
//!   │            ▼                    ▼
//!   └──────► urgency_check ───────► rating ──► ended
//! ```
//!
//! A question typed in `asking` is not answered here: [`Dialogue::submit`]
//! returns [`Step::Dispatch`] and the caller runs
//! [`FaqDesk::answer_turn`](crate::FaqDesk::answer_turn) on a worker, then
//! feeds the result back with [`Dialogue::resolve`], or calls
//! [`Dialogue::give_up`] when the wait runs out.

use std::fmt;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

pub const GREETING: &str =
    "Hi, I'm your banking assistant! I can help with account questions, deposits, and more.";
pub const HELP_CHECK_PROMPT: &str = "Is your question answered? (Yes/No)";
pub const URGENCY_PROMPT: &str = "Is this urgent or not urgent?";
pub const RATING_PROMPT: &str = "How did I do? Positive, Neutral, or Negative?";
pub const APOLOGY: &str = "I'm sorry, I can't assist with that. Thank you!";

const AGENTS: &[&str] = &["Jeff", "Andrea", "Sarah", "Michael", "Emily"];
const CLOSING_PHRASES: &[&str] = &["Have a great day!", "See you next time!", "Take care!"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueState {
    Asking,
    HelpCheck,
    MoreQuestions,
    UrgencyCheck,
    Rating,
    Ended,
}

/// Where a turn goes when the answer never arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Hand the user to a human: move to `urgency_check`.
    Escalate,
    /// Apologise and close the session.
    End,
}

/// Result of answering one question on a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReply {
    pub text: String,
    pub next: DialogueState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Show these lines; no worker needed.
    Reply(Vec<String>),
    /// Answer this question off the interactive thread.
    Dispatch(String),
    /// The user asked to leave.
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    NotUrgent,
    Urgent,
    Unclear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Positive,
    Negative,
    Neutral,
    NotProvided,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rating::Positive => "Positive",
            Rating::Negative => "Negative",
            Rating::Neutral => "Neutral",
            Rating::NotProvided => "Not provided",
        };
        f.write_str(label)
    }
}

fn not_urgent() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"not\s+urgent|non\s?-?\s?urgent").expect("valid urgency regex"))
}

/// The not-urgent pattern is checked first, so "not urgent" never counts as urgent.
pub fn classify_urgency(input: &str) -> Urgency {
    let lower = input.to_lowercase();
    if not_urgent().is_match(&lower) {
        Urgency::NotUrgent
    } else if lower.contains("urgent") {
        Urgency::Urgent
    } else {
        Urgency::Unclear
    }
}

pub fn parse_rating(input: &str) -> Rating {
    match input.trim().to_lowercase().as_str() {
        "positive" => Rating::Positive,
        "negative" => Rating::Negative,
        "neutral" => Rating::Neutral,
        _ => Rating::NotProvided,
    }
}

pub fn is_exit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit")
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "yes" | "y")
}

pub fn case_number() -> String {
    format!("CASE-{}", rand::thread_rng().gen_range(100_000..=999_999))
}

pub fn agent_name() -> &'static str {
    AGENTS.choose(&mut rand::thread_rng()).copied().unwrap_or("Jeff")
}

pub fn closing_summary(question: &str, rating: Rating) -> String {
    let closing = CLOSING_PHRASES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Take care!");
    format!(
        "Thanks for chatting! I helped with your query about '{}', and you rated the experience {}. {}",
        question, rating, closing
    )
}

#[derive(Debug)]
pub struct Dialogue {
    state: DialogueState,
    question: Option<String>,
    awaiting: bool,
    timeout_policy: TimeoutPolicy,
}

impl Dialogue {
    pub fn new(timeout_policy: TimeoutPolicy) -> Self {
        Self {
            state: DialogueState::Asking,
            question: None,
            awaiting: false,
            timeout_policy,
        }
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    /// The last question typed in `asking`.
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    /// A question has been dispatched and neither answered nor given up on.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn submit(&mut self, input: &str) -> Step {
        let input = input.trim();
        if is_exit_command(input) {
            self.state = DialogueState::Ended;
            self.awaiting = false;
            return Step::Exit;
        }
        if input.is_empty() || self.is_awaiting() {
            return Step::Reply(vec![]);
        }

        match self.state {
            DialogueState::Asking => {
                self.question = Some(input.to_string());
                self.awaiting = true;
                Step::Dispatch(input.to_string())
            }
            DialogueState::HelpCheck => {
                if is_yes(input) {
                    self.state = DialogueState::MoreQuestions;
                    Step::Reply(vec!["Do you have any more questions I can answer? (Yes/No)".to_string()])
                } else {
                    self.state = DialogueState::UrgencyCheck;
                    Step::Reply(vec![format!(
                        "It looks like human involvement is necessary. {}",
                        URGENCY_PROMPT
                    )])
                }
            }
            DialogueState::MoreQuestions => {
                if is_yes(input) {
                    self.state = DialogueState::Asking;
                    Step::Reply(vec!["Great! Please go ahead with your next question.".to_string()])
                } else {
                    self.state = DialogueState::Rating;
                    Step::Reply(vec![RATING_PROMPT.to_string()])
                }
            }
            DialogueState::UrgencyCheck => match classify_urgency(input) {
                Urgency::NotUrgent => {
                    let case = case_number();
                    tracing::info!(case = %case, "created case");
                    self.state = DialogueState::Rating;
                    Step::Reply(vec![
                        format!(
                            "I've created a case for you: {}. A human agent will follow up within 1-2 business days.",
                            case
                        ),
                        RATING_PROMPT.to_string(),
                    ])
                }
                Urgency::Urgent => {
                    let agent = agent_name();
                    tracing::info!(agent, "routed to agent");
                    self.state = DialogueState::Rating;
                    Step::Reply(vec![
                        format!(
                            "Since this is urgent, I'll connect you to a human agent. You are now with {}. They'll assist you shortly!",
                            agent
                        ),
                        RATING_PROMPT.to_string(),
                    ])
                }
                Urgency::Unclear => Step::Reply(vec![
                    "I didn't catch that. Please let me know if it's urgent or not urgent.".to_string(),
                ]),
            },
            DialogueState::Rating => {
                let rating = parse_rating(input);
                tracing::info!(%rating, "session rated");
                self.state = DialogueState::Ended;
                let question = self.question.as_deref().unwrap_or("your banking needs");
                Step::Reply(vec![closing_summary(question, rating)])
            }
            DialogueState::Ended => Step::Reply(vec![]),
        }
    }

    /// Apply a worker's answer. Ignored once the session has ended or when
    /// nothing is pending (the wait already timed out).
    pub fn resolve(&mut self, reply: TurnReply) -> Vec<String> {
        if self.state == DialogueState::Ended || !std::mem::take(&mut self.awaiting) {
            tracing::debug!("dropping late reply");
            return vec![];
        }
        self.state = reply.next;
        vec![reply.text]
    }

    /// Stop waiting for the pending answer.
    pub fn give_up(&mut self) -> Vec<String> {
        if !std::mem::take(&mut self.awaiting) {
            return vec![];
        }
        tracing::warn!(policy = ?self.timeout_policy, "response wait timed out");
        match self.timeout_policy {
            TimeoutPolicy::Escalate => {
                self.state = DialogueState::UrgencyCheck;
                vec![
                    "I'm struggling to respond, let's get a human to help!".to_string(),
                    URGENCY_PROMPT.to_string(),
                ]
            }
            TimeoutPolicy::End => {
                self.state = DialogueState::Ended;
                vec![APOLOGY.to_string()]
            }
        }
    }
}
