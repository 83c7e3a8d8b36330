/// Who picks up a conversation the assistant cannot finish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handoff {
    Case(String),
    Agent(String),
}

pub fn format_context(chunks: &[String]) -> String {
    let parts: Vec<&str> = chunks
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if parts.is_empty() {
        "(no context found)".to_string()
    } else {
        parts.join("\n")
    }
}

/// Grounded question prompt: the model is told to use only `context`.
pub fn build_prompt_with_context(question: &str, context: &str) -> String {
    format!(
        "Answer based only on the provided context. Do not add information beyond the context. \
         Question: '{}' Context:\n\n{}\n\nAnswer in a friendly way: ",
        question, context
    )
}

pub fn build_paraphrase_prompt(faq_answer: &str) -> String {
    format!(
        "Rephrase this answer in a friendly, conversational tone (max 50 words) and end with 'Thank you!': '{}'",
        faq_answer
    )
}

pub fn build_handoff_prompt(question: &str, handoff: &Handoff) -> String {
    match handoff {
        Handoff::Case(case) => format!(
            "Generate a friendly message (max 50 words) saying human intervention is needed for '{}', \
             create a case '{}', and end with 'Thank you!'",
            question, case
        ),
        Handoff::Agent(agent) => format!(
            "Generate a friendly message (max 50 words) saying human intervention is needed for '{}', \
             route to agent '{}', and end with 'Thank you!'",
            question, agent
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_skips_blank_chunks() {
        let chunks = vec!["First. ".to_string(), "  ".to_string(), "Second.".to_string()];
        assert_eq!(format_context(&chunks), "First.\nSecond.");
        assert_eq!(format_context(&[]), "(no context found)");
    }

    #[test]
    fn grounded_prompt_carries_question_and_context() {
        let prompt = build_prompt_with_context("What is ASA?", "ASA is a sandbox.");
        assert!(prompt.starts_with("Answer based only on the provided context."));
        assert!(prompt.contains("Question: 'What is ASA?'"));
        assert!(prompt.contains("\n\nASA is a sandbox.\n\n"));
    }

    #[test]
    fn handoff_prompt_names_the_case_or_agent() {
        let case = build_handoff_prompt("lost card", &Handoff::Case("CASE-123456".into()));
        assert!(case.contains("create a case 'CASE-123456'"));
        let agent = build_handoff_prompt("lost card", &Handoff::Agent("Sarah".into()));
        assert!(agent.contains("route to agent 'Sarah'"));
    }
}
