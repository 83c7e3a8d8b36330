//! Sentence-aligned chunking for embedding.
//!
//! Sentences end at `.`, `!` or `?` followed by whitespace. They are packed
//! greedily into chunks of at most `max_length` characters (sentences in a
//! chunk are joined by one space). A sentence is never split; one that is
//! longer than `max_length` becomes a chunk of its own.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// `"<source_id>_chunk_<index>"`, stable for the same source and limit.
    pub id: String,
    pub text: String,
    pub source_id: String,
}

fn sentence_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"))
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in sentence_end().find_iter(text) {
        // terminators are single-byte ASCII
        let sentence = text[last..m.start() + 1].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        last = m.end();
    }
    let tail = text[last..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

pub fn chunk_text(source_id: &str, text: &str, max_length: usize) -> Vec<Chunk> {
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();
        if current.is_empty() {
            current.push_str(sentence);
            current_len = sentence_len;
            continue;
        }
        if current_len + 1 + sentence_len > max_length {
            pieces.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_len = sentence_len;
        } else {
            current.push(' ');
            current.push_str(sentence);
            current_len += 1 + sentence_len;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            id: format!("{}_chunk_{}", source_id, i),
            text,
            source_id: source_id.to_string(),
        })
        .collect()
}

/// Collapse blank lines and whitespace, and drop `Q:` / `A:` line markers.
pub fn clean_text(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix("Q:")
                .or_else(|| line.strip_prefix("A:"))
                .unwrap_or(line)
        })
        .collect();
    lines.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation_followed_by_space() {
        let s = split_sentences("Hi there. Version 2.5 ships!  Ready?\nYes");
        assert_eq!(s, vec!["Hi there.", "Version 2.5 ships!", "Ready?", "Yes"]);
    }

    #[test]
    fn cleans_markers_and_blank_lines() {
        let raw = "Q: What is ASA?\n\n\nA:   It is   a sandbox.\n";
        assert_eq!(clean_text(raw), "What is ASA? It is a sandbox.");
    }
}
