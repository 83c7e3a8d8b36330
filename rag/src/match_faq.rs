use std::collections::HashSet;

use crate::normalize_text::normalize_text;
use crate::parse_faq::FaqRecord;

/// Best FAQ answer for a query. `score` is in `[0, 1]`; `answer` is `None`
/// when no record shares a word with the query.
#[derive(Clone, Debug, PartialEq)]
pub struct FaqMatch {
    pub answer: Option<String>,
    pub question: Option<String>,
    pub score: f64,
}

impl FaqMatch {
    pub fn none() -> Self {
        Self {
            answer: None,
            question: None,
            score: 0.0,
        }
    }
}

/// Word-set overlap divided by the larger set's size.
pub fn overlap_score(a: &str, b: &str) -> f64 {
    let a_words: HashSet<&str> = a.split_whitespace().collect();
    let b_words: HashSet<&str> = b.split_whitespace().collect();
    let larger = a_words.len().max(b_words.len());
    if larger == 0 {
        return 0.0;
    }
    let common = a_words.intersection(&b_words).count();
    common as f64 / larger as f64
}

fn strip_ordinal(question: &str) -> &str {
    match question.split_once(". ") {
        Some((_, rest)) => rest,
        None => question,
    }
}

/// Score `query` against every record and return the strictly best one.
/// Ties keep the earlier record.
pub fn match_faq(query: &str, records: &[FaqRecord]) -> FaqMatch {
    let query = normalize_text(query);
    let mut best = FaqMatch::none();

    for record in records {
        let candidate = normalize_text(strip_ordinal(&record.question));
        let score = overlap_score(&query, &candidate);
        tracing::debug!(query = %query, candidate = %candidate, score, "compared FAQ question");
        if score > best.score {
            best = FaqMatch {
                answer: Some(record.answer.clone()),
                question: Some(candidate),
                score,
            };
        }
    }

    tracing::debug!(query = %query, best = ?best.question, score = best.score, "best FAQ match");
    best
}
