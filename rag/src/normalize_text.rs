/// Canonical form used when comparing a query with FAQ questions.
///
/// Lower-cases, turns `/` and `-` into spaces, collapses whitespace runs and
/// strips question marks and spaces from both ends. Applying it twice gives
/// the same result as applying it once.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase().replace(['/', '-'], " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c == '?' || c == ' ')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_text;

    #[test]
    fn folds_case_and_separators() {
        assert_eq!(normalize_text("What is Zelle/ACH?"), "what is zelle ach");
        assert_eq!(normalize_text("  Set-up   direct\tdeposit "), "set up direct deposit");
    }

    #[test]
    fn strips_question_marks_at_the_edges_only() {
        assert_eq!(normalize_text("?why? not?"), "why? not");
        assert_eq!(normalize_text("? ?"), "");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["  ??A - b?? ", "How do I order checks?", "x/y-z", "", "? ?a"] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "input {raw:?}");
        }
    }
}
