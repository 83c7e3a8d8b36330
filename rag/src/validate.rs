/// Markers that show up when a small model drifts off-topic or emits e-mail
/// boilerplate instead of an answer.
pub const DEFAULT_DENYLIST: &[&str] = &["subject:", "hello [customer]", "space", "moon", "teleport"];

/// Decides whether generated text may be shown to the user.
pub trait ResponseValidator: Send + Sync {
    fn accept(&self, text: &str) -> bool;
}

impl<F> ResponseValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accept(&self, text: &str) -> bool {
        self(text)
    }
}

/// Rejects empty text and any text containing one of the markers
/// (case-insensitive substring match).
#[derive(Clone, Debug)]
pub struct DenylistValidator {
    markers: Vec<String>,
}

impl DenylistValidator {
    pub fn new<S: AsRef<str>>(markers: &[S]) -> Self {
        Self {
            markers: markers.iter().map(|m| m.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn with_marker(mut self, marker: &str) -> Self {
        self.markers.push(marker.to_lowercase());
        self
    }
}

impl Default for DenylistValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}

impl ResponseValidator for DenylistValidator {
    fn accept(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        match self.markers.iter().find(|m| lower.contains(m.as_str())) {
            Some(marker) => {
                tracing::warn!(marker = %marker, "rejected generated text");
                false
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_markers_and_blank_text() {
        let v = DenylistValidator::default();
        assert!(v.accept("You can order checks online. Thank you!"));
        assert!(!v.accept("Subject: Your checks"));
        assert!(!v.accept("Let's teleport your money to the MOON"));
        assert!(!v.accept("   "));
    }

    #[test]
    fn markers_can_be_extended() {
        let v = DenylistValidator::new(&["lorem"]).with_marker("Ipsum");
        assert!(!v.accept("ipsum dolor"));
        assert!(v.accept("the moon is fine here"));
    }

    #[test]
    fn closures_are_validators() {
        let short_only = |text: &str| text.split_whitespace().count() <= 3;
        assert!(short_only.accept("one two three"));
        assert!(!short_only.accept("one two three four"));
    }
}
