//! Closing draft model.
//!
//! A draft is the unsaved result/learning text for one card being finished.

/// In-progress closing text for one card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosingDraft {
    pub result: String,
    pub learning: String,
}

impl ClosingDraft {
    pub fn new(result: impl Into<String>, learning: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            learning: learning.into(),
        }
    }

    /// Merges the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: ClosingPatch) {
        if let Some(result) = patch.result {
            self.result = result;
        }
        if let Some(learning) = patch.learning {
            self.learning = learning;
        }
    }

    /// Returns trimmed `(result, learning)` when both are non-empty.
    pub fn validated(&self) -> Option<(String, String)> {
        let result = self.result.trim();
        let learning = self.learning.trim();
        if result.is_empty() || learning.is_empty() {
            return None;
        }
        Some((result.to_string(), learning.to_string()))
    }
}

/// Partial draft update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosingPatch {
    pub result: Option<String>,
    pub learning: Option<String>,
}

impl ClosingPatch {
    pub fn result(value: impl Into<String>) -> Self {
        Self {
            result: Some(value.into()),
            learning: None,
        }
    }

    pub fn learning(value: impl Into<String>) -> Self {
        Self {
            result: None,
            learning: Some(value.into()),
        }
    }
}
