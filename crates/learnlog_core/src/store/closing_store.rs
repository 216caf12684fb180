//! Transient closing drafts keyed by card id.
//!
//! # Invariants
//! - A draft exists for an id exactly while that card is being closed.
//! - Failed confirmation keeps the draft so the user can correct it.

use crate::model::card::{Card, CardId};
use crate::model::draft::{ClosingDraft, ClosingPatch};
use std::collections::HashMap;

/// Mapping from card id to its in-progress closing draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosingStore {
    drafts: HashMap<CardId, ClosingDraft>,
}

impl ClosingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&ClosingDraft> {
        self.drafts.get(id)
    }

    /// Whether a closing edit is in progress for `id`.
    pub fn is_closing(&self, id: &str) -> bool {
        self.drafts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn drafts(&self) -> &HashMap<CardId, ClosingDraft> {
        &self.drafts
    }

    /// Starts (or resets) a draft seeded from the card's current text.
    pub fn start(&mut self, card: &Card) {
        self.drafts.insert(
            card.id.clone(),
            ClosingDraft::new(card.result.as_str(), card.learning.as_str()),
        );
    }

    /// Merges `patch` into the draft, creating an empty one first if needed.
    pub fn update(&mut self, id: &str, patch: ClosingPatch) {
        self.drafts.entry(id.to_string()).or_default().apply(patch);
    }

    /// Discards the draft. Returns whether one existed.
    pub fn cancel(&mut self, id: &str) -> bool {
        self.drafts.remove(id).is_some()
    }

    /// Returns the draft for `id`, or empty text when none exists.
    pub(crate) fn current(&self, id: &str) -> ClosingDraft {
        self.drafts.get(id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::ClosingStore;
    use crate::model::card::{Card, NewCard};
    use crate::model::draft::{ClosingDraft, ClosingPatch};

    #[test]
    fn start_seeds_from_card_text() {
        let mut card = Card::create(&NewCard::new("t", "h", "s")).unwrap();
        card.result = "partial".to_string();
        let mut store = ClosingStore::new();
        store.start(&card);
        assert_eq!(store.get(&card.id), Some(&ClosingDraft::new("partial", "")));
    }

    #[test]
    fn update_without_draft_creates_empty_one() {
        let mut store = ClosingStore::new();
        store.update("x", ClosingPatch::learning("because"));
        assert_eq!(store.get("x"), Some(&ClosingDraft::new("", "because")));
    }

    #[test]
    fn cancel_missing_draft_is_no_op() {
        let mut store = ClosingStore::new();
        assert!(!store.cancel("x"));
        assert!(store.is_empty());
    }
}
