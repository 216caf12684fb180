//! Ordered card list with status-filtered views.
//!
//! # Invariants
//! - Newest cards are at the front.
//! - Status views preserve list order.
//! - Operations on unknown ids are no-ops.

use crate::model::card::{Card, CardId, CardStatus, NewCard, ValidationError};

/// Sole owner of the card list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardStore {
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-normalized list.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Full list, newest first.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Validates input and prepends a new `planned` card.
    ///
    /// # Errors
    /// - `ValidationError::CardFieldsRequired`; the list is left unchanged.
    pub fn create(&mut self, input: &NewCard) -> Result<CardId, ValidationError> {
        let card = Card::create(input)?;
        let id = card.id.clone();
        self.cards.insert(0, card);
        Ok(id)
    }

    /// Removes the matching card. Returns whether one was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.cards.len();
        self.cards.retain(|card| card.id != id);
        self.cards.len() != before
    }

    /// Replaces the status of the matching card without transition checks.
    ///
    /// Returns whether a card matched.
    pub fn set_status(&mut self, id: &str, status: CardStatus) -> bool {
        match self.get_mut(id) {
            Some(card) => {
                card.status = status;
                true
            }
            None => false,
        }
    }

    /// Marks the matching card `done` with validated closing text.
    ///
    /// Returns whether a card matched.
    pub(crate) fn close(&mut self, id: &str, result: String, learning: String) -> bool {
        match self.get_mut(id) {
            Some(card) => {
                card.close(result, learning);
                true
            }
            None => false,
        }
    }

    /// Cards with `status`, in list order.
    pub fn with_status(&self, status: CardStatus) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |card| card.status == status)
    }

    pub fn planned(&self) -> Vec<&Card> {
        self.with_status(CardStatus::Planned).collect()
    }

    pub fn doing(&self) -> Vec<&Card> {
        self.with_status(CardStatus::Doing).collect()
    }

    pub fn done(&self) -> Vec<&Card> {
        self.with_status(CardStatus::Done).collect()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::CardStore;
    use crate::model::card::{CardStatus, NewCard};

    #[test]
    fn create_prepends_newest_first() {
        let mut store = CardStore::new();
        let first = store.create(&NewCard::new("a", "h", "s")).unwrap();
        let second = store.create(&NewCard::new("b", "h", "s")).unwrap();
        assert_eq!(store.cards()[0].id, second);
        assert_eq!(store.cards()[1].id, first);
    }

    #[test]
    fn views_filter_by_status_in_list_order() {
        let mut store = CardStore::new();
        let a = store.create(&NewCard::new("a", "h", "s")).unwrap();
        let b = store.create(&NewCard::new("b", "h", "s")).unwrap();
        let c = store.create(&NewCard::new("c", "h", "s")).unwrap();
        store.set_status(&a, CardStatus::Doing);
        store.set_status(&c, CardStatus::Doing);

        let doing = store.doing().iter().map(|card| card.id.clone()).collect::<Vec<_>>();
        assert_eq!(doing, vec![c, a]);
        assert_eq!(store.planned().len(), 1);
        assert_eq!(store.planned()[0].id, b);
        assert!(store.done().is_empty());
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut store = CardStore::new();
        store.create(&NewCard::new("a", "h", "s")).unwrap();
        let before = store.clone();
        assert!(!store.delete("missing"));
        assert!(!store.set_status("missing", CardStatus::Done));
        assert_eq!(store, before);
    }
}
