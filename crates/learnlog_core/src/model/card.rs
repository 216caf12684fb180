//! Card domain model.
//!
//! # Responsibility
//! - Define the hypothesis/experiment record tracked by the board.
//! - Validate user input before a card is constructed.
//!
//! # Invariants
//! - New cards start as `planned` with empty `result`/`learning`.
//! - `status == done` implies non-empty `result` and `learning` at the moment
//!   of the close transition; it is not re-checked afterwards.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque card identifier.
///
/// Persisted boards may carry ids from older clients, so this stays a string
/// rather than a parsed UUID.
pub type CardId = String;

/// Workflow stage of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// Recorded but not started.
    Planned,
    /// Experiment is running.
    Doing,
    /// Closed with a result and a learning.
    Done,
}

impl CardStatus {
    /// All statuses in board column order.
    pub const ALL: [CardStatus; 3] = [CardStatus::Planned, CardStatus::Doing, CardStatus::Done];

    /// Stable storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Parses a storage label; anything else yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "planned" => Some(Self::Planned),
            "doing" => Some(Self::Doing),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl Display for CardStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing validation failure for board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Create was called with a blank title, hypothesis or success criterion.
    CardFieldsRequired,
    /// Confirm was called with a blank result or learning.
    ClosingFieldsRequired,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CardFieldsRequired => f.write_str("title/hypothesis/success are required"),
            Self::ClosingFieldsRequired => f.write_str("result/learning are required"),
        }
    }
}

impl Error for ValidationError {}

/// Input for creating a card. Values are trimmed before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCard {
    pub title: String,
    pub hypothesis: String,
    pub success: String,
}

impl NewCard {
    pub fn new(
        title: impl Into<String>,
        hypothesis: impl Into<String>,
        success: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            hypothesis: hypothesis.into(),
            success: success.into(),
        }
    }
}

/// Hypothesis/experiment record.
///
/// Field names match the persisted JSON layout one-to-one. Decoding goes
/// through `codec::cards`, never a derived `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub hypothesis: String,
    /// Success criterion.
    pub success: String,
    pub status: CardStatus,
    /// Empty until closed.
    pub result: String,
    /// Empty until closed.
    pub learning: String,
}

impl Card {
    /// Validates and trims `input`, then builds a `planned` card with a fresh id.
    ///
    /// # Errors
    /// - `ValidationError::CardFieldsRequired` when any trimmed field is empty.
    pub fn create(input: &NewCard) -> Result<Self, ValidationError> {
        let title = input.title.trim();
        let hypothesis = input.hypothesis.trim();
        let success = input.success.trim();
        if title.is_empty() || hypothesis.is_empty() || success.is_empty() {
            return Err(ValidationError::CardFieldsRequired);
        }

        Ok(Self {
            id: new_card_id(),
            title: title.to_string(),
            hypothesis: hypothesis.to_string(),
            success: success.to_string(),
            status: CardStatus::Planned,
            result: String::new(),
            learning: String::new(),
        })
    }

    /// Closes the card with already-validated text.
    pub(crate) fn close(&mut self, result: String, learning: String) {
        self.status = CardStatus::Done;
        self.result = result;
        self.learning = learning;
    }
}

/// Generates a fresh opaque card id.
pub fn new_card_id() -> CardId {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::{Card, CardStatus, NewCard, ValidationError};

    #[test]
    fn create_trims_fields_and_starts_planned() {
        let card = Card::create(&NewCard::new("  Try X ", "X improves Y", " Y rises\n")).unwrap();
        assert_eq!(card.title, "Try X");
        assert_eq!(card.success, "Y rises");
        assert_eq!(card.status, CardStatus::Planned);
        assert!(card.result.is_empty());
        assert!(card.learning.is_empty());
        assert!(!card.id.is_empty());
    }

    #[test]
    fn create_rejects_whitespace_only_fields() {
        let err = Card::create(&NewCard::new("title", "   ", "success")).unwrap_err();
        assert_eq!(err, ValidationError::CardFieldsRequired);
        assert_eq!(err.to_string(), "title/hypothesis/success are required");
    }

    #[test]
    fn status_labels_roundtrip() {
        for status in CardStatus::ALL {
            assert_eq!(CardStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CardStatus::parse("Done"), None);
    }
}
