//! Board use-case service.
//!
//! # Responsibility
//! - Own the card list, the closing drafts and the storage they persist to.
//! - Expose the create/remove/status/closing operations used by front ends.
//! - Write the full card list back after every card-list change.
//!
//! # Invariants
//! - Validation failures never mutate state or write to storage.
//! - Card-list changes are staged and only committed after the write-back
//!   succeeds, so a failed write leaves the board as it was.
//! - Removing a card also removes its closing draft.
//! - Draft-only operations never write to storage.

use crate::codec::cards::{decode_cards, encode_cards, LoadOutcome};
use crate::model::card::{Card, CardId, CardStatus, NewCard, ValidationError};
use crate::model::draft::{ClosingDraft, ClosingPatch};
use crate::storage::{KeyValueStore, StorageError};
use crate::store::card_store::CardStore;
use crate::store::closing_store::ClosingStore;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Service error for board use-cases.
#[derive(Debug)]
pub enum BoardError {
    /// User-facing input problem; nothing was changed.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Storage(StorageError),
    /// Card list could not be encoded for storage.
    Encode(serde_json::Error),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode cards: {err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<ValidationError> for BoardError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<StorageError> for BoardError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Three-column read model plus in-progress drafts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub planned: Vec<Card>,
    pub doing: Vec<Card>,
    pub done: Vec<Card>,
    /// Drafts ordered by card id.
    pub closing: BTreeMap<CardId, ClosingDraft>,
}

/// One entry in the learnings-only list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningEntry {
    pub card_id: CardId,
    pub title: String,
    pub learning: String,
}

/// Card count per column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnCounts {
    pub planned: usize,
    pub doing: usize,
    pub done: usize,
}

/// Board facade over a key-value store.
pub struct BoardService<S: KeyValueStore> {
    storage: S,
    storage_key: String,
    cards: CardStore,
    closing: ClosingStore,
    load_outcome: LoadOutcome,
}

impl<S: KeyValueStore> BoardService<S> {
    /// Loads the board stored under `storage_key` and writes the normalized
    /// list back.
    ///
    /// Malformed stored text never fails the load; it degrades to defaults
    /// and is reported through `load_outcome()`.
    pub fn open(storage: S, storage_key: impl Into<String>) -> BoardResult<Self> {
        let storage_key = storage_key.into();
        let raw = storage.get(&storage_key)?;
        let report = decode_cards(raw.as_deref());
        log_load_outcome(&report.outcome, report.cards.len());

        let mut service = Self {
            storage,
            storage_key,
            cards: CardStore::new(),
            closing: ClosingStore::new(),
            load_outcome: report.outcome,
        };
        service.commit(CardStore::from_cards(report.cards))?;
        Ok(service)
    }

    /// How the initial load resolved.
    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    /// Full card list, newest first.
    pub fn cards(&self) -> &[Card] {
        self.cards.cards()
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn planned(&self) -> Vec<&Card> {
        self.cards.planned()
    }

    pub fn doing(&self) -> Vec<&Card> {
        self.cards.doing()
    }

    pub fn done(&self) -> Vec<&Card> {
        self.cards.done()
    }

    pub fn closing_draft(&self, id: &str) -> Option<&ClosingDraft> {
        self.closing.get(id)
    }

    pub fn is_closing(&self, id: &str) -> bool {
        self.closing.is_closing(id)
    }

    /// Creates a `planned` card at the front of the list.
    ///
    /// # Errors
    /// - `BoardError::Validation(CardFieldsRequired)` for blank input.
    /// - `BoardError::Storage` when the write-back fails.
    pub fn create_card(&mut self, input: &NewCard) -> BoardResult<CardId> {
        let mut staged = self.cards.clone();
        let id = match staged.create(input) {
            Ok(id) => id,
            Err(err) => {
                info!("event=card_create module=board status=rejected reason=fields_required");
                return Err(err.into());
            }
        };
        self.commit(staged)?;
        info!(
            "event=card_create module=board status=ok card_id={} total={}",
            id,
            self.cards.len()
        );
        Ok(id)
    }

    /// Removes a card together with its closing draft.
    ///
    /// Returns whether a card was removed; unknown ids are a no-op.
    pub fn remove_card(&mut self, id: &str) -> BoardResult<bool> {
        let mut staged = self.cards.clone();
        if !staged.delete(id) {
            let draft_removed = self.closing.cancel(id);
            debug!("event=card_remove module=board status=noop card_id={id} draft_removed={draft_removed}");
            return Ok(false);
        }
        self.commit(staged)?;
        let draft_removed = self.closing.cancel(id);
        info!(
            "event=card_remove module=board status=ok card_id={} draft_removed={}",
            id, draft_removed
        );
        Ok(true)
    }

    /// Sets a card's status without transition checks.
    ///
    /// Used for "move" and "move back" actions; closing a card should go
    /// through `confirm_done`. Returns whether a card matched.
    pub fn set_status(&mut self, id: &str, status: CardStatus) -> BoardResult<bool> {
        let mut staged = self.cards.clone();
        if !staged.set_status(id, status) {
            debug!("event=card_status module=board status=noop card_id={id}");
            return Ok(false);
        }
        self.commit(staged)?;
        info!("event=card_status module=board status=ok card_id={id} to={status}");
        Ok(true)
    }

    /// Starts (or restarts) closing a card, seeding the draft from the card.
    ///
    /// Returns whether the card exists.
    pub fn start_closing(&mut self, id: &str) -> bool {
        match self.cards.get(id) {
            Some(card) => {
                self.closing.start(card);
                debug!("event=closing_start module=board status=ok card_id={id}");
                true
            }
            None => false,
        }
    }

    /// Merges a partial edit into the draft for `id`.
    pub fn update_closing(&mut self, id: &str, patch: ClosingPatch) {
        self.closing.update(id, patch);
    }

    /// Discards the draft for `id`; the card itself is untouched.
    pub fn cancel_closing(&mut self, id: &str) -> bool {
        self.closing.cancel(id)
    }

    /// Closes the card using its draft.
    ///
    /// A missing draft counts as empty text. On success the card becomes
    /// `done` with the trimmed result/learning and the draft is discarded.
    ///
    /// # Errors
    /// - `BoardError::Validation(ClosingFieldsRequired)` when either trimmed
    ///   field is empty; the card and the draft are left as they were.
    /// - `BoardError::Storage` when the write-back fails; the card and the
    ///   draft are left as they were.
    pub fn confirm_done(&mut self, id: &str) -> BoardResult<()> {
        let Some((result, learning)) = self.closing.current(id).validated() else {
            info!("event=closing_confirm module=board status=rejected card_id={id} reason=fields_required");
            return Err(ValidationError::ClosingFieldsRequired.into());
        };

        let mut staged = self.cards.clone();
        if staged.close(id, result, learning) {
            self.commit(staged)?;
            info!("event=closing_confirm module=board status=ok card_id={id}");
        } else {
            debug!("event=closing_confirm module=board status=noop card_id={id}");
        }
        self.closing.cancel(id);
        Ok(())
    }

    /// Snapshot of the three columns and all drafts.
    pub fn snapshot(&self) -> BoardSnapshot {
        let column = |status| self.cards.with_status(status).cloned().collect::<Vec<_>>();
        BoardSnapshot {
            planned: column(CardStatus::Planned),
            doing: column(CardStatus::Doing),
            done: column(CardStatus::Done),
            closing: self
                .closing
                .drafts()
                .iter()
                .map(|(id, draft)| (id.clone(), draft.clone()))
                .collect(),
        }
    }

    pub fn column_counts(&self) -> ColumnCounts {
        ColumnCounts {
            planned: self.cards.with_status(CardStatus::Planned).count(),
            doing: self.cards.with_status(CardStatus::Doing).count(),
            done: self.cards.with_status(CardStatus::Done).count(),
        }
    }

    /// Learnings of done cards, in list order.
    pub fn learnings(&self) -> Vec<LearningEntry> {
        self.cards
            .with_status(CardStatus::Done)
            .map(|card| LearningEntry {
                card_id: card.id.clone(),
                title: card.title.clone(),
                learning: card.learning.clone(),
            })
            .collect()
    }

    /// Consumes the service and returns the underlying store.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Writes `staged` in full and makes it the current list on success.
    fn commit(&mut self, staged: CardStore) -> BoardResult<()> {
        let encoded = encode_cards(staged.cards())?;
        if let Err(err) = self.storage.set(&self.storage_key, &encoded) {
            warn!(
                "event=board_persist module=board status=error cards={} error={}",
                staged.len(),
                err
            );
            return Err(err.into());
        }
        debug!(
            "event=board_persist module=board status=ok cards={} bytes={}",
            staged.len(),
            encoded.len()
        );
        self.cards = staged;
        Ok(())
    }
}

fn log_load_outcome(outcome: &LoadOutcome, cards: usize) {
    match outcome {
        LoadOutcome::Absent => info!("event=board_load module=board status=ok source=absent cards=0"),
        LoadOutcome::Valid => info!("event=board_load module=board status=ok source=stored cards={cards}"),
        LoadOutcome::Coerced(summary) => warn!(
            "event=board_load module=board status=coerced cards={} cards_coerced={} fields_defaulted={} ids_regenerated={} statuses_defaulted={}",
            cards,
            summary.cards_coerced,
            summary.fields_defaulted,
            summary.ids_regenerated,
            summary.statuses_defaulted
        ),
        LoadOutcome::Discarded(reason) => {
            warn!("event=board_load module=board status=discarded reason={reason:?} cards=0");
        }
    }
}
