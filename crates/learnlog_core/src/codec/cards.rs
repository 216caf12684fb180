//! Card list encode/decode with defensive normalization.
//!
//! # Responsibility
//! - Decode stored JSON into cards, coercing every field to its expected
//!   shape and reporting how much coercion happened.
//! - Encode cards into the same seven-field layout.
//!
//! # Invariants
//! - A non-string field becomes `""`.
//! - A missing, non-string, empty or duplicate `id` is regenerated.
//! - A `status` outside `planned|doing|done` becomes `planned`.
//! - Decoding the encoding of a card list yields the same list.

use crate::model::card::{new_card_id, Card, CardId, CardStatus};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Why stored text was discarded as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Stored text is not valid JSON.
    InvalidJson,
    /// Stored JSON is valid but not an array.
    NotAnArray,
}

/// Counters describing per-card coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoercionSummary {
    /// Number of cards that needed at least one default.
    pub cards_coerced: usize,
    /// Text fields replaced by `""`.
    pub fields_defaulted: usize,
    /// Ids generated because the stored one was unusable.
    pub ids_regenerated: usize,
    /// Statuses replaced by `planned`.
    pub statuses_defaulted: usize,
}

impl CoercionSummary {
    fn is_clean(&self) -> bool {
        self.cards_coerced == 0
    }
}

/// How a load resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was stored under the key.
    Absent,
    /// Every stored card was already well-formed.
    Valid,
    /// Some cards were repaired with defaults.
    Coerced(CoercionSummary),
    /// Stored text was unusable and replaced with an empty list.
    Discarded(DiscardReason),
}

/// Decoded cards plus the outcome that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub cards: Vec<Card>,
    pub outcome: LoadOutcome,
}

impl LoadReport {
    fn empty(outcome: LoadOutcome) -> Self {
        Self {
            cards: Vec::new(),
            outcome,
        }
    }
}

/// Decodes stored board text.
///
/// `None` means the key was absent.
pub fn decode_cards(raw: Option<&str>) -> LoadReport {
    let Some(raw) = raw else {
        return LoadReport::empty(LoadOutcome::Absent);
    };

    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return LoadReport::empty(LoadOutcome::Discarded(DiscardReason::InvalidJson)),
    };

    let Value::Array(items) = parsed else {
        return LoadReport::empty(LoadOutcome::Discarded(DiscardReason::NotAnArray));
    };

    let mut summary = CoercionSummary::default();
    let mut seen_ids: HashSet<CardId> = HashSet::with_capacity(items.len());
    let cards = items
        .iter()
        .map(|item| normalize_card(item, &mut seen_ids, &mut summary))
        .collect();

    let outcome = if summary.is_clean() {
        LoadOutcome::Valid
    } else {
        LoadOutcome::Coerced(summary)
    };
    LoadReport { cards, outcome }
}

/// Encodes cards as the stored JSON array.
///
/// # Errors
/// - Propagates serializer failures instead of writing a placeholder list.
pub fn encode_cards(cards: &[Card]) -> serde_json::Result<String> {
    serde_json::to_string(cards)
}

fn normalize_card(
    item: &Value,
    seen_ids: &mut HashSet<CardId>,
    summary: &mut CoercionSummary,
) -> Card {
    let empty = Map::new();
    let fields = item.as_object().unwrap_or(&empty);
    let mut coerced = false;

    let id = match fields.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() && !seen_ids.contains(id) => id.to_string(),
        _ => {
            coerced = true;
            summary.ids_regenerated += 1;
            fresh_unique_id(seen_ids)
        }
    };
    seen_ids.insert(id.clone());

    let status = match fields
        .get("status")
        .and_then(Value::as_str)
        .and_then(CardStatus::parse)
    {
        Some(status) => status,
        None => {
            coerced = true;
            summary.statuses_defaulted += 1;
            CardStatus::Planned
        }
    };

    let mut text = |name: &str| match fields.get(name).and_then(Value::as_str) {
        Some(value) => value.to_string(),
        None => {
            coerced = true;
            summary.fields_defaulted += 1;
            String::new()
        }
    };
    let title = text("title");
    let hypothesis = text("hypothesis");
    let success = text("success");
    let result = text("result");
    let learning = text("learning");

    if coerced {
        summary.cards_coerced += 1;
    }

    Card {
        id,
        title,
        hypothesis,
        success,
        status,
        result,
        learning,
    }
}

fn fresh_unique_id(seen_ids: &HashSet<CardId>) -> CardId {
    loop {
        let id = new_card_id();
        if !seen_ids.contains(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_cards, encode_cards, DiscardReason, LoadOutcome};
    use crate::model::card::{Card, CardStatus, NewCard};

    #[test]
    fn absent_key_yields_empty_list() {
        let report = decode_cards(None);
        assert!(report.cards.is_empty());
        assert_eq!(report.outcome, LoadOutcome::Absent);
    }

    #[test]
    fn invalid_json_is_discarded() {
        let report = decode_cards(Some("{not json"));
        assert!(report.cards.is_empty());
        assert_eq!(
            report.outcome,
            LoadOutcome::Discarded(DiscardReason::InvalidJson)
        );
    }

    #[test]
    fn non_array_is_discarded() {
        let report = decode_cards(Some(r#"{"id":"a"}"#));
        assert!(report.cards.is_empty());
        assert_eq!(
            report.outcome,
            LoadOutcome::Discarded(DiscardReason::NotAnArray)
        );
    }

    #[test]
    fn wrong_field_types_default_to_empty_strings() {
        let raw = r#"[{"id":"a","title":7,"hypothesis":null,"success":"s","status":"doing","result":[],"learning":{}}]"#;
        let report = decode_cards(Some(raw));
        let card = &report.cards[0];
        assert_eq!(card.id, "a");
        assert_eq!(card.title, "");
        assert_eq!(card.hypothesis, "");
        assert_eq!(card.success, "s");
        assert_eq!(card.status, CardStatus::Doing);
        assert_eq!(card.result, "");
        assert_eq!(card.learning, "");
        match report.outcome {
            LoadOutcome::Coerced(summary) => {
                assert_eq!(summary.cards_coerced, 1);
                assert_eq!(summary.fields_defaulted, 4);
                assert_eq!(summary.ids_regenerated, 0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn duplicate_and_empty_ids_are_regenerated() {
        let raw = r#"[
            {"id":"same","title":"a","hypothesis":"h","success":"s","status":"planned","result":"","learning":""},
            {"id":"same","title":"b","hypothesis":"h","success":"s","status":"planned","result":"","learning":""},
            {"id":"","title":"c","hypothesis":"h","success":"s","status":"planned","result":"","learning":""}
        ]"#;
        let report = decode_cards(Some(raw));
        assert_eq!(report.cards[0].id, "same");
        assert_ne!(report.cards[1].id, "same");
        assert!(!report.cards[2].id.is_empty());
        assert_ne!(report.cards[1].id, report.cards[2].id);
        assert_eq!(report.cards[1].title, "b");
    }

    #[test]
    fn non_object_elements_become_blank_planned_cards() {
        let report = decode_cards(Some(r#"[42, "text", null]"#));
        assert_eq!(report.cards.len(), 3);
        for card in &report.cards {
            assert_eq!(card.status, CardStatus::Planned);
            assert!(!card.id.is_empty());
            assert!(card.title.is_empty());
        }
    }

    #[test]
    fn encode_then_decode_is_lossless() {
        let mut closed = Card::create(&NewCard::new("t", "h", "s")).unwrap();
        closed.close("r".to_string(), "l".to_string());
        let cards = vec![Card::create(&NewCard::new("a", "b", "c")).unwrap(), closed];

        let report = decode_cards(Some(&encode_cards(&cards).unwrap()));
        assert_eq!(report.cards, cards);
        assert_eq!(report.outcome, LoadOutcome::Valid);
    }
}
