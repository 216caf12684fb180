use learnlog_core::db::open_db;
use learnlog_core::{
    decode_cards, encode_cards, open_board, BoardConfig, BoardService, CardStatus, ClosingPatch,
    DiscardReason, KeyValueStore, LoadOutcome, MemoryKvStore, NewCard, SqliteKvStore,
};
use serde_json::{json, Value};
use std::collections::HashSet;

const KEY: &str = "learning_log_cards_v1";

fn file_config(dir: &tempfile::TempDir) -> BoardConfig {
    BoardConfig {
        db_path: dir.path().join("board.sqlite3"),
        storage_key: KEY.to_string(),
    }
}

#[test]
fn board_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);

    let (doing_id, done_id) = {
        let mut board = open_board(&config).unwrap();
        assert_eq!(board.load_outcome(), LoadOutcome::Absent);
        let doing = board.create_card(&NewCard::new("a", "h", "s")).unwrap();
        let done = board.create_card(&NewCard::new("b", "h", "s")).unwrap();
        board.set_status(&doing, CardStatus::Doing).unwrap();
        board.set_status(&done, CardStatus::Doing).unwrap();
        board.update_closing(&done, ClosingPatch::result("r"));
        board.update_closing(&done, ClosingPatch::learning("l"));
        board.confirm_done(&done).unwrap();
        board.start_closing(&doing);
        (doing, done)
    };

    let board = open_board(&config).unwrap();
    assert_eq!(board.load_outcome(), LoadOutcome::Valid);
    assert_eq!(board.cards().len(), 2);
    assert_eq!(board.card(&doing_id).unwrap().status, CardStatus::Doing);
    let done = board.card(&done_id).unwrap();
    assert_eq!(done.status, CardStatus::Done);
    assert_eq!(done.learning, "l");
    // Drafts are transient.
    assert!(!board.is_closing(&doing_id));
}

#[test]
fn stored_layout_has_the_seven_card_fields() {
    let mut board = BoardService::open(MemoryKvStore::new(), KEY).unwrap();
    board.create_card(&NewCard::new("t", "h", "s")).unwrap();
    let raw = board.into_storage().get(KEY).unwrap().unwrap();

    let parsed: Value = serde_json::from_str(&raw).unwrap();
    let card = parsed.as_array().unwrap()[0].as_object().unwrap();
    let mut keys = card.keys().map(String::as_str).collect::<Vec<_>>();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["hypothesis", "id", "learning", "result", "status", "success", "title"]
    );
    assert_eq!(card["status"], "planned");
}

#[test]
fn malformed_payload_is_normalized_and_written_back() {
    let payload = json!([
        {"id": 5, "title": "no id", "status": "archived"},
        {"id": "keep", "title": "ok", "hypothesis": "h", "success": "s",
         "status": "done", "result": "r", "learning": "l"},
        "not a card",
        {"id": "keep", "title": "dup"}
    ]);
    let store = MemoryKvStore::with_entry(KEY, payload.to_string());
    let board = BoardService::open(store, KEY).unwrap();

    assert!(matches!(board.load_outcome(), LoadOutcome::Coerced(_)));
    assert_eq!(board.cards().len(), 4);
    let ids = board.cards().iter().map(|card| card.id.as_str()).collect::<HashSet<_>>();
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(|id| !id.is_empty()));
    assert_eq!(board.cards()[0].status, CardStatus::Planned);
    assert_eq!(board.cards()[1].id, "keep");
    assert_eq!(board.cards()[1].status, CardStatus::Done);

    let cards = board.cards().to_vec();
    let healed = board.into_storage().get(KEY).unwrap().unwrap();
    let report = decode_cards(Some(&healed));
    assert_eq!(report.outcome, LoadOutcome::Valid);
    assert_eq!(report.cards, cards);
}

#[test]
fn unusable_payloads_load_as_empty_board() {
    for (raw, reason) in [
        ("not json at all", DiscardReason::InvalidJson),
        (r#"{"cards": []}"#, DiscardReason::NotAnArray),
        ("null", DiscardReason::NotAnArray),
    ] {
        let board = BoardService::open(MemoryKvStore::with_entry(KEY, raw), KEY).unwrap();
        assert!(board.cards().is_empty());
        assert_eq!(board.load_outcome(), LoadOutcome::Discarded(reason));
    }
}

#[test]
fn load_is_idempotent_over_encoded_boards() {
    let mut board = BoardService::open(MemoryKvStore::new(), KEY).unwrap();
    for title in ["a", "b", "c"] {
        board.create_card(&NewCard::new(title, "h", "s")).unwrap();
    }
    let id = board.cards()[1].id.clone();
    board.set_status(&id, CardStatus::Doing).unwrap();

    let encoded = encode_cards(board.cards()).unwrap();
    let first = decode_cards(Some(&encoded));
    let second = decode_cards(Some(&encode_cards(&first.cards).unwrap()));
    assert_eq!(first.cards, board.cards());
    assert_eq!(second.cards, first.cards);
}

#[test]
fn boards_under_different_keys_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");

    let conn = open_db(&path).unwrap();
    let mut first = BoardService::open(SqliteKvStore::try_new(conn).unwrap(), "first").unwrap();
    first.create_card(&NewCard::new("a", "h", "s")).unwrap();
    drop(first);

    let conn = open_db(&path).unwrap();
    let second = BoardService::open(SqliteKvStore::try_new(conn).unwrap(), "second").unwrap();
    assert!(second.cards().is_empty());
}
