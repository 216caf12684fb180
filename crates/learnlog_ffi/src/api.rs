//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the board operations to Dart via FRB sync functions.
//! - Own the process-wide board handle the UI reads from and writes to.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Validation failures come back as `ok=false` with the user-facing message.
//! - Removing a card always removes its closing draft.

use learnlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_board,
    BoardConfig, BoardError, Card, CardStatus, ClosingDraft, ClosingPatch, NewCard, SqliteBoard,
};
use log::error;
use std::sync::{Mutex, MutexGuard, OnceLock};

static BOARD: OnceLock<Mutex<Option<SqliteBoard>>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Card as shown on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCardItem {
    pub id: String,
    pub title: String,
    pub hypothesis: String,
    pub success: String,
    /// `planned|doing|done`.
    pub status: String,
    pub result: String,
    pub learning: String,
}

/// Closing draft attached to one card id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingDraftItem {
    pub card_id: String,
    pub result: String,
    pub learning: String,
}

/// Three columns plus in-progress drafts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    pub planned: Vec<BoardCardItem>,
    pub doing: Vec<BoardCardItem>,
    pub done: Vec<BoardCardItem>,
    pub closing: Vec<ClosingDraftItem>,
    /// Non-empty when the board could not be read.
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Card created by the action, when any.
    pub card_id: Option<String>,
    /// Human-readable message; the validation text on rejection.
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            card_id: None,
            message: message.into(),
        }
    }

    fn created(card_id: String) -> Self {
        Self {
            ok: true,
            card_id: Some(card_id),
            message: "Card created.".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            card_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current board.
///
/// # FFI contract
/// - Sync call, reads in-process state only (after first open).
#[flutter_rust_bridge::frb(sync)]
pub fn board_view() -> BoardView {
    match with_board(|board| Ok(board.snapshot())) {
        Ok(snapshot) => BoardView {
            planned: snapshot.planned.iter().map(to_card_item).collect(),
            doing: snapshot.doing.iter().map(to_card_item).collect(),
            done: snapshot.done.iter().map(to_card_item).collect(),
            closing: snapshot
                .closing
                .iter()
                .map(|(card_id, draft)| to_draft_item(card_id, draft))
                .collect(),
            message: String::new(),
        },
        Err(message) => BoardView {
            message,
            ..BoardView::default()
        },
    }
}

/// Creates a `planned` card from the add form.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_card(title: String, hypothesis: String, success: String) -> BoardActionResponse {
    let input = NewCard::new(title, hypothesis, success);
    match with_board(|board| board.create_card(&input)) {
        Ok(card_id) => BoardActionResponse::created(card_id),
        Err(message) => BoardActionResponse::failure(message),
    }
}

/// Deletes a card and its closing draft. Unknown ids succeed as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_card(card_id: String) -> BoardActionResponse {
    respond(with_board(|board| board.remove_card(&card_id)).map(|_| "Card deleted."))
}

/// Moves a card to `status` (`planned|doing|done`).
#[flutter_rust_bridge::frb(sync)]
pub fn board_set_status(card_id: String, status: String) -> BoardActionResponse {
    let Some(status) = CardStatus::parse(status.trim()) else {
        return BoardActionResponse::failure(format!("unknown status `{status}`"));
    };
    respond(with_board(|board| board.set_status(&card_id, status)).map(|_| "Status updated."))
}

/// Opens the closing form for a card.
#[flutter_rust_bridge::frb(sync)]
pub fn board_start_closing(card_id: String) -> BoardActionResponse {
    respond(with_board(|board| Ok(board.start_closing(&card_id))).map(|_| "Closing started."))
}

/// Applies one keystroke-level edit to a closing draft.
///
/// `None` leaves that field unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn board_update_closing(
    card_id: String,
    result: Option<String>,
    learning: Option<String>,
) -> BoardActionResponse {
    let patch = ClosingPatch { result, learning };
    respond(
        with_board(|board| {
            board.update_closing(&card_id, patch);
            Ok(())
        })
        .map(|()| "Draft updated."),
    )
}

/// Discards a closing draft.
#[flutter_rust_bridge::frb(sync)]
pub fn board_cancel_closing(card_id: String) -> BoardActionResponse {
    respond(with_board(|board| Ok(board.cancel_closing(&card_id))).map(|_| "Closing cancelled."))
}

/// Confirms a closing draft, moving the card to `done`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_confirm_done(card_id: String) -> BoardActionResponse {
    respond(with_board(|board| board.confirm_done(&card_id)).map(|()| "Card closed."))
}

fn respond(outcome: Result<&'static str, String>) -> BoardActionResponse {
    match outcome {
        Ok(message) => BoardActionResponse::success(message),
        Err(message) => BoardActionResponse::failure(message),
    }
}

/// Runs `f` against the process-wide board, opening it on first use.
///
/// A failed open is retried on the next call.
fn with_board<T>(f: impl FnOnce(&mut SqliteBoard) -> Result<T, BoardError>) -> Result<T, String> {
    let mut guard = lock_board();
    if guard.is_none() {
        let config = BoardConfig::from_env();
        match open_board(&config) {
            Ok(board) => *guard = Some(board),
            Err(err) => {
                error!("event=board_open module=ffi status=error error={err}");
                return Err(format!("board open failed: {err}"));
            }
        }
    }
    let Some(board) = guard.as_mut() else {
        return Err("board unavailable".to_string());
    };
    f(board).map_err(|err| match err {
        BoardError::Validation(validation) => validation.to_string(),
        other => {
            error!("event=board_write module=ffi status=error error={other}");
            format!("board write failed: {other}")
        }
    })
}

fn lock_board() -> MutexGuard<'static, Option<SqliteBoard>> {
    // A panic while holding the lock leaves the board itself consistent.
    BOARD
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn to_card_item(card: &Card) -> BoardCardItem {
    BoardCardItem {
        id: card.id.clone(),
        title: card.title.clone(),
        hypothesis: card.hypothesis.clone(),
        success: card.success.clone(),
        status: card.status.as_str().to_string(),
        result: card.result.clone(),
        learning: card.learning.clone(),
    }
}

fn to_draft_item(card_id: &str, draft: &ClosingDraft) -> ClosingDraftItem {
    ClosingDraftItem {
        card_id: card_id.to_string(),
        result: draft.result.clone(),
        learning: draft.learning.clone(),
    }
}
