//! Command execution against the board service.

use crate::args::{Cli, Command};
use learnlog_core::{
    init_logging, open_board, BoardConfig, BoardError, Card, CardStatus, ClosingPatch, LogLevel,
    NewCard, SqliteBoard,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    Board(BoardError),
    Logging(String),
    CardNotFound(String),
    /// The requested move does not apply to the card's current stage.
    InvalidMove { id: String, status: CardStatus },
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "logging init failed: {err}"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::InvalidMove { id, status } => {
                write!(f, "card {id} is {status}; that move is not available")
            }
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Board(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BoardError> for CliError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

pub fn run(cli: Cli) -> CliResult<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| LogLevel::for_build().as_str());
        init_logging(level, log_dir).map_err(|err| CliError::Logging(err.to_string()))?;
    }

    let mut config = BoardConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(key) = cli.key {
        config.storage_key = key;
    }
    let mut board = open_board(&config)?;

    match cli.command {
        Command::Add {
            title,
            hypothesis,
            success,
        } => {
            let id = board.create_card(&NewCard::new(title, hypothesis, success))?;
            println!("added {id}");
        }
        Command::List => print_board(&board),
        Command::Start { id } => {
            require_status(&board, &id, &[CardStatus::Planned])?;
            board.set_status(&id, CardStatus::Doing)?;
            println!("{id} -> doing");
        }
        Command::Back { id } => {
            let target = match require_status(&board, &id, &[CardStatus::Doing, CardStatus::Done])? {
                CardStatus::Done => CardStatus::Doing,
                _ => CardStatus::Planned,
            };
            board.set_status(&id, target)?;
            println!("{id} -> {target}");
        }
        Command::Finish {
            id,
            result,
            learning,
        } => {
            require_status(&board, &id, &[CardStatus::Doing])?;
            board.start_closing(&id);
            board.update_closing(
                &id,
                ClosingPatch {
                    result: Some(result),
                    learning: Some(learning),
                },
            );
            board.confirm_done(&id)?;
            println!("{id} -> done");
        }
        Command::Delete { id } => {
            if !board.remove_card(&id)? {
                return Err(CliError::CardNotFound(id));
            }
            println!("deleted {id}");
        }
        Command::Learnings => {
            let learnings = board.learnings();
            if learnings.is_empty() {
                println!("no done cards yet");
            }
            for entry in learnings {
                println!("- {} ({})", entry.learning, entry.title);
            }
        }
    }
    Ok(())
}

fn require_status(board: &SqliteBoard, id: &str, allowed: &[CardStatus]) -> CliResult<CardStatus> {
    let card = board
        .card(id)
        .ok_or_else(|| CliError::CardNotFound(id.to_string()))?;
    if allowed.contains(&card.status) {
        Ok(card.status)
    } else {
        Err(CliError::InvalidMove {
            id: id.to_string(),
            status: card.status,
        })
    }
}

fn print_board(board: &SqliteBoard) {
    let counts = board.column_counts();
    print_column("Planned", counts.planned, &board.planned());
    print_column("Doing", counts.doing, &board.doing());
    print_column("Done", counts.done, &board.done());
}

fn print_column(title: &str, count: usize, cards: &[&Card]) {
    println!("{title} ({count})");
    if cards.is_empty() {
        println!("  (none)");
    }
    for card in cards {
        println!("  [{}] {}", card.id, card.title);
        println!("      hypothesis: {}", card.hypothesis);
        println!("      success: {}", card.success);
        if card.status == CardStatus::Done {
            println!("      result: {}", card.result);
            println!("      learning: {}", card.learning);
        }
    }
}
