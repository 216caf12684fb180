//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Learning log: track hypotheses from planned to done.
#[derive(Parser, Debug)]
#[command(name = "learnlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite file holding the board (defaults to LEARNLOG_DB_PATH or a temp file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Storage key the cards live under
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    /// Log level used with --log-dir (debug in debug builds, info otherwise)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new hypothesis as planned
    Add {
        title: String,
        hypothesis: String,
        /// Success criterion
        success: String,
    },

    /// Show the board in planned/doing/done columns
    List,

    /// Move a planned card to doing
    Start { id: String },

    /// Move a card back one stage (doing -> planned, done -> doing)
    Back { id: String },

    /// Close a doing card with its result and learning
    Finish {
        id: String,
        #[arg(long)]
        result: String,
        #[arg(long)]
        learning: String,
    },

    /// Delete a card
    Delete { id: String },

    /// List learnings of done cards
    Learnings,
}
