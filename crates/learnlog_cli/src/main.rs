//! Terminal front end for the learning log.
//!
//! # Responsibility
//! - Parse commands and dispatch them to the core board service.
//! - Print the board in three columns and report validation messages.

mod args;
mod commands;

use clap::Parser;

fn main() {
    let cli = args::Cli::parse();
    if let Err(err) = commands::run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
