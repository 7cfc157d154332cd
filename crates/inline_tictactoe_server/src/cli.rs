//! Command-line interface for inline_tictactoe.

use clap::{Parser, Subcommand};

/// Inline tic-tac-toe - drive callback games from the terminal
#[derive(Parser, Debug)]
#[command(name = "inline_tictactoe")]
#[command(about = "Resolve tic-tac-toe callback events against a persistent store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "inline_tictactoe.toml")]
    pub config: std::path::PathBuf,

    /// Override the SQLite database path
    #[arg(long)]
    pub db_path: Option<String>,

    /// Keep games in memory instead of SQLite (useful with `replay`)
    #[arg(long)]
    pub memory: bool,

    /// Print resolutions as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a new game as player 1
    New {
        /// Your user ID
        #[arg(long)]
        user_id: i64,

        /// Your display name
        #[arg(long)]
        name: String,

        /// Play the second mark instead of the first
        #[arg(long)]
        second_mark: bool,
    },

    /// Press a cell on an existing game
    Move {
        /// Your user ID
        #[arg(long)]
        user_id: i64,

        /// Your display name
        #[arg(long)]
        name: String,

        /// Game ID
        #[arg(long)]
        game_id: u64,

        /// Cell to press (0-8, row by row)
        #[arg(long)]
        cell: usize,
    },

    /// Deliver a raw callback token, e.g. `new_game|True` or `game3|4`
    Event {
        /// Your user ID
        #[arg(long)]
        user_id: i64,

        /// Your display name
        #[arg(long)]
        name: String,

        /// Callback token
        token: String,
    },

    /// Print a stored game
    Show {
        /// Game ID
        game_id: u64,
    },

    /// Read `<user_id> <token> <name>` lines from stdin and resolve each
    Replay,
}
