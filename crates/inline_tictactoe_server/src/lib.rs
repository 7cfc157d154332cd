//! Inline tic-tac-toe server - persistence and event resolution
//!
//! Everything around the pure game model in [`inline_tictactoe`]:
//!
//! - **Store**: key-value port with in-memory and SQLite adapters
//! - **Registry**: identifier allocation and game records
//! - **Resolver**: turns `(user, callback token)` events into game updates
//! - **View**: read-only snapshot plus the emoji text the bot posts
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use inline_tictactoe::{Player, UserId};
//! use inline_tictactoe_server::{GameRegistry, MemoryStore, MoveResolver, Outcome};
//!
//! # fn example() -> Result<(), inline_tictactoe_server::ResolveError> {
//! let registry = GameRegistry::new(Arc::new(MemoryStore::new()));
//! let resolver = MoveResolver::new(registry, true);
//!
//! let alice = Player::new(UserId(1), "Alice");
//! let started = resolver.dispatch(&alice, "new_game|True")?;
//! assert_eq!(started.outcome(), &Outcome::InProgress);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod callback;
mod config;
mod record;
mod registry;
mod resolver;
mod store;
mod view;

pub use callback::{CallbackData, TokenError};
pub use config::{ConfigError, ConfigSource, DB_PATH_ENV, EngineConfig, StoreKind};
pub use record::{GameRecord, StoredGrid, StoredPlayer, UNBOUND_NAME};
pub use registry::{COUNTER_KEY, GameRegistry, game_key};
pub use resolver::{MoveResolver, Outcome, ResolveError, Resolution};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use view::{
    GameStateView, SeatView, board_rows, cell_symbol, cell_tokens, invitation_tokens, render_board,
    render_end_message, render_message, render_turn_message,
};
