//! Inline tic-tac-toe - game state for callback-driven play
//!
//! Games are never attached to a live session. Every button press arrives
//! as a standalone event carrying the user and the pressed cell; the engine
//! loads the stored [`GameState`], applies the press and hands back what
//! changed.
//!
//! # Example
//!
//! ```
//! use inline_tictactoe::{GameId, GameState, Mark, MoveAccepted, Player, UserId};
//!
//! let alice = Player::new(UserId(1), "Alice");
//! let bob = Player::new(UserId(2), "Bob");
//!
//! let mut game = GameState::new(GameId(1), true);
//! game.bind_player1(alice.clone());
//!
//! // Bob's first press only takes the second seat.
//! assert!(matches!(game.apply_move(&bob, Some(4)), Ok(MoveAccepted::Joined(_))));
//!
//! // Alice opens in the centre with the first mark.
//! let placed = game.apply_move(&alice, Some(4)).unwrap();
//! assert!(matches!(placed, MoveAccepted::Placed { mark: Mark::Cross, cell: 4, .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod player;
pub mod rules;
mod state;
mod types;

pub use action::{MoveAccepted, Phase, Rejection};
pub use player::{Player, PlayerSlot, UserId};
pub use state::{GameId, GameState};
pub use types::{Cell, GameStatus, Grid, Mark};
