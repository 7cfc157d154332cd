//! Players and the two seats they bind to.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// External user identifier delivered with every callback event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// A user bound to one of the two seats of a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Player {
    /// External user identifier.
    id: UserId,
    /// Display name shown next to the player's mark.
    name: String,
}

impl Player {
    /// Creates a player binding.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One of the two seats in a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum PlayerSlot {
    /// The user who opened the game.
    #[display("player 1")]
    One,
    /// The first other user to press a button.
    #[display("player 2")]
    Two,
}

impl PlayerSlot {
    /// Returns the other seat.
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    /// Seat whose turn it is for the persisted turn flag (`false` = player 1).
    pub fn from_turn(turn: bool) -> Self {
        if turn { PlayerSlot::Two } else { PlayerSlot::One }
    }
}
