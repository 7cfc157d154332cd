//! Stored shape of a game.
//!
//! Records keep the layout the bot has always written: players as
//! `{ "id": .., "name": .. }` with a null id for an empty seat, and the grid
//! as nine integer codes. Older records may carry the grid as an object and
//! a `locked` flag; both are accepted on read. A grid in no known shape
//! reads as an empty grid rather than failing the whole record.

use inline_tictactoe::{Cell, GameId, GameState, Grid, Player, UserId};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Name shown for a seat nobody has taken.
pub const UNBOUND_NAME: &str = "?";

/// A seat as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlayer {
    /// Bound user, `None` for an empty seat.
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name.
    #[serde(default = "unbound_name")]
    pub name: String,
}

fn unbound_name() -> String {
    UNBOUND_NAME.to_string()
}

impl Default for StoredPlayer {
    fn default() -> Self {
        Self {
            id: None,
            name: unbound_name(),
        }
    }
}

impl From<Option<&Player>> for StoredPlayer {
    fn from(player: Option<&Player>) -> Self {
        match player {
            Some(player) => Self {
                id: Some(player.id().0),
                name: player.name().clone(),
            },
            None => Self::default(),
        }
    }
}

impl StoredPlayer {
    /// Converts back to a binding; an empty seat yields `None`.
    pub fn into_player(self) -> Option<Player> {
        self.id.map(|id| Player::new(UserId(id), self.name))
    }
}

/// Any grid shape found in stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredGrid {
    /// Nine integer codes. This is what gets written.
    Raw(Vec<i64>),
    /// Grid object holding its codes under `items`.
    Items {
        /// Integer codes.
        items: Vec<i64>,
    },
    /// Grid object holding typed cells.
    Cells {
        /// Typed cells.
        cells: Vec<Cell>,
    },
    /// Anything else, including `null`. Read as an empty grid.
    Malformed(serde_json::Value),
}

impl Default for StoredGrid {
    fn default() -> Self {
        StoredGrid::Raw(Vec::new())
    }
}

impl StoredGrid {
    /// Normalizes to a grid; any malformed shape becomes an empty grid.
    pub fn into_grid(self) -> Grid {
        match self {
            StoredGrid::Raw(codes) | StoredGrid::Items { items: codes } => Grid::from_codes(&codes),
            StoredGrid::Cells { cells } => Grid::new(cells),
            StoredGrid::Malformed(value) => {
                warn!(grid = %value, "Unreadable grid, starting from an empty one");
                Grid::empty()
            }
        }
    }
}

impl From<&Grid> for StoredGrid {
    fn from(grid: &Grid) -> Self {
        StoredGrid::Raw(grid.codes().iter().map(|code| i64::from(*code)).collect())
    }
}

/// A game as stored under its key.
///
/// Unknown fields, such as the retired `locked` flag, are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Seat one.
    #[serde(default)]
    pub player1: StoredPlayer,
    /// Seat two.
    #[serde(default)]
    pub player2: StoredPlayer,
    /// Cells.
    #[serde(default)]
    pub grid: StoredGrid,
    /// `false` while player 1 is to move.
    #[serde(default)]
    pub turn: bool,
    /// Whether player 1 plays the first mark.
    #[serde(alias = "is_player1_first", default = "default_first_player_is_mark1")]
    pub first_player_is_mark1: bool,
}

fn default_first_player_is_mark1() -> bool {
    true
}

impl From<&GameState> for GameRecord {
    fn from(state: &GameState) -> Self {
        Self {
            player1: StoredPlayer::from(state.player1()),
            player2: StoredPlayer::from(state.player2()),
            grid: StoredGrid::from(state.grid()),
            turn: state.turn(),
            first_player_is_mark1: state.first_player_is_mark1(),
        }
    }
}

impl GameRecord {
    /// Rebuilds the in-memory game stored under `id`.
    pub fn into_state(self, id: GameId) -> GameState {
        GameState::from_parts(
            id,
            self.player1.into_player(),
            self.player2.into_player(),
            self.grid.into_grid(),
            self.turn,
            self.first_player_is_mark1,
        )
    }
}
