//! Callback tokens carried by board buttons.
//!
//! Two shapes exist:
//!
//! - `new_game|True` / `new_game|False`: a button on an invitation board.
//!   The flag says whether the user who presses it plays the first mark.
//! - `game{id}|{cell}`: a button on a live board.

use std::str::FromStr;

use inline_tictactoe::GameId;
use tracing::instrument;

const NEW_GAME: &str = "new_game";
const GAME_PREFIX: &str = "game";

/// A decoded callback token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackData {
    /// Start a game; the presser becomes player 1.
    NewGame {
        /// Whether player 1 plays the first mark.
        first_player_is_mark1: bool,
    },
    /// Press a cell on an existing game.
    Move {
        /// Game the board belongs to.
        game_id: GameId,
        /// Pressed cell (0-8).
        cell: usize,
    },
}

impl std::fmt::Display for CallbackData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackData::NewGame {
                first_player_is_mark1,
            } => {
                let flag = if *first_player_is_mark1 { "True" } else { "False" };
                write!(f, "{}|{}", NEW_GAME, flag)
            }
            CallbackData::Move { game_id, cell } => {
                write!(f, "{}{}|{}", GAME_PREFIX, game_id, cell)
            }
        }
    }
}

impl FromStr for CallbackData {
    type Err = TokenError;

    #[instrument]
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (head, tail) = token
            .split_once('|')
            .ok_or_else(|| TokenError::MissingSeparator(token.to_string()))?;

        if head == NEW_GAME {
            return match tail {
                "True" => Ok(CallbackData::NewGame {
                    first_player_is_mark1: true,
                }),
                "False" => Ok(CallbackData::NewGame {
                    first_player_is_mark1: false,
                }),
                other => Err(TokenError::BadFlag(other.to_string())),
            };
        }

        let game_id = head
            .strip_prefix(GAME_PREFIX)
            .and_then(|id| id.parse::<u64>().ok())
            .map(GameId)
            .ok_or_else(|| TokenError::BadGame(head.to_string()))?;

        let cell = tail
            .parse::<usize>()
            .map_err(|_| TokenError::BadCell(tail.to_string()))?;

        Ok(CallbackData::Move { game_id, cell })
    }
}

/// Why a token could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TokenError {
    /// No `|` in the token.
    #[display("Token {:?} has no separator", _0)]
    MissingSeparator(String),

    /// `new_game` followed by something other than `True` or `False`.
    #[display("Unknown new-game flag {:?}", _0)]
    BadFlag(String),

    /// The game part is not `game` followed by a number.
    #[display("Unknown game reference {:?}", _0)]
    BadGame(String),

    /// The cell part is not a number.
    #[display("Unknown cell {:?}", _0)]
    BadCell(String),
}

impl std::error::Error for TokenError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_game() {
        assert_eq!(
            "new_game|True".parse::<CallbackData>(),
            Ok(CallbackData::NewGame {
                first_player_is_mark1: true
            })
        );
        assert_eq!(
            "new_game|False".parse::<CallbackData>(),
            Ok(CallbackData::NewGame {
                first_player_is_mark1: false
            })
        );
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(
            "game12|4".parse::<CallbackData>(),
            Ok(CallbackData::Move {
                game_id: GameId(12),
                cell: 4
            })
        );
    }

    #[test]
    fn test_display_matches_wire_form() {
        let token = CallbackData::Move {
            game_id: GameId(3),
            cell: 8,
        };
        assert_eq!(token.to_string(), "game3|8");
        let token = CallbackData::NewGame {
            first_player_is_mark1: false,
        };
        assert_eq!(token.to_string(), "new_game|False");
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(matches!(
            "game1".parse::<CallbackData>(),
            Err(TokenError::MissingSeparator(_))
        ));
        assert!(matches!(
            "new_game|yes".parse::<CallbackData>(),
            Err(TokenError::BadFlag(_))
        ));
        assert!(matches!(
            "lobby|1".parse::<CallbackData>(),
            Err(TokenError::BadGame(_))
        ));
        assert!(matches!(
            "game1|x".parse::<CallbackData>(),
            Err(TokenError::BadCell(_))
        ));
        assert!(matches!(
            "game1|-1".parse::<CallbackData>(),
            Err(TokenError::BadCell(_))
        ));
    }
}
