//! Game state and the move transition.
//!
//! A [`GameState`] is the whole persisted record of one game: the two seat
//! bindings, the grid, the turn flag and the mark assignment. Everything
//! else (phase, winner, whose turn) is derived on demand.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use crate::{GameStatus, Grid, Mark, MoveAccepted, Phase, Player, PlayerSlot, Rejection, UserId};

/// Identifier of a game, handed out by a monotonically increasing counter.
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
pub struct GameId(pub u64);

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    id: GameId,
    player1: Option<Player>,
    player2: Option<Player>,
    grid: Grid,
    /// `false` while player 1 is to move, `true` for player 2.
    turn: bool,
    /// `true`: player 1 plays the first mark. Fixed at creation.
    first_player_is_mark1: bool,
}

impl GameState {
    /// Creates a game with an empty grid, no players and player 1 to move.
    #[instrument]
    pub fn new(id: GameId, first_player_is_mark1: bool) -> Self {
        Self {
            id,
            player1: None,
            player2: None,
            grid: Grid::empty(),
            turn: false,
            first_player_is_mark1,
        }
    }

    /// Reassembles a game from stored parts.
    pub fn from_parts(
        id: GameId,
        player1: Option<Player>,
        player2: Option<Player>,
        grid: Grid,
        turn: bool,
        first_player_is_mark1: bool,
    ) -> Self {
        Self {
            id,
            player1,
            player2,
            grid,
            turn,
            first_player_is_mark1,
        }
    }

    /// Returns the game identifier.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Returns player 1, if bound.
    pub fn player1(&self) -> Option<&Player> {
        self.player1.as_ref()
    }

    /// Returns player 2, if bound.
    pub fn player2(&self) -> Option<&Player> {
        self.player2.as_ref()
    }

    /// Returns the player bound to `slot`.
    pub fn player(&self, slot: PlayerSlot) -> Option<&Player> {
        match slot {
            PlayerSlot::One => self.player1(),
            PlayerSlot::Two => self.player2(),
        }
    }

    /// Returns the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Raw turn flag: `false` for player 1, `true` for player 2.
    pub fn turn(&self) -> bool {
        self.turn
    }

    /// Whether player 1 plays the first mark.
    pub fn first_player_is_mark1(&self) -> bool {
        self.first_player_is_mark1
    }

    /// Binds `player` to seat one.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn bind_player1(&mut self, player: Player) {
        info!(user_id = %player.id(), name = %player.name(), "Player 1 bound");
        self.player1 = Some(player);
    }

    /// Binds `player` to seat two.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn bind_player2(&mut self, player: Player) {
        info!(user_id = %player.id(), name = %player.name(), "Player 2 bound");
        self.player2 = Some(player);
    }

    /// Mark used by the given seat.
    pub fn mark_of(&self, slot: PlayerSlot) -> Mark {
        match (slot, self.first_player_is_mark1) {
            (PlayerSlot::One, true) | (PlayerSlot::Two, false) => Mark::Cross,
            (PlayerSlot::One, false) | (PlayerSlot::Two, true) => Mark::Nought,
        }
    }

    /// Seat that plays `mark`.
    pub fn slot_with_mark(&self, mark: Mark) -> PlayerSlot {
        PlayerSlot::iter()
            .find(|slot| self.mark_of(*slot) == mark)
            .unwrap_or(PlayerSlot::Two)
    }

    /// Seat whose turn it is.
    pub fn current_slot(&self) -> PlayerSlot {
        PlayerSlot::from_turn(self.turn)
    }

    /// Player whose turn it is, if that seat is bound.
    pub fn current_player(&self) -> Option<&Player> {
        self.player(self.current_slot())
    }

    /// Seat held by `user`, if any.
    pub fn slot_of(&self, user: UserId) -> Option<PlayerSlot> {
        PlayerSlot::iter().find(|slot| self.player(*slot).is_some_and(|p| *p.id() == user))
    }

    /// Status of the grid, evaluated fresh.
    pub fn status(&self) -> GameStatus {
        self.grid.status()
    }

    /// Seat that completed a line, if any.
    pub fn winner_slot(&self) -> Option<PlayerSlot> {
        self.grid.winner().map(|mark| self.slot_with_mark(mark))
    }

    /// Derived lifecycle phase.
    pub fn phase(&self) -> Phase {
        let status = self.status();
        if status.is_over() {
            Phase::Ended(status)
        } else if self.player1.is_none() {
            Phase::Created
        } else if self.player2.is_none() {
            Phase::AwaitingPlayer2
        } else {
            Phase::InProgress(self.current_slot())
        }
    }

    /// Applies a button press by `user` on `cell`.
    ///
    /// The first press by anyone other than player 1 binds them as player 2
    /// and places nothing; the cell is dropped and must be pressed again.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the press breaks a rule. The game is
    /// unchanged in that case.
    #[instrument(skip(self, user), fields(game_id = %self.id, user_id = %user.id(), cell = ?cell))]
    pub fn apply_move(
        &mut self,
        user: &Player,
        cell: Option<usize>,
    ) -> Result<MoveAccepted, Rejection> {
        let user_id = *user.id();

        let player1_id = match &self.player1 {
            Some(player1) => *player1.id(),
            None => {
                self.bind_player1(user.clone());
                return Ok(MoveAccepted::Joined(PlayerSlot::One));
            }
        };

        if self.player2.is_none() {
            if player1_id == user_id {
                warn!("Player 1 tried to move before an opponent joined");
                return Err(Rejection::SelfPlay);
            }
            self.bind_player2(user.clone());
            return Ok(MoveAccepted::Joined(PlayerSlot::Two));
        }

        let slot = self.slot_of(user_id).ok_or_else(|| {
            warn!("Move from a user outside the game");
            Rejection::NotAPlayer(user_id)
        })?;

        let cell = cell.ok_or(Rejection::MissingCell)?;
        if cell >= Grid::SIZE {
            warn!("Cell index off the grid");
            return Err(Rejection::CellOutOfRange(cell));
        }

        if self.status().is_over() {
            debug!("Move after the game ended");
            return Err(Rejection::GameOver);
        }

        if slot != self.current_slot() {
            warn!(slot = %slot, expected = %self.current_slot(), "Move out of turn");
            return Err(Rejection::OutOfTurn(slot));
        }

        if !self.grid.is_empty_at(cell) {
            warn!("Cell already occupied");
            return Err(Rejection::CellOccupied(cell));
        }

        let mark = self.mark_of(slot);
        self.grid.place(cell, mark);
        self.turn = !self.turn;

        info!(slot = %slot, mark = ?mark, status = ?self.status(), "Mark placed");
        Ok(MoveAccepted::Placed { slot, cell, mark })
    }
}
