use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    ai::{CheckedSet, Targeting},
    board::Board,
    common::{AttackOutcome, BoardError, Square},
    config::GameConfig,
    placement::{place_fleet, Strategy},
    ship::{FleetSpec, FleetState},
};

/// Current status of a game, from the human player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// Serializable overall game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub player_board: Board,
    pub player_fleet: FleetState,
    pub opponent_board: Board,
    pub opponent_fleet: FleetState,
    pub player_shots: CheckedSet,
    pub targeting: Targeting,
}

/// One human-versus-computer game. Owns every piece of mutable state.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    player_board: Board,
    player_fleet: FleetState,
    opponent_board: Board,
    opponent_fleet: FleetState,
    player_shots: CheckedSet,
    targeting: Targeting,
}

impl Game {
    /// Lay out both fleets. The player's uses `player_strategy`; the
    /// computer's is always random.
    pub fn new<R: Rng + ?Sized>(
        config: GameConfig,
        spec: &FleetSpec,
        player_strategy: Strategy<'_>,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let player = place_fleet(Board::new(config.size)?, spec, player_strategy, rng)?;
        let opponent = place_fleet(Board::new(config.size)?, spec, Strategy::Random, rng)?;
        info!(
            "new {}x{} game against {} opponent",
            config.size, config.size, config.difficulty
        );
        Ok(Self {
            config,
            player_board: player.board,
            player_fleet: player.fleet,
            opponent_board: opponent.board,
            opponent_fleet: opponent.fleet,
            player_shots: CheckedSet::new(config.size)?,
            targeting: Targeting::new(config.difficulty, config.size)?,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn player_board(&self) -> &Board {
        &self.player_board
    }

    pub fn player_fleet(&self) -> &FleetState {
        &self.player_fleet
    }

    pub fn opponent_board(&self) -> &Board {
        &self.opponent_board
    }

    pub fn opponent_fleet(&self) -> &FleetState {
        &self.opponent_fleet
    }

    /// Squares the player has fired at.
    pub fn player_shots(&self) -> &CheckedSet {
        &self.player_shots
    }

    pub fn targeting(&self) -> &Targeting {
        &self.targeting
    }

    /// Fire the player's shot at the computer's board.
    pub fn player_attack(&mut self, square: Square) -> Result<AttackOutcome, BoardError> {
        if !self.opponent_board.in_bounds(square) {
            return Err(BoardError::OutOfBounds(square));
        }
        if !self.player_shots.insert(square) {
            return Err(BoardError::AlreadyGuessed(square));
        }
        self.opponent_board.attack(&mut self.opponent_fleet, square)
    }

    /// Let the computer choose, fire and learn from one shot.
    pub fn opponent_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(Square, AttackOutcome), BoardError> {
        let square = self.targeting.next_shot(&self.player_fleet, rng)?;
        let outcome = self.player_board.attack(&mut self.player_fleet, square)?;
        self.targeting.observe(square, outcome);
        Ok((square, outcome))
    }

    /// Evaluate the current game status.
    pub fn status(&self) -> GameStatus {
        if self.opponent_fleet.is_destroyed() {
            GameStatus::Won
        } else if self.player_fleet.is_destroyed() {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    /// Generate a serializable snapshot of the current state.
    pub fn state(&self) -> GameState {
        GameState {
            config: self.config,
            player_board: self.player_board.clone(),
            player_fleet: self.player_fleet.clone(),
            opponent_board: self.opponent_board.clone(),
            opponent_fleet: self.opponent_fleet.clone(),
            player_shots: self.player_shots.clone(),
            targeting: self.targeting.clone(),
        }
    }

    /// Restore a game from a previously saved state.
    ///
    /// Boards and shot sets must all match `config.size`, board cells must
    /// name ships of the matching fleet, and hunt entries must lie on the
    /// board and track one of the player's ships.
    pub fn from_state(state: GameState) -> Result<Self, BoardError> {
        let size = state.config.size;
        let sizes = [
            state.player_board.size(),
            state.opponent_board.size(),
            state.player_shots.size(),
            state.targeting.checked().size(),
        ];
        if sizes.iter().any(|&s| s != size) {
            return Err(BoardError::InvalidState("board sizes do not match the configuration"));
        }
        state.player_board.check_fleet(&state.player_fleet)?;
        state.opponent_board.check_fleet(&state.opponent_fleet)?;
        for entry in state.targeting.hunt().iter() {
            if state.player_fleet.get(entry.ship()).is_none() {
                return Err(BoardError::UnknownShip(entry.ship()));
            }
            if !state.player_board.in_bounds(entry.left()) || !state.player_board.in_bounds(entry.right()) {
                return Err(BoardError::InvalidState("hunt target lies off the board"));
            }
        }
        if state.targeting.difficulty() != state.config.difficulty {
            return Err(BoardError::InvalidState("opponent difficulty does not match the configuration"));
        }
        Ok(Self {
            config: state.config,
            player_board: state.player_board,
            player_fleet: state.player_fleet,
            opponent_board: state.opponent_board,
            opponent_fleet: state.opponent_fleet,
            player_shots: state.player_shots,
            targeting: state.targeting,
        })
    }
}
