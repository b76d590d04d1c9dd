//! Common types for the game core: squares, attack outcomes and errors.

use core::fmt;

use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::ship::{FleetState, ShipId};

/// A grid coordinate, 0-indexed. Signed so that probes one step past an
/// edge can be represented and then rejected by bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: i32,
    pub col: i32,
}

impl Square {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Square displaced by `(dr, dc)`.
    pub const fn offset(self, dr: i32, dc: i32) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Sum of both coordinates, used for parity classes and run ordering.
    pub const fn diagonal(self) -> i32 {
        self.row + self.col
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Result of resolving one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Shot landed on open water.
    Miss,
    /// Shot struck a ship that is still afloat.
    Hit(ShipId),
    /// Shot struck the last intact cell of a ship.
    Sunk(ShipId),
}

impl AttackOutcome {
    pub fn is_hit(&self) -> bool {
        !matches!(self, AttackOutcome::Miss)
    }

    /// Ship struck by the shot, if any.
    pub fn ship(&self) -> Option<ShipId> {
        match *self {
            AttackOutcome::Miss => None,
            AttackOutcome::Hit(id) | AttackOutcome::Sunk(id) => Some(id),
        }
    }

    pub fn sunk(&self) -> Option<ShipId> {
        match *self {
            AttackOutcome::Sunk(id) => Some(id),
            _ => None,
        }
    }

    /// Name of the sunk ship, resolved against the fleet that was attacked.
    pub fn sunk_name<'a>(&self, fleet: &'a FleetState) -> Option<&'a str> {
        self.sunk().and_then(|id| fleet.name(id))
    }
}

/// Errors returned by board, placement and targeting operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Board size is zero or too large to address.
    InvalidSize(usize),
    /// Square lies outside the board.
    OutOfBounds(Square),
    /// Square was already attacked by this side.
    AlreadyGuessed(Square),
    /// Simple placement needs one row per ship.
    TooManyShips { ships: usize, rows: usize },
    /// Even the default fleet cannot be placed on a board this small.
    FleetDoesNotFit { size: usize },
    /// Random placement ran out of attempts.
    UnableToPlaceShip,
    /// Every square on the board has already been targeted.
    NoSquaresLeft,
    /// A cell refers to a ship the fleet does not know.
    UnknownShip(ShipId),
    /// A restored snapshot is internally inconsistent.
    InvalidState(&'static str),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::InvalidSize(size) => write!(f, "Invalid board size {}", size),
            BoardError::OutOfBounds(sq) => write!(f, "Square {} is outside the board", sq),
            BoardError::AlreadyGuessed(sq) => write!(f, "Square {} was already attacked", sq),
            BoardError::TooManyShips { ships, rows } => {
                write!(f, "Cannot lay {} ships on {} rows", ships, rows)
            }
            BoardError::FleetDoesNotFit { size } => {
                write!(f, "Default fleet does not fit a {}x{} board", size, size)
            }
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
            BoardError::NoSquaresLeft => write!(f, "No untargeted squares left"),
            BoardError::UnknownShip(id) => write!(f, "Unknown ship id {}", id.index()),
            BoardError::InvalidState(why) => write!(f, "Invalid game state: {}", why),
        }
    }
}

/// Errors from parsing a `name:length` fleet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    /// Line (1-based) does not match `\w+:\d+`.
    BadRecord { line: usize },
    /// No ships were listed.
    Empty,
    /// Length is zero or too long for the board.
    InvalidLength { name: String, length: usize },
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetError::BadRecord { line } => write!(f, "Bad fleet record on line {}", line),
            FleetError::Empty => write!(f, "Fleet specification lists no ships"),
            FleetError::InvalidLength { name, length } => {
                write!(f, "Ship {} has invalid length {}", name, length)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

#[cfg(feature = "std")]
impl std::error::Error for FleetError {}
