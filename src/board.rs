//! Game board state: ship occupancy per cell and shot resolution.

use alloc::vec;
use alloc::vec::Vec;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::common::{AttackOutcome, BoardError, Square};
use crate::ship::{FleetState, ShipId};

/// The four axis directions as `(dr, dc)`.
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// `true` iff both coordinates are in `[0, size)`.
pub fn square_in_bounds(square: Square, size: usize) -> bool {
    let inside = |v: i32| usize::try_from(v).is_ok_and(|v| v < size);
    inside(square.row) && inside(square.col)
}

/// `true` iff the square is on the board and holds no ship.
pub fn is_square_free(board: &Board, square: Square) -> bool {
    board.is_free(square)
}

/// Resolve one shot; see [`Board::attack`].
pub fn resolve_attack(board: &mut Board, fleet: &mut FleetState, square: Square) -> Result<AttackOutcome, BoardError> {
    board.attack(fleet, square)
}

/// Number of cells on a `size`×`size` board, rejecting sizes that cannot be
/// addressed with `i32` coordinates.
pub(crate) fn cell_count(size: usize) -> Result<usize, BoardError> {
    if size == 0 || i32::try_from(size).is_err() {
        return Err(BoardError::InvalidSize(size));
    }
    size.checked_mul(size).ok_or(BoardError::InvalidSize(size))
}

/// N×N grid; each cell is empty or holds the occupying ship's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    size: usize,
    cells: Vec<Option<ShipId>>,
}

/// Unchecked serialized form of [`Board`].
#[derive(Deserialize)]
struct BoardData {
    size: usize,
    cells: Vec<Option<ShipId>>,
}

impl TryFrom<BoardData> for Board {
    type Error = BoardError;

    fn try_from(data: BoardData) -> Result<Self, Self::Error> {
        if data.cells.len() != cell_count(data.size)? {
            return Err(BoardError::InvalidState("board cells do not match its size"));
        }
        Ok(Board {
            size: data.size,
            cells: data.cells,
        })
    }
}

impl Board {
    /// Create an empty board.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        Ok(Board {
            size,
            cells: vec![None; cell_count(size)?],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, square: Square) -> bool {
        square_in_bounds(square, self.size)
    }

    pub fn is_free(&self, square: Square) -> bool {
        self.index(square).is_some_and(|i| self.cells[i].is_none())
    }

    /// Ship occupying `square`, `None` for empty or off-board squares.
    pub fn occupant(&self, square: Square) -> Option<ShipId> {
        self.index(square).and_then(|i| self.cells[i])
    }

    /// Every square on the board in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let n = self.size as i32;
        (0..n).flat_map(move |r| (0..n).map(move |c| Square::new(r, c)))
    }

    /// Occupied squares with their ship, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, ShipId)> + '_ {
        self.squares()
            .filter_map(move |sq| self.occupant(sq).map(|id| (sq, id)))
    }

    /// Squares still holding `ship`, row-major.
    pub fn cells_of(&self, ship: ShipId) -> Vec<Square> {
        self.occupied()
            .filter(|&(_, id)| id == ship)
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// `true` when all `length` cells from `anchor` stepping by `step` are
    /// on the board and empty.
    pub(crate) fn run_is_free(&self, anchor: Square, step: (i32, i32), length: usize) -> bool {
        run(anchor, step, length).all(|sq| self.is_free(sq))
    }

    pub(crate) fn run_in_bounds(&self, anchor: Square, step: (i32, i32), length: usize) -> bool {
        run(anchor, step, length).all(|sq| self.in_bounds(sq))
    }

    /// Write `ship` into every cell of the run. Callers check the run first.
    pub(crate) fn write_run(&mut self, ship: ShipId, anchor: Square, step: (i32, i32), length: usize) {
        for sq in run(anchor, step, length) {
            if let Some(i) = self.index(sq) {
                self.cells[i] = Some(ship);
            }
        }
    }

    /// Resolve one shot against this board and its fleet. A struck cell is
    /// cleared and the ship's remaining count drops by one.
    pub fn attack(&mut self, fleet: &mut FleetState, square: Square) -> Result<AttackOutcome, BoardError> {
        let i = self.index(square).ok_or(BoardError::OutOfBounds(square))?;
        let Some(ship) = self.cells[i] else {
            trace!("shot at {} missed", square);
            return Ok(AttackOutcome::Miss);
        };
        let sunk = fleet.record_hit(ship).ok_or(BoardError::UnknownShip(ship))?;
        self.cells[i] = None;
        trace!("shot at {} hit ship {}", square, ship.index());
        if sunk {
            Ok(AttackOutcome::Sunk(ship))
        } else {
            Ok(AttackOutcome::Hit(ship))
        }
    }

    /// Check every occupied cell names a ship of `fleet`.
    pub(crate) fn check_fleet(&self, fleet: &FleetState) -> Result<(), BoardError> {
        match self.cells.iter().flatten().find(|&&id| fleet.get(id).is_none()) {
            Some(&id) => Err(BoardError::UnknownShip(id)),
            None => Ok(()),
        }
    }

    fn index(&self, square: Square) -> Option<usize> {
        if !self.in_bounds(square) {
            return None;
        }
        Some(square.row as usize * self.size + square.col as usize)
    }
}

/// `length` squares starting at `anchor`, stepping by `step`.
pub(crate) fn run(anchor: Square, step: (i32, i32), length: usize) -> impl Iterator<Item = Square> {
    (0..length).map(move |k| {
        let k = k as i32;
        anchor.offset(step.0 * k, step.1 * k)
    })
}
