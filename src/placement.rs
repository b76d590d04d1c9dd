//! Fleet placement: simple rows, random scatter, and caller-supplied layouts.

use core::fmt;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use crate::board::{Board, DIRECTIONS};
use crate::common::{BoardError, Square};
use crate::ship::{FleetSpec, FleetState, Orientation, ShipId};

/// Anchors sampled for one ship before the layout is restarted.
const MAX_ATTEMPTS_PER_SHIP: usize = 1_000;
/// Full random layouts tried before giving up.
const MAX_RESTARTS: usize = 32;

/// How ships are laid out on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy<'a> {
    /// Ship *i* on row *i* from column 0. Deterministic, for tests and demos.
    Simple,
    /// Uniform random anchors and directions.
    Random,
    /// JSON placement data `{"name": [row, col, "h" | "v"]}`. Falls back to
    /// [`Strategy::Random`] on a fresh board if the data is unusable.
    Custom(&'a str),
}

/// A populated board together with the fleet that was actually placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedFleet {
    pub board: Board,
    pub fleet: FleetState,
}

/// Reasons caller-supplied placement data was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Data is not shaped like `{"name": [row, col, "h" | "v"]}`.
    Malformed(String),
    /// Placement names a ship the fleet does not have.
    UnknownShip(String),
    /// A fleet ship has no placement.
    MissingShip(String),
    /// Ship run leaves the board.
    OutOfBounds(String),
    /// Ship run crosses another ship.
    Overlap(String),
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::Malformed(e) => write!(f, "Invalid placement data: {}", e),
            PlacementError::UnknownShip(n) => write!(f, "Placement names unknown ship {}", n),
            PlacementError::MissingShip(n) => write!(f, "No placement given for ship {}", n),
            PlacementError::OutOfBounds(n) => write!(f, "Invalid ship placement - {} goes outside of board", n),
            PlacementError::Overlap(n) => write!(f, "Invalid ship placement - {} overlaps another ship", n),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlacementError {}

/// Anchor and orientation for one ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRecord {
    pub anchor: Square,
    pub orientation: Orientation,
}

/// Parsed custom placement, in key order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlacementData {
    records: Vec<(String, PlacementRecord)>,
}

impl PlacementData {
    /// Parse `{"name": [row, col, "h" | "v"]}`. Coordinates may be integers
    /// or strings of digits.
    pub fn parse(text: &str) -> Result<Self, PlacementError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| PlacementError::Malformed(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| PlacementError::Malformed("expected an object".to_string()))?;
        let mut records = Vec::with_capacity(object.len());
        for (name, raw) in object {
            records.push((name.clone(), parse_record(name, raw)?));
        }
        Ok(Self { records })
    }

    pub fn get(&self, name: &str) -> Option<&PlacementRecord> {
        self.records.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlacementRecord)> {
        self.records.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_record(name: &str, raw: &Value) -> Result<PlacementRecord, PlacementError> {
    let malformed = || PlacementError::Malformed(alloc::format!("bad record for {}: {}", name, raw));
    let fields = raw.as_array().filter(|a| a.len() == 3).ok_or_else(malformed)?;
    let row = parse_coordinate(&fields[0]).ok_or_else(malformed)?;
    let col = parse_coordinate(&fields[1]).ok_or_else(malformed)?;
    let orientation = match fields[2].as_str() {
        Some("h") | Some("H") => Orientation::Horizontal,
        Some("v") | Some("V") => Orientation::Vertical,
        _ => return Err(malformed()),
    };
    Ok(PlacementRecord {
        anchor: Square::new(row, col),
        orientation,
    })
}

fn parse_coordinate(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Populate `board` with `spec` using `strategy`.
///
/// Lengths outside `1..size` (or an empty spec) discard the whole spec in
/// favour of the default fleet. The returned [`FleetState`] matches the fleet
/// that was placed.
pub fn place_fleet<R: Rng + ?Sized>(
    board: Board,
    spec: &FleetSpec,
    strategy: Strategy<'_>,
    rng: &mut R,
) -> Result<PlacedFleet, BoardError> {
    let size = board.size();
    let spec = effective_fleet(spec, size)?;
    let board = match strategy {
        Strategy::Simple => place_simple(board, &spec)?,
        Strategy::Random => place_random(&board, &spec, rng)?,
        Strategy::Custom(data) => match place_custom(&board, &spec, data) {
            Ok(placed) => placed,
            Err(e) => {
                warn!("{}; falling back to random placement", e);
                place_random(&Board::new(size)?, &spec, rng)?
            }
        },
    };
    Ok(PlacedFleet {
        fleet: FleetState::from_spec(&spec),
        board,
    })
}

fn effective_fleet(spec: &FleetSpec, size: usize) -> Result<FleetSpec, BoardError> {
    if let Err(e) = spec.check_fits(size) {
        warn!("{} for a {}x{} board; default values for ships will be used", e, size, size);
        let fallback = FleetSpec::default_fleet();
        if fallback.check_fits(size).is_err() {
            return Err(BoardError::FleetDoesNotFit { size });
        }
        return Ok(fallback);
    }
    Ok(spec.clone())
}

fn place_simple(mut board: Board, spec: &FleetSpec) -> Result<Board, BoardError> {
    if spec.len() > board.size() {
        return Err(BoardError::TooManyShips {
            ships: spec.len(),
            rows: board.size(),
        });
    }
    for (id, def) in spec.iter() {
        let anchor = Square::new(id.index() as i32, 0);
        board.write_run(id, anchor, Orientation::Horizontal.step(), def.length());
    }
    Ok(board)
}

fn place_random<R: Rng + ?Sized>(
    board: &Board,
    spec: &FleetSpec,
    rng: &mut R,
) -> Result<Board, BoardError> {
    for attempt in 0..MAX_RESTARTS {
        let mut candidate = board.clone();
        if spec
            .iter()
            .all(|(id, def)| place_one_random(&mut candidate, id, def.length(), rng))
        {
            return Ok(candidate);
        }
        debug!("random placement attempt {} stalled; restarting", attempt + 1);
    }
    Err(BoardError::UnableToPlaceShip)
}

fn place_one_random<R: Rng + ?Sized>(
    board: &mut Board,
    ship: ShipId,
    length: usize,
    rng: &mut R,
) -> bool {
    let n = board.size() as i32;
    let mut directions = DIRECTIONS;
    for _ in 0..MAX_ATTEMPTS_PER_SHIP {
        let anchor = Square::new(rng.random_range(0..n), rng.random_range(0..n));
        directions.shuffle(rng);
        if let Some(&step) = directions
            .iter()
            .find(|&&step| board.run_is_free(anchor, step, length))
        {
            board.write_run(ship, anchor, step, length);
            return true;
        }
    }
    false
}

fn place_custom(board: &Board, spec: &FleetSpec, data: &str) -> Result<Board, PlacementError> {
    let data = PlacementData::parse(data)?;
    let mut placed = board.clone();
    for (name, record) in data.iter() {
        let id = spec
            .position(name)
            .ok_or_else(|| PlacementError::UnknownShip(name.to_string()))?;
        let length = spec.get(id).map_or(0, |def| def.length());
        let step = record.orientation.step();
        if !placed.in_bounds(record.anchor) || !placed.run_in_bounds(record.anchor, step, length) {
            return Err(PlacementError::OutOfBounds(name.to_string()));
        }
        if !placed.run_is_free(record.anchor, step, length) {
            return Err(PlacementError::Overlap(name.to_string()));
        }
        placed.write_run(id, record.anchor, step, length);
    }
    if let Some((_, missing)) = spec.iter().find(|(_, def)| data.get(def.name()).is_none()) {
        return Err(PlacementError::MissingShip(missing.name().to_string()));
    }
    Ok(placed)
}
