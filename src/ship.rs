//! Ship definitions, fleet specifications and per-ship damage bookkeeping.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::common::FleetError;
use crate::config::DEFAULT_SHIPS;

/// Orientation of a placed ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Unit step `(dr, dc)` along the ship.
    pub fn step(self) -> (i32, i32) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

/// Index of a ship within the fleet it was placed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipId(usize);

impl ShipId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipDef {
    name: String,
    length: usize,
}

impl ShipDef {
    pub fn new(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// Ordered mapping from ship name to length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSpec {
    ships: Vec<ShipDef>,
}

impl FleetSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aircraft_Carrier 5, Battleship 4, Cruiser 3, Submarine 3, Destroyer 2.
    pub fn default_fleet() -> Self {
        DEFAULT_SHIPS
            .iter()
            .fold(Self::new(), |fleet, &(name, length)| fleet.with(name, length))
    }

    /// Add a ship. A repeated name replaces the earlier length in place.
    pub fn insert(&mut self, name: impl Into<String>, length: usize) {
        let name = name.into();
        match self.ships.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.length = length,
            None => self.ships.push(ShipDef::new(name, length)),
        }
    }

    /// Builder form of [`FleetSpec::insert`].
    pub fn with(mut self, name: impl Into<String>, length: usize) -> Self {
        self.insert(name, length);
        self
    }

    /// Parse newline-delimited `name:length` records. Any line not matching
    /// `\w+:\d+` in full invalidates the whole file. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, FleetError> {
        let mut fleet = Self::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (name, length) = parse_record(line).ok_or(FleetError::BadRecord { line: i + 1 })?;
            fleet.insert(name, length);
        }
        if fleet.is_empty() {
            return Err(FleetError::Empty);
        }
        Ok(fleet)
    }

    /// [`FleetSpec::parse`], substituting the default fleet on error.
    pub fn parse_or_default(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|e| {
            warn!("{}; default values for ships will be used", e);
            Self::default_fleet()
        })
    }

    /// Read a fleet file, substituting the default fleet when it is missing
    /// or malformed.
    #[cfg(feature = "std")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse_or_default(&text),
            Err(e) => {
                warn!("{} could not be read ({}); default values for ships will be used", path.display(), e);
                Self::default_fleet()
            }
        }
    }

    /// Check every length is in `1..size`.
    pub fn check_fits(&self, size: usize) -> Result<(), FleetError> {
        if self.is_empty() {
            return Err(FleetError::Empty);
        }
        match self.ships.iter().find(|s| s.length < 1 || s.length >= size) {
            Some(bad) => Err(FleetError::InvalidLength {
                name: bad.name.to_string(),
                length: bad.length,
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn get(&self, id: ShipId) -> Option<&ShipDef> {
        self.ships.get(id.0)
    }

    pub fn position(&self, name: &str) -> Option<ShipId> {
        self.ships.iter().position(|s| s.name == name).map(ShipId)
    }

    /// Length of the longest ship, 0 for an empty fleet.
    pub fn longest(&self) -> usize {
        self.ships.iter().map(|s| s.length).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShipId, &ShipDef)> {
        self.ships.iter().enumerate().map(|(i, s)| (ShipId(i), s))
    }
}

fn parse_record(line: &str) -> Option<(&str, usize)> {
    let (name, length) = line.split_once(':')?;
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    if name.is_empty() || !name.chars().all(is_word) {
        return None;
    }
    if length.is_empty() || !length.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((name, length.parse().ok()?))
}

/// `true` iff every ship in `fleet` is sunk. Vacuously true when empty.
pub fn is_fleet_destroyed(fleet: &FleetState) -> bool {
    fleet.is_destroyed()
}

/// Damage state of one ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipState {
    pub name: String,
    pub length: usize,
    pub remaining: usize,
}

impl ShipState {
    pub fn is_sunk(&self) -> bool {
        self.remaining == 0
    }
}

/// Remaining unhit cells per ship for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetState {
    ships: Vec<ShipState>,
}

impl FleetState {
    /// Every ship starts with its full length intact.
    pub fn from_spec(spec: &FleetSpec) -> Self {
        let ships = spec
            .ships
            .iter()
            .map(|def| ShipState {
                name: def.name.clone(),
                length: def.length,
                remaining: def.length,
            })
            .collect();
        Self { ships }
    }

    pub fn ships(&self) -> &[ShipState] {
        &self.ships
    }

    pub fn get(&self, id: ShipId) -> Option<&ShipState> {
        self.ships.get(id.0)
    }

    pub fn name(&self, id: ShipId) -> Option<&str> {
        self.get(id).map(|s| s.name.as_str())
    }

    pub fn id_of(&self, name: &str) -> Option<ShipId> {
        self.ships.iter().position(|s| s.name == name).map(ShipId)
    }

    pub fn remaining(&self, id: ShipId) -> Option<usize> {
        self.get(id).map(|s| s.remaining)
    }

    pub fn is_sunk(&self, id: ShipId) -> bool {
        self.get(id).is_some_and(ShipState::is_sunk)
    }

    /// `true` when every ship is sunk, including for an empty fleet.
    pub fn is_destroyed(&self) -> bool {
        self.ships.iter().all(ShipState::is_sunk)
    }

    /// Declared lengths of ships still afloat.
    pub fn unsunk_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.ships.iter().filter(|s| !s.is_sunk()).map(|s| s.length)
    }

    /// Decrement a ship's remaining count. Returns `Some(true)` when this
    /// hit sank it and `None` for an unknown id.
    pub(crate) fn record_hit(&mut self, id: ShipId) -> Option<bool> {
        let ship = self.ships.get_mut(id.0)?;
        ship.remaining = ship.remaining.saturating_sub(1);
        Some(ship.remaining == 0)
    }
}
