//! Hunt tracking: what the opponent knows about ships it has damaged but not
//! yet sunk.

use alloc::collections::VecDeque;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::common::{AttackOutcome, Square};
use crate::ship::ShipId;

/// Axis of a damaged ship as far as the hunter knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HuntOrientation {
    Unknown,
    Horizontal,
    Vertical,
}

impl HuntOrientation {
    /// Unit step from `left` towards `right`, `None` while unknown.
    pub fn step(self) -> Option<(i32, i32)> {
        match self {
            HuntOrientation::Unknown => None,
            HuntOrientation::Horizontal => Some((0, 1)),
            HuntOrientation::Vertical => Some((1, 0)),
        }
    }
}

/// A ship known to be hit but not yet sunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntEntry {
    ship: ShipId,
    left: Square,
    right: Square,
    orientation: HuntOrientation,
}

impl HuntEntry {
    pub fn new(ship: ShipId, first_hit: Square) -> Self {
        Self {
            ship,
            left: first_hit,
            right: first_hit,
            orientation: HuntOrientation::Unknown,
        }
    }

    pub fn ship(&self) -> ShipId {
        self.ship
    }

    /// Lower extreme of the damaged run.
    pub fn left(&self) -> Square {
        self.left
    }

    /// Upper extreme of the damaged run.
    pub fn right(&self) -> Square {
        self.right
    }

    pub fn orientation(&self) -> HuntOrientation {
        self.orientation
    }

    /// Fold another hit on this ship into the known run. The first extra
    /// hit locks the orientation.
    fn absorb(&mut self, hit: Square) {
        if self.orientation == HuntOrientation::Unknown {
            self.orientation = if hit.col == self.left.col {
                HuntOrientation::Vertical
            } else {
                HuntOrientation::Horizontal
            };
            debug!("ship {} orientation locked {:?}", self.ship.index(), self.orientation);
        }
        if hit.diagonal() > self.right.diagonal() {
            self.right = hit;
        } else if hit.diagonal() < self.left.diagonal() {
            self.left = hit;
        }
    }
}

/// Damaged ships in the order they were found; the front is the active
/// target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntQueue {
    entries: VecDeque<HuntEntry>,
}

impl HuntQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The active target.
    pub fn front(&self) -> Option<&HuntEntry> {
        self.entries.front()
    }

    pub fn get(&self, ship: ShipId) -> Option<&HuntEntry> {
        self.entries.iter().find(|e| e.ship == ship)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HuntEntry> {
        self.entries.iter()
    }

    /// Record a hit on `ship`. Entries are matched by ship id only, so a
    /// hit never updates a neighbouring ship's run.
    pub fn record_hit(&mut self, ship: ShipId, square: Square) {
        match self.entries.iter_mut().find(|e| e.ship == ship) {
            Some(entry) => entry.absorb(square),
            None => {
                debug!("new hunt target: ship {} at {}", ship.index(), square);
                self.entries.push_back(HuntEntry::new(ship, square));
            }
        }
    }

    /// Drop every entry for a sunk ship.
    pub fn record_sunk(&mut self, ship: ShipId) {
        self.entries.retain(|e| e.ship != ship);
    }

    /// Apply an attack outcome at `square`.
    pub fn observe(&mut self, square: Square, outcome: AttackOutcome) {
        match outcome {
            AttackOutcome::Miss => {}
            AttackOutcome::Hit(ship) => self.record_hit(ship, square),
            AttackOutcome::Sunk(ship) => self.record_sunk(ship),
        }
    }
}
