// Opponent shot selection: difficulty-tiered search plus hunt-mode follow-up
// on damaged ships. All randomness comes from the caller's RNG.

use alloc::vec;
use alloc::vec::Vec;
use log::{debug, trace};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{cell_count, DIRECTIONS};
use crate::common::{AttackOutcome, BoardError, Square};
use crate::config::Difficulty;
use crate::hunt::{HuntEntry, HuntQueue};
use crate::ship::FleetState;

/// Parity divisor used by the medium, hard and very hard tiers.
pub const BASE_POLARITY: usize = 2;

/// Squares the opponent has already fired at, in firing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CheckedData")]
pub struct CheckedSet {
    size: usize,
    marks: Vec<bool>,
    order: Vec<Square>,
}

#[derive(Deserialize)]
struct CheckedData {
    size: usize,
    marks: Vec<bool>,
    order: Vec<Square>,
}

impl TryFrom<CheckedData> for CheckedSet {
    type Error = BoardError;

    fn try_from(data: CheckedData) -> Result<Self, Self::Error> {
        if data.marks.len() != cell_count(data.size)? {
            return Err(BoardError::InvalidState("shot marks do not match board size"));
        }
        let mut checked = CheckedSet::new(data.size)?;
        for square in data.order {
            if !checked.insert(square) {
                return Err(BoardError::InvalidState("shot list repeats or leaves the board"));
            }
        }
        if checked.marks != data.marks {
            return Err(BoardError::InvalidState("shot marks disagree with shot list"));
        }
        Ok(checked)
    }
}

impl CheckedSet {
    /// Empty set for a `size`×`size` board.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        Ok(Self {
            size,
            marks: vec![false; cell_count(size)?],
            order: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, square: Square) -> bool {
        self.index(square).is_some_and(|i| self.marks[i])
    }

    /// On the board and not yet fired at.
    pub fn is_open(&self, square: Square) -> bool {
        self.index(square).is_some_and(|i| !self.marks[i])
    }

    /// Returns `false` if the square was already present or is off the board.
    pub fn insert(&mut self, square: Square) -> bool {
        match self.index(square) {
            Some(i) if !self.marks[i] => {
                self.marks[i] = true;
                self.order.push(square);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Most recent shot.
    pub fn last(&self) -> Option<Square> {
        self.order.last().copied()
    }

    /// Shots in the order they were fired.
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.order.iter().copied()
    }

    /// Every board square in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let n = self.size as i32;
        (0..n).flat_map(move |r| (0..n).map(move |c| Square::new(r, c)))
    }

    fn index(&self, square: Square) -> Option<usize> {
        if !crate::board::square_in_bounds(square, self.size) {
            return None;
        }
        Some(square.row as usize * self.size + square.col as usize)
    }
}

/// `(row + col) mod polarity == 1`.
fn in_parity_class(square: Square, polarity: usize) -> bool {
    let polarity = polarity.max(1) as i32;
    square.diagonal() % polarity == 1
}

/// Pick the opponent's next shot and add it to `checked`.
///
/// With a non-empty hunt queue the front entry is chased; otherwise the
/// difficulty's search heuristic runs. Never returns a square already in
/// `checked`.
pub fn select_opponent_shot<R: Rng + ?Sized>(
    checked: &mut CheckedSet,
    difficulty: Difficulty,
    hunt: &HuntQueue,
    fleet: &FleetState,
    rng: &mut R,
) -> Result<Square, BoardError> {
    let hunted = hunt.front().and_then(|entry| hunt_shot(entry, checked, rng));
    let square = match hunted {
        Some(sq) => sq,
        None => {
            if !hunt.is_empty() {
                debug!("no open squares around hunt target; searching instead");
            }
            search_shot(checked, difficulty, fleet, rng)?
        }
    };
    checked.insert(square);
    trace!("opponent fires at {}", square);
    Ok(square)
}

/// Probe next to the active target. With a known axis: one past either end.
/// Otherwise: one of the four neighbours of the first hit. If both ends are
/// closed, unfired cells between the ends are tried.
fn hunt_shot<R: Rng + ?Sized>(entry: &HuntEntry, checked: &CheckedSet, rng: &mut R) -> Option<Square> {
    let candidates: Vec<Square> = match entry.orientation().step() {
        Some((dr, dc)) => vec![entry.left().offset(-dr, -dc), entry.right().offset(dr, dc)],
        None => DIRECTIONS
            .iter()
            .map(|&(dr, dc)| entry.left().offset(dr, dc))
            .collect(),
    };
    let open: Vec<Square> = candidates.into_iter().filter(|&sq| checked.is_open(sq)).collect();
    if let Some(&sq) = open.choose(rng) {
        return Some(sq);
    }

    let (dr, dc) = entry.orientation().step()?;
    let span = entry.right().diagonal() - entry.left().diagonal();
    let gaps: Vec<Square> = (1..span)
        .map(|k| entry.left().offset(dr * k, dc * k))
        .filter(|&sq| checked.is_open(sq))
        .collect();
    gaps.choose(rng).copied()
}

fn search_shot<R: Rng + ?Sized>(
    checked: &CheckedSet,
    difficulty: Difficulty,
    fleet: &FleetState,
    rng: &mut R,
) -> Result<Square, BoardError> {
    match difficulty {
        Difficulty::Easy => random_shot(checked, None, rng),
        Difficulty::Medium | Difficulty::Hard => random_shot(checked, Some(BASE_POLARITY), rng),
        Difficulty::VeryHard => density_shot(checked, fleet, BASE_POLARITY, rng),
        Difficulty::Extreme => {
            let shortest = fleet.unsunk_lengths().min().unwrap_or(BASE_POLARITY);
            density_shot(checked, fleet, shortest.max(BASE_POLARITY), rng)
        }
    }
}

/// Uniform choice among unfired squares, optionally restricted to a parity
/// class. An exhausted class widens to the whole board.
fn random_shot<R: Rng + ?Sized>(
    checked: &CheckedSet,
    polarity: Option<usize>,
    rng: &mut R,
) -> Result<Square, BoardError> {
    let open: Vec<Square> = checked
        .squares()
        .filter(|&sq| checked.is_open(sq))
        .filter(|&sq| polarity.map_or(true, |p| in_parity_class(sq, p)))
        .collect();
    if let Some(&sq) = open.choose(rng) {
        return Ok(sq);
    }
    if polarity.is_some() {
        debug!("parity class exhausted; widening search");
        return random_shot(checked, None, rng);
    }
    Err(BoardError::NoSquaresLeft)
}

/// Roulette-wheel choice weighted by [`density_scores`].
fn density_shot<R: Rng + ?Sized>(
    checked: &CheckedSet,
    fleet: &FleetState,
    polarity: usize,
    rng: &mut R,
) -> Result<Square, BoardError> {
    let scores = density_scores(checked, fleet, polarity, rng);
    let total: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    if total == 0 {
        debug!("no scored squares at polarity {}; widening search", polarity);
        return random_shot(checked, None, rng);
    }
    let index = rng.random_range(0..total);
    let mut cumulative = 0u64;
    for (sq, &score) in checked.squares().zip(scores.iter()) {
        cumulative += u64::from(score);
        if cumulative > index {
            return Ok(sq);
        }
    }
    Err(BoardError::NoSquaresLeft)
}

/// Score every square, row-major, by how much open water surrounds it.
///
/// Unfired squares in the parity class `(row + col) mod polarity == 1` get
/// `floor(h^1.5 / 4) + floor(v^1.5 / 4) + jitter`, where `h` and `v` are
/// the lengths of the open runs through the square (each side capped at one
/// less than the longest ship afloat) and jitter is uniform in `5..=7`.
/// Every other square scores 0.
pub fn density_scores<R: Rng + ?Sized>(
    checked: &CheckedSet,
    fleet: &FleetState,
    polarity: usize,
    rng: &mut R,
) -> Vec<u32> {
    let cap = fleet.unsunk_lengths().max().unwrap_or(0).saturating_sub(1);
    checked
        .squares()
        .map(|sq| {
            if !checked.is_open(sq) || !in_parity_class(sq, polarity) {
                return 0;
            }
            let [down, up, right, left] = DIRECTIONS.map(|step| open_run(checked, sq, step, cap));
            let vertical = down + up + 1;
            let horizontal = right + left + 1;
            axis_score(horizontal) + axis_score(vertical) + rng.random_range(5..=7)
        })
        .collect()
}

fn axis_score(run: usize) -> u32 {
    libm::floor(libm::pow(run as f64, 1.5) / 4.0) as u32
}

/// Consecutive unfired on-board squares stepping away from `from`.
fn open_run(checked: &CheckedSet, from: Square, step: (i32, i32), cap: usize) -> usize {
    let mut count = 0;
    let mut sq = from;
    while count < cap {
        sq = sq.offset(step.0, step.1);
        if !checked.is_open(sq) {
            break;
        }
        count += 1;
    }
    count
}

/// The opponent's per-game targeting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targeting {
    difficulty: Difficulty,
    checked: CheckedSet,
    hunt: HuntQueue,
}

impl Targeting {
    pub fn new(difficulty: Difficulty, size: usize) -> Result<Self, BoardError> {
        Ok(Self {
            difficulty,
            checked: CheckedSet::new(size)?,
            hunt: HuntQueue::new(),
        })
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn checked(&self) -> &CheckedSet {
        &self.checked
    }

    pub fn hunt(&self) -> &HuntQueue {
        &self.hunt
    }

    /// `true` while a damaged ship is being chased.
    pub fn is_hunting(&self) -> bool {
        !self.hunt.is_empty()
    }

    /// Choose and record the next shot against `fleet`'s owner.
    pub fn next_shot<R: Rng + ?Sized>(&mut self, fleet: &FleetState, rng: &mut R) -> Result<Square, BoardError> {
        select_opponent_shot(&mut self.checked, self.difficulty, &self.hunt, fleet, rng)
    }

    /// Feed back the outcome of a shot. Easy opponents ignore hits.
    pub fn observe(&mut self, square: Square, outcome: AttackOutcome) {
        if self.difficulty.tracks_hits() {
            self.hunt.observe(square, outcome);
        }
    }
}
