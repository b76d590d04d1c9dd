#![cfg(feature = "std")]

//! Text helpers for terminal front ends: coordinate parsing and grid
//! rendering. Coordinates are entered as `x,y` (column first).

use std::path::Path;
use std::string::String;

use log::warn;

use crate::{ai::CheckedSet, board::Board, common::Square, ship::FleetState};

/// Parse `x,y` into a square (`row = y`, `col = x`).
pub fn parse_coords(input: &str) -> Option<Square> {
    let (x, y) = input.trim().split_once(',')?;
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let (x, y) = (x.trim(), y.trim());
    if !digits(x) || !digits(y) {
        return None;
    }
    Some(Square::new(y.parse().ok()?, x.parse().ok()?))
}

/// Contents of a placement file. An unreadable file is logged and yields
/// `None`, so the caller places its ships at random.
pub fn read_placement(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("{} could not be read ({}); ships will be placed at random", path.display(), e);
            None
        }
    }
}

/// Inverse of [`parse_coords`].
pub fn coords_to_string(square: Square) -> String {
    std::format!("{},{}", square.col, square.row)
}

fn render_grid(size: usize, mut cell: impl FnMut(Square) -> char) -> String {
    let mut out = String::from("   ");
    for c in 0..size {
        out.push_str(&std::format!("{:>2}", c % 100));
    }
    out.push('\n');
    for r in 0..size {
        out.push_str(&std::format!("{:>2} ", r % 100));
        for c in 0..size {
            out.push(' ');
            out.push(cell(Square::new(r as i32, c as i32)));
        }
        out.push('\n');
    }
    out
}

/// The player's own board: ship initials on intact cells, `X` where the
/// opponent hit, `o` where it missed.
pub fn render_own_board(board: &Board, fleet: &FleetState, incoming: &CheckedSet, hits: &[Square]) -> String {
    render_grid(board.size(), |sq| match board.occupant(sq) {
        Some(id) => fleet.name(id).and_then(|n| n.chars().next()).unwrap_or('S'),
        None if hits.contains(&sq) => 'X',
        None if incoming.contains(sq) => 'o',
        None => '.',
    })
}

/// The player's view of the enemy: `X` for hits, `o` for misses.
pub fn render_shots(size: usize, shots: &CheckedSet, hits: &[Square]) -> String {
    render_grid(size, |sq| {
        if hits.contains(&sq) {
            'X'
        } else if shots.contains(sq) {
            'o'
        } else {
            '.'
        }
    })
}
