#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ai;
mod board;
mod common;
mod config;
mod game;
mod hunt;
mod placement;
mod ship;
#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod logging;

pub use ai::*;
pub use board::{is_square_free, resolve_attack, square_in_bounds, Board, DIRECTIONS};
pub use common::*;
pub use config::*;
pub use game::*;
pub use hunt::*;
pub use placement::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_to, level_from};
