//! Built-in defaults and the runtime game configuration.

use core::fmt;
use core::str::FromStr;

use alloc::string::{String, ToString};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ship::FleetSpec;

pub const DEFAULT_BOARD_SIZE: usize = 10;
pub const DEFAULT_DIFFICULTY: Difficulty = Difficulty::Hard;

/// Fleet used whenever a supplied fleet specification is unusable.
pub const DEFAULT_SHIPS: [(&str, usize); 5] = [
    ("Aircraft_Carrier", 5),
    ("Battleship", 4),
    ("Cruiser", 3),
    ("Submarine", 3),
    ("Destroyer", 2),
];

/// Opponent strength. Each tier picks a different search heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "easy")]
    Easy,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "hard")]
    Hard,
    #[serde(rename = "very hard")]
    VeryHard,
    #[serde(rename = "extreme")]
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
        Difficulty::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very hard",
            Difficulty::Extreme => "extreme",
        }
    }

    /// Whether the opponent chases damaged ships at this tier.
    pub fn tracks_hits(&self) -> bool {
        !matches!(self, Difficulty::Easy)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "very hard" => Ok(Difficulty::VeryHard),
            "extreme" => Ok(Difficulty::Extreme),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Problems found in configuration values. Always recovered by defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownDifficulty(String),
    InvalidSize(String),
    Malformed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownDifficulty(d) => write!(f, "unknown difficulty {:?}", d),
            ConfigError::InvalidSize(s) => write!(f, "invalid board size {}", s),
            ConfigError::Malformed(e) => write!(f, "malformed configuration: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Difficulty and board size for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            size: DEFAULT_BOARD_SIZE,
        }
    }
}

impl GameConfig {
    pub fn new(difficulty: Difficulty, size: usize) -> Self {
        Self { difficulty, size }
    }

    /// Parse `{"difficulty": .., "size": ..}`. Each field that is missing or
    /// invalid falls back to its default with a warning.
    pub fn from_json(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                warn!("{}; using default configuration", ConfigError::Malformed(e.to_string()));
                return Self::default();
            }
        };
        let mut config = Self::default();
        match value.get("difficulty").map(parse_difficulty) {
            Some(Ok(d)) => config.difficulty = d,
            Some(Err(e)) => warn!("{}; using difficulty {}", e, DEFAULT_DIFFICULTY),
            None => warn!("difficulty missing; using {}", DEFAULT_DIFFICULTY),
        }
        match value.get("size").map(parse_size) {
            Some(Ok(s)) => config.size = s,
            Some(Err(e)) => warn!("{}; using size {}", e, DEFAULT_BOARD_SIZE),
            None => warn!("size missing; using {}", DEFAULT_BOARD_SIZE),
        }
        config
    }

    /// Read a configuration file. A missing or unreadable file yields the
    /// defaults.
    #[cfg(feature = "std")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) => {
                warn!("{} could not be read ({}); using default configuration", path.display(), e);
                Self::default()
            }
        }
    }

    /// Grow the board when it is too small for the longest ship.
    pub fn fit_fleet(mut self, fleet: &FleetSpec) -> Self {
        let longest = fleet.longest();
        if self.size <= longest {
            warn!(
                "board size {} cannot hold a ship of length {}; using {}",
                self.size,
                longest,
                longest + 1
            );
            self.size = longest + 1;
        }
        self
    }
}

fn parse_difficulty(value: &Value) -> Result<Difficulty, ConfigError> {
    match value.as_str() {
        Some(s) => s.parse(),
        None => Err(ConfigError::UnknownDifficulty(value.to_string())),
    }
}

fn parse_size(value: &Value) -> Result<usize, ConfigError> {
    let size = if let Some(n) = value.as_u64() {
        Some(n)
    } else {
        // whole-number floats such as 10.0 are accepted
        value
            .as_f64()
            .filter(|f| *f >= 1.0 && libm::floor(*f) == *f && *f <= u32::MAX as f64)
            .map(|f| f as u64)
    };
    match size.and_then(|n| usize::try_from(n).ok()) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidSize(value.to_string())),
    }
}
