//! Centralized error types for the simulation.
//!
//! Only level loading can fail. Everything that happens inside a tick is
//! absorbed with a safe default instead of being surfaced here.

use glam::IVec2;

use crate::map::level::Actor;

/// Main error type for the simulation.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),
}

/// Error type for level loading. Fatal for the level being loaded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board at ({x}, {y}): {character:?}")]
    UnknownCharacter { character: char, x: usize, y: usize },

    #[error("Board row {row} is {found} tiles wide, expected at least {expected}")]
    RowTooShort { row: usize, expected: usize, found: usize },

    #[error("Board has {found} rows, expected {expected}")]
    MissingRows { expected: usize, found: usize },

    #[error("House gate must have exactly 2 tiles, found {0}")]
    InvalidGateCount(usize),

    #[error("No start position given for {0:?}")]
    MissingStart(Actor),

    #[error("{what} {position} lies outside the {width}x{height} board")]
    OutOfBounds {
        what: &'static str,
        position: IVec2,
        width: usize,
        height: usize,
    },
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
