//! Common types for naval battle: shot outcomes and the error kinds reported
//! back to the caller.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::bitboard::BitBoardError;
use crate::ship::Orientation;

/// Outcome of firing at a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotResult {
    /// The cell held no ship.
    Miss,
    /// The cell held a ship segment.
    Hit,
}

/// Per-cell shot history as seen by whoever reads a fleet board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShotMark {
    /// Never fired upon.
    #[default]
    None,
    Miss,
    Hit,
}

/// Reasons a ship placement is refused. None of them change the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// No ship kind was chosen before placing.
    NoSelection,
    /// The ship would run past the edge of the grid.
    OutOfBounds { orientation: Orientation },
    /// At least one target cell is already occupied.
    Overlap,
    /// Every ship of this kind has already been placed.
    QuotaExhausted,
    /// Placement is only accepted before combat starts.
    PhaseClosed,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::NoSelection => write!(f, "select a ship first"),
            PlacementError::OutOfBounds {
                orientation: Orientation::Horizontal,
            } => write!(f, "the ship does not fit horizontally here, it runs off the right edge"),
            PlacementError::OutOfBounds {
                orientation: Orientation::Vertical,
            } => write!(f, "the ship does not fit vertically here, it runs off the bottom edge"),
            PlacementError::Overlap => write!(f, "those cells are already occupied"),
            PlacementError::QuotaExhausted => write!(f, "no ships of that kind are left to place"),
            PlacementError::PhaseClosed => write!(f, "ships can no longer be placed"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Reasons a shot is refused. A refused shot never changes the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotError {
    /// Coordinates outside the grid.
    OutOfBounds { row: usize, col: usize },
    /// The cell was already fired upon.
    AlreadyFired { row: usize, col: usize },
    /// The other side holds the turn.
    NotYourTurn,
    /// The player's fleet is not fully placed yet.
    NotInCombat,
    /// The match is over.
    GameOver,
    /// Every cell of the target board has been fired upon.
    NoTargetsLeft,
}

impl fmt::Display for ShotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotError::OutOfBounds { row, col } => {
                write!(f, "cell ({}, {}) is outside the board", row, col)
            }
            ShotError::AlreadyFired { row, col } => {
                write!(f, "cell ({}, {}) was already fired upon", row, col)
            }
            ShotError::NotYourTurn => write!(f, "it is not your turn"),
            ShotError::NotInCombat => write!(f, "place all your ships before firing"),
            ShotError::GameOver => write!(f, "the match is over"),
            ShotError::NoTargetsLeft => write!(f, "there is nothing left to fire at"),
        }
    }
}

impl std::error::Error for ShotError {}

impl From<BitBoardError> for ShotError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::IndexOutOfBounds { row, col } => ShotError::OutOfBounds { row, col },
        }
    }
}

/// Errors returned by whole-board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Random placement found no room for a ship.
    UnableToPlaceShip,
    /// A restored board breaks one of the board invariants.
    CorruptState(&'static str),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::UnableToPlaceShip => write!(f, "unable to place ship"),
            BoardError::CorruptState(why) => write!(f, "corrupt board state: {}", why),
        }
    }
}

impl std::error::Error for BoardError {}
