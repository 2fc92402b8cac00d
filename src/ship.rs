//! Ship kinds, placement quotas and the footprint a placed ship covers.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::common::PlacementError;
use crate::config::BOARD_SIZE;

/// Orientation of a ship on the board. A ship grows rightwards when
/// horizontal and downwards when vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// The four kinds of ship. Each kind's code is also its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipKind {
    Frigate,
    Destroyer,
    Submarine,
    Carrier,
}

impl ShipKind {
    /// All kinds, smallest first.
    pub const ALL: [ShipKind; 4] = [
        ShipKind::Frigate,
        ShipKind::Destroyer,
        ShipKind::Submarine,
        ShipKind::Carrier,
    ];

    /// Number of cells the ship covers.
    pub const fn size(self) -> usize {
        match self {
            ShipKind::Frigate => 1,
            ShipKind::Destroyer => 2,
            ShipKind::Submarine => 3,
            ShipKind::Carrier => 4,
        }
    }

    /// Value written into occupied cells of the occupancy grid.
    pub const fn code(self) -> u8 {
        self.size() as u8
    }

    /// Inverse of [`ShipKind::code`]. Zero and unknown codes give `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        ShipKind::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Index into per-kind tables.
    pub(crate) const fn index(self) -> usize {
        self.size() - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            ShipKind::Frigate => "Frigate",
            ShipKind::Destroyer => "Destroyer",
            ShipKind::Submarine => "Submarine",
            ShipKind::Carrier => "Carrier",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        ShipKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ShipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many ships of one kind a board may still receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipQuota {
    kind: ShipKind,
    remaining: u8,
}

impl ShipQuota {
    pub const fn new(kind: ShipKind, remaining: u8) -> Self {
        Self { kind, remaining }
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn size(&self) -> usize {
        self.kind.size()
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Consume one ship from the quota.
    pub(crate) fn take(&mut self) -> Result<(), PlacementError> {
        self.remaining = self
            .remaining
            .checked_sub(1)
            .ok_or(PlacementError::QuotaExhausted)?;
        Ok(())
    }
}

/// The rectangle of cells covered by one placed ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipFootprint {
    kind: ShipKind,
    orientation: Orientation,
    origin_row: usize,
    origin_col: usize,
    end_row: usize,
    end_col: usize,
}

impl ShipFootprint {
    /// Footprint of a `kind` ship anchored at (`row`, `col`). Fails when any
    /// of its cells would fall outside the grid.
    pub fn new(
        kind: ShipKind,
        orientation: Orientation,
        row: usize,
        col: usize,
    ) -> Result<Self, PlacementError> {
        let len = kind.size();
        let fits = match orientation {
            Orientation::Horizontal => row < BOARD_SIZE && col <= BOARD_SIZE - len,
            Orientation::Vertical => col < BOARD_SIZE && row <= BOARD_SIZE - len,
        };
        if !fits {
            return Err(PlacementError::OutOfBounds { orientation });
        }
        let (end_row, end_col) = match orientation {
            Orientation::Horizontal => (row, col + len - 1),
            Orientation::Vertical => (row + len - 1, col),
        };
        Ok(ShipFootprint {
            kind,
            orientation,
            origin_row: row,
            origin_col: col,
            end_row,
            end_col,
        })
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// First cell (row, col).
    pub fn origin(&self) -> (usize, usize) {
        (self.origin_row, self.origin_col)
    }

    /// Last cell (row, col), inclusive.
    pub fn end(&self) -> (usize, usize) {
        (self.end_row, self.end_col)
    }

    pub fn size(&self) -> usize {
        self.kind.size()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.origin_row..=self.end_row).contains(&row)
            && (self.origin_col..=self.end_col).contains(&col)
    }

    /// Every covered cell, from the origin outwards.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (row, col, orientation) = (self.origin_row, self.origin_col, self.orientation);
        (0..self.kind.size()).map(move |i| match orientation {
            Orientation::Horizontal => (row, col + i),
            Orientation::Vertical => (row + i, col),
        })
    }
}
