//! Which ships, and how many of each, make up a fleet.

use serde::{Deserialize, Serialize};

use crate::config::BOARD_SIZE;
use crate::ship::{ShipKind, ShipQuota};

/// Immutable definition of one ship kind inside a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSpec {
    kind: ShipKind,
    initial_count: u8,
}

impl ShipSpec {
    pub const fn new(kind: ShipKind, initial_count: u8) -> Self {
        Self {
            kind,
            initial_count,
        }
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn size(&self) -> usize {
        self.kind.size()
    }

    pub fn initial_count(&self) -> u8 {
        self.initial_count
    }
}

/// Per-kind ship counts, indexed smallest kind first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipCatalog {
    counts: [u8; 4],
}

impl ShipCatalog {
    /// One ship of every kind: 4 ships, 10 cells.
    pub const fn standard() -> Self {
        Self {
            counts: [1, 1, 1, 1],
        }
    }

    /// Four frigates, three destroyers, two submarines and one carrier:
    /// 10 ships, 20 cells.
    pub const fn classic() -> Self {
        Self {
            counts: [4, 3, 2, 1],
        }
    }

    /// Arbitrary counts for `[Frigate, Destroyer, Submarine, Carrier]`.
    /// Returns `None` for an empty fleet or one with more cells than the grid.
    pub fn with_counts(counts: [u8; 4]) -> Option<Self> {
        let catalog = Self { counts };
        let cells = catalog.total_cells();
        if cells == 0 || cells > BOARD_SIZE * BOARD_SIZE {
            None
        } else {
            Some(catalog)
        }
    }

    pub fn spec(&self, kind: ShipKind) -> ShipSpec {
        ShipSpec::new(kind, self.counts[kind.index()])
    }

    /// Specs ordered largest kind first, the order fleets are auto-placed in.
    pub fn specs(&self) -> impl Iterator<Item = ShipSpec> + '_ {
        ShipKind::ALL.into_iter().rev().map(move |k| self.spec(k))
    }

    /// Fresh quotas, one per kind, in [`ShipKind::ALL`] order.
    pub fn quotas(&self) -> [ShipQuota; 4] {
        core::array::from_fn(|i| ShipQuota::new(ShipKind::ALL[i], self.counts[i]))
    }

    /// Number of ships in a full fleet.
    pub fn total_ships(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Number of cells a full fleet covers.
    pub fn total_cells(&self) -> usize {
        ShipKind::ALL
            .iter()
            .map(|k| k.size() * self.counts[k.index()] as usize)
            .sum()
    }
}

impl Default for ShipCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
