//! One side's fleet board: ship occupancy, shot history and the footprint of
//! every placed ship.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bitboard::BitBoard;
use crate::catalog::ShipCatalog;
use crate::common::{BoardError, PlacementError, ShotError, ShotMark, ShotResult};
use crate::config::BOARD_SIZE;
use crate::ship::{Orientation, ShipFootprint, ShipKind, ShipQuota};

pub type BB = BitBoard<u128, BOARD_SIZE>;

/// Kind codes per cell, `0` for open water.
pub type Occupancy = [[u8; BOARD_SIZE]; BOARD_SIZE];

/// How many fresh layouts `auto_populate` tries before giving up.
const MAX_LAYOUT_ATTEMPTS: usize = 32;

/// Serializable board state for saving and restoring matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub catalog: ShipCatalog,
    pub occupancy: Occupancy,
    pub hits: BB,
    pub misses: BB,
    pub quotas: [ShipQuota; 4],
    pub footprints: Vec<ShipFootprint>,
}

/// A 10×10 fleet board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FleetBoard {
    catalog: ShipCatalog,
    occupancy: Occupancy,
    hits: BB,
    misses: BB,
    quotas: [ShipQuota; 4],
    footprints: Vec<ShipFootprint>,
}

impl FleetBoard {
    /// Empty board whose quotas come from `catalog`.
    pub fn new(catalog: ShipCatalog) -> Self {
        FleetBoard {
            catalog,
            occupancy: [[0; BOARD_SIZE]; BOARD_SIZE],
            hits: BB::new(),
            misses: BB::new(),
            quotas: catalog.quotas(),
            footprints: Vec::new(),
        }
    }

    pub fn catalog(&self) -> ShipCatalog {
        self.catalog
    }

    /// Kind codes of the whole grid.
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Kind code at (row, col); `0` for water or off-board cells.
    pub fn cell_code(&self, row: usize, col: usize) -> u8 {
        self.occupancy
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }

    /// Kind of ship occupying (row, col), if any.
    pub fn occupant(&self, row: usize, col: usize) -> Option<ShipKind> {
        ShipKind::from_code(self.cell_code(row, col))
    }

    pub fn quotas(&self) -> &[ShipQuota] {
        &self.quotas
    }

    /// Ships of `kind` still waiting to be placed.
    pub fn remaining(&self, kind: ShipKind) -> u8 {
        self.quotas[kind.index()].remaining()
    }

    /// Placed ships, in placement order.
    pub fn footprints(&self) -> &[ShipFootprint] {
        &self.footprints
    }

    /// True once every quota is exhausted.
    pub fn is_full(&self) -> bool {
        self.quotas.iter().all(ShipQuota::is_exhausted)
    }

    /// True if a `kind` ship fits at (row, col) without leaving the grid or
    /// touching an occupied cell. Quotas are not consulted.
    pub fn can_place(&self, kind: ShipKind, row: usize, col: usize, orientation: Orientation) -> bool {
        ShipFootprint::new(kind, orientation, row, col)
            .map(|fp| self.is_free(&fp))
            .unwrap_or(false)
    }

    fn is_free(&self, footprint: &ShipFootprint) -> bool {
        footprint.cells().all(|(r, c)| self.occupancy[r][c] == 0)
    }

    /// Full placement validation: quota, then bounds, then overlap. Returns
    /// the footprint the ship would cover.
    pub fn check_placement(
        &self,
        kind: ShipKind,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<ShipFootprint, PlacementError> {
        if self.quotas[kind.index()].is_exhausted() {
            return Err(PlacementError::QuotaExhausted);
        }
        let footprint = ShipFootprint::new(kind, orientation, row, col)?;
        if !self.is_free(&footprint) {
            return Err(PlacementError::Overlap);
        }
        Ok(footprint)
    }

    /// Place a `kind` ship at (row, col). On success every covered cell reads
    /// the kind code, the kind's quota drops by one and the footprint is
    /// appended. On failure nothing changes.
    pub fn place_ship(
        &mut self,
        kind: ShipKind,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<ShipFootprint, PlacementError> {
        let footprint = self.check_placement(kind, row, col, orientation)?;
        self.quotas[kind.index()].take()?;
        for (r, c) in footprint.cells() {
            self.occupancy[r][c] = kind.code();
        }
        self.footprints.push(footprint);
        Ok(footprint)
    }

    /// Returns a uniformly chosen valid (row, col, Orientation) for `kind`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        kind: ShipKind,
    ) -> Result<(usize, usize, Orientation), BoardError> {
        let mut options = Vec::new();
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            for r in 0..BOARD_SIZE {
                for c in 0..BOARD_SIZE {
                    if self.can_place(kind, r, c, orientation) {
                        options.push((r, c, orientation));
                    }
                }
            }
        }
        options
            .choose(rng)
            .copied()
            .ok_or(BoardError::UnableToPlaceShip)
    }

    /// Randomly place every ship the quotas still allow, largest first.
    /// Ships already on the board stay where they are.
    pub fn auto_populate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        let start = self.clone();
        for _ in 0..MAX_LAYOUT_ATTEMPTS {
            if self.fill_remaining(rng).is_ok() {
                return Ok(());
            }
            *self = start.clone();
        }
        Err(BoardError::UnableToPlaceShip)
    }

    fn fill_remaining<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        for kind in ShipKind::ALL.into_iter().rev() {
            while self.remaining(kind) > 0 {
                let (r, c, o) = self.random_placement(rng, kind)?;
                self.place_ship(kind, r, c, o)
                    .map_err(|_| BoardError::UnableToPlaceShip)?;
            }
        }
        Ok(())
    }

    /// Shot history of a single cell. Off-board cells read as `None`.
    pub fn shot_mark(&self, row: usize, col: usize) -> ShotMark {
        if self.hits.contains(row, col) {
            ShotMark::Hit
        } else if self.misses.contains(row, col) {
            ShotMark::Miss
        } else {
            ShotMark::None
        }
    }

    /// Shot history of the whole grid.
    pub fn shot_history(&self) -> [[ShotMark; BOARD_SIZE]; BOARD_SIZE] {
        core::array::from_fn(|r| core::array::from_fn(|c| self.shot_mark(r, c)))
    }

    /// Cells that were hit.
    pub fn hits(&self) -> BB {
        self.hits
    }

    /// Cells that were missed.
    pub fn misses(&self) -> BB {
        self.misses
    }

    /// Every cell fired upon so far.
    pub fn fired(&self) -> BB {
        self.hits | self.misses
    }

    /// Fire at (row, col). A cell can only be fired upon once; a repeat shot
    /// is refused and leaves the history untouched.
    pub fn record_shot(&mut self, row: usize, col: usize) -> Result<ShotResult, ShotError> {
        if self.fired().get(row, col)? {
            return Err(ShotError::AlreadyFired { row, col });
        }
        if self.occupancy[row][col] == 0 {
            self.misses.set(row, col)?;
            Ok(ShotResult::Miss)
        } else {
            self.hits.set(row, col)?;
            Ok(ShotResult::Hit)
        }
    }

    /// True when every cell inside `footprint` has been hit.
    pub fn is_sunk(&self, footprint: &ShipFootprint) -> bool {
        footprint.cells().all(|(r, c)| self.hits.contains(r, c))
    }

    /// The placed ship covering (row, col), if any.
    pub fn footprint_at(&self, row: usize, col: usize) -> Option<&ShipFootprint> {
        self.footprints.iter().find(|fp| fp.contains(row, col))
    }

    /// Ships whose every cell has been hit.
    pub fn sunk_footprints(&self) -> impl Iterator<Item = &ShipFootprint> + '_ {
        self.footprints.iter().filter(move |fp| self.is_sunk(fp))
    }

    /// Number of cells hit so far.
    pub fn hit_count(&self) -> usize {
        self.hits.count_ones()
    }

    /// True once every ship cell of the catalog has been hit.
    pub fn all_sunk(&self) -> bool {
        self.hit_count() == self.catalog.total_cells()
    }
}

impl From<&FleetBoard> for BoardState {
    fn from(b: &FleetBoard) -> Self {
        BoardState {
            catalog: b.catalog,
            occupancy: b.occupancy,
            hits: b.hits,
            misses: b.misses,
            quotas: b.quotas,
            footprints: b.footprints.clone(),
        }
    }
}

impl TryFrom<BoardState> for FleetBoard {
    type Error = BoardError;

    /// Rebuild a board, refusing states that break the board invariants.
    fn try_from(state: BoardState) -> Result<Self, Self::Error> {
        let mut rebuilt = FleetBoard::new(state.catalog);
        for fp in &state.footprints {
            let (row, col) = fp.origin();
            let placed = rebuilt
                .place_ship(fp.kind(), row, col, fp.orientation())
                .map_err(|_| BoardError::CorruptState("footprints overlap or exceed the catalog"))?;
            if placed != *fp {
                return Err(BoardError::CorruptState("footprint does not match its kind"));
            }
        }
        if rebuilt.occupancy != state.occupancy {
            return Err(BoardError::CorruptState("occupancy does not match footprints"));
        }
        if rebuilt.quotas != state.quotas {
            return Err(BoardError::CorruptState("quotas do not match footprints"));
        }
        if !(state.hits & state.misses).is_empty() {
            return Err(BoardError::CorruptState("cell marked both hit and miss"));
        }
        let hits_on_ships = state
            .hits
            .iter_set_bits()
            .all(|(r, c)| state.occupancy[r][c] != 0);
        let misses_on_water = state
            .misses
            .iter_set_bits()
            .all(|(r, c)| state.occupancy[r][c] == 0);
        if !hits_on_ships || !misses_on_water {
            return Err(BoardError::CorruptState("shot history disagrees with occupancy"));
        }
        rebuilt.hits = state.hits;
        rebuilt.misses = state.misses;
        Ok(rebuilt)
    }
}
