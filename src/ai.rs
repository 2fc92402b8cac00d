// Shot selection for the computer side.
//
// Two modes: a uniform draw over every cell not yet fired upon, and a hunt
// that probes the four neighbours of the last shot after a hit.

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::BB;
use crate::config::BOARD_SIZE;

/// Which strategy the next shot uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetMode {
    #[default]
    Random,
    /// Probe around the last shot, which hit a ship that is still afloat.
    Hunting,
}

/// Offsets probed in hunting mode: right, left, down, up.
const NEIGHBOURS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Memory of the computer's own shots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetingState {
    fired: BB,
    last_shot: Option<(usize, usize)>,
    mode: TargetMode,
}

impl TargetingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from its recorded history.
    pub fn from_parts(fired: BB, last_shot: Option<(usize, usize)>, mode: TargetMode) -> Self {
        Self {
            fired,
            last_shot,
            mode,
        }
    }

    /// Cells already fired upon.
    pub fn fired(&self) -> BB {
        self.fired
    }

    pub fn last_shot(&self) -> Option<(usize, usize)> {
        self.last_shot
    }

    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    /// Select the strategy for the next call to [`TargetingState::next_shot`].
    pub fn set_mode(&mut self, mode: TargetMode) {
        self.mode = mode;
    }

    /// Draw uniformly among the cells not fired upon yet. `None` once the
    /// whole board has been covered.
    pub fn random_shot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize)> {
        let cell = self.fired.iter_unset_bits().choose(rng)?;
        self.commit(cell)
    }

    /// Probe the neighbours of the last shot in random order and take the
    /// first that is on the board and untried. Falls back to
    /// [`TargetingState::random_shot`] when none qualifies.
    pub fn smart_shot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize)> {
        if let Some(cell) = self.last_shot.and_then(|last| self.untried_neighbour(last, rng)) {
            return self.commit(cell);
        }
        self.random_shot(rng)
    }

    /// Shot for the current mode.
    pub fn next_shot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize)> {
        match self.mode {
            TargetMode::Random => self.random_shot(rng),
            TargetMode::Hunting => self.smart_shot(rng),
        }
    }

    fn untried_neighbour<R: Rng + ?Sized>(
        &self,
        (row, col): (usize, usize),
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        let mut order = NEIGHBOURS;
        order.shuffle(rng);
        order.iter().find_map(|&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            (r < BOARD_SIZE && c < BOARD_SIZE && !self.fired.contains(r, c)).then_some((r, c))
        })
    }

    /// Record (row, col) as fired and hand it out.
    fn commit(&mut self, (row, col): (usize, usize)) -> Option<(usize, usize)> {
        self.fired.set(row, col).ok()?;
        self.last_shot = Some((row, col));
        self.last_shot
    }
}
