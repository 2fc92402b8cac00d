use std::env;
use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::catalog::ShipCatalog;

/// Width and height of every fleet board.
pub const BOARD_SIZE: usize = 10;

/// Where the match snapshot lives unless told otherwise.
pub const DEFAULT_SAVE_PATH: &str = "navalbattle-match.sav";

/// Version byte written in front of every snapshot.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Environment variable overriding the snapshot path.
pub const SAVE_PATH_ENV: &str = "NAVALBATTLE_SAVE";

/// Environment variable holding the log level filter.
pub const LOG_LEVEL_ENV: &str = "NAVALBATTLE_LOG";

/// Named fleets a match can be started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FleetPreset {
    /// One ship of each kind.
    #[default]
    Standard,
    /// Four frigates, three destroyers, two submarines, one carrier.
    Classic,
}

impl FleetPreset {
    pub fn catalog(self) -> ShipCatalog {
        match self {
            FleetPreset::Standard => ShipCatalog::standard(),
            FleetPreset::Classic => ShipCatalog::classic(),
        }
    }
}

/// Settings for one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub save_path: PathBuf,
    pub fleet: FleetPreset,
    /// Fixed RNG seed for reproducible games.
    pub seed: Option<u64>,
    /// Pause before each computer shot. Pacing only.
    pub computer_delay: Duration,
}

impl GameConfig {
    /// Defaults, with the save path taken from `NAVALBATTLE_SAVE` when set.
    pub fn from_env() -> Self {
        let save_path = env::var_os(SAVE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH));
        Self {
            save_path,
            ..Self::default()
        }
    }

    /// RNG for the session: seeded when a seed is configured, otherwise
    /// drawn from the thread RNG.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            fleet: FleetPreset::Standard,
            seed: None,
            computer_delay: Duration::from_millis(0),
        }
    }
}
