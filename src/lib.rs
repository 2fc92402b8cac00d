//! Naval battle game engine: fleet boards, ship placement, the computer
//! opponent's targeting and a persisted, turn-based match.

mod ai;
mod bitboard;
mod board;
mod catalog;
pub mod cli;
mod common;
mod config;
mod game;
mod logging;
pub mod persistence;
mod ship;

pub use ai::*;
pub use bitboard::{BitBoard, BitBoardError, SetBits};
pub use board::*;
pub use catalog::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use logging::{init_logging, init_logging_with};
pub use persistence::{FileStore, MatchStore, MemoryStore, PersistenceError};
pub use ship::*;
