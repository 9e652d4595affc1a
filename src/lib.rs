//! Optimal solver for `n`x`n` sliding puzzles (8-puzzle, 15-puzzle, ...).
//!
//! Boards are searched with iterative-deepening A* guided by Manhattan
//! distance plus linear conflicts. A search can be driven one deepening pass
//! at a time and stopped from another thread through a [`CancelToken`].

pub mod config;
pub mod error;
pub mod heuristic;
pub mod puzzle;
pub mod search;

pub use config::SolverConfig;
pub use error::PuzzleError;
pub use heuristic::heuristic;
pub use puzzle::{Board, Move, BLANK};
pub use search::{solve, CancelToken, Outcome, Search, SearchStats, Step};
