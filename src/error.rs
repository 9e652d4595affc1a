use thiserror::Error;

/// Errors raised by board construction, move application and solver setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("cannot slide blank at {blank} to {target}")]
    InvalidMove { blank: usize, target: usize },

    #[error("board is {board}x{board} but goal is {goal}x{goal}")]
    SizeMismatch { board: usize, goal: usize },

    #[error("goal is not reachable from this board")]
    Unsolvable,
}
