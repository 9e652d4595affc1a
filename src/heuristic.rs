//! Lower bound on the number of slides separating a board from its goal.
//!
//! The estimate is the Manhattan distance of every tile plus two moves for
//! each tile that has to leave its goal line to let a reversed neighbour
//! pass.

use crate::error::PuzzleError;
use crate::puzzle::{Board, BLANK};

/// Goal positions indexed by tile value, built once per search.
#[derive(Debug, Clone)]
pub(crate) struct Heuristic {
    size: usize,
    goal_pos: Vec<usize>,
}

impl Heuristic {
    pub(crate) fn new(goal: &Board) -> Self {
        let mut goal_pos = vec![0; goal.tiles().len()];
        for (index, &value) in goal.tiles().iter().enumerate() {
            goal_pos[value as usize] = index;
        }
        Self {
            size: goal.size(),
            goal_pos,
        }
    }

    /// `board` must have the goal's size.
    pub(crate) fn estimate(&self, board: &Board) -> u32 {
        debug_assert_eq!(board.size(), self.size);
        self.manhattan_distance(board) + 2 * self.linear_conflicts(board)
    }

    fn manhattan_distance(&self, board: &Board) -> u32 {
        let mut distance = 0;
        for (index, &value) in board.tiles().iter().enumerate() {
            if value != BLANK {
                let target = self.goal_pos[value as usize];
                distance += (index / self.size).abs_diff(target / self.size);
                distance += (index % self.size).abs_diff(target % self.size);
            }
        }
        distance as u32
    }

    /// Tiles that must step out of their goal row or column, summed over all lines.
    fn linear_conflicts(&self, board: &Board) -> u32 {
        let size = self.size;
        let tiles = board.tiles();
        let mut line = Vec::with_capacity(size);
        let mut conflicts = 0;

        // Row conflicts
        for row in 0..size {
            line.clear();
            for col in 0..size {
                let value = tiles[row * size + col];
                if value != BLANK {
                    let target = self.goal_pos[value as usize];
                    if target / size == row {
                        line.push(target % size);
                    }
                }
            }
            conflicts += line.len() - longest_ordered_run(&line);
        }

        // Column conflicts
        for col in 0..size {
            line.clear();
            for row in 0..size {
                let value = tiles[row * size + col];
                if value != BLANK {
                    let target = self.goal_pos[value as usize];
                    if target % size == col {
                        line.push(target / size);
                    }
                }
            }
            conflicts += line.len() - longest_ordered_run(&line);
        }

        conflicts as u32
    }
}

/// Length of the longest strictly increasing subsequence.
fn longest_ordered_run(line: &[usize]) -> usize {
    let mut tails: Vec<usize> = Vec::with_capacity(line.len());
    for &value in line {
        let at = tails.partition_point(|&tail| tail < value);
        if at == tails.len() {
            tails.push(value);
        } else {
            tails[at] = value;
        }
    }
    tails.len()
}

/// Manhattan distance plus linear-conflict penalty from `board` to `goal`.
pub fn heuristic(board: &Board, goal: &Board) -> Result<u32, PuzzleError> {
    if board.size() != goal.size() {
        return Err(PuzzleError::SizeMismatch {
            board: board.size(),
            goal: goal.size(),
        });
    }
    Ok(Heuristic::new(goal).estimate(board))
}
