use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::config::SolverConfig;
use crate::error::PuzzleError;
use crate::heuristic::Heuristic;
use crate::puzzle::{Board, Move};

/// Shared flag used to stop a running search from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clears the flag so the token can drive another search.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Boards from the start to the goal, both included.
    Solved(Vec<Board>),
    /// The work budget ran out before the goal was found.
    GaveUp,
    Cancelled,
}

impl Outcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn path(&self) -> Option<&[Board]> {
        match self {
            Outcome::Solved(path) => Some(path),
            _ => None,
        }
    }

    pub fn move_count(&self) -> Option<usize> {
        self.path().map(|path| path.len() - 1)
    }

    /// Slide directions along the solution path.
    pub fn moves(&self) -> Option<Vec<Move>> {
        let path = self.path()?;
        path.windows(2)
            .map(|pair| pair[0].move_to(&pair[1]))
            .collect()
    }
}

/// Result of one deepening pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No solution within the old threshold; the next pass uses this one.
    Deepened { threshold: u32 },
    /// The search reached an [`Outcome`].
    Finished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Deepening passes started.
    pub iterations: usize,
    /// Nodes whose successors were generated, over all passes.
    pub expanded: u64,
    /// Threshold of the next pass.
    pub threshold: u32,
}

#[derive(Debug)]
enum Bound {
    Found,
    Deeper(u32),
    Exhausted,
    Cancelled,
    OutOfBudget,
}

/// Iterative-deepening A* over sliding-puzzle boards.
///
/// Each call to [`Search::step`] runs one full depth-first pass bounded by
/// the current threshold, so callers can report progress, check a clock or
/// yield to other work between passes.
#[derive(Debug)]
pub struct Search {
    start: Board,
    goal: Board,
    heuristic: Heuristic,
    config: SolverConfig,
    cancel: CancelToken,
    stats: SearchStats,
    outcome: Option<Outcome>,
}

impl Search {
    pub fn new(
        start: Board,
        goal: Board,
        config: SolverConfig,
        cancel: CancelToken,
    ) -> Result<Self, PuzzleError> {
        if start.size() != goal.size() {
            return Err(PuzzleError::SizeMismatch {
                board: start.size(),
                goal: goal.size(),
            });
        }
        if !start.can_reach(&goal) {
            return Err(PuzzleError::Unsolvable);
        }

        let heuristic = Heuristic::new(&goal);
        let stats = SearchStats {
            threshold: heuristic.estimate(&start),
            ..SearchStats::default()
        };

        Ok(Self {
            start,
            goal,
            heuristic,
            config,
            cancel,
            stats,
            outcome: None,
        })
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Runs one deepening pass. Once finished, further calls do nothing.
    pub fn step(&mut self) -> Step {
        if self.outcome.is_some() {
            return Step::Finished;
        }
        if self.cancel.is_cancelled() {
            return self.finish(Outcome::Cancelled);
        }
        if self.stats.iterations >= self.config.max_iterations {
            return self.finish(Outcome::GaveUp);
        }

        self.stats.iterations += 1;
        let mut path = vec![self.start.clone()];

        match self.find(&mut path, 0) {
            Bound::Found => self.finish(Outcome::Solved(path)),
            Bound::Deeper(threshold) => {
                self.stats.threshold = threshold;
                Step::Deepened { threshold }
            }
            Bound::Exhausted | Bound::OutOfBudget => self.finish(Outcome::GaveUp),
            Bound::Cancelled => self.finish(Outcome::Cancelled),
        }
    }

    /// Drives the search until it reaches an outcome.
    pub fn run(mut self) -> Outcome {
        while let Step::Deepened { .. } = self.step() {}
        self.outcome.unwrap_or(Outcome::GaveUp)
    }

    fn finish(&mut self, outcome: Outcome) -> Step {
        self.outcome = Some(outcome);
        Step::Finished
    }

    /// Depth-first pass below the current threshold. `path` holds the
    /// branch being explored and is left holding the solution on success.
    fn find(&mut self, path: &mut Vec<Board>, distance: u32) -> Bound {
        if self.cancel.is_cancelled() {
            return Bound::Cancelled;
        }

        let next_boards: Vec<Board> = {
            let Some(node) = path.last() else {
                return Bound::Exhausted;
            };
            let total_estimated = distance + self.heuristic.estimate(node);
            if total_estimated > self.stats.threshold {
                return Bound::Deeper(total_estimated);
            }
            if *node == self.goal {
                return Bound::Found;
            }
            if let Some(limit) = self.config.max_expansions {
                if self.stats.expanded >= limit {
                    return Bound::OutOfBudget;
                }
            }
            self.stats.expanded += 1;

            node.legal_moves()
                .map(|target| node.swap_blank(target))
                .filter(|next| !path.contains(next))
                .collect()
        };

        let mut min = None;
        for next in next_boards {
            if self.cancel.is_cancelled() {
                return Bound::Cancelled;
            }

            path.push(next);
            match self.find(path, distance + 1) {
                Bound::Found => return Bound::Found,
                Bound::Deeper(cost) => {
                    if min.map_or(true, |c| cost < c) {
                        min.replace(cost);
                    }
                }
                Bound::Exhausted => {}
                interrupted => return interrupted,
            }
            path.pop();
        }

        match min {
            Some(cost) => Bound::Deeper(cost),
            None => Bound::Exhausted,
        }
    }
}

/// Searches for a shortest slide sequence from `start` to `goal`.
pub fn solve(
    start: &Board,
    goal: &Board,
    config: &SolverConfig,
    cancel: &CancelToken,
) -> Result<Outcome, PuzzleError> {
    let search = Search::new(start.clone(), goal.clone(), config.clone(), cancel.clone())?;
    Ok(search.run())
}

impl Board {
    /// Solves towards the standard goal with the default work limits.
    pub fn solve(&self) -> Result<Outcome, PuzzleError> {
        solve(
            self,
            &Board::goal(self.size()),
            &SolverConfig::default(),
            &CancelToken::new(),
        )
    }
}
