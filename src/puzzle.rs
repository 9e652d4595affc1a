use rand::{seq::SliceRandom, Rng};
use std::fmt;

use crate::error::PuzzleError;

/// Tile value marking the empty cell.
pub const BLANK: u32 = 0;

/// Largest supported grid width.
pub const MAX_SIZE: usize = 15;

/// Direction a tile slides into the empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Offset `(row, col)` by which the blank travels when a tile slides this way.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An `size`x`size` sliding puzzle stored row-major, `0` marking the blank.
///
/// A `Board` is always a permutation of `0..size*size`. Every move produces a
/// new board; nothing mutates a board after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Vec<u32>,
    blank: usize,
}

impl Board {
    /// The solved layout: `1..N` in order with the blank in the last cell.
    ///
    /// # Panics
    ///
    /// Panics if `size` is outside `2..=MAX_SIZE`.
    pub fn goal(size: usize) -> Self {
        assert!(
            (2..=MAX_SIZE).contains(&size),
            "grid size {} is outside 2..={}",
            size,
            MAX_SIZE
        );
        let cells = size * size;
        let tiles = (1..=cells as u32)
            .map(|value| value % cells as u32)
            .collect();

        Self {
            size,
            tiles,
            blank: cells - 1,
        }
    }

    pub fn from_tiles(size: usize, tiles: Vec<u32>) -> Result<Self, PuzzleError> {
        if !(2..=MAX_SIZE).contains(&size) {
            return Err(PuzzleError::InvalidBoard(format!(
                "size {} is outside 2..={}",
                size, MAX_SIZE
            )));
        }
        let cells = size * size;
        if tiles.len() != cells {
            return Err(PuzzleError::InvalidBoard(format!(
                "expected {} tiles for a {}x{} grid, found {}",
                cells,
                size,
                size,
                tiles.len()
            )));
        }

        let mut seen = vec![false; cells];
        for &value in &tiles {
            let slot = seen.get_mut(value as usize).ok_or_else(|| {
                PuzzleError::InvalidBoard(format!("tile {} is out of range 0..{}", value, cells))
            })?;
            if *slot {
                return Err(PuzzleError::InvalidBoard(format!("tile {} appears twice", value)));
            }
            *slot = true;
        }

        let blank = tiles
            .iter()
            .position(|&value| value == BLANK)
            .ok_or_else(|| PuzzleError::InvalidBoard("no blank tile".to_string()))?;

        Ok(Self { size, tiles, blank })
    }

    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, PuzzleError> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(PuzzleError::InvalidBoard(format!(
                "row of length {} in a grid with {} rows",
                row.len(),
                size
            )));
        }
        Self::from_tiles(size, rows.into_iter().flatten().collect())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// Flat index of the blank.
    pub fn blank(&self) -> usize {
        self.blank
    }

    /// `(row, col)` of a flat index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::goal(self.size)
    }

    /// Flat indices the blank can move into: up, down, left, right.
    pub fn legal_moves(&self) -> impl Iterator<Item = usize> {
        let size = self.size;
        let blank = self.blank;
        let (row, col) = self.coords(blank);

        [
            (row > 0).then(|| blank - size),
            (row + 1 < size).then(|| blank + size),
            (col > 0).then(|| blank - 1),
            (col + 1 < size).then(|| blank + 1),
        ]
        .into_iter()
        .flatten()
    }

    fn is_adjacent_to_blank(&self, target: usize) -> bool {
        if target >= self.tiles.len() {
            return false;
        }
        let (row, col) = self.coords(self.blank);
        let (t_row, t_col) = self.coords(target);
        row.abs_diff(t_row) + col.abs_diff(t_col) == 1
    }

    /// Swaps the blank with the tile at `target`, returning a new board.
    pub fn apply_move(&self, target: usize) -> Result<Self, PuzzleError> {
        if !self.is_adjacent_to_blank(target) {
            return Err(PuzzleError::InvalidMove {
                blank: self.blank,
                target,
            });
        }
        Ok(self.swap_blank(target))
    }

    /// Unchecked variant of [`Board::apply_move`] for indices produced by
    /// [`Board::legal_moves`].
    pub(crate) fn swap_blank(&self, target: usize) -> Self {
        debug_assert!(self.is_adjacent_to_blank(target));
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Self {
            size: self.size,
            tiles,
            blank: target,
        }
    }

    /// Index the blank moves into when a tile slides in direction `movement`.
    pub fn target_of(&self, movement: Move) -> Option<usize> {
        let (d_row, d_col) = movement.as_offset();
        let (row, col) = self.coords(self.blank);

        let new_row = row as isize + d_row;
        let new_col = col as isize + d_col;
        let size = self.size as isize;

        if new_row >= 0 && new_row < size && new_col >= 0 && new_col < size {
            Some(new_row as usize * self.size + new_col as usize)
        } else {
            None
        }
    }

    pub fn slide(&self, movement: Move) -> Option<Self> {
        self.target_of(movement)
            .map(|target| self.swap_blank(target))
    }

    /// Direction leading from this board to `next`, if they are one slide apart.
    pub fn move_to(&self, next: &Board) -> Option<Move> {
        if next.size != self.size {
            return None;
        }
        Move::ALL.into_iter().find(|&movement| {
            self.target_of(movement) == Some(next.blank) && self.swap_blank(next.blank) == *next
        })
    }

    /// Whether `goal` can be reached from this board by legal slides.
    ///
    /// Every slide is one transposition and moves the blank one cell, so the
    /// parity of the permutation between the boards must match the parity of
    /// the blank's taxicab distance.
    pub fn can_reach(&self, goal: &Board) -> bool {
        if goal.size != self.size {
            return false;
        }

        let mut goal_pos = vec![0; goal.tiles.len()];
        for (index, &value) in goal.tiles.iter().enumerate() {
            goal_pos[value as usize] = index;
        }
        let permutation: Vec<usize> = self
            .tiles
            .iter()
            .map(|&value| goal_pos[value as usize])
            .collect();

        let (row, col) = self.coords(self.blank);
        let (g_row, g_col) = goal.coords(goal.blank);
        let blank_distance = row.abs_diff(g_row) + col.abs_diff(g_col);

        Self::permutation_parity(&permutation) == blank_distance % 2
    }

    pub fn is_solvable(&self) -> bool {
        self.can_reach(&Self::goal(self.size))
    }

    fn permutation_parity(permutation: &[usize]) -> usize {
        let mut visited = vec![false; permutation.len()];
        let mut cycles = 0;

        for start in 0..permutation.len() {
            if visited[start] {
                continue;
            }
            cycles += 1;
            let mut index = start;
            while !visited[index] {
                visited[index] = true;
                index = permutation[index];
            }
        }

        (permutation.len() - cycles) % 2
    }

    /// Uniformly random solvable board.
    ///
    /// # Panics
    ///
    /// Panics if `size` is outside `2..=MAX_SIZE`, like [`Board::goal`].
    pub fn shuffle<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut board = Self::goal(size);

        loop {
            board.tiles.shuffle(rng);
            board.blank = board
                .tiles
                .iter()
                .position(|&value| value == BLANK)
                .unwrap_or_default();

            if board.is_solvable() {
                break;
            }
        }

        board
    }

    /// Random walk of `steps` slides that never undoes the previous one.
    pub fn scramble<R: Rng + ?Sized>(&self, rng: &mut R, steps: usize) -> Self {
        let mut board = self.clone();
        let mut previous = None;

        for _ in 0..steps {
            let candidates: Vec<usize> = board
                .legal_moves()
                .filter(|&target| Some(target) != previous)
                .collect();
            if let Some(&target) = candidates.choose(rng) {
                previous = Some(board.blank);
                board = board.swap_blank(target);
            }
        }

        board
    }
}

impl Board {
    /// Text of the cell at `index`, right-aligned to the widest tile, `.` for the blank.
    pub fn cell_label(&self, index: usize) -> String {
        let width = (self.tiles.len() - 1).to_string().len();
        match self.tiles[index] {
            BLANK => format!("{:>width$}", ".", width = width),
            value => format!("{:>width$}", value, width = width),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                write!(f, "{} ", self.cell_label(row * self.size + col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(size: usize, tiles: &[u32]) -> Board {
        Board::from_tiles(size, tiles.to_vec()).unwrap()
    }

    #[test]
    fn test_goal_layout() {
        assert_eq!(Board::goal(3).tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(Board::goal(4).blank(), 15);
        assert!(Board::goal(4).is_solved());
    }

    #[test]
    fn test_goal_sizes_match_from_tiles() {
        for size in [2, 3, MAX_SIZE] {
            let goal = Board::goal(size);
            assert_eq!(Board::from_tiles(size, goal.tiles().to_vec()), Ok(goal));
        }
        for size in [0, 1, MAX_SIZE + 1] {
            assert!(Board::from_tiles(size, vec![0; size * size]).is_err());
            assert!(std::panic::catch_unwind(|| Board::goal(size)).is_err());
            assert!(std::panic::catch_unwind(|| {
                Board::shuffle(size, &mut StdRng::seed_from_u64(3))
            })
            .is_err());
        }
    }

    #[test]
    fn test_cell_label() {
        let start = board(4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 13, 14, 15, 12]);
        assert_eq!(start.cell_label(0), " 1");
        assert_eq!(start.cell_label(11), " .");
        assert_eq!(start.cell_label(15), "12");
    }

    #[test]
    fn test_from_tiles_rejects_malformed_boards() {
        assert!(matches!(
            Board::from_tiles(3, vec![1, 2, 3]),
            Err(PuzzleError::InvalidBoard(_))
        ));
        assert!(matches!(
            Board::from_tiles(3, vec![1, 1, 3, 4, 5, 6, 7, 8, 0]),
            Err(PuzzleError::InvalidBoard(_))
        ));
        assert!(matches!(
            Board::from_tiles(3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]),
            Err(PuzzleError::InvalidBoard(_))
        ));
        assert!(matches!(
            Board::from_tiles(1, vec![0]),
            Err(PuzzleError::InvalidBoard(_))
        ));
        assert!(matches!(
            Board::from_rows(vec![vec![1, 2], vec![3]]),
            Err(PuzzleError::InvalidBoard(_))
        ));
    }

    #[test]
    fn test_from_rows_matches_flat() {
        let rows = Board::from_rows(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]).unwrap();
        assert_eq!(rows, board(3, &[1, 2, 3, 4, 0, 6, 7, 5, 8]));
        assert_eq!(rows.blank(), 4);
    }

    #[test]
    fn test_legal_moves() {
        let corner = Board::goal(3);
        assert_eq!(corner.legal_moves().collect::<Vec<_>>(), vec![5, 7]);

        let center = board(3, &[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        assert_eq!(center.legal_moves().collect::<Vec<_>>(), vec![1, 7, 3, 5]);

        let top_left = board(3, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(top_left.legal_moves().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_apply_move_returns_new_board() {
        let start = board(3, &[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        let next = start.apply_move(7).unwrap();
        assert_eq!(next.tiles(), &[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert_eq!(next.blank(), 7);
        assert_eq!(start.tiles(), &[1, 2, 3, 4, 0, 6, 7, 5, 8]);
    }

    #[test]
    fn test_apply_move_rejects_non_adjacent() {
        let start = Board::goal(3);
        assert_eq!(
            start.apply_move(0),
            Err(PuzzleError::InvalidMove { blank: 8, target: 0 })
        );
        assert_eq!(
            start.apply_move(9),
            Err(PuzzleError::InvalidMove { blank: 8, target: 9 })
        );
        // same flat distance, different row
        let edge = board(3, &[1, 2, 0, 3, 4, 5, 6, 7, 8]);
        assert!(edge.apply_move(3).is_err());
    }

    #[test]
    fn test_moves_are_reversible() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let start = Board::shuffle(4, &mut rng);
            for target in start.legal_moves() {
                let next = start.apply_move(target).unwrap();
                let back = next.apply_move(start.blank()).unwrap();
                assert_eq!(back, start);
            }
        }
    }

    #[test]
    fn test_slide_and_move_to_agree() {
        let start = Board::goal(4);
        let up = start.slide(Move::Up);
        assert!(up.is_none());

        let down = start.slide(Move::Down).unwrap();
        assert_eq!(down.blank(), 11);
        assert_eq!(start.move_to(&down), Some(Move::Down));
        assert_eq!(down.move_to(&start), Some(Move::Up));
        assert_eq!(start.move_to(&start), None);
    }

    #[test]
    fn test_solvability() {
        assert!(Board::goal(3).is_solvable());
        assert!(Board::goal(4).is_solvable());

        // swapping two tiles flips parity
        assert!(!board(3, &[2, 1, 3, 4, 5, 6, 7, 8, 0]).is_solvable());
        assert!(!board(4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0]).is_solvable());

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            assert!(Board::shuffle(3, &mut rng).is_solvable());
            assert!(Board::goal(4).scramble(&mut rng, 30).is_solvable());
        }
    }

    #[test]
    fn test_can_reach_arbitrary_goal() {
        let from = board(3, &[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        let goal = board(3, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let twisted = board(3, &[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        let swapped = board(3, &[0, 2, 1, 3, 4, 5, 6, 7, 8]);
        assert!(goal.can_reach(&twisted));
        assert!(!goal.can_reach(&swapped));
        assert!(from.is_solvable());
        assert_eq!(from.can_reach(&goal), goal.is_solvable());
        assert!(!from.can_reach(&Board::goal(4)));
    }

    #[test]
    fn test_display() {
        let text = board(3, &[1, 2, 3, 4, 0, 6, 7, 5, 8]).to_string();
        assert_eq!(text, "1 2 3 \n4 . 6 \n7 5 8 \n");
    }
}
