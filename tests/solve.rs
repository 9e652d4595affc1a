use std::{collections::HashMap, collections::VecDeque, thread, time::Duration};

use rand::{rngs::StdRng, SeedableRng};
use slider_solver::{solve, Board, CancelToken, Outcome, Search, SolverConfig};

// Korf's first 15-puzzle instance (57 slides), rotated to put the blank's goal last.
const KORF_1: [u32; 16] = [13, 6, 8, 12, 15, 14, 0, 10, 11, 7, 4, 5, 9, 1, 3, 2];

fn distances_from_goal(size: usize) -> HashMap<Board, u32> {
    let goal = Board::goal(size);
    let mut distance = HashMap::new();
    let mut queue = VecDeque::new();
    distance.insert(goal.clone(), 0);
    queue.push_back(goal);

    while let Some(board) = queue.pop_front() {
        let d = distance[&board];
        for target in board.legal_moves() {
            let next = board.apply_move(target).unwrap();
            if !distance.contains_key(&next) {
                distance.insert(next.clone(), d + 1);
                queue.push_back(next);
            }
        }
    }
    distance
}

fn assert_valid_path(path: &[Board], start: &Board, goal: &Board) {
    assert_eq!(path.first(), Some(start));
    assert_eq!(path.last(), Some(goal));
    for pair in path.windows(2) {
        assert!(pair[0].move_to(&pair[1]).is_some());
    }
}

#[test]
fn random_eight_puzzles_are_solved_optimally() {
    let distance = distances_from_goal(3);
    assert_eq!(distance.len(), 181_440);

    let goal = Board::goal(3);
    let mut rng = StdRng::seed_from_u64(1337);
    for _ in 0..8 {
        let start = Board::shuffle(3, &mut rng);
        let outcome = start.solve().unwrap();
        let path = outcome.path().unwrap();
        assert_valid_path(path, &start, &goal);
        assert_eq!(outcome.move_count(), Some(distance[&start] as usize));
        assert_eq!(outcome.moves().map(|moves| moves.len()), outcome.move_count());
    }
}

#[test]
fn scrambled_fifteen_puzzles_are_solved() {
    let goal = Board::goal(4);
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..3 {
        let start = goal.scramble(&mut rng, 30);
        let outcome = solve(&start, &goal, &SolverConfig::default(), &CancelToken::new()).unwrap();
        let path = outcome.path().unwrap();
        assert_valid_path(path, &start, &goal);
        let moves = path.len() - 1;
        assert!(moves <= 30);
        assert_eq!(moves % 2, 0);
    }
}

#[test]
fn cancelling_from_another_thread_stops_the_search() {
    let start = Board::from_tiles(4, KORF_1.to_vec()).unwrap();
    let cancel = CancelToken::new();
    let search = Search::new(start, Board::goal(4), SolverConfig::default(), cancel.clone()).unwrap();

    let worker = thread::spawn(move || search.run());
    thread::sleep(Duration::from_millis(50));
    cancel.cancel();

    assert_eq!(worker.join().unwrap(), Outcome::Cancelled);
    assert!(cancel.is_cancelled());
}

#[test]
fn low_ceiling_on_a_distant_board_gives_up() {
    let start = Board::from_tiles(4, KORF_1.to_vec()).unwrap();
    let config = SolverConfig::default().with_max_iterations(2);
    let outcome = solve(&start, &Board::goal(4), &config, &CancelToken::new()).unwrap();
    assert_eq!(outcome, Outcome::GaveUp);
}
