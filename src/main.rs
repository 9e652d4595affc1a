use std::{
    error::Error,
    sync::mpsc::{self, RecvTimeoutError},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::style::Stylize;
use rand::thread_rng;
use slider_solver::{
    puzzle::MAX_SIZE, Board, CancelToken, Outcome, Search, SearchStats, SolverConfig, Step, BLANK,
};

// Random 15-puzzles can take minutes, so larger boards are scrambled instead.
const SCRAMBLE_STEPS: usize = 40;

#[derive(Debug, Parser)]
#[command(name = "slider-solver", about = "Shuffle a sliding puzzle and solve it with IDA*")]
struct Args {
    /// Grid width (3 for the 8-puzzle, 4 for the 15-puzzle)
    #[arg(default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=MAX_SIZE as i64))]
    size: u8,

    /// Cancel the search after this many seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

enum Progress {
    Deepened(SearchStats),
    Done(Outcome, SearchStats),
}

fn render(board: &Board, moved: Option<usize>) -> String {
    let mut out = String::new();
    for (index, &value) in board.tiles().iter().enumerate() {
        let label = board.cell_label(index);
        let cell = if value == BLANK {
            label.dark_grey().to_string()
        } else if Some(index) == moved {
            label.yellow().bold().to_string()
        } else {
            label
        };
        out.push_str(&cell);
        out.push(' ');
        if (index + 1) % board.size() == 0 {
            out.push('\n');
        }
    }
    out
}

fn collect(
    worker: JoinHandle<()>,
    finished: Option<(Outcome, SearchStats)>,
) -> Result<(Outcome, SearchStats), Box<dyn Error>> {
    worker.join().map_err(|_| "search worker panicked")?;
    Ok(finished.ok_or("search worker stopped without an outcome")?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let size = usize::from(args.size);
    let timeout = Duration::from_secs(args.timeout_secs);

    let goal = Board::goal(size);
    println!("Initial Puzzle:\n{}", render(&goal, None));

    let mut rng = thread_rng();
    let start = if size <= 3 {
        Board::shuffle(size, &mut rng)
    } else {
        goal.scramble(&mut rng, SCRAMBLE_STEPS)
    };
    println!("Shuffled Puzzle:\n{}", render(&start, None));

    let cancel = CancelToken::new();
    let mut search = Search::new(start, goal, SolverConfig::default(), cancel.clone())?;
    let (tx, rx) = mpsc::channel();

    let worker = thread::spawn(move || {
        while let Step::Deepened { .. } = search.step() {
            if tx.send(Progress::Deepened(search.stats())).is_err() {
                return;
            }
        }
        let outcome = search.outcome().cloned().unwrap_or(Outcome::GaveUp);
        let _ = tx.send(Progress::Done(outcome, search.stats()));
    });

    let deadline = Instant::now() + timeout;
    let finished = loop {
        let received = if cancel.is_cancelled() {
            rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
        } else {
            rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
        };
        match received {
            Ok(Progress::Deepened(stats)) => println!(
                "{} threshold {:>3}, {} nodes expanded",
                "searching".dark_grey(),
                stats.threshold,
                stats.expanded
            ),
            Ok(Progress::Done(outcome, stats)) => break Some((outcome, stats)),
            Err(RecvTimeoutError::Timeout) => {
                if !cancel.is_cancelled() {
                    println!("{}", "time limit reached, stopping search".yellow());
                    cancel.cancel();
                }
            }
            Err(RecvTimeoutError::Disconnected) => break None,
        }
    };
    let (outcome, stats) = collect(worker, finished)?;

    match &outcome {
        Outcome::Solved(path) => {
            println!(
                "{}",
                format!(
                    "Found optimal solution with {} moves ({} passes, {} nodes expanded)",
                    path.len() - 1,
                    stats.iterations,
                    stats.expanded
                )
                .green()
                .bold()
            );
            let moves = outcome.moves().unwrap_or_default();
            for (pair, movement) in path.windows(2).zip(moves) {
                // the tile that moved now sits where the blank was
                println!("{}\n{}", movement, render(&pair[1], Some(pair[0].blank())));
            }
        }
        Outcome::GaveUp => println!("{}", "No solution found within the work limits".red()),
        Outcome::Cancelled => println!("{}", "Search cancelled".red()),
    }

    Ok(())
}
