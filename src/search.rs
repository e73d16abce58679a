//
// Hashiwokakero solver
//
// Copyright 2021 Simon Frankau
//

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, trace};

use crate::bridge::Bridge;
use crate::deduce::deduce;
use crate::grid::{Grid, Status};

////////////////////////////////////////////////////////////////////////
// Backtracking search
//
// Everything happens on a single Grid that's mutated in place. Each
// level of the search keeps a log of the bridges it placed, and takes
// exactly those out again before reporting failure, so a failed call
// always hands the grid back as it found it.
//

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SearchResult {
    Solved,
    Unsolvable,
    // The cancel flag was raised. The grid is rolled back as for
    // Unsolvable.
    Cancelled,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    pub nodes: usize,
    pub guesses: usize,
    pub deduced: usize,
    pub max_depth: usize,
}

#[derive(Debug, Default)]
pub struct Solver {
    cancel: Option<Arc<AtomicBool>>,
    stats: Stats,
}

impl Solver {
    pub fn new() -> Solver {
        Solver::default()
    }

    // The flag is checked before every guess. Once set, the search
    // unwinds, undoing its work on the way out.
    pub fn with_cancel(flag: Arc<AtomicBool>) -> Solver {
        Solver {
            cancel: Some(flag),
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    // Stops at the first solution found, leaving it in the grid.
    pub fn search(&mut self, grid: &mut Grid) -> SearchResult {
        self.search_at(grid, 0)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn search_at(&mut self, grid: &mut Grid, depth: usize) -> SearchResult {
        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        match grid.status() {
            Status::Complete => return SearchResult::Solved,
            Status::Incorrect(why) => {
                trace!("Dead end at depth {}: {}", depth, why);
                return SearchResult::Unsolvable;
            }
            Status::Incomplete => (),
        }

        let deduced = deduce(grid);
        self.stats.deduced += deduced.len();

        match grid.status() {
            Status::Complete => return SearchResult::Solved,
            Status::Incorrect(why) => {
                debug!("Deductions at depth {} failed: {}", depth, why);
                undo(grid, &deduced);
                return SearchResult::Unsolvable;
            }
            Status::Incomplete => (),
        }

        for candidate in grid.valid_bridges() {
            if self.is_cancelled() {
                undo(grid, &deduced);
                return SearchResult::Cancelled;
            }

            trace!("Guessing {} at depth {}", candidate, depth);
            self.stats.guesses += 1;
            grid.add_bridge(candidate);
            match self.search_at(grid, depth + 1) {
                SearchResult::Solved => return SearchResult::Solved,
                SearchResult::Unsolvable => undo(grid, &[candidate]),
                SearchResult::Cancelled => {
                    undo(grid, &[candidate]);
                    undo(grid, &deduced);
                    return SearchResult::Cancelled;
                }
            }
        }

        debug!("Backtracking (depth={})", depth);
        undo(grid, &deduced);
        SearchResult::Unsolvable
    }
}

// Take bridges out, newest first.
fn undo(grid: &mut Grid, placed: &[Bridge]) {
    for bridge in placed.iter().rev() {
        let removed = grid.delete_bridge(bridge);
        debug_assert!(removed, "Undoing missing bridge {}", bridge);
    }
}

// A cancel flag that raises itself after the given time.
pub fn cancel_after(timeout: Duration) -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let timer = Arc::clone(&flag);
    thread::spawn(move || {
        thread::sleep(timeout);
        timer.store(true, Ordering::Relaxed);
    });
    flag
}

////////////////////////////////////////////////////////////////////////
// Tests
//
