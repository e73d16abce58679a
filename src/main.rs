//
// Hashiwokakero solver
//
// Copyright 2021 Simon Frankau
//

use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, Read, Write};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};

use crate::grid::{Grid, Label};
use crate::puzzle::{read_batch, read_map, Puzzle};
use crate::search::{cancel_after, SearchResult, Solver};

mod bridge;
mod deduce;
mod grid;
mod puzzle;
mod search;

////////////////////////////////////////////////////////////////////////
// Main entry point
//

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// A single puzzle drawn as a grid of '.' and digits.
    Grid,
    /// One "<width> | <height> | [(x, y, capacity), ...]" puzzle per line.
    Batch,
}

#[derive(Parser)]
#[clap(version = "0.1", author = "Simon Frankau <sgf@arbitrary.name>")]
#[clap(about = "Hashiwokakero (Bridges) puzzle solver, by deduction and backtracking")]
struct Opts {
    /// Input file. Uses stdin if none specified.
    #[clap(long)]
    input_file: Option<String>,
    /// Output file. Uses stdout if none specified.
    #[clap(long)]
    output_file: Option<String>,
    /// Input format.
    #[clap(long, value_enum, default_value = "grid")]
    format: Format,
    /// Give up on a puzzle after this many seconds.
    #[clap(long)]
    timeout: Option<u64>,
}

fn read_input(opts: &Opts) -> Result<Vec<String>> {
    let file: Box<dyn Read> = match &opts.input_file {
        Some(name) => Box::new(File::open(name)?),
        None => Box::new(stdin()),
    };

    Ok(BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()?)
}

fn write_output(opts: &Opts, s: &str) -> Result<()> {
    let mut file: Box<dyn Write> = match &opts.output_file {
        Some(name) => Box::new(File::create(name)?),
        None => Box::new(stdout()),
    };

    Ok(file.write_all(s.as_bytes())?)
}

fn solve(opts: &Opts, puzzle: &Puzzle) -> (Grid, SearchResult) {
    let mut grid = Grid::new(puzzle);
    let mut solver = match opts.timeout {
        Some(secs) => Solver::with_cancel(cancel_after(Duration::from_secs(secs))),
        None => Solver::new(),
    };

    let result = solver.search(&mut grid);
    let stats = solver.stats();
    info!(
        "{}x{} puzzle, {} islands: {:?} after {} nodes, {} guesses, {} deduced bridges, max depth {}",
        grid.width(),
        grid.height(),
        grid.islands().len(),
        result,
        stats.nodes,
        stats.guesses,
        stats.deduced,
        stats.max_depth
    );
    debug!("Final grid:\n{}", grid.render(Label::Remaining));
    (grid, result)
}

// Solve one puzzle, printing the solution if there is one.
fn solve_single(opts: &Opts, puzzle: &Puzzle) -> Option<String> {
    let (grid, result) = solve(opts, puzzle);
    match result {
        SearchResult::Solved => Some(grid.render(Label::Capacity)),
        SearchResult::Unsolvable => {
            eprintln!("No solutions");
            None
        }
        SearchResult::Cancelled => {
            eprintln!("Timed out");
            None
        }
    }
}

// Solve every puzzle, printing each outcome and final grid, then the
// tally.
fn solve_batch(opts: &Opts, puzzles: &[Puzzle]) -> String {
    let mut output = String::new();
    let (mut succeeded, mut failed) = (0, 0);
    for puzzle in puzzles.iter() {
        let (grid, result) = solve(opts, puzzle);
        let verdict = match result {
            SearchResult::Solved => "SOLVED",
            SearchResult::Unsolvable => "FAILURE",
            SearchResult::Cancelled => "TIMEOUT",
        };
        if result == SearchResult::Solved {
            succeeded += 1;
        } else {
            failed += 1;
        }
        output.push_str(verdict);
        output.push('\n');
        output.push_str(&grid.render(Label::Capacity));
    }
    output.push_str(&format!("Succeeded: {} | Failed: {}\n", succeeded, failed));
    output
}

fn main() -> Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();

    let input = read_input(&opts)?;
    let lines = input.iter().map(String::as_str);

    let output = match opts.format {
        Format::Grid => solve_single(&opts, &read_map(lines)?),
        Format::Batch => Some(solve_batch(&opts, &read_batch(lines)?)),
    };

    if let Some(output_string) = output {
        write_output(&opts, &output_string)?;
    }

    Ok(())
}
