//
// Hashiwokakero solver
//
// Copyright 2021 Simon Frankau
//

use std::collections::HashSet;

use anyhow::{bail, ensure, Context, Result};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////
// Puzzle specification
//

// 4 directions, at most 2 bridges each.
pub const MAX_CAPACITY: usize = 8;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IslandSpec {
    pub x: usize,
    pub y: usize,
    pub capacity: usize,
}

// A validated puzzle: every island is inside the grid, has a capacity
// in 1..=8 and its own cell. The solver relies on all of this, so it
// only accepts puzzles built through Puzzle::new.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Puzzle {
    width: usize,
    height: usize,
    islands: Vec<IslandSpec>,
}

#[derive(Debug, Eq, Error, PartialEq)]
pub enum PuzzleError {
    #[error("Grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("Island at ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("Island at ({x}, {y}) has capacity {capacity}, expected 1 to 8")]
    BadCapacity { x: usize, y: usize, capacity: usize },
    #[error("More than one island at ({x}, {y})")]
    Duplicate { x: usize, y: usize },
}

impl IslandSpec {
    pub fn new(x: usize, y: usize, capacity: usize) -> IslandSpec {
        IslandSpec { x, y, capacity }
    }
}

impl Puzzle {
    pub fn new(
        width: usize,
        height: usize,
        islands: Vec<IslandSpec>,
    ) -> Result<Puzzle, PuzzleError> {
        if width == 0 || height == 0 {
            return Err(PuzzleError::EmptyGrid { width, height });
        }
        let mut seen = HashSet::new();
        for isle in islands.iter() {
            let IslandSpec { x, y, capacity } = *isle;
            if x >= width || y >= height {
                return Err(PuzzleError::OutOfBounds {
                    x,
                    y,
                    width,
                    height,
                });
            }
            if capacity == 0 || capacity > MAX_CAPACITY {
                return Err(PuzzleError::BadCapacity { x, y, capacity });
            }
            if !seen.insert((x, y)) {
                return Err(PuzzleError::Duplicate { x, y });
            }
        }
        Ok(Puzzle {
            width,
            height,
            islands,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn islands(&self) -> &[IslandSpec] {
        &self.islands
    }
}

////////////////////////////////////////////////////////////////////////
// Grid-text parser
//
// One character per cell: '.' is water, '1'-'8' an island. '#'
// starts a comment, and blank lines are ignored.
//

pub fn read_map<'a, Iter: std::iter::Iterator<Item = &'a str>>(lines: Iter) -> Result<Puzzle> {
    let map_lines = lines
        // Trim comments and whitespace
        .map(|s| s.find('#').map_or(s, |idx| &s[..idx]).trim())
        // Filter empty lines
        .filter(|s| !s.is_empty())
        // Convert a single line
        .map(|s| {
            s.chars()
                .map(cell_from_char)
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    ensure!(!map_lines.is_empty(), "Non-empty input line expected");
    let width = map_lines[0].len();
    ensure!(
        map_lines.iter().all(|row| row.len() == width),
        "Not all input lines were of the same length. Rectangular input expected."
    );

    let islands = map_lines
        .iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|capacity| IslandSpec::new(x, y, capacity)))
        })
        .collect::<Vec<_>>();

    Ok(Puzzle::new(width, map_lines.len(), islands)?)
}

fn cell_from_char(c: char) -> Result<Option<usize>> {
    match c {
        '.' => Ok(None),
        '1'..='8' => Ok(Some(c as usize - '0' as usize)),
        _ => bail!("Unexpected character in input: '{}'", c),
    }
}

////////////////////////////////////////////////////////////////////////
// Batch parser
//
// One puzzle per line: "<width> | <height> | [(x, y, capacity), ...]".
//

pub fn parse_batch_line(line: &str) -> Result<Puzzle> {
    let fields = line.splitn(3, '|').map(str::trim).collect::<Vec<_>>();
    ensure!(
        fields.len() == 3,
        "Expected '<width> | <height> | [islands]', got '{}'",
        line.trim()
    );
    let width = parse_number(fields[0]).context("Bad width")?;
    let height = parse_number(fields[1]).context("Bad height")?;
    let islands = parse_island_list(fields[2])?;
    Ok(Puzzle::new(width, height, islands)?)
}

// Parse every puzzle in a batch file, skipping blank and '#' lines.
// Errors carry the 1-based line number.
pub fn read_batch<'a, Iter: std::iter::Iterator<Item = &'a str>>(
    lines: Iter,
) -> Result<Vec<Puzzle>> {
    lines
        .enumerate()
        .filter(|(_, s)| {
            let s = s.trim();
            !s.is_empty() && !s.starts_with('#')
        })
        .map(|(idx, s)| parse_batch_line(s).with_context(|| format!("Line {}", idx + 1)))
        .collect()
}

fn parse_number(s: &str) -> Result<usize> {
    s.parse::<usize>()
        .with_context(|| format!("Expected a number, got '{}'", s))
}

fn parse_island_list(s: &str) -> Result<Vec<IslandSpec>> {
    let body = match s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(body) => body,
        None => bail!("Island list must be enclosed in '[' and ']'"),
    };

    let mut islands = Vec::new();
    // Every tuple ends with ')'. What's left between them is the
    // separating comma.
    let mut chunks = body.split(')').collect::<Vec<_>>();
    let tail = chunks.pop().unwrap_or("");
    ensure!(
        tail.trim().is_empty(),
        "Unexpected text after last island: '{}'",
        tail.trim()
    );
    for (idx, chunk) in chunks.iter().enumerate() {
        let mut chunk = chunk.trim();
        if idx > 0 {
            chunk = match chunk.strip_prefix(',') {
                Some(rest) => rest.trim_start(),
                None => bail!("Expected ',' between islands"),
            };
        }
        let tuple = match chunk.strip_prefix('(') {
            Some(tuple) => tuple,
            None => bail!("Expected '(' to start an island, got '{}'", chunk),
        };
        let values = tuple
            .split(',')
            .map(|v| parse_number(v.trim()))
            .collect::<Result<Vec<_>>>()?;
        ensure!(
            values.len() == 3,
            "Island '({})' should be (x, y, capacity)",
            tuple
        );
        islands.push(IslandSpec::new(values[0], values[1], values[2]));
    }
    Ok(islands)
}

////////////////////////////////////////////////////////////////////////
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completely_empty_fails() {
        let input: &[&str] = &[];
        assert!(read_map(input.iter().cloned()).is_err());
    }

    #[test]
    fn test_only_commments_fails() {
        let input: &[&str] = &["  # Test", "# Also test", "    ", ""];
        assert!(read_map(input.iter().cloned()).is_err());
    }

    #[test]
    fn test_unequal_lines_fails() {
        let input: &[&str] = &[".", ".."];
        assert!(read_map(input.iter().cloned()).is_err());
    }

    #[test]
    fn test_unexpected_chars_fails() {
        for row in [".9.", ".0.", "-", "x"].iter() {
            let input: &[&str] = &[row];
            let err = read_map(input.iter().cloned()).unwrap_err();
            assert!(err.to_string().contains("Unexpected character"));
        }
    }

    #[test]
    fn test_small_parse() {
        let input = "..3\n#TEST\n1.8\n";
        let puzzle = read_map(input.lines()).unwrap();
        assert_eq!(puzzle.width(), 3);
        assert_eq!(puzzle.height(), 2);
        assert_eq!(
            puzzle.islands(),
            &[
                IslandSpec::new(2, 0, 3),
                IslandSpec::new(0, 1, 1),
                IslandSpec::new(2, 1, 8),
            ]
        );
    }

    #[test]
    fn test_puzzle_validation() {
        assert_eq!(
            Puzzle::new(0, 3, vec![]),
            Err(PuzzleError::EmptyGrid {
                width: 0,
                height: 3
            })
        );
        assert_eq!(
            Puzzle::new(2, 2, vec![IslandSpec::new(2, 0, 1)]),
            Err(PuzzleError::OutOfBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            })
        );
        assert_eq!(
            Puzzle::new(2, 2, vec![IslandSpec::new(0, 0, 9)]),
            Err(PuzzleError::BadCapacity {
                x: 0,
                y: 0,
                capacity: 9
            })
        );
        assert_eq!(
            Puzzle::new(2, 2, vec![IslandSpec::new(0, 0, 0)]),
            Err(PuzzleError::BadCapacity {
                x: 0,
                y: 0,
                capacity: 0
            })
        );
        assert_eq!(
            Puzzle::new(
                2,
                2,
                vec![IslandSpec::new(1, 1, 1), IslandSpec::new(1, 1, 2)]
            ),
            Err(PuzzleError::Duplicate { x: 1, y: 1 })
        );
    }

    #[test]
    fn test_batch_line() {
        let puzzle = parse_batch_line("3 | 2 | [(0, 0, 1), (2, 0, 2), (2, 1, 1)]").unwrap();
        assert_eq!(puzzle.width(), 3);
        assert_eq!(puzzle.height(), 2);
        assert_eq!(
            puzzle.islands(),
            &[
                IslandSpec::new(0, 0, 1),
                IslandSpec::new(2, 0, 2),
                IslandSpec::new(2, 1, 1),
            ]
        );
    }

    #[test]
    fn test_batch_line_tight_spacing() {
        let puzzle = parse_batch_line("2|1|[(0,0,1),(1,0,1)]").unwrap();
        assert_eq!(puzzle.islands().len(), 2);

        let empty = parse_batch_line("4 | 4 | []").unwrap();
        assert!(empty.islands().is_empty());
    }

    #[test]
    fn test_batch_line_errors() {
        for line in [
            "3 | 2",
            "x | 2 | []",
            "3 | 2 | (0, 0, 1)",
            "3 | 2 | [(0, 0)]",
            "3 | 2 | [(0, 0, 1) (1, 0, 1)]",
            "3 | 2 | [(0, 0, 1), junk]",
            "3 | 2 | [(5, 0, 1)]",
        ]
        .iter()
        {
            assert!(parse_batch_line(line).is_err(), "{}", line);
        }
    }

    #[test]
    fn test_read_batch_reports_line() {
        let input = "# header\n2 | 1 | [(0, 0, 1), (1, 0, 1)]\n\n2 | 1 | [(0, 0, 1), (1, 0, 9)]\n";
        let err = read_batch(input.lines()).unwrap_err();
        assert!(format!("{:#}", err).contains("Line 4"));

        let ok = read_batch(input.lines().take(3)).unwrap();
        assert_eq!(ok.len(), 1);
    }
}
