//
// Hashiwokakero solver
//
// Copyright 2021 Simon Frankau
//

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::bridge::{Bridge, Direction, Endpoint, IslandId, Orientation, Pos, ALL_DIRS};
use crate::puzzle::Puzzle;

////////////////////////////////////////////////////////////////////////
// Data structures / problem representation
//

// An island knows its clue, how many more bridges it needs, its
// nearest neighbour in each direction (N S W E, indexed by
// Direction), and the bridges currently attached to it.
//
// Invariant: remaining == capacity - bridges.len().
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Island {
    pos: Pos,
    capacity: usize,
    remaining: i32,
    neighbours: [Option<IslandId>; 4],
    bridges: Vec<Bridge>,
}

// The whole puzzle state. Islands are addressed by index, and 'cells'
// maps each grid position to the island there, if any (outer index
// is N-S, inner W-E, like the input).
//
// The search mutates this in place with add_bridge/delete_bridge,
// which are exact inverses of each other.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    islands: Vec<Island>,
    cells: Vec<Vec<Option<IslandId>>>,
    bridges: Vec<Bridge>,
}

// Why a state can't be extended to a solution.
#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub enum Violation {
    #[error("More than two bridges between {0}")]
    OverfullPair(Bridge),
    #[error("Island at {0} can no longer reach its count")]
    Unsatisfiable(Pos),
    #[error("All counts met, but the islands aren't connected")]
    Disconnected,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    Incorrect(Violation),
    Incomplete,
    Complete,
}

// Which number to print on islands when rendering.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Label {
    Capacity,
    Remaining,
}

impl Island {
    fn new(pos: Pos, capacity: usize) -> Island {
        Island {
            pos,
            capacity,
            remaining: capacity as i32,
            neighbours: [None; 4],
            bridges: Vec::new(),
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn neighbours(&self) -> impl Iterator<Item = IslandId> + '_ {
        self.neighbours.iter().filter_map(|n| *n)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

////////////////////////////////////////////////////////////////////////
// Construction and neighbour resolution
//

impl Grid {
    pub fn new(puzzle: &Puzzle) -> Grid {
        let (width, height) = (puzzle.width(), puzzle.height());
        let mut cells = vec![vec![None; width]; height];
        let islands: Vec<Island> = puzzle
            .islands()
            .iter()
            .enumerate()
            .map(|(id, spec)| {
                cells[spec.y][spec.x] = Some(id);
                Island::new(Pos::new(spec.x, spec.y), spec.capacity)
            })
            .collect();

        let mut grid = Grid {
            width,
            height,
            islands,
            cells,
            bridges: Vec::new(),
        };
        grid.resolve_neighbours();
        grid
    }

    // Find the nearest island in each direction from every island.
    // Bridges don't block the scan - this is the static adjacency,
    // computed before any bridge is placed. Every direction has its own
    // slot, so running this again changes nothing.
    pub fn resolve_neighbours(&mut self) {
        for id in 0..self.islands.len() {
            let pos = self.islands[id].pos;
            for dir in ALL_DIRS.iter() {
                self.islands[id].neighbours[*dir as usize] = self.find_neighbour(pos, *dir);
            }
        }
    }

    fn find_neighbour(&self, pos: Pos, dir: Direction) -> Option<IslandId> {
        let mut curr = pos;
        loop {
            curr = curr.step(dir, self.width, self.height)?;
            if let Some(id) = self.cells[curr.y][curr.x] {
                return Some(id);
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    pub fn island(&self, id: IslandId) -> &Island {
        &self.islands[id]
    }

    pub fn bridges(&self) -> &[Bridge] {
        &self.bridges
    }

    fn endpoint(&self, id: IslandId) -> Endpoint {
        Endpoint {
            island: id,
            pos: self.islands[id].pos,
        }
    }

    // The canonical bridge between two islands in the same row/column.
    pub fn bridge(&self, a: IslandId, b: IslandId) -> Bridge {
        Bridge::between(self.endpoint(a), self.endpoint(b))
    }
}

////////////////////////////////////////////////////////////////////////
// Mutation and queries
//

impl Grid {
    pub fn add_bridge(&mut self, bridge: Bridge) {
        self.bridges.push(bridge);
        for id in [bridge.start().island, bridge.end().island].iter() {
            let isle = &mut self.islands[*id];
            isle.bridges.push(bridge);
            isle.remaining -= 1;
        }
    }

    // Remove one copy of the bridge (the most recent, so add/delete
    // pairs unwind like a stack). Returns false, changing nothing, if
    // the bridge isn't there.
    pub fn delete_bridge(&mut self, bridge: &Bridge) -> bool {
        let idx = match self.bridges.iter().rposition(|b| b == bridge) {
            Some(idx) => idx,
            None => return false,
        };
        self.bridges.remove(idx);
        for id in [bridge.start().island, bridge.end().island].iter() {
            let isle = &mut self.islands[*id];
            if let Some(idx) = isle.bridges.iter().rposition(|b| b == bridge) {
                isle.bridges.remove(idx);
            }
            isle.remaining += 1;
        }
        true
    }

    // Number of bridges currently joining a and b.
    pub fn bridges_between(&self, a: IslandId, b: IslandId) -> usize {
        self.islands[a]
            .bridges
            .iter()
            .filter(|bridge| bridge.other(a) == b)
            .count()
    }

    // True iff the candidate would cross an existing bridge.
    pub fn conflict(&self, candidate: &Bridge) -> bool {
        self.bridges.iter().any(|b| b.intersects(candidate))
    }

    // The bridges that could be added from one island: both ends still
    // need bridges, the pair isn't doubled yet, and nothing is in the
    // way.
    pub fn valid_links(&self, id: IslandId) -> Vec<Bridge> {
        let isle = &self.islands[id];
        if isle.is_complete() {
            return Vec::new();
        }
        isle.neighbours()
            .filter(|n| !self.islands[*n].is_complete() && self.bridges_between(id, *n) < 2)
            .map(|n| self.bridge(id, n))
            .filter(|candidate| !self.conflict(candidate))
            .collect()
    }

    // All bridges that could be added next, each pair at most once.
    // Candidates may cross each other; they're only checked against
    // bridges already placed.
    pub fn valid_bridges(&self) -> Vec<Bridge> {
        let mut result: Vec<Bridge> = Vec::new();
        for id in 0..self.islands.len() {
            for candidate in self.valid_links(id) {
                if !result.contains(&candidate) {
                    result.push(candidate);
                }
            }
        }
        result
    }
}

////////////////////////////////////////////////////////////////////////
// Status evaluation
//

impl Grid {
    pub fn status(&self) -> Status {
        // Cheapest checks first: multiplicity, then per-island counts.
        let mut pair_counts: HashMap<&Bridge, usize> = HashMap::new();
        for bridge in self.bridges.iter() {
            let count = pair_counts.entry(bridge).or_insert(0);
            *count += 1;
            if *count > 2 {
                return Status::Incorrect(Violation::OverfullPair(*bridge));
            }
        }

        let mut incomplete = false;
        for (id, isle) in self.islands.iter().enumerate() {
            if isle.remaining < 0 || self.reachable(id) < isle.remaining {
                return Status::Incorrect(Violation::Unsatisfiable(isle.pos));
            }
            incomplete |= isle.remaining != 0;
        }
        if incomplete {
            return Status::Incomplete;
        }

        // Every count is met, so it's down to connectivity.
        if self.is_connected() {
            Status::Complete
        } else {
            Status::Incorrect(Violation::Disconnected)
        }
    }

    // Upper bound on how many more bridges an island could get: the
    // remaining capacity of every neighbour it can still see.
    fn reachable(&self, id: IslandId) -> i32 {
        self.islands[id]
            .neighbours()
            .filter(|n| !self.conflict(&self.bridge(id, *n)))
            .map(|n| self.islands[n].remaining)
            .sum()
    }

    // Depth-first walk along bridges from the first island. An empty
    // grid counts as connected.
    pub fn is_connected(&self) -> bool {
        if self.islands.is_empty() {
            return true;
        }
        let mut visited = vec![false; self.islands.len()];
        let mut stack = vec![0];
        visited[0] = true;
        while let Some(id) = stack.pop() {
            for bridge in self.islands[id].bridges.iter() {
                let next = bridge.other(id);
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        visited.iter().all(|v| *v)
    }
}

////////////////////////////////////////////////////////////////////////
// Printer
//

impl Grid {
    // Text dump, one line per row. Islands show a digit, single bridges
    // '-' or '|', doubles '#'. 'X' marks bridges drawn over each other
    // or a pair with too many bridges, neither of which the solver
    // should ever produce.
    pub fn render(&self, label: Label) -> String {
        let mut rows = vec![vec![' '; self.width]; self.height];

        for isle in self.islands.iter() {
            let n = match label {
                Label::Capacity => isle.capacity() as i64,
                Label::Remaining => isle.remaining as i64,
            };
            rows[isle.pos.y][isle.pos.x] = if (0..=9).contains(&n) {
                std::char::from_digit(n as u32, 10).unwrap_or('?')
            } else {
                '?'
            };
        }

        let mut counts: BTreeMap<&Bridge, usize> = BTreeMap::new();
        for bridge in self.bridges.iter() {
            *counts.entry(bridge).or_insert(0) += 1;
        }
        for (bridge, count) in counts {
            let brush = match (bridge.orientation(), count) {
                (Orientation::Horizontal, 1) => '-',
                (Orientation::Vertical, 1) => '|',
                (_, 2) => '#',
                _ => 'X',
            };
            for pos in bridge.span() {
                let cell = &mut rows[pos.y][pos.x];
                *cell = if *cell == ' ' { brush } else { 'X' };
            }
        }

        rows.iter()
            .map(|row| row.iter().collect::<String>() + "\n")
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////
// Tests
//
