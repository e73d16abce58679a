//
// Hashiwokakero solver
//
// Copyright 2021 Simon Frankau
//

use std::fmt;

////////////////////////////////////////////////////////////////////////
// Geometry primitives
//

// Islands are identified by their index in the grid's island list.
pub type IslandId = usize;

// A cell position. (0, 0) is the NW corner, x runs W-E and y N-S.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

// There are 4 directions from an island.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Direction {
    North = 0,
    South = 1,
    West = 2,
    East = 3,
}

pub const ALL_DIRS: &[Direction] = &[
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

// The (x, y) steps to move N S W E respectively.
const DIRECTION_STEPS: &[(isize, isize); 4] = &[(0, -1), (0, 1), (-1, 0), (1, 0)];

impl Direction {
    pub fn step(&self) -> (isize, isize) {
        DIRECTION_STEPS[*self as usize]
    }
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Pos {
        Pos { x, y }
    }

    // Move one cell in the given direction, or None if that would
    // leave a width x height grid.
    pub fn step(&self, dir: Direction, width: usize, height: usize) -> Option<Pos> {
        let (step_x, step_y) = dir.step();
        let x = self.x as isize + step_x;
        let y = self.y as isize + step_y;
        if x < 0 || x >= width as isize || y < 0 || y >= height as isize {
            return None;
        }
        Some(Pos::new(x as usize, y as usize))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

////////////////////////////////////////////////////////////////////////
// Bridges
//

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Endpoint {
    pub island: IslandId,
    pub pos: Pos,
}

// A single bridge. Doubles are represented as two equal Bridge values
// rather than a weight, which keeps add/delete trivially symmetric.
//
// The endpoints are stored in canonical order (north-most first for
// vertical bridges, west-most first for horizontal ones), so the
// derived equality and hashing don't depend on construction order.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Bridge {
    orientation: Orientation,
    start: Endpoint,
    end: Endpoint,
}

impl Bridge {
    // Build the bridge between two islands in the same row or column.
    pub fn between(a: Endpoint, b: Endpoint) -> Bridge {
        debug_assert!(a.pos != b.pos && (a.pos.x == b.pos.x || a.pos.y == b.pos.y));
        let orientation = if a.pos.x == b.pos.x {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        let a_first = match orientation {
            Orientation::Vertical => a.pos.y < b.pos.y,
            Orientation::Horizontal => a.pos.x < b.pos.x,
        };
        let (start, end) = if a_first { (a, b) } else { (b, a) };
        Bridge {
            orientation,
            start,
            end,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn start(&self) -> Endpoint {
        self.start
    }

    pub fn end(&self) -> Endpoint {
        self.end
    }

    // The island at the far end from the given one.
    pub fn other(&self, island: IslandId) -> IslandId {
        if self.start.island == island {
            self.end.island
        } else {
            self.start.island
        }
    }

    // The cells strictly between the two endpoints.
    pub fn span(&self) -> impl Iterator<Item = Pos> {
        let (start, end) = (self.start.pos, self.end.pos);
        let orientation = self.orientation;
        let range = match orientation {
            Orientation::Horizontal => start.x + 1..end.x,
            Orientation::Vertical => start.y + 1..end.y,
        };
        range.map(move |i| match orientation {
            Orientation::Horizontal => Pos::new(i, start.y),
            Orientation::Vertical => Pos::new(start.x, i),
        })
    }

    // Strict crossing test. Parallel bridges never cross (even if they
    // overlap), and touching at an end-point isn't crossing.
    pub fn intersects(&self, other: &Bridge) -> bool {
        let (h, v) = match (self.orientation, other.orientation) {
            (Orientation::Horizontal, Orientation::Vertical) => (self, other),
            (Orientation::Vertical, Orientation::Horizontal) => (other, self),
            _ => return false,
        };
        let (vx, hy) = (v.start.pos.x, h.start.pos.y);
        h.start.pos.x < vx && vx < h.end.pos.x && v.start.pos.y < hy && hy < v.end.pos.y
    }
}

impl fmt::Display for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.start.pos, self.end.pos)
    }
}

////////////////////////////////////////////////////////////////////////
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(island: IslandId, x: usize, y: usize) -> Endpoint {
        Endpoint {
            island,
            pos: Pos::new(x, y),
        }
    }

    #[test]
    fn test_canonical_order() {
        let h1 = Bridge::between(ep(0, 1, 2), ep(1, 5, 2));
        let h2 = Bridge::between(ep(1, 5, 2), ep(0, 1, 2));
        assert_eq!(h1, h2);
        assert_eq!(h1.orientation(), Orientation::Horizontal);
        assert_eq!(h1.start().pos, Pos::new(1, 2));

        let v1 = Bridge::between(ep(3, 4, 6), ep(2, 4, 0));
        let v2 = Bridge::between(ep(2, 4, 0), ep(3, 4, 6));
        assert_eq!(v1, v2);
        assert_eq!(v1.orientation(), Orientation::Vertical);
        assert_eq!(v1.start().island, 2);
        assert_eq!(v1.end().island, 3);
    }

    #[test]
    fn test_other_end() {
        let b = Bridge::between(ep(7, 0, 0), ep(3, 0, 4));
        assert_eq!(b.other(7), 3);
        assert_eq!(b.other(3), 7);
    }

    #[test]
    fn test_span() {
        let h = Bridge::between(ep(0, 4, 1), ep(1, 1, 1));
        assert_eq!(h.span().collect::<Vec<_>>(), vec![Pos::new(2, 1), Pos::new(3, 1)]);

        let adjacent = Bridge::between(ep(0, 0, 0), ep(1, 0, 1));
        assert_eq!(adjacent.span().count(), 0);
    }

    #[test]
    fn test_crossing() {
        //   .0.
        //   2.3
        //   .1.
        let v = Bridge::between(ep(0, 1, 0), ep(1, 1, 2));
        let h = Bridge::between(ep(2, 0, 1), ep(3, 2, 1));
        assert!(v.intersects(&h));
        assert!(h.intersects(&v));
    }

    #[test]
    fn test_touching_is_not_crossing() {
        // Both bridges end at the island at (2, 2).
        let h = Bridge::between(ep(0, 0, 2), ep(1, 2, 2));
        let v = Bridge::between(ep(1, 2, 2), ep(2, 2, 5));
        assert!(!h.intersects(&v));
        assert!(!v.intersects(&h));

        // A vertical bridge ending on the horizontal bridge's row.
        let v2 = Bridge::between(ep(3, 1, 0), ep(4, 1, 2));
        assert!(!h.intersects(&v2));
        assert!(!v2.intersects(&h));
    }

    #[test]
    fn test_parallel_never_crosses() {
        let a = Bridge::between(ep(0, 0, 0), ep(1, 4, 0));
        let b = Bridge::between(ep(2, 2, 0), ep(3, 6, 0));
        assert!(!a.intersects(&b));
        assert!(!a.intersects(&a));
    }

    #[test]
    fn test_intersects_symmetric() {
        let bridges = [
            Bridge::between(ep(0, 1, 0), ep(1, 1, 4)),
            Bridge::between(ep(2, 0, 2), ep(3, 3, 2)),
            Bridge::between(ep(4, 2, 1), ep(5, 2, 3)),
            Bridge::between(ep(6, 0, 3), ep(7, 4, 3)),
            Bridge::between(ep(8, 0, 0), ep(9, 4, 0)),
        ];
        for a in bridges.iter() {
            for b in bridges.iter() {
                assert_eq!(a.intersects(b), b.intersects(a), "{} vs {}", a, b);
            }
        }
    }
}
