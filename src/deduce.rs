//
// Hashiwokakero solver
//
// Copyright 2021 Simon Frankau
//

use log::{debug, trace};

use crate::bridge::{Bridge, IslandId};
use crate::grid::Grid;

////////////////////////////////////////////////////////////////////////
// Forced moves
//
// Counting arguments that place bridges without guessing. For an
// island needing 'r' more bridges, look at its valid links: each can
// take at most 'room' more bridges, where room is capped both by the
// far island's remaining count and by the 2-bridge limit per pair.
//
//  1. If the rooms add up to exactly r, every link is filled.
//  2. If r > 2 * (links - 1), no link can be skipped, so each gets one.
//  3. As 2, but only counting the links with room for 2: the
//     single-room links contribute at most one each.
//

struct Link {
    bridge: Bridge,
    room: usize,
}

// Apply the rules over every island, repeatedly, until a pass places
// nothing. Returns every bridge placed, in order, so the caller can
// take them out again.
pub fn deduce(grid: &mut Grid) -> Vec<Bridge> {
    let mut placed = Vec::new();
    let mut passes = 0;
    loop {
        passes += 1;
        let before = placed.len();
        for id in 0..grid.islands().len() {
            deduce_island(grid, id, &mut placed);
        }
        debug!(
            "Deduction pass {} placed {} bridges",
            passes,
            placed.len() - before
        );
        if placed.len() == before {
            return placed;
        }
    }
}

fn links(grid: &Grid, id: IslandId) -> Vec<Link> {
    grid.valid_links(id)
        .into_iter()
        .map(|bridge| {
            let far = bridge.other(id);
            let far_remaining = grid.island(far).remaining().max(0) as usize;
            let unused = 2 - grid.bridges_between(id, far);
            Link {
                bridge,
                room: far_remaining.min(unused).min(2),
            }
        })
        .filter(|link| link.room > 0)
        .collect()
}

// Apply whichever rule fires first for one island. Bridges go into the
// grid straight away, so later islands in the same pass see them.
fn deduce_island(grid: &mut Grid, id: IslandId, placed: &mut Vec<Bridge>) {
    let remaining = grid.island(id).remaining();
    if remaining <= 0 {
        return;
    }
    let remaining = remaining as usize;

    let links = links(grid, id);
    let directions = links.len();
    let connections: usize = links.iter().map(|l| l.room).sum();
    let restricted = links.iter().filter(|l| l.room == 1).count();

    let to_place: Vec<Bridge> = if connections == remaining {
        trace!("Island at {}: all links saturated", grid.island(id).pos());
        links
            .iter()
            .flat_map(|l| std::iter::repeat(l.bridge).take(l.room))
            .collect()
    } else if remaining + 2 > 2 * directions {
        // r > 2 * (d - 1), kept in unsigned arithmetic.
        trace!("Island at {}: one bridge per link", grid.island(id).pos());
        links.iter().map(|l| l.bridge).collect()
    } else if remaining + 2 > 2 * directions - restricted {
        // r - s > 2 * (d - s - 1), rearranged the same way.
        trace!(
            "Island at {}: one bridge per unrestricted link",
            grid.island(id).pos()
        );
        links
            .iter()
            .filter(|l| l.room == 2)
            .map(|l| l.bridge)
            .collect()
    } else {
        return;
    };

    for bridge in to_place {
        grid.add_bridge(bridge);
        placed.push(bridge);
    }
}

////////////////////////////////////////////////////////////////////////
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Label, Status, Violation};
    use crate::puzzle::{read_map, IslandSpec, Puzzle};

    fn grid_from(input: &str) -> Grid {
        Grid::new(&read_map(input.lines()).unwrap())
    }

    #[test]
    fn test_collinear_chain() {
        let puzzle = Puzzle::new(
            3,
            1,
            vec![
                IslandSpec::new(0, 0, 1),
                IslandSpec::new(1, 0, 2),
                IslandSpec::new(2, 0, 1),
            ],
        )
        .unwrap();
        let mut grid = Grid::new(&puzzle);
        let placed = deduce(&mut grid);
        assert_eq!(placed.len(), 2);
        assert_eq!(grid.status(), Status::Complete);
    }

    #[test]
    fn test_saturation_doubles() {
        // The 4 has two links, each with room for 2.
        let mut grid = grid_from("2.4.2");
        deduce(&mut grid);
        assert_eq!(grid.status(), Status::Complete);
        assert_eq!(grid.render(Label::Capacity), "2#4#2\n");
    }

    #[test]
    fn test_one_per_link() {
        // The 3 has two links with room for 2, so each must get one.
        let mut grid = grid_from(
            "3.2
             ...
             2..",
        );
        let mut placed = Vec::new();
        deduce_island(&mut grid, 0, &mut placed);
        assert_eq!(placed, vec![grid.bridge(0, 2), grid.bridge(0, 1)]);
        assert_eq!(grid.island(0).remaining(), 1);
        assert_eq!(grid.bridges_between(0, 1), 1);
        assert_eq!(grid.bridges_between(0, 2), 1);
    }

    #[test]
    fn test_restricted_links() {
        // The 4 sees a 1 to the west, which takes at most one bridge,
        // so the south and east links need one each.
        let mut grid = grid_from(
            "1.4.2
             .....
             ..2..",
        );
        let mut placed = Vec::new();
        deduce_island(&mut grid, 1, &mut placed);
        assert_eq!(placed, vec![grid.bridge(1, 3), grid.bridge(1, 2)]);
        assert_eq!(grid.bridges_between(1, 0), 0);
        assert_eq!(grid.island(1).remaining(), 2);
    }

    #[test]
    fn test_never_overfills_a_pair() {
        // Seen from the 3, the 4 has room for two more, but the pair
        // already carries one bridge.
        let mut grid = grid_from("3.4");
        grid.add_bridge(grid.bridge(0, 1));
        deduce(&mut grid);
        assert_eq!(grid.bridges_between(0, 1), 2);
        assert_eq!(
            grid.status(),
            Status::Incorrect(Violation::Unsatisfiable(grid.island(1).pos()))
        );
    }

    #[test]
    fn test_complete_island_untouched() {
        let mut grid = grid_from("1.1");
        grid.add_bridge(grid.bridge(0, 1));
        let mut placed = Vec::new();
        deduce_island(&mut grid, 0, &mut placed);
        assert!(placed.is_empty());
    }

    #[test]
    fn test_no_progress() {
        // Square of 2s: every island has two links and two choices.
        let mut grid = grid_from(
            "2.2
             ...
             2.2",
        );
        assert!(deduce(&mut grid).is_empty());
        assert!(grid.bridges().is_empty());
    }
}
