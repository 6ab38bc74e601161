#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hint finder that searches for swaps producing a run.
//!
//! Candidates are visited row-major; for each cell the swap with its right
//! neighbour is tried before the swap with the cell below. The first swap
//! that produces a run is the hint, which keeps results stable for a given
//! grid.

use gem_cascade_core::{Grid, Hint, Position};
use gem_cascade_system_detection::has_match;
use gem_cascade_system_swap::trial_swap;

/// Returns the first swap in scan order that produces a run, or `None`
/// when the grid is dead.
#[must_use]
pub fn find_hint(grid: &Grid) -> Option<Hint> {
    candidates(grid).find(|hint| produces_match(grid, *hint))
}

/// Every swap that produces a run, in scan order.
#[must_use]
pub fn legal_moves(grid: &Grid) -> Vec<Hint> {
    candidates(grid)
        .filter(|hint| produces_match(grid, *hint))
        .collect()
}

fn candidates(grid: &Grid) -> impl Iterator<Item = Hint> + '_ {
    grid.positions().flat_map(move |cell| {
        let right = cell.right(grid.columns());
        let below = cell.below(grid.rows());
        [right, below]
            .into_iter()
            .flatten()
            .map(move |neighbor: Position| Hint::new(cell, neighbor))
    })
}

fn produces_match(grid: &Grid, hint: Hint) -> bool {
    trial_swap(grid, hint.first(), hint.second())
        .map(|swapped| has_match(&swapped))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_cascade_core::{Token, TokenKind};

    #[test]
    fn candidates_cover_every_edge_once() {
        let grid = Grid::from_cells(2, 3, vec![Token::plain(TokenKind::Fox); 6]).expect("grid");
        // 2 rows of 2 horizontal edges plus 3 vertical edges.
        assert_eq!(candidates(&grid).count(), 7);
    }
}
