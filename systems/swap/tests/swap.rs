use gem_cascade_core::{EngineError, Grid, Position, RandomKinds, Token, TokenKind};
use gem_cascade_system_generation::generate;
use gem_cascade_system_swap::{trial_swap, try_swap};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn grid_from(rows: &[&str]) -> Grid {
    let rows = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|glyph| {
                    let index = glyph as usize - 'A' as usize;
                    Token::plain(TokenKind::from_index(index).expect("glyph within catalog"))
                })
                .collect()
        })
        .collect();
    Grid::from_rows(rows).expect("rectangular grid")
}

#[test]
fn swap_forming_a_run_is_accepted() {
    let grid = grid_from(&["AABC", "BCAD", "CDBC"]);
    let outcome = try_swap(&grid, Position::new(0, 2), Position::new(1, 2)).expect("legal swap");
    assert!(outcome.accepted());
    assert_eq!(outcome.matches().len(), 3);
    assert_eq!(
        outcome.grid().get(Position::new(0, 2)).map(|token| token.kind()),
        Some(TokenKind::Puppy)
    );
}

#[test]
fn swap_without_a_run_leaves_grid_untouched() {
    let grid = grid_from(&["ABAB", "BABA", "ABAB"]);
    let outcome = try_swap(&grid, Position::new(0, 0), Position::new(0, 1)).expect("legal swap");
    assert!(!outcome.accepted());
    assert!(outcome.matches().is_empty());
    assert_eq!(outcome.grid(), &grid, "rejected swap must not mutate the grid");
}

#[test]
fn diagonal_swap_is_invalid() {
    let grid = grid_from(&["ABAB", "BABA", "ABAB"]);
    let first = Position::new(0, 0);
    let second = Position::new(1, 1);
    assert_eq!(
        try_swap(&grid, first, second),
        Err(EngineError::InvalidSwap { first, second })
    );
}

#[test]
fn swapping_a_cell_with_itself_is_invalid() {
    let grid = grid_from(&["AB", "BA"]);
    let cell = Position::new(1, 1);
    assert!(matches!(
        trial_swap(&grid, cell, cell),
        Err(EngineError::InvalidSwap { .. })
    ));
}

#[test]
fn bounds_are_checked_before_adjacency() {
    let grid = grid_from(&["AB", "BA"]);
    let outside = Position::new(5, 5);
    assert_eq!(
        try_swap(&grid, Position::new(0, 0), outside),
        Err(EngineError::OutOfBounds {
            position: outside,
            rows: 2,
            columns: 2,
        })
    );
}

#[test]
fn rejected_swaps_on_generated_grids_are_reversible() {
    for seed in 0..16 {
        let mut source = RandomKinds::new(ChaCha8Rng::seed_from_u64(seed));
        let grid = generate(6, 7, 5, &mut source).expect("valid configuration");
        let mut rejected = 0;

        for first in grid.positions() {
            let neighbours = [first.right(grid.columns()), first.below(grid.rows())];
            for second in neighbours.into_iter().flatten() {
                let outcome = try_swap(&grid, first, second).expect("adjacent swap");
                if outcome.accepted() {
                    continue;
                }
                assert_eq!(outcome.grid(), &grid, "seed {seed}: {first} <-> {second}");

                let swapped = trial_swap(&grid, first, second).expect("adjacent");
                let restored = trial_swap(&swapped, first, second).expect("adjacent");
                assert_eq!(restored, grid, "seed {seed}: {first} <-> {second}");
                rejected += 1;
            }
        }
        assert!(rejected > 0, "seed {seed}: every swap formed a run");
    }
}

#[test]
fn distant_swap_on_full_board_is_invalid() {
    let grid = grid_from(&[
        "ABCDEFAB", "BCDEFABC", "CDEFABCD", "DEFABCDE", "EFABCDEF", "FABCDEFA", "ABCDEFAB",
        "BCDEFABC",
    ]);
    let first = Position::new(0, 0);
    let second = Position::new(5, 5);
    assert_eq!(
        try_swap(&grid, first, second),
        Err(EngineError::InvalidSwap { first, second })
    );
    assert_eq!(grid.get(first), Some(Token::plain(TokenKind::Puppy)));
}
