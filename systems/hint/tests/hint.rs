use gem_cascade_core::{Grid, Hint, Position, RandomKinds, Token, TokenKind};
use gem_cascade_system_generation::generate;
use gem_cascade_system_hint::{find_hint, legal_moves};
use gem_cascade_system_swap::try_swap;
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

fn dead_board() -> Grid {
    grid_from(&[
        "ABABABAB", "CDCDCDCD", "ABABABAB", "CDCDCDCD", "ABABABAB", "CDCDCDCD", "ABABABAB",
        "CDCDCDCD",
    ])
}

#[test]
fn dead_board_has_no_hint() {
    let grid = dead_board();
    assert_eq!(find_hint(&grid), None);
    assert!(legal_moves(&grid).is_empty());
}

#[test]
fn right_neighbour_is_tried_before_the_cell_below() {
    let grid = grid_from(&["BAA", "ACD", "ADC"]);
    let right = Hint::new(Position::new(0, 0), Position::new(0, 1));
    let below = Hint::new(Position::new(0, 0), Position::new(1, 0));

    assert_eq!(find_hint(&grid), Some(right));
    let moves = legal_moves(&grid);
    assert_eq!(moves.first(), Some(&right));
    assert!(moves.contains(&below), "both swaps complete a run");
}

#[test]
fn hint_is_stable_for_the_same_grid() {
    let grid = grid_from(&["BAA", "ACD", "ADC"]);
    assert_eq!(find_hint(&grid), find_hint(&grid.clone()));
}

#[test]
fn every_legal_move_is_accepted_by_the_swap_validator() {
    for seed in 0..16 {
        let mut source = RandomKinds::new(ChaCha8Rng::seed_from_u64(seed));
        let grid = generate(8, 8, 5, &mut source).expect("valid configuration");
        let moves = legal_moves(&grid);
        assert_eq!(find_hint(&grid), moves.first().copied(), "seed {seed}");
        for hint in moves {
            let outcome = try_swap(&grid, hint.first(), hint.second()).expect("adjacent swap");
            assert!(outcome.accepted(), "seed {seed}: {hint:?} should form a run");
        }
    }
}

#[test]
fn single_row_grid_without_moves() {
    let grid = grid_from(&["ABAB"]);
    assert_eq!(find_hint(&grid), None);
}
