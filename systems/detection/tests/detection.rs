use gem_cascade_core::{Grid, Position, RunSet, SpecialKind, Token, TokenKind};
use gem_cascade_system_detection::{connected_groups, find_matches, has_match};

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

fn set_of(positions: &[(u32, u32)]) -> RunSet {
    positions
        .iter()
        .map(|&(row, column)| Position::new(row, column))
        .collect()
}

#[test]
fn detects_horizontal_triple() {
    let grid = grid_from(&["AAAB", "BCDC", "CDBD"]);
    assert_eq!(find_matches(&grid), set_of(&[(0, 0), (0, 1), (0, 2)]));
    assert!(has_match(&grid));
}

#[test]
fn detects_vertical_triple() {
    let grid = grid_from(&["ABC", "ACB", "ADC"]);
    assert_eq!(find_matches(&grid), set_of(&[(0, 0), (1, 0), (2, 0)]));
}

#[test]
fn four_run_is_union_of_overlapping_triples() {
    let grid = grid_from(&["BBBBA", "ACDAC", "CDACD"]);
    let matches = find_matches(&grid);
    assert_eq!(matches.len(), 4, "four-run should contribute four cells");
    assert!(!matches.contains(Position::new(0, 4)));
}

#[test]
fn crossing_runs_merge_into_one_set() {
    let grid = grid_from(&["CACD", "AAAB", "DADC"]);
    let matches = find_matches(&grid);
    assert_eq!(
        matches,
        set_of(&[(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)]),
        "T-shaped runs should share their intersection"
    );
}

#[test]
fn stable_grid_has_no_matches() {
    let grid = grid_from(&["ABAB", "BABA", "ABAB"]);
    assert!(find_matches(&grid).is_empty());
    assert!(!has_match(&grid));
}

#[test]
fn special_tags_do_not_affect_matching() {
    let grid = grid_from(&["AAAB", "BCDC"]);
    let grid = grid
        .with_token(
            Position::new(0, 1),
            Token::special(TokenKind::Puppy, SpecialKind::BlockBomb),
        )
        .expect("inside grid");
    assert_eq!(find_matches(&grid).len(), 3);
}

#[test]
fn narrow_grids_are_scanned_without_overflow() {
    let grid = grid_from(&["A", "A"]);
    assert!(find_matches(&grid).is_empty());
    let grid = grid_from(&["AA"]);
    assert!(!has_match(&grid));
}

#[test]
fn connected_groups_split_disjoint_runs() {
    let grid = grid_from(&["AAAB", "BCDC", "DDDC"]);
    let matches = find_matches(&grid);
    let groups = connected_groups(&grid, &matches);
    assert_eq!(
        groups,
        vec![
            set_of(&[(0, 0), (0, 1), (0, 2)]),
            set_of(&[(2, 0), (2, 1), (2, 2)]),
        ]
    );
}

#[test]
fn connected_groups_keep_different_kinds_apart() {
    let grid = grid_from(&["AAAC", "BBBC", "DADC"]);
    let matches = find_matches(&grid);
    let groups = connected_groups(&grid, &matches);
    assert_eq!(groups.len(), 3, "touching runs of different kinds stay separate");
    assert!(groups.iter().all(|group| group.len() == 3));
}
