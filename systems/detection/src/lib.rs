#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure match detector that reports every cell belonging to a run of three.

use std::{collections::VecDeque, ops::ControlFlow};

use gem_cascade_core::{Grid, Position, RunSet};

/// Collects every position that belongs to a horizontal or vertical run of
/// at least three tokens sharing a kind.
///
/// Runs longer than three fall out as the union of their overlapping
/// triples, so a four-run contributes four positions.
#[must_use]
pub fn find_matches(grid: &Grid) -> RunSet {
    let mut matches = RunSet::new();
    let _ = scan_triples(grid, |triple| {
        matches.extend(triple);
        ControlFlow::Continue(())
    });
    matches
}

/// Reports whether the grid contains at least one run, stopping at the first.
#[must_use]
pub fn has_match(grid: &Grid) -> bool {
    scan_triples(grid, |_| ControlFlow::Break(())).is_break()
}

/// Splits a match set into 4-connected groups of equal kind.
///
/// Groups are returned in row-major order of their first member and each
/// group iterates row-major. Positions outside the grid are ignored.
#[must_use]
pub fn connected_groups(grid: &Grid, matches: &RunSet) -> Vec<RunSet> {
    let mut claimed = RunSet::new();
    let mut groups = Vec::new();
    let mut frontier = VecDeque::new();

    for start in matches.iter() {
        if claimed.contains(start) {
            continue;
        }
        let Some(kind) = grid.get(start).map(|token| token.kind()) else {
            continue;
        };

        let mut group = RunSet::new();
        let _ = claimed.insert(start);
        frontier.push_back(start);

        while let Some(current) = frontier.pop_front() {
            let _ = group.insert(current);
            for neighbor in neighbors(current, grid.rows(), grid.columns()) {
                if !matches.contains(neighbor) || claimed.contains(neighbor) {
                    continue;
                }
                if grid.get(neighbor).map(|token| token.kind()) != Some(kind) {
                    continue;
                }
                let _ = claimed.insert(neighbor);
                frontier.push_back(neighbor);
            }
        }

        groups.push(group);
    }

    groups
}

fn scan_triples<F>(grid: &Grid, mut visit: F) -> ControlFlow<()>
where
    F: FnMut([Position; 3]) -> ControlFlow<()>,
{
    for row in 0..grid.rows() {
        for column in 0..grid.columns().saturating_sub(2) {
            let triple = [
                Position::new(row, column),
                Position::new(row, column + 1),
                Position::new(row, column + 2),
            ];
            if kinds_agree(grid, triple) {
                visit(triple)?;
            }
        }
    }

    for row in 0..grid.rows().saturating_sub(2) {
        for column in 0..grid.columns() {
            let triple = [
                Position::new(row, column),
                Position::new(row + 1, column),
                Position::new(row + 2, column),
            ];
            if kinds_agree(grid, triple) {
                visit(triple)?;
            }
        }
    }

    ControlFlow::Continue(())
}

fn kinds_agree(grid: &Grid, triple: [Position; 3]) -> bool {
    match (grid.get(triple[0]), grid.get(triple[1]), grid.get(triple[2])) {
        (Some(first), Some(second), Some(third)) => first.matches(&second) && second.matches(&third),
        _ => false,
    }
}

fn neighbors(cell: Position, rows: u32, columns: u32) -> impl Iterator<Item = Position> {
    let mut candidates = [None; 4];

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[0] = Some(Position::new(row, cell.column()));
    }
    candidates[1] = cell.right(columns);
    candidates[2] = cell.below(rows);
    if let Some(column) = cell.column().checked_sub(1) {
        candidates[3] = Some(Position::new(cell.row(), column));
    }

    candidates.into_iter().flatten()
}
