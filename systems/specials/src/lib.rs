#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Special-token classification and area-of-effect resolution.
//!
//! [`classify`] decides which special token, if any, a single swap's run set
//! earns. [`expand`] computes the cells a triggered special clears, and
//! [`detonate`] chains expansions until the removal set stops growing. A
//! special moved by the player's swap fires through an [`Activation`] even
//! when no run covers its cell.

use gem_cascade_core::{EngineError, Grid, Position, RunSet, SpecialKind, Token, TokenKind};

/// Special token earned by a qualifying run set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpecialSpawn {
    /// Variant of special token produced.
    pub special: SpecialKind,
    /// Cell that keeps its kind and gains the special tag.
    pub position: Position,
}

/// Special token that fired during a resolution round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TriggeredSpecial {
    /// Variant of special token that fired.
    pub special: SpecialKind,
    /// Cell the special occupied when it fired.
    pub position: Position,
}

/// Special fired directly by the player's swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Activation {
    /// Cell holding the special once the swap is applied.
    pub position: Position,
    /// Kind of the run the swap completed; a full-clear removes this kind.
    pub target: TokenKind,
}

/// Closed removal set produced by [`detonate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Detonation {
    /// Every cell to remove, seed cells included.
    pub removed: RunSet,
    /// Specials that fired, in firing order.
    pub triggered: Vec<TriggeredSpecial>,
}

/// Classifies one connected run set produced by a single swap.
///
/// Positions are considered in row-major order. Five or more cells earn a
/// full-clear at the middle cell whatever the shape. Exactly four cells earn
/// a block-bomb at the second cell when they lie on one line, or a
/// line-clear at the second cell when they form a T or L intersection.
#[must_use]
pub fn classify(run: &RunSet) -> Option<SpecialSpawn> {
    let ordered = run.to_vec();
    let spawn = |special, index: usize| SpecialSpawn {
        special,
        position: ordered[index],
    };

    match ordered.len() {
        len if len >= 5 => Some(spawn(SpecialKind::FullClear, len / 2)),
        4 if is_straight(&ordered) => Some(spawn(SpecialKind::BlockBomb, 1)),
        4 if has_intersection(&ordered) => Some(spawn(SpecialKind::LineClear, 1)),
        _ => None,
    }
}

/// Cells cleared when `token` fires at `position`.
///
/// A block-bomb covers the surrounding 3x3 block clipped to the grid, a
/// full-clear covers every cell of kind `target`, and a line-clear covers the
/// full row and column. Plain tokens clear nothing beyond themselves and
/// yield an empty set.
pub fn expand(
    token: Token,
    position: Position,
    grid: &Grid,
    target: TokenKind,
) -> Result<RunSet, EngineError> {
    grid.ensure_contains(position)?;

    let area = match token.special_kind() {
        None => RunSet::new(),
        Some(SpecialKind::BlockBomb) => block_around(position, grid),
        Some(SpecialKind::FullClear) => grid
            .iter()
            .filter(|(_, candidate)| candidate.kind() == target)
            .map(|(cell, _)| cell)
            .collect(),
        Some(SpecialKind::LineClear) => {
            let row = (0..grid.columns()).map(|column| Position::new(position.row(), column));
            let column = (0..grid.rows()).map(|row| Position::new(row, position.column()));
            row.chain(column).collect()
        }
    };

    Ok(area)
}

/// Grows `seed` by firing every special it covers until no new special is
/// reached.
///
/// `activations` fire first and join the removal set whether or not the
/// seed covers them; entries whose cell holds no special are ignored. Specials
/// reached afterwards target their own kind. Each special fires at most once.
/// Seed positions outside the grid are dropped.
pub fn detonate(
    grid: &Grid,
    seed: &RunSet,
    activations: &[Activation],
) -> Result<Detonation, EngineError> {
    let mut blast = Blast {
        removed: seed.iter().filter(|cell| grid.contains(*cell)).collect(),
        fired: RunSet::new(),
        triggered: Vec::new(),
    };

    for activation in activations {
        grid.ensure_contains(activation.position)?;
        let Some(token) = grid.get(activation.position).filter(Token::is_special) else {
            continue;
        };
        let _ = blast.removed.insert(activation.position);
        blast.fire(grid, activation.position, token, activation.target)?;
    }

    loop {
        let pending: Vec<(Position, Token)> = blast
            .removed
            .iter()
            .filter(|cell| !blast.fired.contains(*cell))
            .filter_map(|cell| grid.get(cell).map(|token| (cell, token)))
            .filter(|(_, token)| token.is_special())
            .collect();
        if pending.is_empty() {
            break;
        }

        for (cell, token) in pending {
            blast.fire(grid, cell, token, token.kind())?;
        }
    }

    Ok(Detonation {
        removed: blast.removed,
        triggered: blast.triggered,
    })
}

struct Blast {
    removed: RunSet,
    fired: RunSet,
    triggered: Vec<TriggeredSpecial>,
}

impl Blast {
    fn fire(
        &mut self,
        grid: &Grid,
        cell: Position,
        token: Token,
        target: TokenKind,
    ) -> Result<(), EngineError> {
        if !self.fired.insert(cell) {
            return Ok(());
        }
        let area = expand(token, cell, grid, target)?;
        let added = self.removed.absorb(&area);
        if let Some(special) = token.special_kind() {
            tracing::trace!(?special, %cell, ?target, added, "special token fired");
            self.triggered.push(TriggeredSpecial {
                special,
                position: cell,
            });
        }
        Ok(())
    }
}

fn block_around(center: Position, grid: &Grid) -> RunSet {
    let rows = center.row().saturating_sub(1)..=center.row().saturating_add(1);
    rows.flat_map(|row| {
        let columns = center.column().saturating_sub(1)..=center.column().saturating_add(1);
        columns.map(move |column| Position::new(row, column))
    })
    .filter(|cell| grid.contains(*cell))
    .collect()
}

fn is_straight(cells: &[Position]) -> bool {
    let Some(first) = cells.first() else {
        return false;
    };
    cells.iter().all(|cell| cell.row() == first.row())
        || cells.iter().all(|cell| cell.column() == first.column())
}

fn has_intersection(cells: &[Position]) -> bool {
    cells.iter().any(|pivot| {
        let sharing_row = cells.iter().filter(|cell| cell.row() == pivot.row()).count();
        let sharing_column = cells
            .iter()
            .filter(|cell| cell.column() == pivot.column())
            .count();
        sharing_row >= 2 && sharing_column >= 2
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(positions: &[(u32, u32)]) -> Vec<Position> {
        positions
            .iter()
            .map(|&(row, column)| Position::new(row, column))
            .collect()
    }

    #[test]
    fn straight_detection_accepts_rows_and_columns() {
        assert!(is_straight(&cells(&[(2, 0), (2, 1), (2, 2), (2, 3)])));
        assert!(is_straight(&cells(&[(0, 5), (1, 5), (2, 5), (3, 5)])));
        assert!(!is_straight(&cells(&[(0, 0), (0, 1), (0, 2), (1, 2)])));
        assert!(!is_straight(&[]));
    }

    #[test]
    fn intersection_requires_shared_row_and_column() {
        assert!(has_intersection(&cells(&[(0, 0), (0, 1), (0, 2), (1, 2)])));
        assert!(!has_intersection(&cells(&[(0, 0), (0, 1), (0, 2), (0, 3)])));
    }
}
