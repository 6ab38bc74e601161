#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Swap validator that accepts a player swap only when it produces a run.

use gem_cascade_core::{EngineError, Grid, Position, RunSet};
use gem_cascade_system_detection::find_matches;

/// Result of validating a single swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapOutcome {
    accepted: bool,
    grid: Grid,
    matches: RunSet,
}

impl SwapOutcome {
    /// Reports whether the swap produced at least one run.
    #[must_use]
    pub const fn accepted(&self) -> bool {
        self.accepted
    }

    /// Grid after the swap when accepted, otherwise the untouched input.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Runs formed by the swap. Empty when rejected.
    #[must_use]
    pub const fn matches(&self) -> &RunSet {
        &self.matches
    }

    /// Consumes the outcome, returning the grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Exchanges two edge-adjacent tokens without checking for runs.
///
/// Bounds are checked before adjacency.
pub fn trial_swap(grid: &Grid, first: Position, second: Position) -> Result<Grid, EngineError> {
    grid.ensure_contains(first)?;
    grid.ensure_contains(second)?;
    if !first.is_adjacent(second) {
        return Err(EngineError::InvalidSwap { first, second });
    }
    grid.swapped(first, second)
}

/// Attempts a player swap.
///
/// The swapped grid is kept only when it contains a run. A rejected swap
/// is not an error; the outcome carries the original grid unchanged.
pub fn try_swap(grid: &Grid, first: Position, second: Position) -> Result<SwapOutcome, EngineError> {
    let swapped = trial_swap(grid, first, second)?;
    let matches = find_matches(&swapped);

    if matches.is_empty() {
        tracing::trace!(%first, %second, "swap rejected without a run");
        return Ok(SwapOutcome {
            accepted: false,
            grid: grid.clone(),
            matches,
        });
    }

    tracing::trace!(%first, %second, matched = matches.len(), "swap accepted");
    Ok(SwapOutcome {
        accepted: true,
        grid: swapped,
        matches,
    })
}
