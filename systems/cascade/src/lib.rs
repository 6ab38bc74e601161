#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cascade engine that resolves a grid until no run remains.
//!
//! Resolution is an explicit state machine cycling through
//! [`CascadeState::Detecting`], [`CascadeState::Removing`],
//! [`CascadeState::Compacting`] and [`CascadeState::Refilling`] until
//! detection comes back empty. Callers may drive it one transition at a time
//! with [`Cascade::advance`], one round at a time with
//! [`Cascade::step_round`], or to completion with [`Cascade::run`]; all three
//! yield the same grid for the same draw sequence.

use gem_cascade_core::{
    CatalogSize, EngineError, Grid, KindSource, Position, RunSet, Token, POINTS_PER_CELL,
};
use gem_cascade_system_detection::{connected_groups, find_matches};
use gem_cascade_system_specials::{
    classify, detonate, Activation, SpecialSpawn, TriggeredSpecial,
};

/// Rounds after which a debug build treats the cascade as runaway.
pub const ROUND_CEILING: u32 = 10_000;

/// Phase of a cascade resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CascadeState {
    /// Searching the grid for runs.
    Detecting,
    /// Clearing matched cells and any special expansions they reach.
    Removing,
    /// Sliding surviving tokens down their columns.
    Compacting,
    /// Filling emptied cells with freshly drawn tokens.
    Refilling,
    /// No runs remain.
    Done,
}

/// Everything that happened during one resolution round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    /// One-based round index.
    pub round: u32,
    /// Cells the detector reported at the start of the round.
    pub matched: RunSet,
    /// Cells actually cleared, after special expansion and spawn protection.
    pub removed: RunSet,
    /// Specials that fired this round.
    pub triggered: Vec<TriggeredSpecial>,
    /// Specials created from the player's swap. Only ever set in round one.
    pub spawned: Vec<SpecialSpawn>,
    /// Points earned this round.
    pub score: u32,
    /// Grid after refilling.
    pub grid: Grid,
}

/// Outcome of resolving a cascade to completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Stable grid without any run.
    pub grid: Grid,
    /// Total points earned across every round.
    pub score: u32,
    /// Per-round breakdown in resolution order.
    pub rounds: Vec<RoundReport>,
}

#[derive(Clone, Debug, Default)]
struct RoundProgress {
    matched: RunSet,
    removed: RunSet,
    triggered: Vec<TriggeredSpecial>,
    spawned: Vec<SpecialSpawn>,
    score: u32,
}

/// Resumable cascade resolution over a working copy of a grid.
#[derive(Clone, Debug)]
pub struct Cascade {
    rows: u32,
    columns: u32,
    catalog: CatalogSize,
    cells: Vec<Option<Token>>,
    state: CascadeState,
    swap: Option<(Position, Position)>,
    rounds: u32,
    score: u32,
    progress: RoundProgress,
}

impl Cascade {
    /// Prepares a cascade that never spawns specials.
    #[must_use]
    pub fn new(grid: Grid, catalog: CatalogSize) -> Self {
        let rows = grid.rows();
        let columns = grid.columns();
        Self {
            rows,
            columns,
            catalog,
            cells: grid.into_cells().into_iter().map(Some).collect(),
            state: CascadeState::Detecting,
            swap: None,
            rounds: 0,
            score: 0,
            progress: RoundProgress::default(),
        }
    }

    /// Prepares a cascade following an accepted swap of `first` and `second`.
    ///
    /// First-round groups that contain either swapped position are offered
    /// to the special classifier, and a special sitting on either swapped
    /// position fires in the first round even when no run covers it.
    #[must_use]
    pub fn after_swap(grid: Grid, catalog: CatalogSize, first: Position, second: Position) -> Self {
        let mut cascade = Self::new(grid, catalog);
        cascade.swap = Some((first, second));
        cascade
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> CascadeState {
        self.state
    }

    /// Points earned so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Number of completed rounds.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Performs a single state transition.
    ///
    /// Returns the round report when the transition completed a round.
    pub fn advance(
        &mut self,
        source: &mut dyn KindSource,
    ) -> Result<Option<RoundReport>, EngineError> {
        match self.state {
            CascadeState::Detecting => {
                let matched = find_matches(&self.snapshot()?);
                if matched.is_empty() {
                    self.swap = None;
                    self.state = CascadeState::Done;
                } else {
                    debug_assert!(
                        self.rounds < ROUND_CEILING,
                        "cascade exceeded {ROUND_CEILING} rounds"
                    );
                    self.progress = RoundProgress {
                        matched,
                        ..RoundProgress::default()
                    };
                    self.state = CascadeState::Removing;
                }
                Ok(None)
            }
            CascadeState::Removing => {
                self.remove()?;
                self.state = CascadeState::Compacting;
                Ok(None)
            }
            CascadeState::Compacting => {
                self.compact();
                self.state = CascadeState::Refilling;
                Ok(None)
            }
            CascadeState::Refilling => {
                self.refill(source);
                self.state = CascadeState::Detecting;
                self.rounds += 1;
                self.finish_round().map(Some)
            }
            CascadeState::Done => Ok(None),
        }
    }

    /// Advances through one complete round, or returns `None` once the grid
    /// is stable.
    pub fn step_round(
        &mut self,
        source: &mut dyn KindSource,
    ) -> Result<Option<RoundReport>, EngineError> {
        loop {
            if let Some(report) = self.advance(source)? {
                return Ok(Some(report));
            }
            if self.state == CascadeState::Done {
                return Ok(None);
            }
        }
    }

    /// Resolves every remaining round.
    pub fn run(mut self, source: &mut dyn KindSource) -> Result<Resolution, EngineError> {
        let mut rounds = Vec::new();
        while let Some(report) = self.step_round(source)? {
            rounds.push(report);
        }

        Ok(Resolution {
            grid: self.snapshot()?,
            score: self.score,
            rounds,
        })
    }

    fn snapshot(&self) -> Result<Grid, EngineError> {
        let cells = self.cells.iter().flatten().copied().collect();
        Grid::from_cells(self.rows, self.columns, cells)
    }

    fn index(&self, position: Position) -> usize {
        position.row() as usize * self.columns as usize + position.column() as usize
    }

    fn remove(&mut self) -> Result<(), EngineError> {
        let grid = self.snapshot()?;
        let matched = &self.progress.matched;
        let (spawned, activations): (Vec<SpecialSpawn>, Vec<Activation>) =
            match self.swap.take() {
                Some((first, second)) => (
                    connected_groups(&grid, matched)
                        .iter()
                        .filter(|group| group.contains(first) || group.contains(second))
                        .filter_map(classify)
                        .collect(),
                    swap_activations(&grid, matched, first, second),
                ),
                None => (Vec::new(), Vec::new()),
            };

        let detonation = detonate(&grid, matched, &activations)?;
        let mut removed = detonation.removed;
        for spawn in &spawned {
            let _ = removed.remove(spawn.position);
        }

        for cell in removed.iter() {
            let index = self.index(cell);
            self.cells[index] = None;
        }
        for spawn in &spawned {
            let index = self.index(spawn.position);
            self.cells[index] = self.cells[index].map(|token| token.with_special(spawn.special));
        }

        let cleared = u32::try_from(removed.len()).unwrap_or(u32::MAX);
        let score = cleared.saturating_mul(POINTS_PER_CELL);
        self.score = self.score.saturating_add(score);

        self.progress.removed = removed;
        self.progress.triggered = detonation.triggered;
        self.progress.spawned = spawned;
        self.progress.score = score;
        Ok(())
    }

    fn compact(&mut self) {
        let columns = self.columns as usize;
        for column in 0..columns {
            let mut write = self.rows as usize;
            for row in (0..self.rows as usize).rev() {
                let index = row * columns + column;
                if let Some(token) = self.cells[index] {
                    write -= 1;
                    if write != row {
                        self.cells[write * columns + column] = Some(token);
                        self.cells[index] = None;
                    }
                }
            }
        }
    }

    fn refill(&mut self, source: &mut dyn KindSource) {
        let columns = self.columns as usize;
        for column in 0..columns {
            for row in 0..self.rows as usize {
                let cell = &mut self.cells[row * columns + column];
                if cell.is_none() {
                    *cell = Some(Token::plain(self.catalog.draw(source)));
                }
            }
        }
    }

    fn finish_round(&mut self) -> Result<RoundReport, EngineError> {
        let progress = std::mem::take(&mut self.progress);
        let grid = self.snapshot()?;
        tracing::debug!(
            round = self.rounds,
            matched = progress.matched.len(),
            removed = progress.removed.len(),
            triggered = progress.triggered.len(),
            spawned = progress.spawned.len(),
            score = progress.score,
            "cascade round resolved"
        );

        Ok(RoundReport {
            round: self.rounds,
            matched: progress.matched,
            removed: progress.removed,
            triggered: progress.triggered,
            spawned: progress.spawned,
            score: progress.score,
            grid,
        })
    }
}

/// Specials on the swapped cells, each aimed at the kind of the run the swap
/// completed. A special inside a run targets its own kind; one outside takes
/// the kind its partner carried into the run.
fn swap_activations(
    grid: &Grid,
    matched: &RunSet,
    first: Position,
    second: Position,
) -> Vec<Activation> {
    [(first, second), (second, first)]
        .into_iter()
        .filter_map(|(cell, partner)| {
            let token = grid.get(cell).filter(Token::is_special)?;
            let target = if matched.contains(cell) {
                token.kind()
            } else {
                grid.get(partner)?.kind()
            };
            Some(Activation {
                position: cell,
                target,
            })
        })
        .collect()
}

/// Resolves `grid` to a stable state without spawning specials.
pub fn resolve(
    grid: &Grid,
    catalog: CatalogSize,
    source: &mut dyn KindSource,
) -> Result<Resolution, EngineError> {
    Cascade::new(grid.clone(), catalog).run(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_cascade_core::{ScriptedKinds, TokenKind};

    fn cascade_over(kinds: &[Option<TokenKind>], rows: u32, columns: u32) -> Cascade {
        let catalog = CatalogSize::new(6).expect("valid catalog");
        let grid = Grid::from_cells(rows, columns, vec![Token::plain(TokenKind::Fox); kinds.len()])
            .expect("grid");
        let mut cascade = Cascade::new(grid, catalog);
        cascade.cells = kinds.iter().map(|kind| kind.map(Token::plain)).collect();
        cascade
    }

    #[test]
    fn compaction_preserves_column_order() {
        let a = Some(TokenKind::Puppy);
        let b = Some(TokenKind::Dog);
        let c = Some(TokenKind::Poodle);
        let mut cascade = cascade_over(&[a, None, b, c, None, None], 3, 2);
        cascade.compact();
        let kinds: Vec<_> = cascade.cells.iter().map(|cell| cell.map(|token| token.kind())).collect();
        assert_eq!(kinds, vec![None, None, a, None, b, c]);
    }

    #[test]
    fn refill_walks_columns_top_to_bottom() {
        let mut cascade = cascade_over(&[None, None, None, Some(TokenKind::Fox)], 2, 2);
        let mut source = ScriptedKinds::new(vec![0, 1, 2]);
        cascade.refill(&mut source);
        let kinds: Vec<_> = cascade.cells.iter().map(|cell| cell.map(|token| token.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                Some(TokenKind::Puppy),
                Some(TokenKind::Poodle),
                Some(TokenKind::Dog),
                Some(TokenKind::Fox),
            ]
        );
    }
}
