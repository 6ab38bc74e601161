#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative play session for a single level.
//!
//! A [`Session`] is the only owner of mutable game state. It routes player
//! swaps through the swap validator and the cascade engine, keeps score and
//! move counters, evaluates win and loss, and remembers one prior state for
//! undo. Read-only views live in [`query`].

mod progress;

pub use progress::Progress;

use gem_cascade_core::{CatalogSize, EngineError, Grid, Hint, KindSource, LevelConfig, Position};
use gem_cascade_system_cascade::{Cascade, RoundReport};
use gem_cascade_system_generation::generate_for;
use gem_cascade_system_hint::find_hint;
use gem_cascade_system_swap::try_swap;
use serde::{Deserialize, Serialize};

/// Outcome state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Moves remain and the target has not been reached.
    InProgress,
    /// The score reached the level target.
    Won,
    /// Every move was spent below the target.
    Lost,
}

impl SessionStatus {
    /// Reports whether the session accepts no further moves.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Errors reported by session commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// An engine operation rejected the request.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The session has already been won or lost.
    #[error("session is already finished")]
    Finished,
    /// No accepted move is available to revert.
    #[error("there is no move to undo")]
    NothingToUndo,
}

/// Result of a single [`Session::play`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    /// Whether the swap produced a run and was applied.
    pub accepted: bool,
    /// Cascade rounds in resolution order. Empty for rejected swaps.
    pub rounds: Vec<RoundReport>,
    /// Points earned by the move.
    pub score_delta: u32,
    /// Session status after the move.
    pub status: SessionStatus,
    /// Whether the resulting grid still offers a legal swap.
    pub has_legal_move: bool,
}

#[derive(Clone, Debug)]
struct Snapshot {
    grid: Grid,
    score: u32,
    moves_used: u32,
    status: SessionStatus,
}

/// Mutable play state for one level.
#[derive(Clone, Debug)]
pub struct Session {
    level: LevelConfig,
    catalog: CatalogSize,
    grid: Grid,
    score: u32,
    moves_used: u32,
    status: SessionStatus,
    previous: Option<Snapshot>,
}

impl Session {
    /// Validates the level and deals a fresh grid.
    pub fn start(level: LevelConfig, source: &mut dyn KindSource) -> Result<Self, SessionError> {
        let catalog = level.validate()?;
        let grid = generate_for(&level, source)?;
        tracing::info!(
            level = level.id(),
            rows = level.rows(),
            columns = level.columns(),
            target = level.target_score(),
            moves = level.max_moves(),
            "session started"
        );

        Ok(Self {
            level,
            catalog,
            grid,
            score: 0,
            moves_used: 0,
            status: SessionStatus::InProgress,
            previous: None,
        })
    }

    /// Attempts the swap of `first` and `second`.
    ///
    /// A swap that forms no run is reported with `accepted = false` and
    /// costs nothing. An accepted swap resolves the full cascade, spends one
    /// move and re-evaluates the session status.
    pub fn play(
        &mut self,
        first: Position,
        second: Position,
        source: &mut dyn KindSource,
    ) -> Result<MoveReport, SessionError> {
        if self.status.is_finished() {
            return Err(SessionError::Finished);
        }

        let outcome = try_swap(&self.grid, first, second)?;
        if !outcome.accepted() {
            tracing::debug!(%first, %second, "swap rejected");
            return Ok(MoveReport {
                accepted: false,
                rounds: Vec::new(),
                score_delta: 0,
                status: self.status,
                has_legal_move: find_hint(&self.grid).is_some(),
            });
        }

        let resolution =
            Cascade::after_swap(outcome.into_grid(), self.catalog, first, second).run(source)?;
        self.previous = Some(self.snapshot());
        self.grid = resolution.grid;
        self.score = self.score.saturating_add(resolution.score);
        self.moves_used = self.moves_used.saturating_add(1);
        self.update_status();

        tracing::debug!(
            %first,
            %second,
            rounds = resolution.rounds.len(),
            delta = resolution.score,
            score = self.score,
            moves_used = self.moves_used,
            "move resolved"
        );

        Ok(MoveReport {
            accepted: true,
            rounds: resolution.rounds,
            score_delta: resolution.score,
            status: self.status,
            has_legal_move: find_hint(&self.grid).is_some(),
        })
    }

    /// First legal swap on the current grid.
    #[must_use]
    pub fn hint(&self) -> Option<Hint> {
        find_hint(&self.grid)
    }

    /// Restores the state before the last accepted move.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        let snapshot = self.previous.take().ok_or(SessionError::NothingToUndo)?;
        let restored_status = snapshot.status;
        self.grid = snapshot.grid;
        self.score = snapshot.score;
        self.moves_used = snapshot.moves_used;
        if self.status != restored_status {
            tracing::info!(level = self.level.id(), status = ?restored_status, "status restored by undo");
        }
        self.status = restored_status;
        Ok(())
    }

    /// Deals a fresh grid without spending a move. Clears the undo slot.
    pub fn reshuffle(&mut self, source: &mut dyn KindSource) -> Result<(), SessionError> {
        if self.status.is_finished() {
            return Err(SessionError::Finished);
        }
        self.grid = generate_for(&self.level, source)?;
        self.previous = None;
        tracing::debug!(level = self.level.id(), "grid reshuffled");
        Ok(())
    }

    /// Folds this session into `progress`. A win unlocks the next level,
    /// bounded by `total_levels`.
    pub fn record(&self, progress: &mut Progress, total_levels: u32) {
        progress.record_attempt(
            self.level.id(),
            self.score,
            self.status == SessionStatus::Won,
            total_levels,
        );
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            score: self.score,
            moves_used: self.moves_used,
            status: self.status,
        }
    }

    fn update_status(&mut self) {
        let next = if self.score >= self.level.target_score() {
            SessionStatus::Won
        } else if self.moves_used >= self.level.max_moves() {
            SessionStatus::Lost
        } else {
            SessionStatus::InProgress
        };

        if next != self.status {
            tracing::info!(
                level = self.level.id(),
                score = self.score,
                moves_used = self.moves_used,
                status = ?next,
                "session status changed"
            );
        }
        self.status = next;
    }
}

/// Query functions that provide read-only access to a session.
pub mod query {
    use gem_cascade_core::{Grid, LevelConfig};

    use super::{Session, SessionStatus};

    /// Level being played.
    #[must_use]
    pub fn level(session: &Session) -> &LevelConfig {
        &session.level
    }

    /// Current stable grid.
    #[must_use]
    pub fn grid(session: &Session) -> &Grid {
        &session.grid
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(session: &Session) -> u32 {
        session.score
    }

    /// Accepted moves so far.
    #[must_use]
    pub fn moves_used(session: &Session) -> u32 {
        session.moves_used
    }

    /// Moves left before the session is lost.
    #[must_use]
    pub fn moves_remaining(session: &Session) -> u32 {
        session.level.max_moves().saturating_sub(session.moves_used)
    }

    /// Current status.
    #[must_use]
    pub fn status(session: &Session) -> SessionStatus {
        session.status
    }

    /// Reports whether a move is available to undo.
    #[must_use]
    pub fn can_undo(session: &Session) -> bool {
        session.previous.is_some()
    }
}
