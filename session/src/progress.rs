//! Persistent player progress across levels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unlock state, best scores and play statistics for a player.
///
/// Field names serialize in camelCase so stored records stay readable by
/// other front ends sharing the same save format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    unlocked_level: u32,
    level_scores: BTreeMap<u32, u32>,
    current_level: u32,
    play_count: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            unlocked_level: 1,
            level_scores: BTreeMap::new(),
            current_level: 1,
            play_count: 0,
        }
    }
}

impl Progress {
    /// Highest level id the player may start.
    #[must_use]
    pub const fn unlocked_level(&self) -> u32 {
        self.unlocked_level
    }

    /// Level most recently selected.
    #[must_use]
    pub const fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Number of sessions recorded.
    #[must_use]
    pub const fn play_count(&self) -> u32 {
        self.play_count
    }

    /// Reports whether the level may be started.
    #[must_use]
    pub const fn is_unlocked(&self, level: u32) -> bool {
        level <= self.unlocked_level
    }

    /// Best recorded score for the level, zero when never played.
    #[must_use]
    pub fn high_score(&self, level: u32) -> u32 {
        self.level_scores.get(&level).copied().unwrap_or(0)
    }

    /// Stores `score` when it beats the level's best, returning `true` when
    /// the record changed.
    pub fn update_high_score(&mut self, level: u32, score: u32) -> bool {
        if score <= self.high_score(level) {
            return false;
        }
        let _ = self.level_scores.insert(level, score);
        true
    }

    /// Marks `level` as the current selection when it is unlocked.
    pub fn select_level(&mut self, level: u32) -> bool {
        if level == 0 || !self.is_unlocked(level) {
            return false;
        }
        self.current_level = level;
        true
    }

    /// Folds one finished attempt into the record.
    ///
    /// A win unlocks the following level, never past `total_levels`.
    pub fn record_attempt(&mut self, level: u32, score: u32, won: bool, total_levels: u32) {
        self.play_count = self.play_count.saturating_add(1);
        let _ = self.update_high_score(level, score);

        if won {
            let next = level.saturating_add(1).min(total_levels.max(1));
            self.unlocked_level = self.unlocked_level.max(next);
        }
    }

    /// Replaces zeroed counters left by incomplete records with their
    /// defaults.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.unlocked_level == 0 {
            self.unlocked_level = 1;
        }
        if self.current_level == 0 {
            self.current_level = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_unlocks_only_the_first_level() {
        let progress = Progress::default();
        assert!(progress.is_unlocked(1));
        assert!(!progress.is_unlocked(2));
        assert_eq!(progress.high_score(1), 0);
    }

    #[test]
    fn high_score_only_moves_up() {
        let mut progress = Progress::default();
        assert!(progress.update_high_score(3, 250));
        assert!(!progress.update_high_score(3, 120));
        assert!(!progress.update_high_score(3, 250));
        assert_eq!(progress.high_score(3), 250);
    }

    #[test]
    fn locked_levels_cannot_be_selected() {
        let mut progress = Progress::default();
        assert!(!progress.select_level(2));
        assert!(!progress.select_level(0));
        assert!(progress.select_level(1));
    }
}
