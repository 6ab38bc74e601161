//! Level catalog loaded from TOML.

use std::{fs, path::Path};

use anyhow::Context;
use gem_cascade_core::{EngineError, LevelConfig};
use serde::Deserialize;

const CATALOG_VERSION: u32 = 1;
const BUILTIN_CATALOG: &str = include_str!("../levels.toml");

/// Reasons a catalog document is rejected.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CatalogError {
    #[error("could not parse level catalog")]
    Parse(#[from] toml::de::Error),
    #[error("level catalog version {0} is not supported")]
    UnsupportedVersion(u32),
    #[error("level catalog contains no levels")]
    Empty,
    #[error("level id {0} appears more than once")]
    DuplicateId(u32),
    #[error("level ids must run from 1 without gaps; expected {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },
    #[error("level {id} is invalid")]
    InvalidLevel {
        id: u32,
        #[source]
        source: EngineError,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: u32,
    #[serde(default)]
    levels: Vec<LevelEntry>,
}

/// One level as described in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct LevelEntry {
    pub(crate) id: u32,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) rows: u32,
    pub(crate) cols: u32,
    pub(crate) catalog_size: u8,
    pub(crate) target_score: u32,
    pub(crate) max_moves: u32,
}

impl LevelEntry {
    /// Engine configuration for this level.
    pub(crate) fn config(&self) -> LevelConfig {
        LevelConfig::new(
            self.id,
            self.rows,
            self.cols,
            self.catalog_size,
            self.target_score,
            self.max_moves,
        )
    }
}

/// Validated, id-ordered list of levels.
#[derive(Clone, Debug)]
pub(crate) struct LevelCatalog {
    levels: Vec<LevelEntry>,
}

impl LevelCatalog {
    /// Catalog compiled into the binary.
    pub(crate) fn builtin() -> Result<Self, CatalogError> {
        Self::parse(BUILTIN_CATALOG)
    }

    /// Loads the catalog at `path`, or the built-in one when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Self::builtin().context("built-in level catalog is invalid");
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read level catalog {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid level catalog {}", path.display()))
    }

    /// Parses and validates a catalog document.
    pub(crate) fn parse(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        if file.version != CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion(file.version));
        }
        if file.levels.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut levels = file.levels;
        levels.sort_by_key(|level| level.id);
        for (expected, level) in (1..).zip(&levels) {
            if level.id < expected {
                return Err(CatalogError::DuplicateId(level.id));
            }
            if level.id != expected {
                return Err(CatalogError::NonContiguous {
                    expected,
                    found: level.id,
                });
            }
            let _ = level
                .config()
                .validate()
                .map_err(|source| CatalogError::InvalidLevel { id: level.id, source })?;
        }

        Ok(Self { levels })
    }

    pub(crate) fn levels(&self) -> &[LevelEntry] {
        &self.levels
    }

    pub(crate) fn level(&self, id: u32) -> Option<&LevelEntry> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Number of levels, which is also the highest id.
    pub(crate) fn len(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_table(id: u32) -> String {
        format!(
            "[[levels]]\nid = {id}\nname = \"L{id}\"\nrows = 8\ncols = 8\ncatalog_size = 6\ntarget_score = 100\nmax_moves = 10\n"
        )
    }

    #[test]
    fn builtin_catalog_has_ten_contiguous_levels() {
        let catalog = LevelCatalog::builtin().expect("built-in catalog parses");
        assert_eq!(catalog.len(), 10);
        let first = catalog.level(1).expect("level 1");
        assert_eq!((first.target_score, first.max_moves), (100, 15));
        let last = catalog.level(10).expect("level 10");
        assert_eq!((last.target_score, last.max_moves), (1300, 10));
        assert!(catalog.levels().iter().all(|level| level.rows == 8 && level.cols == 8));
    }

    #[test]
    fn levels_are_ordered_by_id() {
        let text = format!("version = 1\n{}{}", level_table(2), level_table(1));
        let catalog = LevelCatalog::parse(&text).expect("valid catalog");
        let ids: Vec<_> = catalog.levels().iter().map(|level| level.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = format!("version = 1\n{}{}", level_table(1), level_table(1));
        assert!(matches!(
            LevelCatalog::parse(&text),
            Err(CatalogError::DuplicateId(1))
        ));
    }

    #[test]
    fn gaps_in_ids_are_rejected() {
        let text = format!("version = 1\n{}{}", level_table(1), level_table(3));
        assert!(matches!(
            LevelCatalog::parse(&text),
            Err(CatalogError::NonContiguous {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let text = format!("version = 2\n{}", level_table(1));
        assert!(matches!(
            LevelCatalog::parse(&text),
            Err(CatalogError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn invalid_level_reports_its_id() {
        let text = "version = 1\n[[levels]]\nid = 1\nname = \"tiny\"\nrows = 8\ncols = 8\ncatalog_size = 2\ntarget_score = 100\nmax_moves = 10\n";
        assert!(matches!(
            LevelCatalog::parse(text),
            Err(CatalogError::InvalidLevel { id: 1, .. })
        ));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            LevelCatalog::parse("version = 1\n"),
            Err(CatalogError::Empty)
        ));
    }
}
