#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gem Cascade engine.
//!
//! This crate defines the value types every engine system speaks: [`Token`]
//! values laid out in an immutable [`Grid`], [`Position`] coordinates gathered
//! into [`RunSet`] membership sets, the read-only [`LevelConfig`] record and
//! the [`EngineError`] surface. Systems borrow grids and hand back new ones;
//! nothing in here mutates a caller's grid in place. Randomness enters only
//! through the [`KindSource`] trait so tests can script every draw.

use std::{collections::BTreeSet, fmt};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of token kinds in the full catalog.
pub const CATALOG_LEN: usize = 8;

/// Smallest catalog subset a level may play with.
pub const MIN_CATALOG_SIZE: u8 = 3;

/// Points awarded for every cell removed from the grid.
pub const POINTS_PER_CELL: u32 = 10;

/// Kinds of token available in the catalog, in catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// First catalog entry.
    Puppy,
    /// Second catalog entry.
    Dog,
    /// Third catalog entry.
    Poodle,
    /// Fourth catalog entry.
    Bone,
    /// Fifth catalog entry.
    Paw,
    /// Sixth catalog entry.
    Fox,
    /// Seventh catalog entry.
    Mink,
    /// Eighth catalog entry.
    Duck,
}

impl TokenKind {
    /// Every kind in catalog order.
    pub const ALL: [TokenKind; CATALOG_LEN] = [
        Self::Puppy,
        Self::Dog,
        Self::Poodle,
        Self::Bone,
        Self::Paw,
        Self::Fox,
        Self::Mink,
        Self::Duck,
    ];

    /// Zero-based position of the kind within the catalog.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up the kind stored at the provided catalog index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Area-of-effect variants a token may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    /// Clears the 3x3 block centred on the token.
    BlockBomb,
    /// Clears every token sharing the triggering kind.
    FullClear,
    /// Clears the token's entire row and column.
    LineClear,
}

/// Single occupant of a grid cell.
///
/// Structural equality compares both the kind and the special tag. Matching
/// only ever compares kinds, see [`Token::matches`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    special: Option<SpecialKind>,
}

impl Token {
    /// Creates a token without a special tag.
    #[must_use]
    pub const fn plain(kind: TokenKind) -> Self {
        Self {
            kind,
            special: None,
        }
    }

    /// Creates a token carrying the provided special tag.
    #[must_use]
    pub const fn special(kind: TokenKind, special: SpecialKind) -> Self {
        Self {
            kind,
            special: Some(special),
        }
    }

    /// Kind used when comparing tokens for runs.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Special tag carried by the token, if any.
    #[must_use]
    pub const fn special_kind(&self) -> Option<SpecialKind> {
        self.special
    }

    /// Reports whether the token carries a special tag.
    #[must_use]
    pub const fn is_special(&self) -> bool {
        self.special.is_some()
    }

    /// Returns a copy of the token with its kind kept and the tag replaced.
    #[must_use]
    pub const fn with_special(self, special: SpecialKind) -> Self {
        Self::special(self.kind, special)
    }

    /// Reports whether two tokens count as identical for run detection.
    #[must_use]
    pub fn matches(&self, other: &Token) -> bool {
        self.kind == other.kind
    }
}

/// Validated number of catalog kinds in play for a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CatalogSize(u8);

impl CatalogSize {
    /// Validates the provided catalog size.
    pub fn new(value: u8) -> Result<Self, EngineError> {
        if value < MIN_CATALOG_SIZE {
            return Err(EngineError::InvalidConfiguration(
                ConfigurationIssue::CatalogTooSmall { catalog_size: value },
            ));
        }
        if usize::from(value) > CATALOG_LEN {
            return Err(EngineError::InvalidConfiguration(
                ConfigurationIssue::CatalogTooLarge { catalog_size: value },
            ));
        }
        Ok(Self(value))
    }

    /// Number of kinds in play.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Kinds in play, in catalog order.
    #[must_use]
    pub fn kinds(&self) -> &'static [TokenKind] {
        &TokenKind::ALL[..usize::from(self.0)]
    }

    /// Draws a kind uniformly from the active subset.
    pub fn draw(&self, source: &mut dyn KindSource) -> TokenKind {
        let bound = usize::from(self.0);
        let kinds = self.kinds();
        kinds[source.next_index(bound) % bound]
    }
}

/// Location of a single grid cell, ordered row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u32,
    column: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index, counted from the top.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index, counted from the left.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Reports whether the two positions share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column) == 1
    }

    /// Position one column to the right, if it exists in a grid of `columns`.
    #[must_use]
    pub fn right(self, columns: u32) -> Option<Position> {
        let column = self.column.checked_add(1)?;
        (column < columns).then_some(Position::new(self.row, column))
    }

    /// Position one row below, if it exists in a grid of `rows`.
    #[must_use]
    pub fn below(self, rows: u32) -> Option<Position> {
        let row = self.row.checked_add(1)?;
        (row < rows).then_some(Position::new(row, self.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Fully occupied rectangular grid of tokens, stored row-major.
///
/// Deserialization goes through [`Grid::from_cells`], so a decoded grid
/// always holds exactly `rows * columns` cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridRecord")]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<Token>,
}

#[derive(Deserialize)]
struct GridRecord {
    rows: u32,
    columns: u32,
    cells: Vec<Token>,
}

impl TryFrom<GridRecord> for Grid {
    type Error = EngineError;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        Self::from_cells(record.rows, record.columns, record.cells)
    }
}

impl Grid {
    /// Builds a grid from row-major cells.
    ///
    /// Fails when either dimension is zero or the cell count does not equal
    /// `rows * columns`.
    pub fn from_cells(rows: u32, columns: u32, cells: Vec<Token>) -> Result<Self, EngineError> {
        validate_dimensions(rows, columns)?;
        let expected = cell_capacity(rows, columns);
        if cells.len() != expected {
            return Err(EngineError::InvalidConfiguration(
                ConfigurationIssue::CellCountMismatch {
                    expected,
                    actual: cells.len(),
                },
            ));
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Builds a grid from nested rows, top row first.
    pub fn from_rows(rows: Vec<Vec<Token>>) -> Result<Self, EngineError> {
        let row_count = u32::try_from(rows.len()).map_err(|_| {
            EngineError::InvalidConfiguration(ConfigurationIssue::EmptyDimension)
        })?;
        let width = rows.first().map_or(0, Vec::len);
        let column_count = u32::try_from(width).map_err(|_| {
            EngineError::InvalidConfiguration(ConfigurationIssue::EmptyDimension)
        })?;

        let mut cells = Vec::with_capacity(rows.len() * width);
        for row in rows {
            if row.len() != width {
                return Err(EngineError::InvalidConfiguration(
                    ConfigurationIssue::RaggedRows,
                ));
            }
            cells.extend(row);
        }
        Self::from_cells(row_count, column_count, cells)
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Row-major slice of every token.
    #[must_use]
    pub fn cells(&self) -> &[Token] {
        &self.cells
    }

    /// Consumes the grid, yielding its row-major cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<Token> {
        self.cells
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.column < self.columns
    }

    /// Fails with [`EngineError::OutOfBounds`] unless the position is inside.
    pub fn ensure_contains(&self, position: Position) -> Result<(), EngineError> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                position,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    /// Returns the token at the position, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<Token> {
        self.index(position).map(|index| self.cells[index])
    }

    /// Returns the token at the position or an out-of-bounds error.
    pub fn token(&self, position: Position) -> Result<Token, EngineError> {
        self.ensure_contains(position)?;
        Ok(self.cells[self.index_unchecked(position)])
    }

    /// Row-major iterator over every position in the grid.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| Position::new(row, column)))
    }

    /// Row-major iterator over every position paired with its token.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Token)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// Returns a copy of the grid with the tokens at `first` and `second` exchanged.
    ///
    /// Only bounds are checked here; adjacency is the swap validator's concern.
    pub fn swapped(&self, first: Position, second: Position) -> Result<Grid, EngineError> {
        self.ensure_contains(first)?;
        self.ensure_contains(second)?;
        let mut next = self.clone();
        next.cells
            .swap(self.index_unchecked(first), self.index_unchecked(second));
        Ok(next)
    }

    /// Returns a copy of the grid with the token at `position` replaced.
    pub fn with_token(&self, position: Position, token: Token) -> Result<Grid, EngineError> {
        self.ensure_contains(position)?;
        let mut next = self.clone();
        next.cells[self.index_unchecked(position)] = token;
        Ok(next)
    }

    /// Flat row-major index for the position, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| self.index_unchecked(position))
    }

    fn index_unchecked(&self, position: Position) -> usize {
        position.row as usize * self.columns as usize + position.column as usize
    }
}

/// Set of unique positions, iterated in row-major order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunSet {
    positions: BTreeSet<Position>,
}

impl RunSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a position, returning `true` when it was not yet a member.
    pub fn insert(&mut self, position: Position) -> bool {
        self.positions.insert(position)
    }

    /// Removes a position, returning `true` when it was a member.
    pub fn remove(&mut self, position: Position) -> bool {
        self.positions.remove(&position)
    }

    /// Reports membership of the position.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    /// Number of member positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Row-major iterator over the members.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }

    /// Adds every member of `other`, returning how many were new.
    pub fn absorb(&mut self, other: &RunSet) -> usize {
        let before = self.positions.len();
        self.positions.extend(other.positions.iter().copied());
        self.positions.len() - before
    }

    /// Members collected into a row-major vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Position> {
        self.positions.iter().copied().collect()
    }
}

impl FromIterator<Position> for RunSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl Extend<Position> for RunSet {
    fn extend<I: IntoIterator<Item = Position>>(&mut self, iter: I) {
        self.positions.extend(iter);
    }
}

/// Read-only per-level configuration supplied by the level catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelConfig {
    id: u32,
    rows: u32,
    columns: u32,
    catalog_size: u8,
    target_score: u32,
    max_moves: u32,
}

impl LevelConfig {
    /// Creates a new, not yet validated, level configuration.
    #[must_use]
    pub const fn new(
        id: u32,
        rows: u32,
        columns: u32,
        catalog_size: u8,
        target_score: u32,
        max_moves: u32,
    ) -> Self {
        Self {
            id,
            rows,
            columns,
            catalog_size,
            target_score,
            max_moves,
        }
    }

    /// Identifier of the level within its catalog.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Raw number of catalog kinds in play.
    #[must_use]
    pub const fn catalog_size(&self) -> u8 {
        self.catalog_size
    }

    /// Score that wins the level.
    #[must_use]
    pub const fn target_score(&self) -> u32 {
        self.target_score
    }

    /// Number of accepted moves available.
    #[must_use]
    pub const fn max_moves(&self) -> u32 {
        self.max_moves
    }

    /// Validates dimensions and catalog size, returning the usable catalog.
    pub fn validate(&self) -> Result<CatalogSize, EngineError> {
        validate_dimensions(self.rows, self.columns)?;
        CatalogSize::new(self.catalog_size)
    }
}

/// Two adjacent positions whose swap produces at least one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hint {
    first: Position,
    second: Position,
}

impl Hint {
    /// Creates a hint for the provided pair.
    #[must_use]
    pub const fn new(first: Position, second: Position) -> Self {
        Self { first, second }
    }

    /// Upper-left position of the pair.
    #[must_use]
    pub const fn first(&self) -> Position {
        self.first
    }

    /// Position to the right of or below [`Hint::first`].
    #[must_use]
    pub const fn second(&self) -> Position {
        self.second
    }
}

/// Reasons a configuration is rejected before any grid exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ConfigurationIssue {
    /// Fewer than three kinds cannot guarantee a match-free grid.
    #[error("catalog size {catalog_size} is below the minimum of 3")]
    CatalogTooSmall {
        /// Rejected catalog size.
        catalog_size: u8,
    },
    /// More kinds were requested than the catalog offers.
    #[error("catalog size {catalog_size} exceeds the 8 available kinds")]
    CatalogTooLarge {
        /// Rejected catalog size.
        catalog_size: u8,
    },
    /// A grid dimension was zero.
    #[error("grid dimensions must be positive")]
    EmptyDimension,
    /// Nested rows did not all share the same width.
    #[error("grid rows have differing widths")]
    RaggedRows,
    /// The supplied cells do not fill the declared dimensions.
    #[error("expected {expected} cells but received {actual}")]
    CellCountMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
}

/// Errors reported by engine operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum EngineError {
    /// Level or grid setup was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(ConfigurationIssue),
    /// The two swap positions do not share an edge.
    #[error("cannot swap {first} with non-adjacent {second}")]
    InvalidSwap {
        /// First position of the rejected swap.
        first: Position,
        /// Second position of the rejected swap.
        second: Position,
    },
    /// A position fell outside the grid.
    #[error("position {position} lies outside the {rows}x{columns} grid")]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Row count of the grid.
        rows: u32,
        /// Column count of the grid.
        columns: u32,
    },
}

/// Source of uniform draws used for grid generation and refills.
pub trait KindSource {
    /// Returns a draw in `0..bound`. `bound` is always at least one.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// [`KindSource`] backed by any `rand` generator.
#[derive(Clone, Debug)]
pub struct RandomKinds<R> {
    rng: R,
}

impl<R: Rng> RandomKinds<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Consumes the source, returning the generator.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> KindSource for RandomKinds<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// [`KindSource`] that cycles through a fixed script of draws.
///
/// Each scripted value is reduced modulo the requested bound, so one script
/// can drive levels with different catalog sizes. An empty script always
/// draws zero.
#[derive(Clone, Debug, Default)]
pub struct ScriptedKinds {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedKinds {
    /// Creates a source replaying the provided values in order.
    #[must_use]
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script,
            cursor: 0,
        }
    }

    /// Number of draws served so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl KindSource for ScriptedKinds {
    fn next_index(&mut self, bound: usize) -> usize {
        let value = if self.script.is_empty() {
            0
        } else {
            self.script[self.cursor % self.script.len()]
        };
        self.cursor += 1;
        value % bound.max(1)
    }
}

fn validate_dimensions(rows: u32, columns: u32) -> Result<(), EngineError> {
    if rows == 0 || columns == 0 {
        return Err(EngineError::InvalidConfiguration(
            ConfigurationIssue::EmptyDimension,
        ));
    }
    Ok(())
}

fn cell_capacity(rows: u32, columns: u32) -> usize {
    rows as usize * columns as usize
}
