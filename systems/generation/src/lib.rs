#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid factory that fills a level's board without any pre-existing runs.

use gem_cascade_core::{
    CatalogSize, EngineError, Grid, KindSource, LevelConfig, Token, TokenKind,
};

/// Rejected draws tolerated for a single cell before falling back to the
/// first permitted kind in catalog order.
const MAX_REJECTED_DRAWS: usize = 64;

/// Generates a grid for the provided level configuration.
pub fn generate_for(level: &LevelConfig, source: &mut dyn KindSource) -> Result<Grid, EngineError> {
    generate(level.rows(), level.columns(), level.catalog_size(), source)
}

/// Generates a `rows x columns` grid using the first `catalog_size` kinds.
///
/// Cells are filled row-major. A drawn kind is rejected when it would
/// complete a run with the two cells to its left or the two cells above it;
/// cells to the right and below are not placed yet, so the finished grid has
/// no run anywhere. Fails with [`EngineError::InvalidConfiguration`] when a
/// dimension is zero or fewer than three kinds are in play.
pub fn generate(
    rows: u32,
    columns: u32,
    catalog_size: u8,
    source: &mut dyn KindSource,
) -> Result<Grid, EngineError> {
    let catalog = LevelConfig::new(0, rows, columns, catalog_size, 0, 0).validate()?;
    let width = columns as usize;
    let mut cells: Vec<Token> = Vec::with_capacity(rows as usize * width);

    for row in 0..rows as usize {
        for column in 0..width {
            let kind = draw_permitted(&cells, width, row, column, catalog, source);
            cells.push(Token::plain(kind));
        }
    }

    Grid::from_cells(rows, columns, cells)
}

fn draw_permitted(
    cells: &[Token],
    width: usize,
    row: usize,
    column: usize,
    catalog: CatalogSize,
    source: &mut dyn KindSource,
) -> TokenKind {
    for _ in 0..MAX_REJECTED_DRAWS {
        let kind = catalog.draw(source);
        if !completes_run(cells, width, row, column, kind) {
            return kind;
        }
    }

    tracing::debug!(
        row,
        column,
        "kind source kept proposing run-completing kinds; falling back to catalog order"
    );
    catalog
        .kinds()
        .iter()
        .copied()
        .find(|kind| !completes_run(cells, width, row, column, *kind))
        .unwrap_or(TokenKind::Puppy)
}

fn completes_run(cells: &[Token], width: usize, row: usize, column: usize, kind: TokenKind) -> bool {
    let index = row * width + column;

    let horizontal = column >= 2
        && cells[index - 1].kind() == kind
        && cells[index - 2].kind() == kind;
    let vertical = row >= 2
        && cells[index - width].kind() == kind
        && cells[index - 2 * width].kind() == kind;

    horizontal || vertical
}
