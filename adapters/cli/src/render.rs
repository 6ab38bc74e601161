//! Plain-text rendering of grids for terminal output.

use std::fmt::Write as _;

use gem_cascade_core::{Grid, Position, SpecialKind, Token};

const SPECIAL_LEGEND: &str = "* block-bomb  # full-clear  + line-clear";

/// Renders the grid with a column header and row labels.
///
/// Each kind is shown as a letter in catalog order; specials carry a suffix
/// marker listed in [`legend`].
pub(crate) fn grid(grid: &Grid) -> String {
    let mut out = String::from("   ");
    for column in 0..grid.columns() {
        let _ = write!(out, "{column:>3}");
    }
    out.push('\n');

    for row in 0..grid.rows() {
        let _ = write!(out, "{row:>3}");
        for column in 0..grid.columns() {
            if let Some(token) = grid.get(Position::new(row, column)) {
                let _ = write!(out, " {}", glyph(token));
            }
        }
        out.push('\n');
    }
    out
}

/// Explanation of the special markers.
pub(crate) fn legend() -> &'static str {
    SPECIAL_LEGEND
}

fn glyph(token: Token) -> String {
    let letter = char::from(b'A' + token.kind().index() as u8);
    let marker = match token.special_kind() {
        None => ' ',
        Some(SpecialKind::BlockBomb) => '*',
        Some(SpecialKind::FullClear) => '#',
        Some(SpecialKind::LineClear) => '+',
    };
    format!("{letter}{marker}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_cascade_core::TokenKind;

    #[test]
    fn glyphs_use_catalog_letters_and_markers() {
        assert_eq!(glyph(Token::plain(TokenKind::Puppy)), "A ");
        assert_eq!(
            glyph(Token::special(TokenKind::Fox, SpecialKind::LineClear)),
            "F+"
        );
    }

    #[test]
    fn rendering_labels_rows_and_columns() {
        let cells = vec![Token::plain(TokenKind::Dog); 4];
        let rendered = grid(&Grid::from_cells(2, 2, cells).expect("grid"));
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "     0  1");
        assert_eq!(lines[1], "  0 B  B ");
    }
}
