//! Single-line board codes for sharing a grid between runs.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use gem_cascade_core::{EngineError, Grid, Token};

const CODE_DOMAIN: &str = "gems";
const CODE_VERSION: &str = "v1";
const SEPARATOR: char = ':';

/// Reasons a board code cannot be produced or read back.
#[derive(Debug, thiserror::Error)]
pub(crate) enum BoardCodeError {
    #[error("board code was empty")]
    EmptyCode,
    #[error("board code has no {0} segment")]
    MissingSegment(&'static str),
    #[error("board code header '{0}' is not a gems:v1 code")]
    UnsupportedHeader(String),
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    #[error("board payload is not valid base64")]
    InvalidEncoding(#[source] base64::DecodeError),
    #[error("board payload is not a token list")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("board payload does not fit its dimensions")]
    InvalidGrid(#[source] EngineError),
    #[error("could not serialise board")]
    Serialize(#[source] serde_json::Error),
}

/// Encodes the grid as `gems:v1:<cols>x<rows>:<payload>`.
///
/// The payload is the row-major token list as JSON, base64 without padding.
pub(crate) fn encode(grid: &Grid) -> Result<String, BoardCodeError> {
    let json = serde_json::to_vec(grid.cells()).map_err(BoardCodeError::Serialize)?;
    Ok(format!(
        "{CODE_DOMAIN}{SEPARATOR}{CODE_VERSION}{SEPARATOR}{}x{}{SEPARATOR}{}",
        grid.columns(),
        grid.rows(),
        STANDARD_NO_PAD.encode(json)
    ))
}

/// Decodes a board code back into a grid.
pub(crate) fn decode(value: &str) -> Result<Grid, BoardCodeError> {
    let code = value.trim();
    if code.is_empty() {
        return Err(BoardCodeError::EmptyCode);
    }

    let mut segments = code.splitn(4, SEPARATOR);
    let mut segment = |name| segments.next().ok_or(BoardCodeError::MissingSegment(name));
    let domain = segment("domain")?;
    let version = segment("version")?;
    let dimensions = segment("dimensions")?;
    let payload = segment("payload")?;

    if (domain, version) != (CODE_DOMAIN, CODE_VERSION) {
        return Err(BoardCodeError::UnsupportedHeader(format!(
            "{domain}{SEPARATOR}{version}"
        )));
    }
    let (columns, rows) = parse_dimensions(dimensions)
        .ok_or_else(|| BoardCodeError::InvalidDimensions(dimensions.to_owned()))?;

    let json = STANDARD_NO_PAD
        .decode(payload)
        .map_err(BoardCodeError::InvalidEncoding)?;
    let cells: Vec<Token> = serde_json::from_slice(&json).map_err(BoardCodeError::InvalidPayload)?;
    Grid::from_cells(rows, columns, cells).map_err(BoardCodeError::InvalidGrid)
}

/// Reads `<cols>x<rows>` with both sides positive.
fn parse_dimensions(text: &str) -> Option<(u32, u32)> {
    let (columns, rows) = text.split_once(['x', 'X'])?;
    let positive = |side: &str| side.trim().parse::<u32>().ok().filter(|&value| value > 0);
    Some((positive(columns)?, positive(rows)?))
}
