use crate::{Cell, Grid, GridError};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

pub trait GridEncoder {
    fn encode<C: Cell>(&self, grid: &Grid<C>) -> String;
    fn decode<C: Cell>(&self, value: &str) -> Result<Grid<C>, GridError>;
}

/// Returns the singleton pattern for one row of the digit format
fn row_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[01]+$").expect("valid row pattern"))
}

/// Plain text grids: one line per row, `1` for a live cell and `0` otherwise
///
/// Only the live bit is stored, so an ant's heading does not survive a
/// round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitRows;

impl DigitRows {
    /// Builds a grid from rows of digits
    ///
    /// Trailing whitespace on each line and trailing blank lines are
    /// ignored. Every remaining line must be the same, non-zero length.
    pub fn load<C, I, S>(&self, lines: I) -> Result<Grid<C>, GridError>
    where
        C: Cell,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim_end().to_owned())
            .collect();
        while rows.last().is_some_and(String::is_empty) {
            rows.pop();
        }

        let width = rows.first().map(String::len).unwrap_or_default();
        if width == 0 {
            return Err(GridError::validation("no rows to load"));
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (n, row) in rows.iter().enumerate() {
            if !row_pattern().is_match(row) {
                return Err(GridError::validation(format!(
                    "line {} may only contain 0 and 1",
                    n + 1
                )));
            }
            if row.len() != width {
                return Err(GridError::validation(format!(
                    "line {} has {} cells, expected {width}",
                    n + 1,
                    row.len()
                )));
            }
            cells.extend(row.bytes().map(|b| C::from_live(b == b'1')));
        }

        debug!(width, height = rows.len(), "loaded digit rows");
        Grid::from_cells(width, cells)
    }

    /// Whether every cell of `grid` survives encoding unchanged
    pub fn can_encode<C: Cell>(&self, grid: &Grid<C>) -> bool {
        grid.iter().all(|&c| C::from_live(c.is_live()) == c)
    }
}

impl GridEncoder for DigitRows {
    fn encode<C: Cell>(&self, grid: &Grid<C>) -> String {
        let mut out = String::with_capacity((grid.width() + 1) * grid.height());
        for row in grid.cells().chunks(grid.width()) {
            out.extend(row.iter().map(|c| if c.is_live() { '1' } else { '0' }));
            out.push('\n');
        }
        out
    }

    fn decode<C: Cell>(&self, value: &str) -> Result<Grid<C>, GridError> {
        self.load(value.lines())
    }
}
