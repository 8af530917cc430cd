mod window;

pub use self::window::{Glyph, GridWindow};
use crate::{AntCell, Cell, GridError, Heading, Pos2};
use tracing::debug;

/// A rectangular, row-major arena of cells
///
/// Cells are stored by value; index `i` sits at row `i / width`, column
/// `i % width`. Anything that needs grid context (dimensions, neighbors)
/// takes the grid as a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<C> {
    width: usize,
    height: usize,
    cells: Vec<C>,
}

impl<C: Cell> Grid<C> {
    /// Creates a `width` x `height` grid of empty cells
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::validation(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        let len = width
            .checked_mul(height)
            .ok_or_else(|| GridError::validation(format!("{width}x{height} is too large")))?;
        debug!(width, height, "created empty grid");
        Ok(Self {
            width,
            height,
            cells: vec![C::default(); len],
        })
    }

    /// Creates a grid from optional raw initial contents
    ///
    /// With `initial`, the height is derived from `initial.len() / width`; an
    /// explicit `height` must agree with it. Without `initial`, `height` is
    /// required and every cell starts empty.
    pub fn create(
        width: usize,
        height: Option<usize>,
        initial: Option<&[C::Code]>,
    ) -> Result<Self, GridError> {
        if width == 0 {
            return Err(GridError::validation("width must be positive"));
        }
        let Some(initial) = initial else {
            let height = height.ok_or_else(|| {
                GridError::validation("height is required when no initial data is given")
            })?;
            return Self::new(width, height);
        };

        if initial.is_empty() || initial.len() % width != 0 {
            return Err(GridError::validation(format!(
                "cannot draw rectangle from {} cells with a width of {width}",
                initial.len()
            )));
        }
        let derived = initial.len() / width;
        if let Some(height) = height.filter(|&h| h != derived) {
            return Err(GridError::validation(format!(
                "inconsistent height {height} for {} cells of width {width}",
                initial.len()
            )));
        }

        let cells = initial
            .iter()
            .enumerate()
            .map(|(i, &code)| {
                C::decode(code).ok_or_else(|| {
                    GridError::validation(format!("{code:?} at index {i} is not a legal cell state"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(width, cells)
    }

    /// Builds a grid from already-decoded cells, `cells.len() / width` rows tall
    pub fn from_cells(width: usize, cells: Vec<C>) -> Result<Self, GridError> {
        if width == 0 || cells.is_empty() || cells.len() % width != 0 {
            return Err(GridError::validation(format!(
                "cannot draw rectangle from {} cells with a width of {width}",
                cells.len()
            )));
        }
        let markers = cells.iter().filter(|c| c.has_marker()).count();
        if markers > 1 {
            return Err(GridError::validation(format!(
                "at most one cell may carry a heading, found {markers}"
            )));
        }

        let height = cells.len() / width;
        debug!(width, height, "created grid from initial cells");
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds the next generation's grid; dimensions come from `self`
    pub(crate) fn with_cells(&self, cells: Vec<C>) -> Self {
        debug_assert_eq!(cells.len(), self.cells.len(), "next generation changed size");
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    /// Always `false`, construction rejects empty grids
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn row(&self, index: usize) -> usize {
        index / self.width
    }
    #[inline]
    pub fn column(&self, index: usize) -> usize {
        index % self.width
    }
    #[inline]
    pub fn index_of(&self, pos: Pos2) -> Option<usize> {
        pos.to_index(self.width, self.height)
    }

    fn check_index(&self, index: usize) -> Result<(), GridError> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(GridError::Index {
                index,
                len: self.cells.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Result<C, GridError> {
        self.check_index(index)?;
        Ok(self.cells[index])
    }

    /// Overwrites one cell
    ///
    /// Placing a marker-carrying cell while another cell already holds the
    /// marker is rejected.
    pub fn set(&mut self, index: usize, state: C) -> Result<(), GridError> {
        self.check_index(index)?;
        if state.has_marker()
            && self
                .cells
                .iter()
                .enumerate()
                .any(|(i, c)| i != index && c.has_marker())
        {
            return Err(GridError::validation(
                "another cell already carries the heading",
            ));
        }
        self.cells[index] = state;
        Ok(())
    }

    /// Flips the live bit of one cell
    pub fn toggle(&mut self, index: usize) -> Result<(), GridError> {
        self.check_index(index)?;
        self.cells[index] = self.cells[index].toggled();
        Ok(())
    }

    /// Sets every cell back to the empty state
    pub fn reset(&mut self) {
        self.cells.fill(C::default());
    }

    #[inline]
    pub fn cells(&self) -> &[C] {
        &self.cells
    }
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.cells.iter()
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_live()).count()
    }
    pub fn live_fraction(&self) -> f64 {
        self.live_count() as f64 / self.cells.len() as f64
    }

    pub fn window(&self, top_left: Pos2, bottom_right: Pos2) -> GridWindow<'_, C> {
        GridWindow::new(self, top_left, bottom_right)
    }
}

impl Grid<AntCell> {
    /// Index and heading of the ant, if one is on the grid
    pub fn ant(&self) -> Option<(usize, Heading)> {
        self.cells
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.heading.map(|h| (i, h)))
    }

    /// Picks the ant up and puts it down on `index` facing `heading`
    ///
    /// Colors are left alone.
    pub fn move_ant(&mut self, index: usize, heading: Heading) -> Result<(), GridError> {
        self.check_index(index)?;
        for cell in &mut self.cells {
            cell.heading = None;
        }
        self.cells[index].heading = Some(heading);
        Ok(())
    }
}
