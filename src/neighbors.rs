//! Gathering a cell's neighbor states from a grid.

use crate::{BoundaryPolicy, Cell, Direction, Grid, GridError};

/// Which steps count as neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// North, east, south and west
    Four,
    /// The four orthogonal steps plus the diagonals
    Eight,
}
impl Connectivity {
    #[inline]
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Self::Four => &Direction::ORTHOGONAL,
            Self::Eight => &Direction::ALL,
        }
    }
}

/// Neighbor states of one cell, keyed by [`Direction`]
///
/// A [`None`] entry is an absent neighbor: off the edge under
/// [`BoundaryPolicy::Clamped`], or not part of the connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood<C> {
    connectivity: Connectivity,
    states: [Option<C>; 8],
}

impl<C: Cell> Neighborhood<C> {
    /// A neighborhood with every neighbor absent
    pub fn empty(connectivity: Connectivity) -> Self {
        Self {
            connectivity,
            states: [None; 8],
        }
    }

    /// Fills in one neighbor; directions outside the connectivity are ignored
    pub fn with(mut self, direction: Direction, state: C) -> Self {
        if self.connectivity.directions().contains(&direction) {
            self.states[direction as usize] = Some(state);
        }
        self
    }

    #[inline]
    pub fn get(&self, direction: Direction) -> Option<C> {
        self.states[direction as usize]
    }

    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, Option<C>)> + '_ {
        self.connectivity
            .directions()
            .iter()
            .map(|&dir| (dir, self.get(dir)))
    }

    /// Number of present neighbors whose live bit is set
    pub fn live_count(&self) -> usize {
        self.states
            .iter()
            .flatten()
            .filter(|c| c.is_live())
            .count()
    }
}

/// Resolves the neighbors of `index` under `boundary`
///
/// Fails with [`GridError::Index`] when `index` is not a cell of `grid`.
pub fn neighbors<C: Cell>(
    grid: &Grid<C>,
    index: usize,
    boundary: BoundaryPolicy,
    connectivity: Connectivity,
) -> Result<Neighborhood<C>, GridError> {
    grid.get(index)?;
    Ok(gather(grid, index, boundary, connectivity))
}

/// [`neighbors`] for an index already known to be on the grid
pub(crate) fn gather<C: Cell>(
    grid: &Grid<C>,
    index: usize,
    boundary: BoundaryPolicy,
    connectivity: Connectivity,
) -> Neighborhood<C> {
    let cells = grid.cells();
    let mut hood = Neighborhood::empty(connectivity);
    for &dir in connectivity.directions() {
        hood.states[dir as usize] = boundary
            .resolve(index, dir, grid.width(), grid.height())
            .map(|i| cells[i]);
    }
    hood
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Binary;

    fn plus_grid() -> Grid<Binary> {
        #[rustfmt::skip]
        let initial = [
            1, 1, 0,
            1, 0, 0,
            0, 0, 1,
        ];
        Grid::create(3, None, Some(&initial[..])).unwrap()
    }

    #[test]
    fn four_connected_ignores_diagonals() {
        let grid = plus_grid();
        let n = neighbors(&grid, 4, BoundaryPolicy::Clamped, Connectivity::Four).unwrap();

        assert_eq!(n.get(Direction::North), Some(Binary::Alive));
        assert_eq!(n.get(Direction::NorthWest), None);
        assert_eq!(n.iter().count(), 4);
        assert_eq!(n.live_count(), 2);
    }

    #[test]
    fn eight_connected_counts_diagonals() {
        let grid = plus_grid();
        let n = neighbors(&grid, 4, BoundaryPolicy::Clamped, Connectivity::Eight).unwrap();

        assert_eq!(n.live_count(), 4);
    }

    #[test]
    fn clamped_corner_has_three_neighbors() {
        let grid = plus_grid();
        let n = neighbors(&grid, 0, BoundaryPolicy::Clamped, Connectivity::Eight).unwrap();

        assert_eq!(n.iter().filter(|(_, s)| s.is_some()).count(), 3);
        // the far corner never leaks in through a diagonal
        assert_eq!(n.get(Direction::NorthWest), None);
        assert_eq!(n.live_count(), 2);
    }

    #[test]
    fn toroidal_left_edge_sees_last_column() {
        #[rustfmt::skip]
        let initial = [
            0, 0, 0, 0,
            0, 0, 0, 1,
            0, 0, 0, 0,
        ];
        let grid = Grid::<Binary>::create(4, None, Some(&initial[..])).unwrap();

        let n = neighbors(&grid, 4, BoundaryPolicy::Toroidal, Connectivity::Eight).unwrap();
        assert_eq!(n.get(Direction::West), Some(Binary::Alive));
        assert_eq!(n.live_count(), 1);

        let n = neighbors(&grid, 4, BoundaryPolicy::Clamped, Connectivity::Eight).unwrap();
        assert_eq!(n.get(Direction::West), None);
        assert_eq!(n.live_count(), 0);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let grid = plus_grid();

        for boundary in [BoundaryPolicy::Clamped, BoundaryPolicy::Toroidal] {
            let err = neighbors(&grid, 9, boundary, Connectivity::Four).unwrap_err();
            assert_eq!(err, GridError::Index { index: 9, len: 9 });
        }
    }
}
