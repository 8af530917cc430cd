//! Neighbor resolution at the edges of the rectangle.

use crate::Pos2;

/// One step from a cell towards a neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::East,
        Self::South,
        Self::West,
        Self::NorthEast,
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthWest,
    ];

    /// Column/row offset of this step; rows grow southwards
    #[inline]
    pub fn offset(self) -> Pos2 {
        let (x, y) = match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::NorthEast => (1, -1),
            Self::SouthEast => (1, 1),
            Self::SouthWest => (-1, 1),
            Self::NorthWest => (-1, -1),
        };
        Pos2 { x, y }
    }

}

/// What happens when a neighbor step leaves the rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryPolicy {
    /// The step is dropped; edge cells simply have fewer neighbors.
    #[default]
    Clamped,
    /// Rows and columns wrap independently (torus).
    Toroidal,
}

impl BoundaryPolicy {
    /// Resolves the neighbor of `index` one `direction` step away.
    ///
    /// Row and column are resolved independently, so a diagonal step is only
    /// present when both of its orthogonal components are. An `index` off the
    /// grid resolves to `None`; otherwise `Toroidal` always returns `Some`.
    pub fn resolve(
        self,
        index: usize,
        direction: Direction,
        width: usize,
        height: usize,
    ) -> Option<usize> {
        if index >= width.saturating_mul(height) {
            return None;
        }
        let pos = Pos2::from_index(index, width) + direction.offset();
        let x = self.resolve_axis(pos.x, width)?;
        let y = self.resolve_axis(pos.y, height)?;
        Some(y * width + x)
    }

    /// Swaps clamped for toroidal and back
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Self::Clamped => Self::Toroidal,
            Self::Toroidal => Self::Clamped,
        }
    }

    fn resolve_axis(self, value: i32, len: usize) -> Option<usize> {
        let n = len as i32;
        if (0..n).contains(&value) {
            return Some(value as usize);
        }
        match self {
            Self::Clamped => None,
            Self::Toroidal => Some(value.rem_euclid(n) as usize),
        }
    }
}

impl std::str::FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clamped" => Ok(Self::Clamped),
            "toroidal" => Ok(Self::Toroidal),
            other => Err(format!("unknown boundary policy `{other}`")),
        }
    }
}
