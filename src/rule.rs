//! Per-cell transition rules.

use crate::{AntCell, Binary, Cell, Connectivity, Direction, Heading, Neighborhood};

/// Maps a cell's current state and its neighbors to its next state
///
/// Implementations must be pure: the same inputs always give the same
/// output, and nothing outside the arguments is read or written.
pub trait TransitionRule: Send + Sync {
    type Cell: Cell;

    /// Neighbors the rule needs resolved for each cell
    fn connectivity(&self) -> Connectivity;

    fn next_state(&self, current: Self::Cell, neighbors: &Neighborhood<Self::Cell>) -> Self::Cell;
}

/// Conway's Game of Life (B3/S23) over eight neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConwayRule;

impl TransitionRule for ConwayRule {
    type Cell = Binary;

    #[inline]
    fn connectivity(&self) -> Connectivity {
        Connectivity::Eight
    }

    fn next_state(&self, current: Binary, neighbors: &Neighborhood<Binary>) -> Binary {
        let alive = neighbors.live_count();

        // stasis unless one of the branches below fires
        let mut next = current;
        if alive > 3 {
            next = Binary::Dead; // overpopulation
        } else if alive < 2 {
            next = Binary::Dead; // underpopulation
        } else if alive == 3 {
            next = Binary::Alive; // reproduction
        }
        next
    }
}

/// Langton's ant over four neighbors
///
/// Each cell looks at the headings (not the colors) of its orthogonal
/// neighbors in the fixed order south, west, north, east. A neighbor whose
/// heading equals that direction's trigger hands the ant to this cell: the
/// cell flips its color and takes heading `trigger + (color * 2 + 1)`,
/// i.e. the ant turns right off a white cell and left off a black one.
/// When several triggers match, the last one in that order wins. Every other
/// cell keeps its color and loses any heading.
///
/// The two presets carry different trigger tables and are not
/// interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntRule {
    triggers: [(Direction, Heading); 4],
}

impl AntRule {
    /// Triggers south=0, west=1, north=2, east=3
    pub const A: AntRule = AntRule {
        triggers: [
            (Direction::South, Heading::North),
            (Direction::West, Heading::East),
            (Direction::North, Heading::South),
            (Direction::East, Heading::West),
        ],
    };
    /// Triggers south=3, west=0, north=1, east=2
    pub const B: AntRule = AntRule {
        triggers: [
            (Direction::South, Heading::West),
            (Direction::West, Heading::North),
            (Direction::North, Heading::East),
            (Direction::East, Heading::South),
        ],
    };
}

impl Default for AntRule {
    fn default() -> Self {
        Self::A
    }
}

impl std::str::FromStr for AntRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "A" => Ok(Self::A),
            "b" | "B" => Ok(Self::B),
            other => Err(format!("unknown ant rule preset `{other}`")),
        }
    }
}

impl TransitionRule for AntRule {
    type Cell = AntCell;

    #[inline]
    fn connectivity(&self) -> Connectivity {
        Connectivity::Four
    }

    fn next_state(&self, current: AntCell, neighbors: &Neighborhood<AntCell>) -> AntCell {
        let turn = u8::from(current.color) * 2 + 1;

        let mut next = AntCell::new(current.color, None);
        for &(dir, trigger) in &self.triggers {
            if neighbors.get(dir).and_then(|c| c.heading) == Some(trigger) {
                next = AntCell::new(!current.color, Some(trigger.rotated(turn)));
            }
        }
        next
    }
}
