//! Per-cell state for the two automaton flavors.

use std::fmt;

/// State held by one grid position.
///
/// A cell is plain value data; it never knows which grid holds it. Every
/// flavor has a single "live" bit (alive for Life, black for the ant) which
/// is what `toggle`, the live-fraction and the digit-row format look at.
pub trait Cell: Copy + Eq + Default + fmt::Debug + Send + Sync {
    /// Raw encoding accepted by [`Grid::create`](crate::Grid::create).
    type Code: Copy + fmt::Debug;

    /// Decodes a raw value, or [`None`] if it is not a legal state.
    fn decode(code: Self::Code) -> Option<Self>;
    fn encode(self) -> Self::Code;

    fn is_live(self) -> bool;
    fn from_live(live: bool) -> Self;

    /// Flips the live bit, leaving any other component untouched.
    fn toggled(self) -> Self;

    /// Whether this cell carries the single mobile marker (the ant).
    #[inline]
    fn has_marker(self) -> bool {
        false
    }
}

/// A Game of Life cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Binary {
    #[default]
    Dead,
    Alive,
}

impl Cell for Binary {
    type Code = u8;

    fn decode(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Dead),
            1 => Some(Self::Alive),
            _ => None,
        }
    }
    fn encode(self) -> u8 {
        match self {
            Self::Dead => 0,
            Self::Alive => 1,
        }
    }

    #[inline]
    fn is_live(self) -> bool {
        self == Self::Alive
    }
    #[inline]
    fn from_live(live: bool) -> Self {
        if live { Self::Alive } else { Self::Dead }
    }
    #[inline]
    fn toggled(self) -> Self {
        Self::from_live(!self.is_live())
    }
}

/// Orientation of the ant, encoded `0..=3` clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Self::North, Self::East, Self::South, Self::West];

    #[inline]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Turns clockwise by `quarter_turns`, wrapping past west back to north
    #[inline]
    pub fn rotated(self, quarter_turns: u8) -> Self {
        Self::ALL[((self.code() + quarter_turns) % 4) as usize]
    }
}

/// A Langton's-Ant cell: a color bit plus the heading of the ant, if the
/// ant stands here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AntCell {
    pub color: bool,
    pub heading: Option<Heading>,
}

impl AntCell {
    #[inline]
    pub fn new(color: bool, heading: Option<Heading>) -> Self {
        Self { color, heading }
    }
}

impl Cell for AntCell {
    /// `(color, heading)`, color `0|1`, heading `0..=3` or absent
    type Code = (u8, Option<u8>);

    fn decode((color, heading): Self::Code) -> Option<Self> {
        let color = match color {
            0 => false,
            1 => true,
            _ => return None,
        };
        let heading = match heading {
            Some(code) => Some(Heading::from_code(code)?),
            None => None,
        };
        Some(Self { color, heading })
    }
    fn encode(self) -> Self::Code {
        (u8::from(self.color), self.heading.map(Heading::code))
    }

    #[inline]
    fn is_live(self) -> bool {
        self.color
    }
    #[inline]
    fn from_live(live: bool) -> Self {
        Self::new(live, None)
    }
    #[inline]
    fn toggled(self) -> Self {
        Self::new(!self.color, self.heading)
    }
    #[inline]
    fn has_marker(self) -> bool {
        self.heading.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_rejects_codes_above_one() {
        assert_eq!(Binary::decode(1), Some(Binary::Alive));
        assert_eq!(Binary::decode(2), None);
    }

    #[test]
    fn ant_toggle_keeps_heading() {
        let cell = AntCell::new(false, Some(Heading::West));
        let toggled = cell.toggled();

        assert!(toggled.color);
        assert_eq!(toggled.heading, Some(Heading::West));
    }

    #[test]
    fn heading_rotation_wraps() {
        assert_eq!(Heading::North.rotated(1), Heading::East);
        assert_eq!(Heading::West.rotated(1), Heading::North);
        assert_eq!(Heading::East.rotated(3), Heading::North);
    }

    #[test]
    fn ant_decode_checks_both_components() {
        assert_eq!(
            AntCell::decode((1, Some(2))),
            Some(AntCell::new(true, Some(Heading::South)))
        );
        assert_eq!(AntCell::decode((2, None)), None);
        assert_eq!(AntCell::decode((0, Some(4))), None);
        assert_eq!(AntCell::new(true, Some(Heading::East)).encode(), (1, Some(1)));
    }
}
