//! Grid automata: Conway's Game of Life and Langton's ant on one engine.
//!
//! A [`Grid`] holds cells by value, a [`BoundaryPolicy`] decides what lies
//! past its edges, a [`TransitionRule`] maps a cell and its neighbors to the
//! cell's next state, and [`next_generation`] applies the rule to every cell
//! at once. [`TickEngine`] wraps that in the pause/run state a driver needs.

pub mod boundary;
pub mod cell;
pub mod enc;
pub mod engine;
pub mod error;
pub mod grid;
pub mod neighbors;
pub mod pos;
pub mod rule;

pub use boundary::{BoundaryPolicy, Direction};
pub use cell::{AntCell, Binary, Cell, Heading};
pub use enc::{DigitRows, GridEncoder};
pub use engine::{RunEvent, RunState, TickEngine, next_generation, next_generation_parallel};
pub use error::GridError;
pub use grid::{Glyph, Grid, GridWindow};
pub use neighbors::{Connectivity, Neighborhood, neighbors};
pub use pos::Pos2;
pub use rule::{AntRule, ConwayRule, TransitionRule};
