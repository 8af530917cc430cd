use super::Grid;
use crate::{AntCell, Binary, Cell, Heading, Pos2};

/// How a cell is drawn in a text viewport
pub trait Glyph {
    fn glyph(self) -> char;
}
impl Glyph for Binary {
    fn glyph(self) -> char {
        if self.is_live() { '█' } else { ' ' }
    }
}
impl Glyph for AntCell {
    fn glyph(self) -> char {
        match self.heading {
            Some(Heading::North) => '^',
            Some(Heading::East) => '>',
            Some(Heading::South) => 'v',
            Some(Heading::West) => '<',
            None if self.color => '█',
            None => ' ',
        }
    }
}

/// A rectangular viewport `[top_left, bottom_right)` onto a grid
pub struct GridWindow<'a, C> {
    tl: Pos2,
    br: Pos2,
    grid: &'a Grid<C>,
}
impl<'a, C: Cell> GridWindow<'a, C> {
    pub fn new(grid: &'a Grid<C>, top_left: Pos2, bottom_right: Pos2) -> Self {
        Self {
            tl: top_left,
            br: bottom_right,
            grid,
        }
    }

    /// Every on-grid cell inside the viewport, row-major
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Pos2, C)> + 'a {
        let grid = self.grid;
        let rx = self.tl.x.max(0)..self.br.x.min(grid.width() as i32);
        let ry = self.tl.y.max(0)..self.br.y.min(grid.height() as i32);
        ry.flat_map(move |y| rx.clone().map(move |x| Pos2 { x, y }))
            .map(move |pos| {
                let index = pos.y as usize * grid.width() + pos.x as usize;
                (pos, grid.cells()[index])
            })
    }
}

impl<C: Cell + Glyph> std::fmt::Display for GridWindow<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut last_row = None;
        for (pos, cell) in self.iter() {
            if last_row.is_some_and(|row| row != pos.y) {
                writeln!(f)?;
            }
            last_row = Some(pos.y);
            write!(f, "{}", cell.glyph())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clipped_to_the_grid() {
        let grid = Grid::<Binary>::create(3, None, Some(&[1, 0, 0, 0, 1, 0][..])).unwrap();
        let window = grid.window(Pos2 { x: -2, y: -2 }, Pos2 { x: 2, y: 9 });

        let cells: Vec<_> = window.iter().collect();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], (Pos2 { x: 0, y: 0 }, Binary::Alive));
        assert_eq!(cells[3], (Pos2 { x: 1, y: 1 }, Binary::Alive));
    }

    #[test]
    fn display_draws_rows() {
        let grid = Grid::<Binary>::create(2, None, Some(&[1, 0, 0, 1][..])).unwrap();
        let window = grid.window(Pos2::zero(), Pos2 { x: 2, y: 2 });

        assert_eq!(window.to_string(), "█ \n █");
    }

    #[test]
    fn ant_is_drawn_by_heading() {
        let mut grid = Grid::<AntCell>::new(2, 1).unwrap();
        grid.toggle(0).unwrap();
        grid.move_ant(1, Heading::West).unwrap();

        assert_eq!(grid.window(Pos2::zero(), Pos2 { x: 2, y: 1 }).to_string(), "█<");
    }
}
