/// (row, col), 0-indexed. Signed so a step off the board is representable.
pub type Position = (i16, i16);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    SnakeBody,
    Food,
}

/// Fixed-size cell matrix, stored row-major.
///
/// `get` and `set` expect an in-bounds position; callers check with
/// [`Grid::in_bounds`] first.
#[derive(Clone, Debug)]
pub struct Grid {
    height: i16,
    width: i16,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(height: i16, width: i16) -> Self {
        let cells = vec![Cell::Empty; height as usize * width as usize];
        Grid { height, width, cells }
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn center(&self) -> Position {
        (self.height / 2, self.width / 2)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.0 >= 0 && pos.1 >= 0 && pos.0 < self.height && pos.1 < self.width
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// Every position on the board, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| (row, col)))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(self.in_bounds(pos), "grid access out of bounds: {:?}", pos);
        self.width as usize * pos.0 as usize + pos.1 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(20, 80);
        assert_eq!(grid.count(Cell::Empty), 20 * 80);
        assert_eq!(grid.center(), (10, 40));
    }

    #[test]
    fn bounds_are_half_open() {
        let grid = Grid::new(20, 80);
        assert!(grid.in_bounds((0, 0)));
        assert!(grid.in_bounds((19, 79)));
        assert!(!grid.in_bounds((-1, 0)));
        assert!(!grid.in_bounds((0, -1)));
        assert!(!grid.in_bounds((20, 0)));
        assert!(!grid.in_bounds((0, 80)));
    }

    #[test]
    fn set_only_touches_one_cell() {
        let mut grid = Grid::new(3, 4);
        grid.set((2, 3), Cell::Food);
        grid.set((0, 1), Cell::SnakeBody);

        assert_eq!(grid.get((2, 3)), Cell::Food);
        assert_eq!(grid.get((0, 1)), Cell::SnakeBody);
        assert_eq!(grid.count(Cell::Empty), 10);
        assert_eq!(grid.positions().count(), 12);
    }
}
