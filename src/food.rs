use crate::grid::{Cell, Grid, Position};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Random draws before falling back to enumerating every candidate cell.
pub const MAX_SPAWN_ATTEMPTS: usize = 10_000;

/// Which cells a new food item may be placed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpawnRule {
    /// Rejects any cell sharing the head's row or the head's column, and
    /// nothing else. Food can still land on a body segment.
    HeadRowColumn,
    /// Rejects any cell that is not empty.
    FreeCell,
}

impl Default for SpawnRule {
    fn default() -> Self {
        SpawnRule::HeadRowColumn
    }
}

impl SpawnRule {
    pub fn accepts(self, grid: &Grid, head: Position, pos: Position) -> bool {
        match self {
            SpawnRule::HeadRowColumn => pos.0 != head.0 && pos.1 != head.1,
            SpawnRule::FreeCell => grid.get(pos) == Cell::Empty,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Food {
    position: Position,
}

impl Food {
    /// Places food on a random cell allowed by `rule` and marks it on the grid.
    ///
    /// Returns `None` only when no cell on the board is allowed.
    pub fn spawn<R: Rng>(grid: &mut Grid, head: Position, rule: SpawnRule, rng: &mut R) -> Option<Food> {
        let sampled = (0..MAX_SPAWN_ATTEMPTS)
            .map(|_| (rng.gen_range(0..grid.height()), rng.gen_range(0..grid.width())))
            .find(|pos| rule.accepts(grid, head, *pos));

        let position = match sampled {
            Some(pos) => pos,
            None => {
                debug!("food sampling gave up after {} attempts, scanning the board", MAX_SPAWN_ATTEMPTS);
                let choices: Vec<Position> = grid.positions().filter(|pos| rule.accepts(grid, head, *pos)).collect();
                *choices.choose(rng)?
            }
        };

        Some(Food::place(grid, position))
    }

    pub fn place(grid: &mut Grid, position: Position) -> Food {
        grid.set(position, Cell::Food);
        Food { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn consumed_by(&self, head: Position) -> bool {
        self.position == head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn consumed_only_on_exact_position() {
        let mut grid = Grid::new(20, 80);
        let food = Food::place(&mut grid, (5, 5));

        assert!(!food.consumed_by((5, 40)));
        assert!(!food.consumed_by((6, 5)));
        assert!(food.consumed_by((5, 5)));
        assert_eq!(grid.get((5, 5)), Cell::Food);
    }

    #[test]
    fn seeded_spawn_is_repeatable() {
        let spawn = |seed| {
            let mut grid = Grid::new(20, 80);
            Food::spawn(&mut grid, (5, 40), SpawnRule::HeadRowColumn, &mut StdRng::seed_from_u64(seed)).unwrap()
        };

        let food = spawn(11);
        assert_eq!(food, spawn(11));

        let (row, col) = food.position();
        assert!(food.consumed_by((row, col)));
        assert!(!food.consumed_by((row, 40)));
        assert!(!food.consumed_by((5, col)));
    }

    #[test]
    fn seeded_spawn_at_five_five_needs_exact_head() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = Grid::new(20, 80);
        for pos in grid.positions().collect::<Vec<_>>() {
            grid.set(pos, Cell::SnakeBody);
        }
        grid.set((5, 5), Cell::Empty);

        let food = Food::spawn(&mut grid, (5, 40), SpawnRule::FreeCell, &mut rng).unwrap();

        assert_eq!(food.position(), (5, 5));
        assert!(!food.consumed_by((5, 40)));
        assert!(!food.consumed_by((10, 5)));
        assert!(food.consumed_by((5, 5)));
    }

    #[test]
    fn head_row_column_rule_avoids_both_lines() {
        let mut rng = StdRng::seed_from_u64(7);
        let head = (10, 40);

        for _ in 0..200 {
            let mut grid = Grid::new(20, 80);
            let food = Food::spawn(&mut grid, head, SpawnRule::HeadRowColumn, &mut rng).unwrap();
            let (row, col) = food.position();

            assert!(grid.in_bounds((row, col)));
            assert_ne!(row, head.0);
            assert_ne!(col, head.1);
            assert_eq!(grid.count(Cell::Food), 1);
        }
    }

    #[test]
    fn head_row_column_rule_may_land_on_body() {
        let grid = Grid::new(3, 3);
        let mut occupied = grid.clone();
        occupied.set((2, 2), Cell::SnakeBody);

        assert!(SpawnRule::HeadRowColumn.accepts(&occupied, (0, 0), (2, 2)));
        assert!(!SpawnRule::FreeCell.accepts(&occupied, (0, 0), (2, 2)));
        assert!(!SpawnRule::HeadRowColumn.accepts(&grid, (0, 0), (0, 2)));
    }

    #[test]
    fn free_cell_rule_finds_the_last_gap() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = Grid::new(4, 4);
        for pos in grid.positions().collect::<Vec<_>>() {
            grid.set(pos, Cell::SnakeBody);
        }
        grid.set((3, 1), Cell::Empty);

        let food = Food::spawn(&mut grid, (0, 0), SpawnRule::FreeCell, &mut rng).unwrap();

        assert_eq!(food.position(), (3, 1));
        assert_eq!(grid.get((3, 1)), Cell::Food);
    }

    #[test]
    fn full_board_has_nowhere_to_spawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(2, 2);
        for pos in grid.positions().collect::<Vec<_>>() {
            grid.set(pos, Cell::SnakeBody);
        }

        assert_eq!(Food::spawn(&mut grid, (0, 0), SpawnRule::FreeCell, &mut rng), None);
        assert_eq!(grid.count(Cell::Food), 0);
    }
}
