use crate::grid::{Cell, Grid, Position};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Left, Up, Right, Down];

    pub fn opposite(self) -> Direction {
        match self {
            Left => Right,
            Up => Down,
            Right => Left,
            Down => Up,
        }
    }

    /// Unit step as (row, col).
    pub fn delta(self) -> Position {
        match self {
            Left => (0, -1),
            Up => (-1, 0),
            Right => (0, 1),
            Down => (1, 0),
        }
    }

    pub fn step(self, pos: Position) -> Position {
        let (dr, dc) = self.delta();
        (pos.0 + dr, pos.1 + dc)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    Wall,
    Body,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position, vacated: Option<Position> },
    Collision(CollisionKind),
}

/// Body segments ordered head (index 0) to tail.
#[derive(Debug)]
pub struct Snake {
    body: Vec<Position>,
    heading: Direction,
    last_move: Direction,
    pending_growth: bool,
}

impl Snake {
    pub fn spawn(center: Position, grid: &mut Grid) -> Self {
        grid.set(center, Cell::SnakeBody);
        Snake { body: vec![center], heading: Right, last_move: Right, pending_growth: false }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn has_pending_growth(&self) -> bool {
        self.pending_growth
    }

    /// A request for the exact reverse of the current heading is dropped.
    pub fn set_heading(&mut self, requested: Direction) {
        if requested != self.heading.opposite() {
            self.heading = requested;
        }
    }

    /// Moves one cell along the heading. On collision nothing is mutated.
    ///
    /// The body check covers every current segment, the tail included, even
    /// though the tail is about to move out of the way.
    pub fn advance(&mut self, grid: &mut Grid) -> MoveResult {
        let new_head = self.heading.step(self.head());

        if !grid.in_bounds(new_head) {
            return Collision(CollisionKind::Wall);
        }
        if self.body.contains(&new_head) {
            return Collision(CollisionKind::Body);
        }

        let old_tail = self.tail();
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = new_head;
        self.last_move = self.heading;
        grid.set(new_head, Cell::SnakeBody);

        if self.pending_growth {
            // The vacated cell stays occupied by the new segment.
            self.pending_growth = false;
            self.body.push(old_tail);
            Moved { new_head, vacated: None }
        } else {
            grid.set(old_tail, Cell::Empty);
            Moved { new_head, vacated: Some(old_tail) }
        }
    }

    /// Appends a segment next to the tail without shifting the body.
    ///
    /// Returns the new tail position, or `None` when every neighbour of the
    /// tail is taken and the growth is deferred to the next `advance`.
    pub fn grow(&mut self, grid: &mut Grid) -> Option<Position> {
        let tail = self.tail();
        let behind = self.last_move.opposite();
        let candidates = std::iter::once(behind).chain(Direction::ALL.into_iter().filter(|d| *d != behind));

        for dir in candidates {
            let pos = dir.step(tail);
            if grid.in_bounds(pos) && grid.get(pos) == Cell::Empty {
                grid.set(pos, Cell::SnakeBody);
                self.body.push(pos);
                return Some(pos);
            }
        }

        self.pending_growth = true;
        None
    }

    pub fn head_char(&self) -> char {
        match self.heading {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    #[cfg(test)]
    pub(crate) fn from_body(body: Vec<Position>, heading: Direction, grid: &mut Grid) -> Self {
        for pos in &body {
            grid.set(*pos, Cell::SnakeBody);
        }
        Snake { body, heading, last_move: heading, pending_growth: false }
    }
}
