use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, sleep};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use rand::rngs::StdRng;

use crate::error::GameError;
use crate::food::{Food, SpawnRule};
use crate::grid::{Cell, Grid};
use crate::input::InputRouter;
use crate::signal::{AbortOnDrop, GameOverReason, TerminationSignal};
use crate::snake::{CollisionKind, Direction, MoveResult, Snake};

pub const HEIGHT: i16 = 20;
pub const WIDTH: i16 = 80;
const TICK_INTERVAL_MS: u64 = 200;

#[derive(Copy, Clone, Debug)]
pub struct GameConfig {
    pub height: i16,
    pub width: i16,
    pub tick: Duration,
    pub spawn_rule: SpawnRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            height: HEIGHT,
            width: WIDTH,
            tick: Duration::from_millis(TICK_INTERVAL_MS),
            spawn_rule: SpawnRule::default(),
        }
    }
}

/// Draws one frame of the board. Called once per tick while the board lock is held.
pub trait Renderer {
    fn draw(&mut self, board: &Board) -> io::Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver(GameOverReason),
}

/// Everything a tick mutates. Lives behind the single game lock.
pub struct Board {
    grid: Grid,
    snake: Snake,
    food: Option<Food>,
    spawn_rule: SpawnRule,
    rng: StdRng,
    state: GameState,
}

impl Board {
    pub fn new(config: &GameConfig, mut rng: StdRng) -> Self {
        let mut grid = Grid::new(config.height, config.width);
        let snake = Snake::spawn(grid.center(), &mut grid);
        let food = Food::spawn(&mut grid, snake.head(), config.spawn_rule, &mut rng);

        let state = match food {
            Some(f) => {
                debug!("snake at {:?}, food at {:?}", snake.head(), f.position());
                GameState::Running
            }
            None => GameState::GameOver(GameOverReason::BoardFull),
        };

        Board { grid, snake, food, spawn_rule: config.spawn_rule, rng, state }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> usize {
        self.snake.len()
    }

    /// One move: steer, advance, then grow and respawn food if it was eaten.
    ///
    /// Once the game is over further calls change nothing.
    pub fn tick(&mut self, requested: Option<Direction>) -> GameState {
        if self.state != GameState::Running {
            return self.state;
        }

        if let Some(dir) = requested {
            self.snake.set_heading(dir);
        }

        match self.snake.advance(&mut self.grid) {
            MoveResult::Collision(kind) => {
                let reason = match kind {
                    CollisionKind::Wall => GameOverReason::Wall,
                    CollisionKind::Body => GameOverReason::SelfCollision,
                };
                self.state = GameState::GameOver(reason);
            }
            MoveResult::Moved { new_head, .. } => match self.food {
                Some(food) if food.consumed_by(new_head) => self.eat(),
                Some(food) => {
                    // Food spawned under a body segment shows up once the segment leaves.
                    if self.grid.get(food.position()) == Cell::Empty {
                        self.grid.set(food.position(), Cell::Food);
                    }
                }
                None => {}
            },
        }

        self.state
    }

    /// Ends a running game from outside the tick, e.g. on quit.
    pub fn end(&mut self, reason: GameOverReason) {
        if self.state == GameState::Running {
            self.state = GameState::GameOver(reason);
        }
    }

    fn eat(&mut self) {
        let new_tail = self.snake.grow(&mut self.grid);
        debug!("ate at {:?}, new tail {:?}, length {}", self.snake.head(), new_tail, self.snake.len());

        self.food = Food::spawn(&mut self.grid, self.snake.head(), self.spawn_rule, &mut self.rng);
        match self.food {
            Some(food) => debug!("food respawned at {:?}", food.position()),
            None => self.state = GameState::GameOver(GameOverReason::BoardFull),
        }
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, pos: crate::grid::Position) {
        if let Some(old) = self.food {
            self.grid.set(old.position(), Cell::Empty);
        }
        self.food = Some(Food::place(&mut self.grid, pos));
    }

    #[cfg(test)]
    pub(crate) fn arrange(&mut self, body: Vec<crate::grid::Position>, heading: Direction, food: crate::grid::Position) {
        self.grid = Grid::new(self.grid.height(), self.grid.width());
        self.snake = Snake::from_body(body, heading, &mut self.grid);
        self.food = Some(Food::place(&mut self.grid, food));
    }
}

/// Fixed-interval tick driver.
pub struct GameLoop {
    board: Arc<Mutex<Board>>,
    input: InputRouter,
    signal: Arc<TerminationSignal>,
    period: Duration,
}

impl GameLoop {
    pub fn new(board: Arc<Mutex<Board>>, input: InputRouter, signal: Arc<TerminationSignal>, period: Duration) -> Self {
        GameLoop { board, input, signal, period }
    }

    /// Ticks until the game ends, from a collision here or a quit elsewhere.
    pub fn run<R: Renderer>(&self, renderer: &mut R) -> Result<(), GameError> {
        {
            let board = self.board.lock().unwrap_or_else(PoisonError::into_inner);
            self.draw(renderer, &board)?;
        }

        let mut deadline = Instant::now() + self.period;
        loop {
            let now = Instant::now();
            if deadline > now {
                sleep(deadline - now);
            } else if now - deadline > self.period {
                // Too far behind; start over from now rather than bursting ticks.
                deadline = now;
            }
            deadline += self.period;

            if let Some(reason) = self.signal.reason() {
                self.board.lock().unwrap_or_else(PoisonError::into_inner).end(reason);
                return Ok(());
            }

            // Move, grow, respawn and draw all happen under one lock.
            let state = {
                let mut board = self.board.lock().unwrap_or_else(PoisonError::into_inner);
                let state = board.tick(self.input.take());
                self.draw(renderer, &board)?;
                state
            };

            if let GameState::GameOver(reason) = state {
                self.signal.raise(reason);
                return Ok(());
            }
        }
    }

    pub fn spawn<R>(self, mut renderer: R) -> thread::JoinHandle<Result<(), GameError>>
    where
        R: Renderer + Send + 'static,
    {
        info!("tick loop starting, period {:?}", self.period);
        let guard = AbortOnDrop(Arc::clone(&self.signal));
        thread::spawn(move || {
            let _guard = guard;
            self.run(&mut renderer)
        })
    }

    fn draw<R: Renderer>(&self, renderer: &mut R, board: &Board) -> Result<(), GameError> {
        renderer.draw(board).map_err(|e| {
            error!("render failed: {}", e);
            self.signal.raise(GameOverReason::Aborted);
            GameError::Render(e)
        })
    }
}
