//! Terminal snake: a tick loop, a key listener and a game-over latch sharing
//! one locked board.

pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod signal;
pub mod snake;
pub mod term;
