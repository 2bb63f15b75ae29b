use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to draw frame")]
    Render(#[source] io::Error),
    #[error("could not query the terminal")]
    Terminal(#[source] io::Error),
    #[error("terminal is {actual_w}x{actual_h}, the board needs at least {needed_w}x{needed_h}")]
    TerminalTooSmall { needed_w: u16, needed_h: u16, actual_w: u16, actual_h: u16 },
    #[error("tick thread panicked")]
    TickThreadPanicked,
}
