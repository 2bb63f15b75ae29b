use std::fmt;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use log::info;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    Wall,
    SelfCollision,
    Quit,
    BoardFull,
    /// The frame could not be drawn.
    Aborted,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameOverReason::Wall => "hit the wall",
            GameOverReason::SelfCollision => "ran into itself",
            GameOverReason::Quit => "quit",
            GameOverReason::BoardFull => "board full, you won!",
            GameOverReason::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// One-shot game-over latch shared by the tick loop, the key listener and main.
///
/// The first reason raised is kept; later raises are no-ops.
#[derive(Debug, Default)]
pub struct TerminationSignal {
    reason: Mutex<Option<GameOverReason>>,
    raised: Condvar,
}

impl TerminationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this call is the one that ended the game.
    pub fn raise(&self, reason: GameOverReason) -> bool {
        let mut slot = self.reason.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }

        info!("game over: {}", reason);
        *slot = Some(reason);
        self.raised.notify_all();
        true
    }

    pub fn reason(&self) -> Option<GameOverReason> {
        *self.reason.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_raised(&self) -> bool {
        self.reason().is_some()
    }

    /// Blocks until some party raises the signal.
    pub fn wait(&self) -> GameOverReason {
        let mut slot = self.reason.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(reason) = *slot {
                return reason;
            }
            slot = self.raised.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Raises `Aborted` when dropped, so a thread that dies without ending the
/// game properly still releases whoever is waiting.
pub struct AbortOnDrop(pub Arc<TerminationSignal>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.raise(GameOverReason::Aborted);
    }
}
