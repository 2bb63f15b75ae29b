use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::debug;

use crate::signal::{GameOverReason, TerminationSignal};
use crate::snake::Direction;

const READ_RETRY_DELAY: Duration = Duration::from_millis(10);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Quit,
    Other,
}

/// Source of semantic key presses.
///
/// `next_key` may block for a short while; `Ok(None)` means nothing was
/// pressed in that window, which gives the listener a chance to notice the
/// game has ended.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<Option<Key>>;
}

/// Single-slot hand-off of the latest requested direction.
///
/// The producer overwrites whatever the consumer has not picked up yet.
#[derive(Clone, Debug, Default)]
pub struct InputRouter {
    slot: Arc<Mutex<Option<Direction>>>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, dir: Direction) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(dir);
    }

    /// Never blocks on the producer; `None` if nothing new arrived.
    pub fn take(&self) -> Option<Direction> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Reads keys until quit or until someone else ends the game.
///
/// Directions go to the router. Quit bypasses it and raises the signal.
pub fn listen<K: KeySource>(mut source: K, router: InputRouter, signal: Arc<TerminationSignal>) {
    while !signal.is_raised() {
        match source.next_key() {
            Ok(Some(Key::Move(dir))) => router.publish(dir),
            Ok(Some(Key::Quit)) => {
                signal.raise(GameOverReason::Quit);
                break;
            }
            Ok(Some(Key::Other)) | Ok(None) => {}
            Err(e) => {
                debug!("key read failed, retrying: {}", e);
                thread::sleep(READ_RETRY_DELAY);
            }
        }
    }
}

pub fn spawn_listener<K>(source: K, router: InputRouter, signal: Arc<TerminationSignal>) -> thread::JoinHandle<()>
where
    K: KeySource + Send + 'static,
{
    thread::spawn(move || listen(source, router, signal))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed script, then reports no key forever.
    pub(crate) struct ScriptedKeys {
        script: VecDeque<io::Result<Option<Key>>>,
    }

    impl ScriptedKeys {
        pub(crate) fn new(script: Vec<io::Result<Option<Key>>>) -> Self {
            ScriptedKeys { script: script.into() }
        }
    }

    impl KeySource for ScriptedKeys {
        fn next_key(&mut self) -> io::Result<Option<Key>> {
            match self.script.pop_front() {
                Some(next) => next,
                None => {
                    thread::sleep(Duration::from_millis(1));
                    Ok(None)
                }
            }
        }
    }

    #[test]
    fn router_keeps_only_the_latest_direction() {
        let router = InputRouter::new();
        assert_eq!(router.take(), None);

        router.publish(Direction::Up);
        router.publish(Direction::Left);

        assert_eq!(router.take(), Some(Direction::Left));
        assert_eq!(router.take(), None);
    }

    #[test]
    fn read_errors_are_swallowed_and_quit_raises() {
        let router = InputRouter::new();
        let signal = Arc::new(TerminationSignal::new());
        let keys = ScriptedKeys::new(vec![
            Err(io::Error::new(io::ErrorKind::Interrupted, "flaky")),
            Ok(Some(Key::Move(Direction::Down))),
            Ok(Some(Key::Other)),
            Ok(None),
            Ok(Some(Key::Quit)),
            Ok(Some(Key::Move(Direction::Left))),
        ]);

        listen(keys, router.clone(), Arc::clone(&signal));

        assert_eq!(signal.reason(), Some(GameOverReason::Quit));
        assert_eq!(router.take(), Some(Direction::Down));
    }

    #[test]
    fn listener_stops_once_game_is_over() {
        let router = InputRouter::new();
        let signal = Arc::new(TerminationSignal::new());
        let handle = spawn_listener(ScriptedKeys::new(vec![]), router, Arc::clone(&signal));

        signal.raise(GameOverReason::Wall);

        handle.join().unwrap();
        assert_eq!(signal.reason(), Some(GameOverReason::Wall));
    }
}
