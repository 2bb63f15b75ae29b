use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use env_logger::Env;
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;

use term_snake::error::GameError;
use term_snake::game::{Board, GameConfig, GameLoop};
use term_snake::input::{spawn_listener, InputRouter};
use term_snake::signal::{GameOverReason, TerminationSignal};
use term_snake::term::{TermKeys, TermManager, TermRenderer};

fn main() -> Result<()> {
    // Silent unless RUST_LOG is set; redirect stderr when enabling it.
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();

    let config = GameConfig::default();
    let mut term = TermManager::new();
    term.check_size(config.height, config.width)?;

    term.setup().context("failed to prepare the terminal")?;
    let result = play(&config);
    term.restore().context("failed to restore the terminal")?;

    let (reason, score) = result?;
    println!("Game over! ({})", reason);
    println!("Score: {}", score);
    Ok(())
}

/// Runs one game to completion and returns why it ended and the final length.
fn play(config: &GameConfig) -> Result<(GameOverReason, usize)> {
    let board = Arc::new(Mutex::new(Board::new(config, StdRng::from_entropy())));
    let input = InputRouter::new();
    let signal = Arc::new(TerminationSignal::new());

    let ticker = GameLoop::new(Arc::clone(&board), input.clone(), Arc::clone(&signal), config.tick)
        .spawn(TermRenderer::new(config.height, config.width));
    let listener = spawn_listener(TermKeys, input, Arc::clone(&signal));

    let reason = signal.wait();

    ticker
        .join()
        .map_err(|_| GameError::TickThreadPanicked)?
        .context("game loop stopped")?;
    if listener.join().is_err() {
        warn!("key listener panicked");
    }

    let score = board.lock().unwrap_or_else(PoisonError::into_inner).score();
    Ok((reason, score))
}
