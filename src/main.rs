//! Headless game host (default binary).
//!
//! With the adapter enabled it serves the game to remote presentation
//! clients over TCP. With `MAHJONG_ADAPTER_DISABLED=1` it plays one level
//! with the greedy auto-player and exits.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vita_mahjong::adapter::{advice_source, Adapter, GameConfig, Session};
use vita_mahjong::autoplay::next_pick;
use vita_mahjong::core::{GameRng, GameState};
use vita_mahjong::types::TICK_MS;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GameConfig::from_env();
    let rng = config.seed.map(GameRng::new).unwrap_or_else(GameRng::from_entropy);

    let mut game = GameState::with_rng(rng, config.difficulty);
    game.set_language(config.language);
    game.set_theme(config.theme);
    game.set_commentary_live(config.live);
    info!(
        seed = game.seed(),
        difficulty = config.difficulty.as_str(),
        tiles = game.board().tiles().len(),
        "game ready"
    );

    match Adapter::start_from_env()? {
        Some(adapter) => {
            let session = Session::new(game, advice_source(&config));
            serve(adapter, session);
            Ok(())
        }
        None => {
            autoplay(game);
            Ok(())
        }
    }
}

fn serve(mut adapter: Adapter, mut session: Session) {
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();

    loop {
        while let Some(cmd) = adapter.try_recv() {
            for msg in session.handle(cmd) {
                adapter.send(msg);
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            for msg in session.step(elapsed_ms) {
                adapter.send(msg);
            }
        } else {
            thread::sleep(tick_duration - elapsed);
        }
    }
}

fn autoplay(mut game: GameState) {
    loop {
        if game.status().is_over() {
            break;
        }

        match next_pick(&game) {
            Some(tile) => {
                game.select(tile);
            }
            None if game.flights().is_empty() => {
                warn!(level = game.level(), "auto-player stuck");
                break;
            }
            None => {}
        }
        game.tick(TICK_MS);
    }

    info!(
        status = game.status().as_str(),
        score = game.score(),
        coins = game.coins(),
        seconds = game.elapsed_seconds(),
        "demo finished"
    );
}
