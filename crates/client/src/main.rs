//! Dungeon client binary.
//!
//! Plays a scripted session against the demo board on a single-threaded
//! executor and logs every enemy turn.
//!
//! ```bash
//! MOVEMENT_MODE=constrained DEMO_TURNS=12 RUST_LOG=debug cargo run -p dungeon-client
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use animation_sequencer::{AnimationScheduler, HostClock, TokioHost};
use anyhow::Result;
use dungeon_client::{ClientConfig, DemoBoard, HitFlash, logging};
use runtime::{TurnEvent, TurnManager, TurnOutcome};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::LocalSet;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    LocalSet::new().block_on(&runtime, run(config))
}

async fn run(config: ClientConfig) -> Result<()> {
    tracing::info!("Starting Dungeon client");
    tracing::info!("Movement mode: {}", config.turn.movement_mode());
    tracing::info!("Game seed: {}", config.turn.game.game_seed);

    let host: Rc<dyn HostClock> = Rc::new(TokioHost::with_frame_interval(config.host.frame_interval));
    let scheduler = AnimationScheduler::new(host);
    let board = Rc::new(RefCell::new(DemoBoard::new()?));
    let manager = TurnManager::new(Rc::clone(&board), scheduler.clone(), config.turn.clone())?;

    let mut events = manager.subscribe();
    let event_log = tokio::task::spawn_local(async move {
        loop {
            match events.recv().await {
                Ok(TurnEvent::Stalemate { turn }) => tracing::info!(turn, "stalemate"),
                Ok(event) => tracing::debug!(?event, "turn event"),
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "turn events dropped"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    tracing::debug!("\n{}", board.borrow().render());
    let flash = HitFlash::default();
    let toggles = Rc::new(Cell::new(0));

    for _ in 0..config.demo_turns {
        let player = board.borrow_mut().advance_player();
        tracing::info!(%player, "player moved");
        if board.borrow().route_wrapped() {
            manager.enter_zone();
        }

        match manager.handle_turn_completion().await {
            TurnOutcome::Completed(summary) => {
                tracing::info!(
                    turn = summary.turn,
                    moved = summary.moved,
                    skipped = summary.skipped,
                    frozen = manager.freeze_status().show_frozen,
                    "turn resolved"
                );
                if summary.player_struck {
                    tokio::task::spawn_local(
                        flash.sequence(&scheduler, Rc::clone(&toggles)).start(),
                    );
                }
            }
            TurnOutcome::Ignored => tracing::warn!("turn ignored"),
        }
        tracing::debug!("\n{}", board.borrow().render());
    }

    let cancelled = scheduler.cancel_all();
    if cancelled > 0 {
        tracing::debug!(cancelled, "pending effects cancelled");
    }

    // Closes the event channel.
    drop(manager);
    event_log.await?;

    tracing::info!(
        hits = board.borrow().hits_taken(),
        "Client shutdown complete"
    );
    Ok(())
}
