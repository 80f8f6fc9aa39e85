use crate::state::{EventTx, SharedSim, SimState};
use kitchen_core::EventLevel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub async fn run_tick_loop(
    sim: SharedSim,
    event_tx: EventTx,
    paused: Arc<AtomicBool>,
    ticks_per_sec: f64,
    max_ticks: Option<u64>,
) {
    let mut interval = if ticks_per_sec > 0.0 {
        let mut iv = tokio::time::interval(Duration::from_secs_f64(1.0 / ticks_per_sec));
        iv.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Burst);
        Some(iv)
    } else {
        None
    };

    loop {
        if !paused.load(Ordering::Relaxed) {
            let (events, done) = {
                let mut guard = sim.lock();
                let now = guard.game_state.meta.tick;
                let mut commands = std::mem::take(&mut guard.pending);
                // Queued commands run on whichever tick processes them.
                for command in &mut commands {
                    command.execute_at_tick = now;
                }
                let SimState {
                    ref mut game_state,
                    ref content,
                    ref mut rng,
                    ..
                } = *guard;
                let events =
                    kitchen_core::tick(game_state, &commands, content, rng, EventLevel::Normal);

                let done = guard.game_state.finished.is_some()
                    || max_ticks.is_some_and(|max| guard.game_state.meta.tick >= max);
                (events, done)
            };

            let _ = event_tx.send(events);

            if done {
                tracing::info!("tick loop finished");
                break;
            }
        }

        if let Some(ref mut iv) = interval {
            iv.tick().await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}
