use rand::Rng;

use crate::timer::TimerEntry;
use crate::types::{
    station_at_mut, CommandEnvelope, EventEnvelope, EventLevel, FinishReason, GameContent,
    GameState, Position, SoundCue, Station, TimerEffect,
};
use crate::{chef, commands, device, orders};

/// Advance the simulation by one tick (one simulated second).
///
/// Order of operations:
/// 1. Apply commands scheduled for this tick.
/// 2. Resolve chef busy activities (chop completion, wash scrubs).
/// 3. Drain due timer entries (cook, burn, order tick, lucky cooldown).
/// 4. Decrement the match clock and evaluate termination.
/// 5. Increment the tick counter.
///
/// A finished match is inert: commands are ignored and no events fire.
///
/// Returns all events produced this tick.
pub fn tick(
    state: &mut GameState,
    commands: &[CommandEnvelope],
    content: &GameContent,
    rng: &mut impl Rng,
    event_level: EventLevel,
) -> Vec<EventEnvelope> {
    if state.finished.is_some() {
        return Vec::new();
    }
    let mut events = Vec::new();

    commands::apply_commands(state, commands, content, rng, &mut events);
    chef::resolve_activities(state, &mut events);
    drain_timers(state, content, rng, event_level, &mut events);
    advance_clock(state, content, &mut events);

    state.meta.tick += 1;
    events
}

fn drain_timers(
    state: &mut GameState,
    content: &GameContent,
    rng: &mut impl Rng,
    event_level: EventLevel,
    events: &mut Vec<EventEnvelope>,
) {
    let current_tick = state.meta.tick;
    for entry in state.timers.take_due(current_tick) {
        if event_level == EventLevel::Debug {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::TimerFired {
                    timer: entry.id,
                    effect: entry.effect.clone(),
                },
            );
            events.push(event);
        }
        apply_timer_entry(state, &entry, content, rng, events);
    }
}

fn apply_timer_entry(
    state: &mut GameState,
    entry: &TimerEntry,
    content: &GameContent,
    rng: &mut impl Rng,
    events: &mut Vec<EventEnvelope>,
) {
    match entry.effect {
        TimerEffect::CookDone {
            station,
            generation,
        } => apply_cook_done(state, station, generation, events),
        TimerEffect::BurnContents {
            station,
            generation,
        } => apply_burn(state, station, generation, events),
        TimerEffect::OrderTick => orders::run_order_tick(state, content, rng, events),
        TimerEffect::LuckyCooldown { station } => {
            let mut finished = true;
            if let Some(Station::Lucky { cooldown_left }) =
                station_at_mut(&mut state.stations, station)
            {
                *cooldown_left = cooldown_left.saturating_sub(1);
                finished = *cooldown_left == 0;
            }
            if finished {
                state.timers.cancel(entry.id);
                let event = crate::emit(
                    &mut state.counters,
                    state.meta.tick,
                    crate::Event::LuckyReady { station },
                );
                events.push(event);
            }
        }
    }
}

/// Contents finish cooking, unless the batch this timer was scheduled for is
/// no longer live on the station, in which case the entry is dropped
/// silently. Tokens are state-wide unique, so a swapped-in device can never
/// satisfy a stale entry.
fn apply_cook_done(
    state: &mut GameState,
    station: Position,
    generation: u64,
    events: &mut Vec<EventEnvelope>,
) {
    let mut finished_device = None;
    if let Some(Station::Cooking { device: Some(dev) }) =
        station_at_mut(&mut state.stations, station)
    {
        if dev.cooking && dev.generation == generation {
            device::finish_cooking(dev);
            finished_device = Some(dev.def_id.clone());
        }
    }
    if let Some(def_id) = finished_device {
        let event = crate::emit(
            &mut state.counters,
            state.meta.tick,
            crate::Event::CookFinished {
                station,
                device: def_id,
            },
        );
        events.push(event);
    }
}

fn apply_burn(
    state: &mut GameState,
    station: Position,
    generation: u64,
    events: &mut Vec<EventEnvelope>,
) {
    let mut burned_device = None;
    if let Some(Station::Cooking { device: Some(dev) }) =
        station_at_mut(&mut state.stations, station)
    {
        if dev.cooking && dev.generation == generation {
            device::burn_contents(dev);
            burned_device = Some(dev.def_id.clone());
        }
    }
    if let Some(def_id) = burned_device {
        let event = crate::emit(
            &mut state.counters,
            state.meta.tick,
            crate::Event::ContentsBurned {
                station,
                device: def_id,
            },
        );
        events.push(event);
    }
}

fn advance_clock(state: &mut GameState, content: &GameContent, events: &mut Vec<EventEnvelope>) {
    state.clock_left = state.clock_left.saturating_sub(1);

    let reason = if state.clock_left == 0 {
        Some(FinishReason::ClockExpired)
    } else if state.failed_streak >= content.constants.failed_streak_threshold {
        Some(FinishReason::FailedStreak)
    } else {
        None
    };
    let Some(reason) = reason else {
        return;
    };

    state.finished = Some(reason);
    let finish = crate::emit(
        &mut state.counters,
        state.meta.tick,
        crate::Event::GameFinished {
            reason,
            score: state.score,
        },
    );
    events.push(finish);
    if reason == FinishReason::ClockExpired && state.score > 0 {
        let cue = crate::emit(
            &mut state.counters,
            state.meta.tick,
            crate::Event::SoundCue { cue: SoundCue::Win },
        );
        events.push(cue);
    }
}
