//! Command validation and application.
//!
//! Every player command resolves against one chef and, except for movement,
//! the station that chef is facing. Invalid commands are silent no-ops
//! reported through `CommandRejected` events; simulation state is untouched.

use rand::Rng;

use crate::orders;
use crate::recipes;
use crate::station::{self, PickOutcome, PlaceOutcome};
use crate::types::{
    station_at_mut, ChefActivity, ChefId, Command, CommandEnvelope, CommandId, Direction,
    EventEnvelope, GameContent, GameState, Item, LuckyOutcome, PlateItem, PlateState, Position,
    PrepState, RejectReason, SoundCue, Station, TimerEffect,
};

/// Lucky-spin side-effect balance.
const LUCKY_SCORE_BONUS: i64 = 15;
const LUCKY_BONUS_TICKS: u64 = 10;

pub(crate) fn apply_commands(
    state: &mut GameState,
    commands: &[CommandEnvelope],
    content: &GameContent,
    rng: &mut impl Rng,
    events: &mut Vec<EventEnvelope>,
) {
    let current_tick = state.meta.tick;
    for envelope in commands {
        if envelope.execute_at_tick != current_tick {
            continue;
        }
        match &envelope.command {
            Command::Move { chef, direction } => {
                handle_move(state, &envelope.id, chef, *direction, events);
            }
            Command::Pick { chef } => handle_pick(state, &envelope.id, chef, events),
            Command::Place { chef } => handle_place(state, &envelope.id, chef, content, events),
            Command::Interact { chef } => {
                handle_interact(state, &envelope.id, chef, content, rng, events);
            }
            Command::Throw { chef } => handle_throw(state, &envelope.id, chef, events),
        }
    }
}

fn reject(
    state: &mut GameState,
    command_id: &CommandId,
    reason: RejectReason,
    events: &mut Vec<EventEnvelope>,
) {
    let event = crate::emit(
        &mut state.counters,
        state.meta.tick,
        crate::Event::CommandRejected {
            command_id: command_id.clone(),
            reason,
        },
    );
    events.push(event);
}

/// Chef lookup plus the busy check shared by every command.
fn ready_chef(
    state: &mut GameState,
    command_id: &CommandId,
    chef_id: &ChefId,
    events: &mut Vec<EventEnvelope>,
) -> Option<(Position, Direction)> {
    let Some(chef) = state.chefs.get(chef_id) else {
        reject(state, command_id, RejectReason::UnknownChef, events);
        return None;
    };
    if chef.is_busy() {
        reject(state, command_id, RejectReason::Busy, events);
        return None;
    }
    Some((chef.position, chef.facing))
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

fn handle_move(
    state: &mut GameState,
    command_id: &CommandId,
    chef_id: &ChefId,
    direction: Direction,
    events: &mut Vec<EventEnvelope>,
) {
    let Some((from, facing)) = ready_chef(state, command_id, chef_id, events) else {
        return;
    };
    let current_tick = state.meta.tick;

    // Facing updates on any non-busy attempt (turn in place); position only
    // when every check passes.
    if facing != direction {
        if let Some(chef) = state.chefs.get_mut(chef_id) {
            chef.facing = direction;
        }
    }

    let destination = from.step(direction);
    let failure = if !state.grid.in_bounds(destination) {
        Some(RejectReason::OutOfBounds)
    } else if !state.grid.is_walkable(destination) {
        Some(RejectReason::Blocked)
    } else if state
        .chefs
        .values()
        .any(|other| other.id != *chef_id && other.position == destination)
    {
        // Checked against current positions: two chefs can never swap cells
        // through each other within one tick.
        Some(RejectReason::Occupied)
    } else {
        None
    };

    if let Some(reason) = failure {
        if facing != direction {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::ChefTurned {
                    chef: chef_id.clone(),
                    facing: direction,
                },
            );
            events.push(event);
        }
        reject(state, command_id, reason, events);
        return;
    }

    if let Some(chef) = state.chefs.get_mut(chef_id) {
        chef.position = destination;
    }
    let event = crate::emit(
        &mut state.counters,
        current_tick,
        crate::Event::ChefMoved {
            chef: chef_id.clone(),
            from,
            to: destination,
            facing: direction,
        },
    );
    events.push(event);
}

// ---------------------------------------------------------------------------
// Pick
// ---------------------------------------------------------------------------

fn handle_pick(
    state: &mut GameState,
    command_id: &CommandId,
    chef_id: &ChefId,
    events: &mut Vec<EventEnvelope>,
) {
    let Some((position, facing)) = ready_chef(state, command_id, chef_id, events) else {
        return;
    };
    if state.chefs[chef_id].held.is_some() {
        reject(state, command_id, RejectReason::HandsFull, events);
        return;
    }
    let target = position.step(facing);
    take_from_station(state, command_id, chef_id, target, events);
}

/// Shared by `pick` and the implicit pick of the default `interact` branch.
fn take_from_station(
    state: &mut GameState,
    command_id: &CommandId,
    chef_id: &ChefId,
    target: Position,
    events: &mut Vec<EventEnvelope>,
) {
    let Some(station) = station_at_mut(&mut state.stations, target) else {
        reject(state, command_id, RejectReason::NoStation, events);
        return;
    };
    match station::pick_item(station) {
        PickOutcome::Picked(item) => {
            let label = item.label();
            if let Some(chef) = state.chefs.get_mut(chef_id) {
                chef.held = Some(item);
            }
            let event = crate::emit(
                &mut state.counters,
                state.meta.tick,
                crate::Event::ItemPicked {
                    chef: chef_id.clone(),
                    station: target,
                    item: label,
                },
            );
            events.push(event);
        }
        PickOutcome::Empty(reason) => reject(state, command_id, reason, events),
    }
}

// ---------------------------------------------------------------------------
// Place
// ---------------------------------------------------------------------------

fn handle_place(
    state: &mut GameState,
    command_id: &CommandId,
    chef_id: &ChefId,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) {
    let Some((position, facing)) = ready_chef(state, command_id, chef_id, events) else {
        return;
    };
    let target = position.step(facing);
    if state.station_at(target).is_none() {
        reject(state, command_id, RejectReason::NoStation, events);
        return;
    }
    let Some(item) = state.chefs.get_mut(chef_id).and_then(|c| c.held.take()) else {
        reject(state, command_id, RejectReason::HandsEmpty, events);
        return;
    };
    let label = item.label();

    let (returned, outcome) = {
        let GameState {
            stations, counters, ..
        } = &mut *state;
        let station = station_at_mut(stations, target).expect("checked above");
        station::place_item(station, item, content, counters)
    };
    if let Some(item) = returned {
        if let Some(chef) = state.chefs.get_mut(chef_id) {
            chef.held = Some(item);
        }
    }
    let current_tick = state.meta.tick;

    match outcome {
        PlaceOutcome::Stored | PlaceOutcome::JoinedCook { .. } => {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::ItemPlaced {
                    chef: chef_id.clone(),
                    station: target,
                    item: label,
                },
            );
            events.push(event);
        }
        PlaceOutcome::StartedCooking {
            device,
            generation,
            cook_ticks,
            burn_ticks,
            sound,
        } => {
            state.timers.schedule_at(
                current_tick + cook_ticks,
                TimerEffect::CookDone {
                    station: target,
                    generation,
                },
            );
            state.timers.schedule_at(
                current_tick + cook_ticks + burn_ticks,
                TimerEffect::BurnContents {
                    station: target,
                    generation,
                },
            );
            for event in [
                crate::Event::ItemPlaced {
                    chef: chef_id.clone(),
                    station: target,
                    item: label,
                },
                crate::Event::CookStarted {
                    station: target,
                    device,
                },
                crate::Event::SoundCue { cue: sound },
            ] {
                let envelope = crate::emit(&mut state.counters, current_tick, event);
                events.push(envelope);
            }
        }
        PlaceOutcome::Poured { count, assembled } => {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::PouredOntoPlate {
                    chef: chef_id.clone(),
                    station: target,
                    count,
                },
            );
            events.push(event);
            emit_assembled(state, target, assembled, events);
        }
        PlaceOutcome::Plated { kind, assembled } => {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::IngredientPlated {
                    chef: chef_id.clone(),
                    station: target,
                    kind,
                },
            );
            events.push(event);
            emit_assembled(state, target, assembled, events);
        }
        PlaceOutcome::DeviceEmptied { device } => {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::DeviceEmptied {
                    chef: chef_id.clone(),
                    device,
                },
            );
            events.push(event);
        }
        PlaceOutcome::Destroyed => {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::ItemTrashed {
                    chef: chef_id.clone(),
                    item: label,
                },
            );
            events.push(event);
        }
        PlaceOutcome::Rejected(reason) => reject(state, command_id, reason, events),
    }
}

fn emit_assembled(
    state: &mut GameState,
    station: Position,
    assembled: Option<crate::types::DishId>,
    events: &mut Vec<EventEnvelope>,
) {
    if let Some(dish) = assembled {
        let event = crate::emit(
            &mut state.counters,
            state.meta.tick,
            crate::Event::DishAssembled { station, dish },
        );
        events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Interact
// ---------------------------------------------------------------------------

/// What an `interact` resolves to, classified up front so the station borrow
/// is released before any mutation.
enum InteractAction {
    StartCut,
    Tend,
    StartWash,
    Serve,
    LuckySpin { ready: bool },
    DefaultPick,
}

fn classify_interact(station: &Station, content: &GameContent) -> InteractAction {
    match station {
        Station::Cutting { slot: Some(ing) }
            if ing.state == PrepState::Raw
                && content.ingredient(&ing.kind).is_some_and(|d| d.choppable) =>
        {
            InteractAction::StartCut
        }
        Station::Cooking { device: Some(_) } => InteractAction::Tend,
        Station::Washing { slot: Some(plate) } if plate.state == PlateState::Dirty => {
            InteractAction::StartWash
        }
        Station::Serving { .. } => InteractAction::Serve,
        Station::Lucky { cooldown_left } => InteractAction::LuckySpin {
            ready: *cooldown_left == 0,
        },
        _ => InteractAction::DefaultPick,
    }
}

fn handle_interact(
    state: &mut GameState,
    command_id: &CommandId,
    chef_id: &ChefId,
    content: &GameContent,
    rng: &mut impl Rng,
    events: &mut Vec<EventEnvelope>,
) {
    let Some((position, facing)) = ready_chef(state, command_id, chef_id, events) else {
        return;
    };
    let target = position.step(facing);
    let current_tick = state.meta.tick;

    let action = match state.station_at(target) {
        Some(station) => classify_interact(station, content),
        None => {
            reject(state, command_id, RejectReason::NoStation, events);
            return;
        }
    };

    match action {
        InteractAction::StartCut => {
            let until_tick = current_tick + content.constants.chop_ticks;
            if let Some(chef) = state.chefs.get_mut(chef_id) {
                chef.activity = ChefActivity::Cutting {
                    station: target,
                    until_tick,
                };
            }
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::ChopStarted {
                    chef: chef_id.clone(),
                    station: target,
                },
            );
            events.push(event);
        }
        // Tending the stove is momentary: the cook timer lives on the
        // device, not the chef.
        InteractAction::Tend => {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::StoveTended {
                    chef: chef_id.clone(),
                    station: target,
                },
            );
            events.push(event);
        }
        InteractAction::StartWash => {
            let scrubs = content.constants.wash_scrubs;
            if let Some(chef) = state.chefs.get_mut(chef_id) {
                chef.activity = ChefActivity::Washing {
                    station: target,
                    scrubs_left: scrubs,
                };
            }
            for event in [
                crate::Event::WashStarted {
                    chef: chef_id.clone(),
                    station: target,
                },
                crate::Event::SoundCue {
                    cue: SoundCue::Wash,
                },
            ] {
                let envelope = crate::emit(&mut state.counters, current_tick, event);
                events.push(envelope);
            }
        }
        InteractAction::Serve => {
            handle_serve(state, command_id, chef_id, target, content, events);
        }
        InteractAction::LuckySpin { ready: false } => {
            reject(state, command_id, RejectReason::LuckyCoolingDown, events);
        }
        InteractAction::LuckySpin { ready: true } => {
            handle_lucky_spin(state, chef_id, target, content, rng, events);
        }
        // Default: an implicit pick from whatever the station offers, only
        // legal with free hands.
        InteractAction::DefaultPick => {
            if state.chefs[chef_id].held.is_some() {
                reject(state, command_id, RejectReason::HandsFull, events);
                return;
            }
            take_from_station(state, command_id, chef_id, target, events);
        }
    }
}

fn handle_serve(
    state: &mut GameState,
    command_id: &CommandId,
    chef_id: &ChefId,
    target: Position,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) {
    let current_tick = state.meta.tick;
    let check = match state.chefs.get(chef_id).and_then(|c| c.held.as_ref()) {
        None => Err(RejectReason::HandsEmpty),
        Some(Item::Dish(dish)) => {
            let complete = content
                .recipe(&dish.dish)
                .is_some_and(|r| recipes::match_ingredients(r, &dish.ingredients));
            if complete {
                Ok(())
            } else {
                Err(RejectReason::IncompleteDish)
            }
        }
        Some(_) => Err(RejectReason::StationRefused),
    };
    if let Err(reason) = check {
        reject(state, command_id, reason, events);
        return;
    }

    let Some(Item::Dish(dish)) = state.chefs.get_mut(chef_id).and_then(|c| c.held.take()) else {
        unreachable!("held dish checked above");
    };

    let constants = &content.constants;
    match orders::take_matching(state, &dish.dish) {
        Some(order) => {
            state.score += constants.order_reward;
            state.failed_streak = 0;
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::DishServed {
                    chef: chef_id.clone(),
                    order: order.id,
                    dish: dish.dish,
                    reward: constants.order_reward,
                    score_after: state.score,
                },
            );
            events.push(event);
        }
        None => {
            state.score -= constants.order_penalty;
            state.failed_streak += 1;
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::SubmitMissed {
                    chef: chef_id.clone(),
                    dish: dish.dish,
                    penalty: constants.order_penalty,
                    score_after: state.score,
                },
            );
            events.push(event);
        }
    }

    // The served plate comes back dirty: somebody has to wash it.
    if let Some(Station::Serving { dirty_plates }) = station_at_mut(&mut state.stations, target) {
        dirty_plates.push(PlateItem::dirty());
    }
}

fn handle_lucky_spin(
    state: &mut GameState,
    chef_id: &ChefId,
    target: Position,
    content: &GameContent,
    rng: &mut impl Rng,
    events: &mut Vec<EventEnvelope>,
) {
    let current_tick = state.meta.tick;
    let outcome = match rng.gen_range(0..4u8) {
        0 => LuckyOutcome::ScoreBonus {
            amount: LUCKY_SCORE_BONUS,
        },
        1 => LuckyOutcome::BonusTime {
            ticks: LUCKY_BONUS_TICKS,
        },
        2 => LuckyOutcome::FreePlate,
        _ => LuckyOutcome::Nothing,
    };

    match &outcome {
        LuckyOutcome::ScoreBonus { amount } => state.score += amount,
        LuckyOutcome::BonusTime { ticks } => state.clock_left += ticks,
        LuckyOutcome::FreePlate => {
            let storage = state
                .stations
                .iter_mut()
                .find_map(|p| match &mut p.station {
                    Station::PlateStorage { stack } => Some(stack),
                    _ => None,
                });
            if let Some(stack) = storage {
                stack.push(PlateItem::clean());
            }
        }
        LuckyOutcome::Nothing => {}
    }

    if let Some(Station::Lucky { cooldown_left }) = station_at_mut(&mut state.stations, target) {
        *cooldown_left = content.constants.lucky_cooldown_ticks;
    }
    state
        .timers
        .schedule_every(current_tick, 1, TimerEffect::LuckyCooldown { station: target });

    for event in [
        crate::Event::LuckySpin {
            chef: chef_id.clone(),
            station: target,
            outcome,
        },
        crate::Event::SoundCue {
            cue: SoundCue::Spin,
        },
    ] {
        let envelope = crate::emit(&mut state.counters, current_tick, event);
        events.push(envelope);
    }
}

// ---------------------------------------------------------------------------
// Throw
// ---------------------------------------------------------------------------

/// Throwing discards the held item in place: trash-in-hand semantics, so a
/// held device only loses its contents.
fn handle_throw(
    state: &mut GameState,
    command_id: &CommandId,
    chef_id: &ChefId,
    events: &mut Vec<EventEnvelope>,
) {
    if ready_chef(state, command_id, chef_id, events).is_none() {
        return;
    }
    let Some(item) = state.chefs.get_mut(chef_id).and_then(|c| c.held.take()) else {
        reject(state, command_id, RejectReason::HandsEmpty, events);
        return;
    };
    let current_tick = state.meta.tick;
    match item {
        Item::Device(mut dev) => {
            crate::device::clear(&mut dev);
            let def_id = dev.def_id.clone();
            if let Some(chef) = state.chefs.get_mut(chef_id) {
                chef.held = Some(Item::Device(dev));
            }
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::DeviceEmptied {
                    chef: chef_id.clone(),
                    device: def_id,
                },
            );
            events.push(event);
        }
        other => {
            let event = crate::emit(
                &mut state.counters,
                current_tick,
                crate::Event::ItemTrashed {
                    chef: chef_id.clone(),
                    item: other.label(),
                },
            );
            events.push(event);
        }
    }
}
