use super::*;
use crate::test_fixtures::{
    base_content, base_state, make_rng, ASSEMBLY, CUTTING, LUCKY, PAN_STATION, PLATE_STORAGE,
    POT_STATION, SERVING, TOMATO_STORAGE,
};
use rand_chacha::ChaCha8Rng;

mod cooking;
mod prep;

// --- Shared test helpers ------------------------------------------------

fn chef1() -> ChefId {
    ChefId("chef_0001".to_string())
}

fn chef2() -> ChefId {
    ChefId("chef_0002".to_string())
}

fn envelope(state: &GameState, n: u64, command: Command) -> CommandEnvelope {
    CommandEnvelope {
        id: CommandId(format!("cmd_{n:06}")),
        issued_tick: state.meta.tick,
        execute_at_tick: state.meta.tick,
        command,
    }
}

fn run_tick(
    state: &mut GameState,
    commands: &[CommandEnvelope],
    content: &GameContent,
    rng: &mut ChaCha8Rng,
) -> Vec<EventEnvelope> {
    tick(state, commands, content, rng, EventLevel::Normal)
}

/// Run ticks up to (not including) `until_tick`, issuing each scripted
/// command on its tick. Returns every event produced along the way.
fn run_script(
    state: &mut GameState,
    content: &GameContent,
    rng: &mut ChaCha8Rng,
    script: &[(u64, Command)],
    until_tick: u64,
) -> Vec<EventEnvelope> {
    let mut all = Vec::new();
    let mut n = 0;
    while state.meta.tick < until_tick {
        let now = state.meta.tick;
        let batch: Vec<CommandEnvelope> = script
            .iter()
            .filter(|(t, _)| *t == now)
            .map(|(_, command)| {
                n += 1;
                CommandEnvelope {
                    id: CommandId(format!("cmd_{n:06}")),
                    issued_tick: now,
                    execute_at_tick: now,
                    command: command.clone(),
                }
            })
            .collect();
        all.extend(tick(state, &batch, content, rng, EventLevel::Normal));
    }
    all
}

fn put_chef(state: &mut GameState, chef: &ChefId, position: Position, facing: Direction) {
    let chef = state.chefs.get_mut(chef).unwrap();
    chef.position = position;
    chef.facing = facing;
}

fn give(state: &mut GameState, chef: &ChefId, item: Item) {
    state.chefs.get_mut(chef).unwrap().held = Some(item);
}

fn held<'a>(state: &'a GameState, chef: &ChefId) -> Option<&'a Item> {
    state.chefs[chef].held.as_ref()
}

fn station(state: &GameState, position: Position) -> &Station {
    state.station_at(position).unwrap()
}

fn rejected_with(events: &[EventEnvelope], reason: &RejectReason) -> bool {
    events.iter().any(
        |e| matches!(&e.event, Event::CommandRejected { reason: r, .. } if r == reason),
    )
}

fn raw(kind: &str) -> Item {
    Item::Ingredient(IngredientItem::raw(kind.to_string()))
}

fn chopped(kind: &str) -> Item {
    Item::Ingredient(IngredientItem {
        kind: kind.to_string(),
        state: PrepState::Chopped,
    })
}

fn device_with(def_id: &str, contents: &[(&str, PrepState)]) -> DeviceItem {
    let mut device = DeviceItem::new(def_id.to_string());
    for (kind, state) in contents {
        device.contents.push(IngredientItem {
            kind: (*kind).to_string(),
            state: *state,
        });
    }
    device
}

fn dish(dish_id: &str, ingredients: &[&str]) -> Item {
    Item::Dish(DishItem {
        dish: dish_id.to_string(),
        ingredients: ingredients
            .iter()
            .map(|kind| IngredientItem {
                kind: (*kind).to_string(),
                state: PrepState::Chopped,
            })
            .collect(),
    })
}
