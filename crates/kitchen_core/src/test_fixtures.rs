//! Shared test fixtures for kitchen_core and downstream crates.
//!
//! `base_content()` provides a full-featured `GameContent` (three ingredient
//! kinds, pot and pan devices, three non-overlapping recipes).
//! `base_state()` builds a small bordered kitchen with every station variant
//! and two chefs standing side by side.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;
use crate::timer::TimerQueue;
use crate::types::{
    Chef, ChefActivity, ChefId, Constants, Counters, DeviceDef, DeviceItem, Direction, GameContent,
    GameState, IngredientClass, IngredientDef, IngredientFilter, MetaState, PlacedStation,
    PlateItem, Position, RecipeDef, SoundCue, Station, Tile, TimerEffect,
};

// Station coordinates in the fixture kitchen, for test readability.
pub const TOMATO_STORAGE: Position = Position { x: 1, y: 1 };
pub const CUTTING: Position = Position { x: 2, y: 1 };
pub const POT_STATION: Position = Position { x: 3, y: 1 };
pub const ASSEMBLY: Position = Position { x: 4, y: 1 };
pub const SERVING: Position = Position { x: 5, y: 1 };
pub const RICE_STORAGE: Position = Position { x: 6, y: 1 };
pub const MEAT_STORAGE: Position = Position { x: 7, y: 1 };
pub const WASHING: Position = Position { x: 1, y: 4 };
pub const PLATE_STORAGE: Position = Position { x: 2, y: 4 };
pub const PAN_STATION: Position = Position { x: 3, y: 4 };
pub const TRASH: Position = Position { x: 4, y: 4 };
pub const LUCKY: Position = Position { x: 5, y: 4 };

/// Full-featured content: tomato/rice/meat, pot (boil, capacity 3) and pan
/// (fry, capacity 1), three non-overlapping recipes, reference balance.
pub fn base_content() -> GameContent {
    GameContent {
        content_version: "test".to_string(),
        ingredients: vec![
            IngredientDef {
                id: "ing_tomato".to_string(),
                display_name: "Tomato".to_string(),
                class: IngredientClass::Produce,
                choppable: true,
            },
            IngredientDef {
                id: "ing_rice".to_string(),
                display_name: "Rice".to_string(),
                class: IngredientClass::Starch,
                choppable: false,
            },
            IngredientDef {
                id: "ing_meat".to_string(),
                display_name: "Meat".to_string(),
                class: IngredientClass::Protein,
                choppable: true,
            },
        ],
        devices: vec![
            DeviceDef {
                id: "device_pot".to_string(),
                name: "Boiling Pot".to_string(),
                capacity: 3,
                cook_ticks: 12,
                burn_ticks: 12,
                accepts: IngredientFilter::RawOfClass {
                    class: IngredientClass::Starch,
                },
                sound: SoundCue::Boil,
            },
            DeviceDef {
                id: "device_pan".to_string(),
                name: "Frying Pan".to_string(),
                capacity: 1,
                cook_ticks: 12,
                burn_ticks: 12,
                accepts: IngredientFilter::ChoppedNotClass {
                    class: IngredientClass::Starch,
                },
                sound: SoundCue::Fry,
            },
        ],
        recipes: vec![
            RecipeDef {
                dish: "dish_salad".to_string(),
                name: "Tomato Salad".to_string(),
                requires: vec!["ing_tomato".to_string()],
            },
            RecipeDef {
                dish: "dish_rice_bowl".to_string(),
                name: "Rice Bowl".to_string(),
                requires: vec!["ing_rice".to_string()],
            },
            RecipeDef {
                dish: "dish_steak_meal".to_string(),
                name: "Steak Meal".to_string(),
                requires: vec!["ing_meat".to_string(), "ing_tomato".to_string()],
            },
        ],
        constants: Constants {
            chop_ticks: 3,
            wash_scrubs: 3,
            order_tick_interval_ticks: 1,
            order_time_budget_ticks: 60,
            max_active_orders: 4,
            order_reward: 20,
            order_penalty: 10,
            failed_streak_threshold: 3,
            match_clock_ticks: 180,
            plate_count: 4,
            lucky_cooldown_ticks: 10,
        },
    }
}

fn fixture_grid(stations: &[Position]) -> Grid {
    let width = 9;
    let height = 6;
    let mut tiles = vec![Tile::Floor; (width * height) as usize];
    let mut set = |x: i32, y: i32, tile: Tile| {
        tiles[(y * width + x) as usize] = tile;
    };
    for x in 0..width {
        set(x, 0, Tile::Wall);
        set(x, height - 1, Tile::Wall);
    }
    for y in 0..height {
        set(0, y, Tile::Wall);
        set(width - 1, y, Tile::Wall);
    }
    for pos in stations {
        set(pos.x, pos.y, Tile::Station);
    }
    Grid::new(width, height, tiles)
}

fn fixture_chef(id: &str, name: &str, position: Position) -> (ChefId, Chef) {
    let chef_id = ChefId(id.to_string());
    (
        chef_id.clone(),
        Chef {
            id: chef_id,
            name: name.to_string(),
            position,
            facing: Direction::Up,
            held: None,
            activity: ChefActivity::Idle,
        },
    )
}

/// Standard state: bordered 9x6 kitchen, every station variant, two chefs at
/// (1,2) and (2,2), empty order queue, armed order tick, full match clock.
pub fn base_state(content: &GameContent) -> GameState {
    let stations = vec![
        PlacedStation {
            position: TOMATO_STORAGE,
            station: Station::IngredientStorage {
                kind: "ing_tomato".to_string(),
            },
        },
        PlacedStation {
            position: CUTTING,
            station: Station::Cutting { slot: None },
        },
        PlacedStation {
            position: POT_STATION,
            station: Station::Cooking {
                device: Some(DeviceItem::new("device_pot")),
            },
        },
        PlacedStation {
            position: ASSEMBLY,
            station: Station::Assembly { slot: None },
        },
        PlacedStation {
            position: SERVING,
            station: Station::Serving {
                dirty_plates: Vec::new(),
            },
        },
        PlacedStation {
            position: RICE_STORAGE,
            station: Station::IngredientStorage {
                kind: "ing_rice".to_string(),
            },
        },
        PlacedStation {
            position: MEAT_STORAGE,
            station: Station::IngredientStorage {
                kind: "ing_meat".to_string(),
            },
        },
        PlacedStation {
            position: WASHING,
            station: Station::Washing { slot: None },
        },
        PlacedStation {
            position: PLATE_STORAGE,
            station: Station::PlateStorage {
                stack: vec![PlateItem::clean(); content.constants.plate_count],
            },
        },
        PlacedStation {
            position: PAN_STATION,
            station: Station::Cooking {
                device: Some(DeviceItem::new("device_pan")),
            },
        },
        PlacedStation {
            position: TRASH,
            station: Station::Trash,
        },
        PlacedStation {
            position: LUCKY,
            station: Station::Lucky { cooldown_left: 0 },
        },
    ];
    let grid = fixture_grid(
        &stations
            .iter()
            .map(|p| p.position)
            .collect::<Vec<Position>>(),
    );

    let mut timers = TimerQueue::new();
    timers.schedule_every(0, content.constants.order_tick_interval_ticks, TimerEffect::OrderTick);

    GameState {
        meta: MetaState {
            tick: 0,
            seed: 42,
            schema_version: 1,
            content_version: content.content_version.clone(),
        },
        grid,
        stations,
        chefs: BTreeMap::from([
            fixture_chef("chef_0001", "Ada", Position::new(1, 2)),
            fixture_chef("chef_0002", "Grace", Position::new(2, 2)),
        ]),
        orders: Vec::new(),
        timers,
        score: 0,
        failed_streak: 0,
        clock_left: content.constants.match_clock_ticks,
        finished: None,
        counters: Counters {
            next_event_id: 0,
            next_command_id: 0,
            next_cook_token: 0,
        },
    }
}

/// Deterministic RNG seeded with 42.
pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
