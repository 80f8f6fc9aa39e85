//! Content loading and kitchen construction shared between kitchen_cli and
//! kitchen_daemon.

use anyhow::{Context, Result};
use kitchen_core::{
    Chef, ChefActivity, ChefId, Constants, Counters, DeviceDef, DeviceItem, Direction, GameContent,
    GameState, Grid, IngredientDef, MetaState, PlacedStation, PlateItem, Position, RecipeDef,
    Station, Tile, TimerEffect, TimerQueue,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

#[derive(Deserialize)]
struct IngredientsFile {
    content_version: String,
    ingredients: Vec<IngredientDef>,
}

#[derive(Deserialize)]
struct DevicesFile {
    devices: Vec<DeviceDef>,
}

#[derive(Deserialize)]
struct RecipesFile {
    recipes: Vec<RecipeDef>,
}

/// ASCII kitchen layout plus the legends resolving its letter symbols.
///
/// Reserved symbols: `#` wall, `.` floor, `C` cutting board, `W` sink,
/// `A` assembly counter, `S` serving hatch, `P` plate stack, `T` trash
/// chute, `L` lucky wheel, digits for chef spawn points. Everything else
/// must appear in one of the legends: `ingredient_legend` maps a symbol to
/// the ingredient stored there, `device_legend` maps a symbol to the device
/// pre-hosted on a cooking station.
#[derive(Debug, Clone, Deserialize)]
pub struct MapDef {
    pub rows: Vec<String>,
    pub ingredient_legend: HashMap<char, String>,
    pub device_legend: HashMap<char, String>,
}

/// Validates cross-references in loaded content, panicking on any authoring
/// error.
///
/// Catches mistakes like: a recipe requiring an unknown ingredient, duplicate
/// definition ids, or two recipes describing the same multiset (which would
/// make dish matching ambiguous).
pub fn validate_content(content: &GameContent) {
    let mut ingredient_ids = HashSet::new();
    for ingredient in &content.ingredients {
        assert!(
            ingredient_ids.insert(ingredient.id.as_str()),
            "duplicate ingredient id '{}'",
            ingredient.id,
        );
    }
    let mut device_ids = HashSet::new();
    for device in &content.devices {
        assert!(
            device_ids.insert(device.id.as_str()),
            "duplicate device id '{}'",
            device.id,
        );
        assert!(device.capacity > 0, "device '{}' has zero capacity", device.id);
    }

    let mut dish_ids = HashSet::new();
    let mut multisets = HashSet::new();
    for recipe in &content.recipes {
        assert!(
            dish_ids.insert(recipe.dish.as_str()),
            "duplicate dish id '{}'",
            recipe.dish,
        );
        assert!(
            !recipe.requires.is_empty(),
            "recipe '{}' requires no ingredients",
            recipe.dish,
        );
        for required in &recipe.requires {
            assert!(
                ingredient_ids.contains(required.as_str()),
                "recipe '{}' requires unknown ingredient '{}'",
                recipe.dish,
                required,
            );
        }
        let mut sorted = recipe.requires.clone();
        sorted.sort();
        assert!(
            multisets.insert(sorted),
            "recipe '{}' repeats another recipe's ingredient multiset",
            recipe.dish,
        );
    }
}

/// Validates that every legend entry and map symbol resolves, panicking on
/// any authoring error.
pub fn validate_map(map: &MapDef, content: &GameContent) {
    const RESERVED: &str = "#.CWASPTL";
    for (symbol, ingredient) in &map.ingredient_legend {
        assert!(
            !RESERVED.contains(*symbol) && !symbol.is_ascii_digit(),
            "ingredient legend symbol '{symbol}' is reserved",
        );
        assert!(
            content.ingredient(ingredient).is_some(),
            "ingredient legend '{symbol}' points at unknown ingredient '{ingredient}'",
        );
    }
    for (symbol, device) in &map.device_legend {
        assert!(
            !RESERVED.contains(*symbol) && !symbol.is_ascii_digit(),
            "device legend symbol '{symbol}' is reserved",
        );
        assert!(
            !map.ingredient_legend.contains_key(symbol),
            "symbol '{symbol}' appears in both legends",
        );
        assert!(
            content.device(device).is_some(),
            "device legend '{symbol}' points at unknown device '{device}'",
        );
    }

    let width = map.rows.first().map_or(0, |row| row.chars().count());
    assert!(width > 0, "map has no cells");
    let mut spawns = HashSet::new();
    for row in &map.rows {
        assert!(
            row.chars().count() == width,
            "map rows must all be {width} cells wide",
        );
        for symbol in row.chars() {
            if symbol.is_ascii_digit() {
                assert!(spawns.insert(symbol), "duplicate chef spawn '{symbol}'");
            } else {
                assert!(
                    RESERVED.contains(symbol)
                        || map.ingredient_legend.contains_key(&symbol)
                        || map.device_legend.contains_key(&symbol),
                    "map symbol '{symbol}' is not in any legend",
                );
            }
        }
    }
    assert!(!spawns.is_empty(), "map has no chef spawn points");
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let text = std::fs::read_to_string(dir.join(file)).with_context(|| format!("reading {file}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {file}"))
}

pub fn load_content(content_dir: &str) -> Result<GameContent> {
    let dir = Path::new(content_dir);
    let constants: Constants = read_json(dir, "constants.json")?;
    let ingredients_file: IngredientsFile = read_json(dir, "ingredients.json")?;
    let devices_file: DevicesFile = read_json(dir, "devices.json")?;
    let recipes_file: RecipesFile = read_json(dir, "recipes.json")?;
    let content = GameContent {
        content_version: ingredients_file.content_version,
        ingredients: ingredients_file.ingredients,
        devices: devices_file.devices,
        recipes: recipes_file.recipes,
        constants,
    };
    validate_content(&content);
    Ok(content)
}

pub fn load_map(content_dir: &str, content: &GameContent) -> Result<MapDef> {
    let map: MapDef = read_json(Path::new(content_dir), "map.json")?;
    validate_map(&map, content);
    Ok(map)
}

/// Build the tick-zero state for a validated map: grid, stations with their
/// pre-hosted devices and seeded plate stack, chefs on their spawn points,
/// an empty order queue, and the armed order timer. The first order tick
/// fills the queue.
pub fn build_initial_state(content: &GameContent, map: &MapDef, seed: u64) -> GameState {
    let width = map.rows.first().map_or(0, |row| row.chars().count()) as i32;
    let height = map.rows.len() as i32;
    let mut tiles = Vec::with_capacity((width * height) as usize);
    let mut stations = Vec::new();
    let mut spawns: Vec<(char, Position)> = Vec::new();

    for (y, row) in map.rows.iter().enumerate() {
        for (x, symbol) in row.chars().enumerate() {
            let position = Position::new(x as i32, y as i32);
            let station = match symbol {
                '#' => {
                    tiles.push(Tile::Wall);
                    continue;
                }
                '.' => {
                    tiles.push(Tile::Floor);
                    continue;
                }
                digit if digit.is_ascii_digit() => {
                    tiles.push(Tile::Floor);
                    spawns.push((digit, position));
                    continue;
                }
                'C' => Station::Cutting { slot: None },
                'W' => Station::Washing { slot: None },
                'A' => Station::Assembly { slot: None },
                'S' => Station::Serving {
                    dirty_plates: Vec::new(),
                },
                'P' => Station::PlateStorage {
                    stack: vec![PlateItem::clean(); content.constants.plate_count],
                },
                'T' => Station::Trash,
                'L' => Station::Lucky { cooldown_left: 0 },
                other => {
                    if let Some(kind) = map.ingredient_legend.get(&other) {
                        Station::IngredientStorage { kind: kind.clone() }
                    } else if let Some(device) = map.device_legend.get(&other) {
                        Station::Cooking {
                            device: Some(DeviceItem::new(device.clone())),
                        }
                    } else {
                        panic!("map symbol '{other}' is not in any legend");
                    }
                }
            };
            tiles.push(Tile::Station);
            stations.push(PlacedStation { position, station });
        }
    }

    spawns.sort_by_key(|(digit, _)| *digit);
    let chefs: BTreeMap<ChefId, Chef> = spawns
        .into_iter()
        .map(|(digit, position)| {
            let id = ChefId(format!("chef_000{digit}"));
            (
                id.clone(),
                Chef {
                    id,
                    name: format!("Chef {digit}"),
                    position,
                    facing: Direction::Up,
                    held: None,
                    activity: ChefActivity::Idle,
                },
            )
        })
        .collect();

    let mut timers = TimerQueue::new();
    timers.schedule_every(
        0,
        content.constants.order_tick_interval_ticks,
        TimerEffect::OrderTick,
    );

    GameState {
        meta: MetaState {
            tick: 0,
            seed,
            schema_version: 1,
            content_version: content.content_version.clone(),
        },
        grid: Grid::new(width, height, tiles),
        stations,
        chefs,
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
