//! Type definitions for `kitchen_core`.
//!
//! All public types, structs, enums, and ID newtypes used by the simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::grid::Grid;
use crate::timer::TimerQueue;

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

pub type IngredientId = String;
pub type DishId = String;
pub type DeviceDefId = String;

/// Small inline capacity; device loads and plate contents are usually 1-2
/// items and spill to the heap past that.
pub type IngredientVec = SmallVec<[IngredientItem; 2]>;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ChefId);
string_id!(OrderId);
string_id!(CommandId);
string_id!(EventId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

// ---------------------------------------------------------------------------
// Grid geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent cell one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset; `Up` is toward smaller `y` (row 0 at the top of the map).
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
    Station,
}

impl Tile {
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Floor)
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrepState {
    Raw,
    Chopped,
    Cooking,
    Cooked,
    Burned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientItem {
    pub kind: IngredientId,
    pub state: PrepState,
}

impl IngredientItem {
    pub fn raw(kind: impl Into<IngredientId>) -> Self {
        Self {
            kind: kind.into(),
            state: PrepState::Raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateItem {
    pub state: PlateState,
    pub contents: IngredientVec,
}

impl PlateItem {
    pub fn clean() -> Self {
        Self {
            state: PlateState::Clean,
            contents: IngredientVec::new(),
        }
    }

    pub fn dirty() -> Self {
        Self {
            state: PlateState::Dirty,
            contents: IngredientVec::new(),
        }
    }
}

/// A portable cooking utensil (pot, pan). Capacity and acceptance rules live
/// in the matching `DeviceDef`. `generation` names the current batch: each
/// cook start stamps the device with a fresh state-wide token, and pending
/// cook/burn timers fire only against the batch they were scheduled for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceItem {
    pub def_id: DeviceDefId,
    pub contents: IngredientVec,
    pub cooking: bool,
    pub generation: u64,
}

impl DeviceItem {
    pub fn new(def_id: impl Into<DeviceDefId>) -> Self {
        Self {
            def_id: def_id.into(),
            contents: IngredientVec::new(),
            cooking: false,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishItem {
    pub dish: DishId,
    pub ingredients: IngredientVec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Ingredient(IngredientItem),
    Plate(PlateItem),
    Device(DeviceItem),
    Dish(DishItem),
}

impl Item {
    /// Short human-readable label for logs and events.
    pub fn label(&self) -> String {
        match self {
            Item::Ingredient(ing) => format!("{} ({:?})", ing.kind, ing.state),
            Item::Plate(plate) => format!("plate ({:?})", plate.state),
            Item::Device(device) => format!("{} ({} items)", device.def_id, device.contents.len()),
            Item::Dish(dish) => format!("dish {}", dish.dish),
        }
    }
}

// ---------------------------------------------------------------------------
// Chefs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chef {
    pub id: ChefId,
    pub name: String,
    pub position: Position,
    pub facing: Direction,
    pub held: Option<Item>,
    pub activity: ChefActivity,
}

/// Timed activities block all further commands until they self-complete.
/// Tending a stove is momentary and therefore never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChefActivity {
    Idle,
    Cutting { station: Position, until_tick: u64 },
    Washing { station: Position, scrubs_left: u32 },
}

impl Chef {
    pub fn is_busy(&self) -> bool {
        self.activity != ChefActivity::Idle
    }
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Station {
    Cutting {
        slot: Option<IngredientItem>,
    },
    Cooking {
        device: Option<DeviceItem>,
    },
    Washing {
        slot: Option<PlateItem>,
    },
    Assembly {
        slot: Option<Item>,
    },
    /// Serve-only; dirty plates pile up here as fallout from each serve.
    Serving {
        dirty_plates: Vec<PlateItem>,
    },
    /// Stateless, unbounded source of one raw ingredient kind.
    IngredientStorage {
        kind: IngredientId,
    },
    PlateStorage {
        stack: Vec<PlateItem>,
    },
    Trash,
    Lucky {
        cooldown_left: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedStation {
    pub position: Position,
    pub station: Station,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// A live, time-bounded request for one dish. Terminal orders (completed or
/// expired) are removed from the active set and never resurrected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub dish: DishId,
    pub time_left: u64,
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

/// A scheduled mutation, applied by the tick loop when due. Entries carrying
/// a generation token are dropped silently when the token no longer matches
/// the device it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEffect {
    CookDone { station: Position, generation: u64 },
    BurnContents { station: Position, generation: u64 },
    OrderTick,
    LuckyCooldown { station: Position },
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    ClockExpired,
    FailedStreak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub meta: MetaState,
    pub grid: Grid,
    /// Construction order is the deterministic iteration order.
    pub stations: Vec<PlacedStation>,
    pub chefs: BTreeMap<ChefId, Chef>,
    pub orders: Vec<Order>,
    pub timers: TimerQueue,
    pub score: i64,
    pub failed_streak: u32,
    pub clock_left: u64,
    pub finished: Option<FinishReason>,
    pub counters: Counters,
}

impl GameState {
    pub fn station_at(&self, position: Position) -> Option<&Station> {
        self.stations
            .iter()
            .find(|p| p.position == position)
            .map(|p| &p.station)
    }
}

/// Field-level lookup so callers can keep disjoint borrows on other
/// `GameState` fields while holding the station mutably.
pub(crate) fn station_at_mut(
    stations: &mut [PlacedStation],
    position: Position,
) -> Option<&mut Station> {
    stations
        .iter_mut()
        .find(|p| p.position == position)
        .map(|p| &mut p.station)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub tick: u64,
    pub seed: u64,
    pub schema_version: u32,
    pub content_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
    pub next_command_id: u64,
    /// Batch tokens for cook/burn timers. State-wide so two devices never
    /// share a token, even across pick-up-and-swap.
    pub next_cook_token: u64,
}

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: CommandId,
    pub issued_tick: u64,
    pub execute_at_tick: u64,
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    Move { chef: ChefId, direction: Direction },
    Pick { chef: ChefId },
    Place { chef: ChefId },
    Interact { chef: ChefId },
    Throw { chef: ChefId },
}

impl Command {
    pub fn chef(&self) -> &ChefId {
        match self {
            Command::Move { chef, .. }
            | Command::Pick { chef }
            | Command::Place { chef }
            | Command::Interact { chef }
            | Command::Throw { chef } => chef,
        }
    }
}

/// Why a command resolved as a no-op. Gameplay misuse is never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    UnknownChef,
    Busy,
    OutOfBounds,
    Blocked,
    Occupied,
    NoStation,
    NothingThere,
    HandsFull,
    HandsEmpty,
    StationRefused,
    DeviceRefused,
    DeviceFull,
    PlateStorageEmpty,
    IncompleteDish,
    LuckyCoolingDown,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventLevel {
    Normal,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Boil,
    Fry,
    Wash,
    Win,
    Spin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub tick: u64,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ChefMoved {
        chef: ChefId,
        from: Position,
        to: Position,
        facing: Direction,
    },
    ChefTurned {
        chef: ChefId,
        facing: Direction,
    },
    CommandRejected {
        command_id: CommandId,
        reason: RejectReason,
    },
    ItemPicked {
        chef: ChefId,
        station: Position,
        item: String,
    },
    ItemPlaced {
        chef: ChefId,
        station: Position,
        item: String,
    },
    ItemTrashed {
        chef: ChefId,
        item: String,
    },
    DeviceEmptied {
        chef: ChefId,
        device: DeviceDefId,
    },
    ChopStarted {
        chef: ChefId,
        station: Position,
    },
    ChopFinished {
        chef: ChefId,
        station: Position,
        kind: IngredientId,
    },
    StoveTended {
        chef: ChefId,
        station: Position,
    },
    WashStarted {
        chef: ChefId,
        station: Position,
    },
    WashFinished {
        chef: ChefId,
        station: Position,
    },
    CookStarted {
        station: Position,
        device: DeviceDefId,
    },
    CookFinished {
        station: Position,
        device: DeviceDefId,
    },
    ContentsBurned {
        station: Position,
        device: DeviceDefId,
    },
    PouredOntoPlate {
        chef: ChefId,
        station: Position,
        count: usize,
    },
    IngredientPlated {
        chef: ChefId,
        station: Position,
        kind: IngredientId,
    },
    DishAssembled {
        station: Position,
        dish: DishId,
    },
    DishServed {
        chef: ChefId,
        order: OrderId,
        dish: DishId,
        reward: i64,
        score_after: i64,
    },
    SubmitMissed {
        chef: ChefId,
        dish: DishId,
        penalty: i64,
        score_after: i64,
    },
    OrderCreated {
        order: OrderId,
        dish: DishId,
        time_budget: u64,
    },
    OrderExpired {
        order: OrderId,
        dish: DishId,
        penalty: i64,
        score_after: i64,
    },
    LuckySpin {
        chef: ChefId,
        station: Position,
        outcome: LuckyOutcome,
    },
    LuckyReady {
        station: Position,
    },
    SoundCue {
        cue: SoundCue,
    },
    GameFinished {
        reason: FinishReason,
        score: i64,
    },
    /// Only emitted at `EventLevel::Debug`.
    TimerFired {
        timer: TimerId,
        effect: TimerEffect,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LuckyOutcome {
    ScoreBonus { amount: i64 },
    BonusTime { ticks: u64 },
    FreePlate,
    Nothing,
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContent {
    pub content_version: String,
    pub ingredients: Vec<IngredientDef>,
    pub devices: Vec<DeviceDef>,
    pub recipes: Vec<RecipeDef>,
    pub constants: Constants,
}

impl GameContent {
    pub fn ingredient(&self, id: &str) -> Option<&IngredientDef> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    pub fn device(&self, id: &str) -> Option<&DeviceDef> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn recipe(&self, dish: &str) -> Option<&RecipeDef> {
        self.recipes.iter().find(|r| r.dish == dish)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngredientClass {
    Starch,
    Produce,
    Protein,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientDef {
    pub id: IngredientId,
    pub display_name: String,
    pub class: IngredientClass,
    pub choppable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDef {
    pub id: DeviceDefId,
    pub name: String,
    pub capacity: usize,
    pub cook_ticks: u64,
    pub burn_ticks: u64,
    pub accepts: IngredientFilter,
    pub sound: SoundCue,
}

/// Device-specific acceptance predicate over ingredient kind and prep state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IngredientFilter {
    /// Raw ingredients of the given class (boiling pots take raw starch).
    RawOfClass { class: IngredientClass },
    /// Chopped ingredients of any class except the given one (frying pans
    /// take chopped non-starch).
    ChoppedNotClass { class: IngredientClass },
}

/// An unordered multiset of required ingredient kinds defining one dish type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDef {
    pub dish: DishId,
    pub name: String,
    pub requires: Vec<IngredientId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    pub chop_ticks: u64,
    pub wash_scrubs: u32,
    pub order_tick_interval_ticks: u64,
    pub order_time_budget_ticks: u64,
    pub max_active_orders: usize,
    pub order_reward: i64,
    pub order_penalty: i64,
    pub failed_streak_threshold: u32,
    pub match_clock_ticks: u64,
    pub plate_count: usize,
    pub lucky_cooldown_ticks: u64,
}
