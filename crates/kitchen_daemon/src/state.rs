use kitchen_core::{CommandEnvelope, EventEnvelope, GameContent, GameState};
use parking_lot::Mutex;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct SimState {
    pub game_state: GameState,
    pub content: GameContent,
    pub rng: ChaCha8Rng,
    /// Commands accepted over HTTP, applied on the next processed tick.
    pub pending: Vec<CommandEnvelope>,
    pub next_command_id: u64,
}

pub type SharedSim = Arc<Mutex<SimState>>;
pub type EventTx = broadcast::Sender<Vec<EventEnvelope>>;

#[derive(Clone)]
pub struct AppState {
    pub sim: SharedSim,
    pub event_tx: EventTx,
    pub paused: Arc<AtomicBool>,
    pub ticks_per_sec: f64,
}
