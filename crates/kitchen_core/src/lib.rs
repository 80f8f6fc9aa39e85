//! `kitchen_core`: deterministic kitchen simulation tick.
//!
//! No IO, no network. All randomness via the passed-in Rng.

mod chef;
mod commands;
mod device;
mod engine;
mod grid;
mod id;
mod orders;
mod recipes;
mod station;
mod timer;
mod types;

pub use chef::ChefStateView;
pub use engine::tick;
pub use grid::Grid;
pub use recipes::{find_matching_recipe, match_ingredients};
pub use station::{can_place, is_occupied, peek, PickOutcome, PlaceOutcome};
pub use timer::TimerQueue;
pub use types::*;

pub(crate) fn emit(counters: &mut Counters, tick: u64, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, tick, event }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

#[cfg(test)]
mod tests;
