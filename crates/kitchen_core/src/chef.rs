//! Chef state machine helpers and timed-activity resolution.
//!
//! Busy activities are entered by `interact` and stored on the chef with
//! their completion condition; the tick loop resolves them here. While busy,
//! a chef rejects every further command, so re-entry is impossible by
//! construction.

use serde::{Deserialize, Serialize};

use crate::types::{
    station_at_mut, Chef, ChefActivity, ChefId, EventEnvelope, GameState, PlateState, PrepState,
    Station,
};

/// View-only projection of a chef's state for external observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChefStateView {
    Idle,
    Carrying,
    BusyCutting,
    BusyWashing,
}

impl ChefStateView {
    pub fn of(chef: &Chef) -> Self {
        match chef.activity {
            ChefActivity::Cutting { .. } => ChefStateView::BusyCutting,
            ChefActivity::Washing { .. } => ChefStateView::BusyWashing,
            ChefActivity::Idle if chef.held.is_some() => ChefStateView::Carrying,
            ChefActivity::Idle => ChefStateView::Idle,
        }
    }
}

/// Advance busy chefs: finish chops whose delay has elapsed and progress one
/// wash scrub per tick. Completing chefs return to idle.
pub(crate) fn resolve_activities(state: &mut GameState, events: &mut Vec<EventEnvelope>) {
    let current_tick = state.meta.tick;

    // Sorted for determinism; HashMap iteration order is arbitrary.
    let mut chef_ids: Vec<ChefId> = state
        .chefs
        .values()
        .filter(|chef| chef.is_busy())
        .map(|chef| chef.id.clone())
        .collect();
    chef_ids.sort();

    for chef_id in chef_ids {
        let Some(chef) = state.chefs.get(&chef_id) else {
            continue;
        };
        match chef.activity.clone() {
            ChefActivity::Cutting {
                station: station_pos,
                until_tick,
            } if until_tick <= current_tick => {
                let mut chopped_kind = None;
                if let Some(Station::Cutting { slot: Some(ing) }) =
                    station_at_mut(&mut state.stations, station_pos)
                {
                    if ing.state == PrepState::Raw {
                        ing.state = PrepState::Chopped;
                    }
                    chopped_kind = Some(ing.kind.clone());
                }
                if let Some(chef) = state.chefs.get_mut(&chef_id) {
                    chef.activity = ChefActivity::Idle;
                }
                if let Some(kind) = chopped_kind {
                    let event = crate::emit(
                        &mut state.counters,
                        current_tick,
                        crate::Event::ChopFinished {
                            chef: chef_id,
                            station: station_pos,
                            kind,
                        },
                    );
                    events.push(event);
                }
            }
            ChefActivity::Washing {
                station: station_pos,
                scrubs_left,
            } => {
                let scrubs_left = scrubs_left.saturating_sub(1);
                if scrubs_left > 0 {
                    if let Some(chef) = state.chefs.get_mut(&chef_id) {
                        chef.activity = ChefActivity::Washing {
                            station: station_pos,
                            scrubs_left,
                        };
                    }
                    continue;
                }
                if let Some(Station::Washing { slot: Some(plate) }) =
                    station_at_mut(&mut state.stations, station_pos)
                {
                    plate.state = PlateState::Clean;
                }
                if let Some(chef) = state.chefs.get_mut(&chef_id) {
                    chef.activity = ChefActivity::Idle;
                }
                let event = crate::emit(
                    &mut state.counters,
                    current_tick,
                    crate::Event::WashFinished {
                        chef: chef_id,
                        station: station_pos,
                    },
                );
                events.push(event);
            }
            _ => {}
        }
    }
}
