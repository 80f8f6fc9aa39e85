//! Order engine: bounded active queue of time-limited orders.
//!
//! Runs on its own periodic timer entry, decoupled from chef actions. Each
//! order tick decrements every active order, expires the ones that ran out
//! (fixed penalty, streak increment), then refills the queue to capacity
//! with randomly drawn dish types.

use rand::Rng;

use crate::types::{EventEnvelope, GameContent, GameState, Order};

pub(crate) fn run_order_tick(
    state: &mut GameState,
    content: &GameContent,
    rng: &mut impl Rng,
    events: &mut Vec<EventEnvelope>,
) {
    let current_tick = state.meta.tick;
    let constants = &content.constants;

    for order in &mut state.orders {
        order.time_left = order.time_left.saturating_sub(1);
    }

    let expired: Vec<Order> = {
        let (done, live): (Vec<Order>, Vec<Order>) =
            state.orders.drain(..).partition(|o| o.time_left == 0);
        state.orders = live;
        done
    };
    for order in expired {
        state.score -= constants.order_penalty;
        state.failed_streak += 1;
        let event = crate::emit(
            &mut state.counters,
            current_tick,
            crate::Event::OrderExpired {
                order: order.id,
                dish: order.dish,
                penalty: constants.order_penalty,
                score_after: state.score,
            },
        );
        events.push(event);
    }

    refill(state, content, rng, events);
}

/// Top the active set back up to capacity with random dish types.
pub(crate) fn refill(
    state: &mut GameState,
    content: &GameContent,
    rng: &mut impl Rng,
    events: &mut Vec<EventEnvelope>,
) {
    let current_tick = state.meta.tick;
    let constants = &content.constants;
    if content.recipes.is_empty() {
        return;
    }
    while state.orders.len() < constants.max_active_orders {
        let recipe = &content.recipes[rng.gen_range(0..content.recipes.len())];
        let order = Order {
            id: crate::id::order_id(rng),
            dish: recipe.dish.clone(),
            time_left: constants.order_time_budget_ticks,
        };
        let event = crate::emit(
            &mut state.counters,
            current_tick,
            crate::Event::OrderCreated {
                order: order.id.clone(),
                dish: order.dish.clone(),
                time_budget: order.time_left,
            },
        );
        events.push(event);
        state.orders.push(order);
    }
}

/// Remove and return the first active order matching `dish`, if any. The
/// caller applies scoring so the emitted event can name the serving chef.
pub(crate) fn take_matching(state: &mut GameState, dish: &str) -> Option<Order> {
    let index = state.orders.iter().position(|o| o.dish == dish)?;
    Some(state.orders.remove(index))
}
