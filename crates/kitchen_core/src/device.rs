//! Cooking device lifecycle: `Empty → Cooking → {Ready, Burned}`.
//!
//! The device itself only tracks contents and a batch token. Cook and burn
//! transitions are applied by the tick loop through timer-queue entries
//! scheduled when cooking starts; each start draws a fresh state-wide token,
//! and entries whose token no longer names a live batch are dropped at fire
//! time. Clearing or picking the device up ends the batch.

use crate::types::{
    Counters, DeviceDef, DeviceItem, GameContent, IngredientClass, IngredientFilter,
    IngredientItem, PrepState, RejectReason,
};

/// What `add_ingredient` did. `Started` means cook/burn timers must be
/// scheduled by the caller against the returned definition.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum AddResult {
    Started,
    Joined,
}

pub(crate) fn filter_accepts(
    filter: &IngredientFilter,
    class: IngredientClass,
    state: PrepState,
) -> bool {
    match filter {
        IngredientFilter::RawOfClass { class: wanted } => {
            state == PrepState::Raw && class == *wanted
        }
        IngredientFilter::ChoppedNotClass { class: excluded } => {
            state == PrepState::Chopped && class != *excluded
        }
    }
}

pub(crate) fn can_accept(
    device: &DeviceItem,
    def: &DeviceDef,
    ingredient: &IngredientItem,
    content: &GameContent,
) -> Result<(), RejectReason> {
    let Some(ingredient_def) = content.ingredient(&ingredient.kind) else {
        return Err(RejectReason::DeviceRefused);
    };
    if !filter_accepts(&def.accepts, ingredient_def.class, ingredient.state) {
        return Err(RejectReason::DeviceRefused);
    }
    if device.contents.len() >= def.capacity {
        return Err(RejectReason::DeviceFull);
    }
    // Once contents have finished (or burned), the batch must be poured or
    // trashed before anything new goes in.
    if device
        .contents
        .iter()
        .any(|i| matches!(i.state, PrepState::Cooked | PrepState::Burned))
    {
        return Err(RejectReason::DeviceRefused);
    }
    Ok(())
}

/// Add an accepted ingredient. The first addition starts cooking and stamps
/// the device with a fresh batch token; later additions join the in-flight
/// batch and ride its existing timers.
pub(crate) fn add_ingredient(
    device: &mut DeviceItem,
    mut ingredient: IngredientItem,
    counters: &mut Counters,
) -> AddResult {
    ingredient.state = PrepState::Cooking;
    device.contents.push(ingredient);
    if device.cooking {
        AddResult::Joined
    } else {
        device.cooking = true;
        device.generation = counters.next_cook_token;
        counters.next_cook_token += 1;
        AddResult::Started
    }
}

/// Empty the device (pour or trash). The batch ends; pending cook/burn
/// timers become stale.
pub(crate) fn clear(device: &mut DeviceItem) {
    device.contents.clear();
    device.cooking = false;
}

/// End the batch without touching contents. Used when the device is picked
/// up off its station. Contents stay at their last state.
pub(crate) fn cancel_cooking(device: &mut DeviceItem) {
    device.cooking = false;
}

/// Timer-driven transition at cook completion: everything still cooking is
/// now cooked.
pub(crate) fn finish_cooking(device: &mut DeviceItem) {
    for item in &mut device.contents {
        if item.state == PrepState::Cooking {
            item.state = PrepState::Cooked;
        }
    }
}

/// Timer-driven transition at burn time: cooked contents left in the device
/// are ruined.
pub(crate) fn burn_contents(device: &mut DeviceItem) {
    for item in &mut device.contents {
        if item.state == PrepState::Cooked {
            item.state = PrepState::Burned;
        }
    }
}
