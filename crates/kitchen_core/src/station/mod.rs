//! Station protocol: `can_place`, `place`, `pick`, `peek`, `is_occupied`.
//!
//! Stations are a closed set of variants dispatched exhaustively. Placement
//! returns a [`PlaceOutcome`] plus the item when it was not consumed, so the
//! command layer knows whether the chef's hand cleared and which timers to
//! schedule.

mod assembly;

use crate::device;
use crate::types::{
    Counters, DeviceDefId, DishId, GameContent, IngredientId, Item, PlateState, RejectReason,
    SoundCue, Station,
};

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceOutcome {
    /// Item consumed into the station's slot or stack.
    Stored,
    /// Ingredient consumed into a device; cooking started. The caller must
    /// schedule the cook and burn timers with this generation token.
    StartedCooking {
        device: DeviceDefId,
        generation: u64,
        cook_ticks: u64,
        burn_ticks: u64,
        sound: SoundCue,
    },
    /// Ingredient consumed into a device already mid-cook.
    JoinedCook { device: DeviceDefId },
    /// Device contents poured onto the plate in the assembly slot. The
    /// device itself stays with the chef.
    Poured {
        count: usize,
        assembled: Option<DishId>,
    },
    /// Loose ingredient added to the plate in the assembly slot.
    Plated {
        kind: IngredientId,
        assembled: Option<DishId>,
    },
    /// Trash cleared a held device's contents; the device stays held.
    DeviceEmptied { device: DeviceDefId },
    /// Trash destroyed the item.
    Destroyed,
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    Picked(Item),
    Empty(RejectReason),
}

/// Non-mutating acceptance check against the station's capability rules.
pub fn can_place(station: &Station, item: &Item, content: &GameContent) -> bool {
    match place_dry_run(station, item, content) {
        PlaceCheck::Accepts => true,
        PlaceCheck::Rejects(_) => false,
    }
}

enum PlaceCheck {
    Accepts,
    Rejects(RejectReason),
}

fn place_dry_run(station: &Station, item: &Item, content: &GameContent) -> PlaceCheck {
    match station {
        Station::Cutting { slot } => match (slot, item) {
            (Some(_), _) => PlaceCheck::Rejects(RejectReason::Occupied),
            (None, Item::Ingredient(ing)) => {
                let choppable = content.ingredient(&ing.kind).is_some_and(|d| d.choppable);
                if ing.state == crate::types::PrepState::Raw && choppable {
                    PlaceCheck::Accepts
                } else {
                    PlaceCheck::Rejects(RejectReason::StationRefused)
                }
            }
            (None, _) => PlaceCheck::Rejects(RejectReason::StationRefused),
        },
        Station::Cooking { device } => match (device, item) {
            (None, Item::Device(_)) => PlaceCheck::Accepts,
            (None, _) => PlaceCheck::Rejects(RejectReason::StationRefused),
            (Some(dev), Item::Ingredient(ing)) => {
                let Some(def) = content.device(&dev.def_id) else {
                    return PlaceCheck::Rejects(RejectReason::DeviceRefused);
                };
                match device::can_accept(dev, def, ing, content) {
                    Ok(()) => PlaceCheck::Accepts,
                    Err(reason) => PlaceCheck::Rejects(reason),
                }
            }
            (Some(_), _) => PlaceCheck::Rejects(RejectReason::StationRefused),
        },
        Station::Washing { slot } => match (slot, item) {
            (Some(_), _) => PlaceCheck::Rejects(RejectReason::Occupied),
            (None, Item::Plate(plate)) if plate.state == PlateState::Dirty => PlaceCheck::Accepts,
            (None, _) => PlaceCheck::Rejects(RejectReason::StationRefused),
        },
        Station::Assembly { slot } => assembly::dry_run(slot.as_ref(), item),
        Station::PlateStorage { .. } => {
            if matches!(item, Item::Plate(_)) {
                PlaceCheck::Accepts
            } else {
                PlaceCheck::Rejects(RejectReason::StationRefused)
            }
        }
        Station::Trash => PlaceCheck::Accepts,
        Station::Serving { .. } | Station::IngredientStorage { .. } | Station::Lucky { .. } => {
            PlaceCheck::Rejects(RejectReason::StationRefused)
        }
    }
}

/// Place `item` into the station. Returns the item back to the caller when it
/// was not consumed (rejection, or device retained after pour/trash-empty).
pub(crate) fn place_item(
    station: &mut Station,
    item: Item,
    content: &GameContent,
    counters: &mut Counters,
) -> (Option<Item>, PlaceOutcome) {
    if let PlaceCheck::Rejects(reason) = place_dry_run(station, &item, content) {
        return (Some(item), PlaceOutcome::Rejected(reason));
    }
    match station {
        Station::Cutting { slot } => {
            let Item::Ingredient(ing) = item else {
                unreachable!("dry run admits only raw choppable ingredients");
            };
            *slot = Some(ing);
            (None, PlaceOutcome::Stored)
        }
        Station::Cooking { device } => match item {
            Item::Device(dev) => {
                *device = Some(dev);
                (None, PlaceOutcome::Stored)
            }
            Item::Ingredient(ing) => {
                let dev = device.as_mut().expect("dry run checked occupancy");
                let def = content.device(&dev.def_id).expect("dry run checked def");
                match device::add_ingredient(dev, ing, counters) {
                    device::AddResult::Started => (
                        None,
                        PlaceOutcome::StartedCooking {
                            device: def.id.clone(),
                            generation: dev.generation,
                            cook_ticks: def.cook_ticks,
                            burn_ticks: def.burn_ticks,
                            sound: def.sound,
                        },
                    ),
                    device::AddResult::Joined => (
                        None,
                        PlaceOutcome::JoinedCook {
                            device: def.id.clone(),
                        },
                    ),
                }
            }
            other => (Some(other), PlaceOutcome::Rejected(RejectReason::StationRefused)),
        },
        Station::Washing { slot } => {
            let Item::Plate(plate) = item else {
                unreachable!("dry run admits only dirty plates");
            };
            *slot = Some(plate);
            (None, PlaceOutcome::Stored)
        }
        Station::Assembly { slot } => assembly::place(slot, item, content),
        Station::PlateStorage { stack } => {
            let Item::Plate(plate) = item else {
                unreachable!("dry run admits only plates");
            };
            stack.push(plate);
            (None, PlaceOutcome::Stored)
        }
        Station::Trash => match item {
            Item::Device(mut dev) => {
                device::clear(&mut dev);
                let def_id = dev.def_id.clone();
                (
                    Some(Item::Device(dev)),
                    PlaceOutcome::DeviceEmptied { device: def_id },
                )
            }
            _ => (None, PlaceOutcome::Destroyed),
        },
        Station::Serving { .. } | Station::IngredientStorage { .. } | Station::Lucky { .. } => {
            (Some(item), PlaceOutcome::Rejected(RejectReason::StationRefused))
        }
    }
}

/// Take the station's item, if any. Picking a device off a cooking station
/// cancels its pending cook/burn timers via the generation token.
pub(crate) fn pick_item(station: &mut Station) -> PickOutcome {
    match station {
        Station::Cutting { slot } => match slot.take() {
            Some(ing) => PickOutcome::Picked(Item::Ingredient(ing)),
            None => PickOutcome::Empty(RejectReason::NothingThere),
        },
        Station::Cooking { device } => match device.take() {
            Some(mut dev) => {
                device::cancel_cooking(&mut dev);
                PickOutcome::Picked(Item::Device(dev))
            }
            None => PickOutcome::Empty(RejectReason::NothingThere),
        },
        Station::Washing { slot } => match slot.take() {
            Some(plate) => PickOutcome::Picked(Item::Plate(plate)),
            None => PickOutcome::Empty(RejectReason::NothingThere),
        },
        Station::Assembly { slot } => match slot.take() {
            Some(item) => PickOutcome::Picked(item),
            None => PickOutcome::Empty(RejectReason::NothingThere),
        },
        Station::Serving { dirty_plates } => match dirty_plates.pop() {
            Some(plate) => PickOutcome::Picked(Item::Plate(plate)),
            None => PickOutcome::Empty(RejectReason::NothingThere),
        },
        Station::IngredientStorage { kind } => {
            PickOutcome::Picked(Item::Ingredient(crate::types::IngredientItem::raw(
                kind.clone(),
            )))
        }
        Station::PlateStorage { stack } => match stack.pop() {
            Some(plate) => PickOutcome::Picked(Item::Plate(plate)),
            None => PickOutcome::Empty(RejectReason::PlateStorageEmpty),
        },
        Station::Trash => PickOutcome::Empty(RejectReason::NothingThere),
        // Always "occupied", never yields an item.
        Station::Lucky { .. } => PickOutcome::Empty(RejectReason::StationRefused),
    }
}

/// Non-destructive read of the stored item.
pub fn peek(station: &Station) -> Option<Item> {
    match station {
        Station::Cutting { slot } => slot.clone().map(Item::Ingredient),
        Station::Cooking { device } => device.clone().map(Item::Device),
        Station::Washing { slot } => slot.clone().map(Item::Plate),
        Station::Assembly { slot } => slot.clone(),
        Station::Serving { dirty_plates } => dirty_plates.last().cloned().map(Item::Plate),
        Station::PlateStorage { stack } => stack.last().cloned().map(Item::Plate),
        Station::IngredientStorage { .. } | Station::Trash | Station::Lucky { .. } => None,
    }
}

pub fn is_occupied(station: &Station) -> bool {
    match station {
        Station::Cutting { slot } => slot.is_some(),
        Station::Cooking { device } => device.is_some(),
        Station::Washing { slot } => slot.is_some(),
        Station::Assembly { slot } => slot.is_some(),
        Station::Serving { dirty_plates } => !dirty_plates.is_empty(),
        Station::PlateStorage { stack } => !stack.is_empty(),
        Station::IngredientStorage { .. } | Station::Trash => false,
        // Reports occupied for the whole cooldown to block item interaction.
        Station::Lucky { .. } => true,
    }
}
