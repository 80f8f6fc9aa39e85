//! Assembly station: the composition hub.
//!
//! An empty slot takes a plate, a loose ingredient, or a finished dish. Once
//! a plate is in the slot, a held device pours its whole contents onto the
//! plate and a held ingredient is added directly; after every addition the
//! plate is checked against the recipe book and replaced by a completed dish
//! on a match.

use super::{PlaceCheck, PlaceOutcome};
use crate::device;
use crate::recipes;
use crate::types::{DishItem, GameContent, Item, RejectReason};

pub(super) fn dry_run(slot: Option<&Item>, item: &Item) -> PlaceCheck {
    match (slot, item) {
        (None, Item::Plate(_) | Item::Ingredient(_) | Item::Dish(_)) => PlaceCheck::Accepts,
        (None, Item::Device(_)) => PlaceCheck::Rejects(RejectReason::StationRefused),
        (Some(Item::Plate(_)), Item::Ingredient(_)) => PlaceCheck::Accepts,
        (Some(Item::Plate(_)), Item::Device(dev)) => {
            if dev.contents.is_empty() {
                PlaceCheck::Rejects(RejectReason::NothingThere)
            } else {
                PlaceCheck::Accepts
            }
        }
        (Some(_), _) => PlaceCheck::Rejects(RejectReason::Occupied),
    }
}

pub(super) fn place(
    slot: &mut Option<Item>,
    item: Item,
    content: &GameContent,
) -> (Option<Item>, PlaceOutcome) {
    match item {
        // Empty slot: plain storage.
        item @ (Item::Plate(_) | Item::Ingredient(_) | Item::Dish(_)) if slot.is_none() => {
            *slot = Some(item);
            (None, PlaceOutcome::Stored)
        }
        Item::Device(mut dev) => {
            let Some(Item::Plate(plate)) = slot.as_mut() else {
                return (
                    Some(Item::Device(dev)),
                    PlaceOutcome::Rejected(RejectReason::Occupied),
                );
            };
            let count = dev.contents.len();
            plate.contents.extend(dev.contents.drain(..));
            device::clear(&mut dev);
            let assembled = check_recipe(slot, content);
            (
                Some(Item::Device(dev)),
                PlaceOutcome::Poured { count, assembled },
            )
        }
        Item::Ingredient(ing) => {
            let Some(Item::Plate(plate)) = slot.as_mut() else {
                return (
                    Some(Item::Ingredient(ing)),
                    PlaceOutcome::Rejected(RejectReason::Occupied),
                );
            };
            let kind = ing.kind.clone();
            plate.contents.push(ing);
            let assembled = check_recipe(slot, content);
            (None, PlaceOutcome::Plated { kind, assembled })
        }
        other => (
            Some(other),
            PlaceOutcome::Rejected(RejectReason::Occupied),
        ),
    }
}

/// Match the plate's contents against the recipe book; on a hit the plate's
/// logical identity becomes a completed dish bearing that recipe.
fn check_recipe(slot: &mut Option<Item>, content: &GameContent) -> Option<crate::types::DishId> {
    let Some(Item::Plate(plate)) = slot.as_ref() else {
        return None;
    };
    let recipe = recipes::find_matching_recipe(content, &plate.contents)?;
    let dish = recipe.dish.clone();
    let ingredients = plate.contents.clone();
    *slot = Some(Item::Dish(DishItem {
        dish: dish.clone(),
        ingredients,
    }));
    Some(dish)
}
