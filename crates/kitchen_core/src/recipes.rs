//! Recipe matching.
//!
//! A recipe is an unordered multiset of required ingredient kinds. A candidate
//! set matches iff the sizes are equal and a one-to-one assignment exists from
//! each requirement to a distinct candidate of that kind. Kinds, not
//! instances, are what matter, so a greedy per-requirement scan with a "used"
//! marker is sufficient.

use crate::types::{GameContent, IngredientItem, RecipeDef};

/// Order-independent multiset match of `candidates` against the recipe.
pub fn match_ingredients(recipe: &RecipeDef, candidates: &[IngredientItem]) -> bool {
    if recipe.requires.len() != candidates.len() {
        return false;
    }
    let mut used = vec![false; candidates.len()];
    for required in &recipe.requires {
        let assigned = candidates
            .iter()
            .enumerate()
            .find(|(i, candidate)| !used[*i] && candidate.kind == *required);
        match assigned {
            Some((i, _)) => used[i] = true,
            None => return false,
        }
    }
    true
}

/// Scan the recipe book for the recipe the candidates satisfy. Recipes are
/// non-overlapping by construction, so at most one can match.
pub fn find_matching_recipe<'a>(
    content: &'a GameContent,
    candidates: &[IngredientItem],
) -> Option<&'a RecipeDef> {
    content
        .recipes
        .iter()
        .find(|recipe| match_ingredients(recipe, candidates))
}
