//! Recipe validation and crafting.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    character::CharacterManager,
    error::CommandError,
    models::{CharacterState, Recipe, Resources},
    store::DocumentStore,
};

/// Ingredient the character does not hold enough of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    /// Resource name.
    pub ingredient: String,
    /// Count the recipe asks for.
    pub required: i64,
    /// Count the character holds.
    pub available: i64,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Not enough \"{}\": required {}, available {}.",
            self.ingredient, self.required, self.available
        )
    }
}

/// Every ingredient of `recipe` that `resources` cannot cover.
pub fn check_ingredients(resources: &Resources, recipe: &Recipe) -> Vec<Shortfall> {
    recipe
        .ingredients
        .iter()
        .filter_map(|(ingredient, &required)| {
            let available = resources.get(ingredient).copied().unwrap_or(0);
            (available < required).then(|| Shortfall {
                ingredient: ingredient.clone(),
                required,
                available,
            })
        })
        .collect()
}

/// Consume the ingredients and add the result item, or change nothing.
pub fn apply_recipe(state: &mut CharacterState, recipe: &Recipe) -> Result<(), CommandError> {
    let resources = state
        .resources
        .as_mut()
        .ok_or(CommandError::MissingResources)?;

    let shortfalls = check_ingredients(resources, recipe);
    if !shortfalls.is_empty() {
        return Err(CommandError::InsufficientResources {
            recipe: recipe.name.clone(),
            shortfalls,
        });
    }

    let mut remaining = Vec::with_capacity(recipe.ingredients.len());
    for (ingredient, required) in &recipe.ingredients {
        let available = resources.get(ingredient).copied().unwrap_or(0);
        let left = available
            .checked_sub(*required)
            .ok_or_else(|| CommandError::AmountOverflow(ingredient.clone()))?;
        remaining.push((ingredient.clone(), left));
    }
    resources.extend(remaining);
    state.add_item(recipe.result.clone());
    Ok(())
}

/// Crafts items from the recipe catalog held by the store.
pub struct CraftingEngine<'a, S> {
    characters: &'a CharacterManager<S>,
}

impl<'a, S: DocumentStore> CraftingEngine<'a, S> {
    /// Craft against the documents behind `characters`.
    pub fn new(characters: &'a CharacterManager<S>) -> Self {
        Self { characters }
    }

    /// Craft `recipe_name`, returning the produced item name.
    ///
    /// Resource consumption and the new inventory entry are persisted in a
    /// single write; on any rejection the document is left untouched.
    pub fn craft(&self, recipe_name: &str) -> Result<String, CommandError> {
        let store = self.characters.store();
        let outcome = self.characters.update(|state| {
            if state.resources.is_none() {
                return Err(CommandError::MissingResources);
            }
            let catalog = store.load_recipes()?;
            let recipe = catalog
                .find(recipe_name)
                .ok_or_else(|| CommandError::RecipeNotFound(recipe_name.to_string()))?;
            apply_recipe(state, recipe)?;
            Ok(recipe.result.clone())
        });

        match &outcome {
            Ok(item) => info!(recipe = %recipe_name, item = %item, "Item crafted"),
            Err(err) if !err.is_fatal() => info!(recipe = %recipe_name, "Craft rejected: {err}"),
            Err(_) => {}
        }
        outcome
    }
}
