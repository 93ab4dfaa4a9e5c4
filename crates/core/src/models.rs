//! Character and recipe documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::CommandError;

/// Resource tracked by the `addMateria` command.
pub const MATERIA: &str = "materia";

/// Resource name to count. Absent keys count as zero.
pub type Resources = BTreeMap<String, i64>;

/// Single entry of the character's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Item name as entered or produced by a recipe.
    pub name: String,
    /// Keys this tool does not manage, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryItem {
    /// Build an item with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// Persisted state of the player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Current hit points.
    #[serde(default = "zero")]
    pub hp: Number,
    /// Owned items in insertion order. Duplicates are allowed.
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Consumable counts. `None` when the document has no `resources` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    /// Money balance. May hold a fractional value.
    #[serde(default = "zero")]
    pub money: Number,
    /// Keys this tool does not manage, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn zero() -> Number {
    Number::from(0)
}

/// Add an integer delta to a JSON number.
///
/// Integers stay integers with checked arithmetic; fractional values are
/// added as `f64` and must stay finite.
fn add_delta(value: &Number, delta: i64, field: &str) -> Result<Number, CommandError> {
    let overflow = || CommandError::AmountOverflow(field.to_string());
    if let Some(current) = value.as_i64() {
        return current
            .checked_add(delta)
            .map(Number::from)
            .ok_or_else(overflow);
    }
    let current = value.as_f64().ok_or_else(overflow)?;
    Number::from_f64(current + delta as f64).ok_or_else(overflow)
}

impl CharacterState {
    /// State written on first run.
    pub fn starting() -> Self {
        Self {
            hp: Number::from(500),
            inventory: Vec::new(),
            resources: Some(Resources::from([(MATERIA.to_string(), 0)])),
            money: Number::from(1000),
            extra: Map::new(),
        }
    }

    /// State used when the document exists but holds `null`.
    pub fn empty() -> Self {
        Self {
            hp: zero(),
            inventory: Vec::new(),
            resources: Some(Resources::new()),
            money: zero(),
            extra: Map::new(),
        }
    }

    /// Count of `name`, treating a missing entry as zero.
    pub fn resource(&self, name: &str) -> i64 {
        self.resources
            .as_ref()
            .and_then(|resources| resources.get(name).copied())
            .unwrap_or(0)
    }

    /// Append an item to the end of the inventory.
    pub fn add_item(&mut self, name: impl Into<String>) {
        self.inventory.push(InventoryItem::new(name));
    }

    /// Remove the first item named exactly `name`.
    pub fn remove_item(&mut self, name: &str) -> Option<InventoryItem> {
        let index = self.inventory.iter().position(|item| item.name == name)?;
        Some(self.inventory.remove(index))
    }

    /// Add every delta to its resource. Nothing changes if any sum overflows.
    pub fn adjust_resources(&mut self, deltas: &Resources) -> Result<(), CommandError> {
        let mut updated = Vec::with_capacity(deltas.len());
        for (name, delta) in deltas {
            let total = self
                .resource(name)
                .checked_add(*delta)
                .ok_or_else(|| CommandError::AmountOverflow(name.clone()))?;
            updated.push((name.clone(), total));
        }

        let resources = self.resources.get_or_insert_with(Resources::new);
        resources.extend(updated);
        Ok(())
    }

    /// Add `delta` to hit points, returning the new value.
    pub fn adjust_hp(&mut self, delta: i64) -> Result<Number, CommandError> {
        self.hp = add_delta(&self.hp, delta, "hp")?;
        Ok(self.hp.clone())
    }

    /// Add `delta` to the money balance, returning the new value.
    pub fn adjust_money(&mut self, delta: i64) -> Result<Number, CommandError> {
        self.money = add_delta(&self.money, delta, "money")?;
        Ok(self.money.clone())
    }
}

/// Rule turning a set of resources into one inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique name used by the `craft` command.
    pub name: String,
    /// Required count per resource.
    #[serde(default)]
    pub ingredients: Resources,
    /// Name of the item added on success.
    pub result: String,
}

/// Read-only list of known recipes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCatalog {
    /// Recipes in document order.
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    /// Recipe with exactly this name.
    pub fn find(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inventory_keeps_insertion_order() {
        let mut state = CharacterState::starting();
        state.add_item("Sword");
        state.add_item("Shield");
        state.add_item("Sword");

        let names: Vec<_> = state.inventory.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Sword", "Shield", "Sword"]);
    }

    #[test]
    fn remove_takes_first_match_only() {
        let mut state = CharacterState::starting();
        state.add_item("Potion");
        state.add_item("Rope");
        state.add_item("Potion");

        assert_eq!(state.remove_item("Potion"), Some(InventoryItem::new("Potion")));
        let names: Vec<_> = state.inventory.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Rope", "Potion"]);
    }

    #[test]
    fn remove_missing_item_leaves_state() {
        let mut state = CharacterState::starting();
        state.add_item("Rope");
        let before = state.clone();

        assert_eq!(state.remove_item("rope"), None);
        assert_eq!(state, before);
    }

    #[test]
    fn resource_adjustments_are_additive() -> Result<(), CommandError> {
        let mut split = CharacterState::starting();
        split.adjust_resources(&Resources::from([("wood".to_string(), 7)]))?;
        split.adjust_resources(&Resources::from([("wood".to_string(), -3)]))?;

        let mut once = CharacterState::starting();
        once.adjust_resources(&Resources::from([("wood".to_string(), 4)]))?;

        assert_eq!(split.resource("wood"), 4);
        assert_eq!(split, once);
        Ok(())
    }

    #[test]
    fn adjust_resources_creates_missing_map() -> Result<(), CommandError> {
        let mut state: CharacterState = serde_json::from_value(json!({ "hp": 3 }))
            .expect("state without resources should parse");
        assert!(state.resources.is_none());

        state.adjust_resources(&Resources::from([(MATERIA.to_string(), 50)]))?;
        assert_eq!(state.resource(MATERIA), 50);
        Ok(())
    }

    #[test]
    fn overflow_is_rejected_without_change() {
        let mut state = CharacterState::starting();
        state.money = Number::from(i64::MAX);
        state
            .adjust_resources(&Resources::from([("gold".to_string(), i64::MAX)]))
            .expect("first grant fits");
        let before = state.clone();

        let deltas = Resources::from([("gold".to_string(), 1), ("a_first".to_string(), 5)]);
        assert!(matches!(
            state.adjust_resources(&deltas),
            Err(CommandError::AmountOverflow(name)) if name == "gold"
        ));
        assert!(state.adjust_money(1).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn document_shape_matches_saved_files() {
        let mut state = CharacterState::starting();
        state.add_item("Axe");
        assert_eq!(
            serde_json::to_value(&state).expect("serialize"),
            json!({
                "hp": 500,
                "inventory": [{ "name": "Axe" }],
                "resources": { "materia": 0 },
                "money": 1000
            })
        );
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let document = json!({
            "name": "Hero",
            "level": 3,
            "hp": 10,
            "inventory": [{ "name": "Rope", "qty": 2 }],
            "resources": { "materia": 0 },
            "money": 5
        });
        let mut state: CharacterState =
            serde_json::from_value(document).expect("document should parse");
        assert_eq!(state.extra["name"], json!("Hero"));
        assert_eq!(state.inventory[0].extra["qty"], json!(2));

        state.add_item("Axe");
        assert_eq!(
            serde_json::to_value(&state).expect("serialize"),
            json!({
                "name": "Hero",
                "level": 3,
                "hp": 10,
                "inventory": [{ "name": "Rope", "qty": 2 }, { "name": "Axe" }],
                "resources": { "materia": 0 },
                "money": 5
            })
        );
    }

    #[test]
    fn fractional_money_is_accepted_and_adjusted() -> Result<(), CommandError> {
        let mut state: CharacterState =
            serde_json::from_value(json!({ "hp": 500, "money": 99.5 }))
                .expect("fractional money should parse");

        assert_eq!(state.adjust_money(1)?.as_f64(), Some(100.5));
        assert_eq!(state.adjust_hp(-20)?, Number::from(480));
        assert_eq!(
            serde_json::to_value(&state).expect("serialize")["money"],
            json!(100.5)
        );
        Ok(())
    }

    #[test]
    fn catalog_lookup_is_exact() {
        let catalog: RecipeCatalog = serde_json::from_value(json!({
            "recipes": [
                { "name": "axe", "ingredients": { "wood": 10 }, "result": "Axe" }
            ]
        }))
        .expect("catalog should parse");

        assert_eq!(catalog.find("axe").map(|r| r.result.as_str()), Some("Axe"));
        assert!(catalog.find("Axe").is_none());
    }
}
