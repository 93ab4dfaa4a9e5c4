//! Character state mutations backed by a [`DocumentStore`].

use serde_json::Number;
use tracing::info;

use crate::{
    error::CommandError,
    models::{CharacterState, InventoryItem, Resources, MATERIA},
    store::DocumentStore,
};

/// Applies one mutation per call: load the document, change it, write it back.
pub struct CharacterManager<S> {
    store: S,
}

impl<S: DocumentStore> CharacterManager<S> {
    /// Wrap the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append an item to the inventory.
    pub fn add_item(&self, name: &str) -> Result<(), CommandError> {
        self.update(|state| {
            state.add_item(name);
            Ok(())
        })?;
        info!(item = %name, "Item added");
        Ok(())
    }

    /// Remove the first inventory entry named `name`.
    pub fn remove_item(&self, name: &str) -> Result<InventoryItem, CommandError> {
        let removed = self.update(|state| {
            state
                .remove_item(name)
                .ok_or_else(|| CommandError::ItemNotFound(name.to_string()))
        });
        match &removed {
            Ok(_) => info!(item = %name, "Item removed"),
            Err(CommandError::ItemNotFound(_)) => info!(item = %name, "Item not in inventory"),
            Err(_) => {}
        }
        removed
    }

    /// Add each delta to the matching resource count.
    pub fn adjust_resources(&self, deltas: &Resources) -> Result<(), CommandError> {
        self.update(|state| state.adjust_resources(deltas))?;
        info!(?deltas, "Resources adjusted");
        Ok(())
    }

    /// Grant `amount` materia.
    pub fn add_materia(&self, amount: i64) -> Result<(), CommandError> {
        self.adjust_resources(&Resources::from([(MATERIA.to_string(), amount)]))
    }

    /// Apply `delta` to hit points and return the new value.
    pub fn adjust_hp(&self, delta: i64) -> Result<Number, CommandError> {
        let hp = self.update(|state| state.adjust_hp(delta))?;
        info!(delta, hp = %hp, "HP adjusted");
        Ok(hp)
    }

    /// Restore `amount` hit points.
    pub fn heal(&self, amount: i64) -> Result<Number, CommandError> {
        self.adjust_hp(amount)
    }

    /// Remove `amount` hit points.
    pub fn damage(&self, amount: i64) -> Result<Number, CommandError> {
        let delta = amount
            .checked_neg()
            .ok_or_else(|| CommandError::AmountOverflow("hp".to_string()))?;
        self.adjust_hp(delta)
    }

    /// Apply `delta` to the money balance and return the new value.
    pub fn adjust_money(&self, delta: i64) -> Result<Number, CommandError> {
        let money = self.update(|state| state.adjust_money(delta))?;
        info!(delta, money = %money, "Money adjusted");
        Ok(money)
    }

    /// Grant `amount` money.
    pub fn add_money(&self, amount: i64) -> Result<Number, CommandError> {
        self.adjust_money(amount)
    }

    /// Current state, without mutation.
    pub fn display(&self) -> Result<CharacterState, CommandError> {
        Ok(self.store.load_character()?)
    }

    /// Run `mutate` on a freshly loaded document and persist it on success.
    ///
    /// The document is written once and only when `mutate` returns `Ok`.
    pub(crate) fn update<T>(
        &self,
        mutate: impl FnOnce(&mut CharacterState) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let mut state = self.store.load_character()?;
        let outcome = mutate(&mut state)?;
        self.store.save_character(&state)?;
        Ok(outcome)
    }
}
