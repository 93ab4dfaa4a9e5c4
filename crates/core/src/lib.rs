#![warn(clippy::all, missing_docs)]

//! Core logic for the character sheet tool.
//!
//! This crate hosts the character and recipe models, configuration
//! handling, JSON persistence, crafting rules and the interactive
//! command loop used by the `charsheet` binary.

pub mod character;
pub mod config;
pub mod crafting;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod store;

pub use character::CharacterManager;
pub use config::AppConfig;
pub use crafting::{CraftingEngine, Shortfall};
pub use dispatch::{Command, Shell};
pub use error::CommandError;
pub use models::{CharacterState, InventoryItem, Recipe, RecipeCatalog};
pub use store::{DocumentStore, JsonDocumentStore};
