//! Errors surfaced by character commands.

use thiserror::Error;

use crate::crafting::Shortfall;

/// Failure of a single command invocation.
///
/// Everything except [`CommandError::Storage`] is a user-level rejection: the
/// command loop reports it and carries on with the document untouched.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command word is not part of the vocabulary.
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),
    /// No inventory entry carries the requested name.
    #[error("item \"{0}\" not found in inventory")]
    ItemNotFound(String),
    /// The recipe catalog has no entry with the requested name.
    #[error("recipe \"{0}\" not found")]
    RecipeNotFound(String),
    /// The character document has no `resources` object.
    #[error("cannot craft: the character has no resources")]
    MissingResources,
    /// At least one ingredient is short; every shortfall is listed.
    #[error("not enough resources to craft \"{recipe}\"")]
    InsufficientResources {
        /// Recipe that was attempted.
        recipe: String,
        /// One entry per ingredient below its requirement.
        shortfalls: Vec<Shortfall>,
    },
    /// Argument was not a non-negative integer.
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),
    /// Applying the delta would overflow the stored value.
    #[error("amount out of range for {0}")]
    AmountOverflow(String),
    /// Reading or writing a document failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl CommandError {
    /// Whether the error should terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
