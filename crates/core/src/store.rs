//! JSON document persistence.

use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    models::{CharacterState, RecipeCatalog},
};

/// Storage backend for the character and recipe documents.
///
/// Every error returned here is fatal for the process.
pub trait DocumentStore {
    /// Load the character, seeding a starting document when none exists.
    fn load_character(&self) -> Result<CharacterState>;
    /// Replace the stored character document.
    fn save_character(&self, state: &CharacterState) -> Result<()>;
    /// Load the recipe catalog.
    fn load_recipes(&self) -> Result<RecipeCatalog>;
}

/// File-backed store reading and writing pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    character_path: PathBuf,
    recipes_path: PathBuf,
}

impl JsonDocumentStore {
    /// Create a store for the two documents.
    pub fn new(character_path: impl Into<PathBuf>, recipes_path: impl Into<PathBuf>) -> Self {
        Self {
            character_path: character_path.into(),
            recipes_path: recipes_path.into(),
        }
    }

    /// Create a store using the paths from the resolved configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.character_path, &config.recipes_path)
    }

    /// Path of the character document.
    pub fn character_path(&self) -> &Path {
        &self.character_path
    }

    /// Path of the recipe catalog.
    pub fn recipes_path(&self) -> &Path {
        &self.recipes_path
    }
}

impl DocumentStore for JsonDocumentStore {
    fn load_character(&self) -> Result<CharacterState> {
        let path = &self.character_path;
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Character document not found, creating default");
                let state = CharacterState::starting();
                self.save_character(&state)?;
                return Ok(state);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };

        // A literal `null` document falls back to an empty character.
        let state: Option<CharacterState> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        debug!(path = %path.display(), "Character document loaded");
        Ok(state.unwrap_or_else(CharacterState::empty))
    }

    fn save_character(&self, state: &CharacterState) -> Result<()> {
        write_document(&self.character_path, state)?;
        debug!(path = %self.character_path.display(), "Character document saved");
        Ok(())
    }

    fn load_recipes(&self) -> Result<RecipeCatalog> {
        let path = &self.recipes_path;
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let catalog = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(catalog)
    }
}

/// Serialize `document` next to `path` and rename it into place.
fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let serialised = serde_json::to_vec_pretty(document)?;
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage write in {}", dir.display()))?;
    staged
        .write_all(&serialised)
        .and_then(|_| staged.as_file().sync_all())
        .with_context(|| format!("failed to write {}", path.display()))?;
    staged
        .persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
