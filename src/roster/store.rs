//! Character persistence
//!
//! All characters live as one JSON array under a single key. Every save
//! rewrites the whole array.

use thiserror::Error;
use tracing::{debug, warn};

use crate::character::Character;
use crate::db::KeyValueStore;
use crate::normalize::decode_characters;

/// Errors persisting characters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode characters: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("character not found: {0}")]
    NotFound(String),
}

/// Loads and saves the character collection
#[derive(Clone)]
pub struct CharacterStore {
    kv: KeyValueStore,
    key: String,
}

impl CharacterStore {
    /// Create a store keeping the collection under `key`
    pub fn new(kv: KeyValueStore, key: &str) -> Self {
        Self {
            kv,
            key: key.to_string(),
        }
    }

    /// Load every stored character
    ///
    /// Missing, unreadable or corrupted data loads as an empty collection so
    /// startup is never blocked.
    pub async fn load(&self) -> Vec<Character> {
        let bytes = match self.kv.get(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No stored characters under {}/{}", self.kv.namespace(), self.key);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read stored characters: {}", e);
                return Vec::new();
            }
        };

        match decode_characters(&bytes) {
            Ok(characters) => characters,
            Err(e) => {
                warn!("Stored characters could not be decoded, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the stored collection
    pub async fn save(&self, characters: &[Character]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(characters)?;
        self.kv.put(&self.key, &json).await?;
        debug!("Saved {} characters", characters.len());
        Ok(())
    }
}
