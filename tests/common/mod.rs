//! Common test utilities - in-memory sheets with direct storage access

#![allow(dead_code)]

use whsheet::db::{Database, KeyValueStore};
use whsheet::roster::{CharacterStore, Roster};
use whsheet::Config;

pub const FOREIGN_FIXTURE: &str = include_str!("../fixtures/foreign_character.json");
pub const NATIVE_FIXTURE: &str = include_str!("../fixtures/native_character.json");

/// A roster over an in-memory database, with the raw key-value store exposed
pub struct TestSheets {
    pub db: Database,
    pub config: Config,
}

impl TestSheets {
    pub async fn new() -> Self {
        let config = Config::in_memory();
        let db = Database::new(None)
            .await
            .expect("Failed to create test database");
        Self { db, config }
    }

    /// The namespace the roster stores under
    pub fn kv(&self) -> KeyValueStore {
        self.db.kv(&self.config.namespace)
    }

    /// Overwrite the stored collection with raw bytes
    pub async fn seed_raw(&self, bytes: &[u8]) {
        self.kv()
            .put(&self.config.characters_key, bytes)
            .await
            .expect("Failed to seed storage");
    }

    /// Load a roster from whatever is stored now
    pub async fn roster(&self) -> Roster {
        Roster::open(CharacterStore::new(self.kv(), &self.config.characters_key)).await
    }
}
