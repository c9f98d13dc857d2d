//! whsheet - Whitehack character sheet manager
//!
//! Stores character sheets locally, reads sheets written by the sibling
//! mobile app, and derives class advancement from the rules tables.

pub mod advancement;
pub mod character;
pub mod config;
pub mod db;
pub mod normalize;
pub mod roster;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

pub use config::Config;
use db::Database;
use roster::{CharacterStore, Roster};

/// An open character sheet collection
pub struct Sheets {
    config: Config,
    db: Arc<Database>,
    roster: Roster,
}

impl Sheets {
    /// Open the database and load the roster
    pub async fn open(config: Config) -> Result<Self> {
        let db = Database::new(config.db_path.as_deref()).await?;
        info!(
            "Opened character storage at {}",
            config.db_path.as_deref().unwrap_or(":memory:")
        );

        let store = CharacterStore::new(db.kv(&config.namespace), &config.characters_key);
        let roster = Roster::open(store).await;

        Ok(Self {
            config,
            db: Arc::new(db),
            roster,
        })
    }

    /// Get the database handle
    pub fn db(&self) -> Arc<Database> {
        self.db.clone()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
