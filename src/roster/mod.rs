//! Character roster - the in-memory collection and its persistence
//!
//! The roster is the single writer for the stored collection:
//! - loads once on open (corrupted data loads as empty)
//! - applies each edit as a whole-record replacement
//! - rewrites the stored array after every change
//! - publishes the new collection to subscribers

mod store;
mod transfer;

pub use store::{CharacterStore, StoreError};
pub use transfer::{
    default_export_file_name, export_json, prepare_import, read_import_file, write_export_file,
    ExportError, ImportError,
};

use std::collections::HashSet;
use std::path::Path;

use tokio::sync::{watch, Mutex};
use tracing::info;

use crate::advancement::CharacterClass;
use crate::character::{enforce_invariants, Character};

/// Observable character collection backed by a `CharacterStore`
pub struct Roster {
    store: CharacterStore,
    characters_tx: watch::Sender<Vec<Character>>,
    write_lock: Mutex<()>,
}

impl Roster {
    /// Load the stored collection
    pub async fn open(store: CharacterStore) -> Self {
        let characters = store.load().await;
        info!("Loaded {} characters", characters.len());
        let (characters_tx, _) = watch::channel(characters);

        Self {
            store,
            characters_tx,
            write_lock: Mutex::new(()),
        }
    }

    /// Receive the collection every time it changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<Character>> {
        self.characters_tx.subscribe()
    }

    /// Snapshot of all characters
    pub fn characters(&self) -> Vec<Character> {
        self.characters_tx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.characters_tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a character by id
    pub fn get(&self, id: &str) -> Option<Character> {
        self.characters_tx
            .borrow()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Persist `characters` and publish them
    async fn commit(&self, characters: Vec<Character>) -> Result<(), StoreError> {
        self.store.save(&characters).await?;
        self.characters_tx.send_replace(characters);
        Ok(())
    }

    /// Create and store a new level 1 character
    pub async fn create(&self, name: &str, class: CharacterClass) -> Result<Character, StoreError> {
        let character = Character::new(name, class);
        self.save_character(character).await
    }

    /// Insert or replace a character by id
    ///
    /// Invariants are enforced on the stored copy, which is returned.
    pub async fn save_character(&self, character: Character) -> Result<Character, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.save_locked(character).await
    }

    /// Replace a character with `edit(current)`
    ///
    /// The read, edit and write all happen under the write lock.
    pub async fn update<F>(&self, id: &str, edit: F) -> Result<Character, StoreError>
    where
        F: FnOnce(Character) -> Character,
    {
        let _guard = self.write_lock.lock().await;
        let current = self
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut edited = edit(current);
        edited.id = id.to_string();
        self.save_locked(edited).await
    }

    /// Upsert while the caller holds `write_lock`
    async fn save_locked(&self, mut character: Character) -> Result<Character, StoreError> {
        enforce_invariants(&mut character);

        let mut characters = self.characters();
        match characters.iter_mut().find(|c| c.id == character.id) {
            Some(existing) => *existing = character.clone(),
            None => characters.push(character.clone()),
        }
        self.commit(characters).await?;

        info!("Saved character {} ({})", character.name, character.id);
        Ok(character)
    }

    /// Delete a character, returning whether it existed
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut characters = self.characters();
        let before = characters.len();
        characters.retain(|c| c.id != id);
        if characters.len() == before {
            return Ok(false);
        }
        self.commit(characters).await?;

        info!("Deleted character {}", id);
        Ok(true)
    }

    /// Import characters from a raw payload
    ///
    /// Every imported record gets a fresh id. On any error the collection is
    /// left untouched.
    pub async fn import_bytes(&self, bytes: &[u8]) -> Result<Vec<Character>, ImportError> {
        let _guard = self.write_lock.lock().await;
        let mut characters = self.characters();
        let taken: HashSet<String> = characters.iter().map(|c| c.id.clone()).collect();

        let imported = prepare_import(bytes, &taken)?;
        characters.extend(imported.iter().cloned());
        self.commit(characters).await?;

        info!("Imported {} characters", imported.len());
        Ok(imported)
    }

    /// Import from pasted text (clipboard payload)
    pub async fn import_text(&self, text: &str) -> Result<Vec<Character>, ImportError> {
        self.import_bytes(text.as_bytes()).await
    }

    /// Import from a file
    pub async fn import_file(&self, path: &Path) -> Result<Vec<Character>, ImportError> {
        let bytes = read_import_file(path).await?;
        self.import_bytes(&bytes).await
    }

    /// Canonical JSON of the whole collection
    pub fn export_json(&self) -> Result<String, ExportError> {
        export_json(&self.characters_tx.borrow())
    }

    /// Write the whole collection to `path`, returning the record count
    pub async fn export_file(&self, path: &Path) -> Result<usize, ExportError> {
        let characters = self.characters();
        let json = export_json(&characters)?;
        write_export_file(path, &json).await?;

        info!("Exported {} characters to {}", characters.len(), path.display());
        Ok(characters.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_pool;
    use crate::db::KeyValueStore;

    async fn test_roster() -> Roster {
        let kv = KeyValueStore::new(test_pool().await, "whitehack");
        Roster::open(CharacterStore::new(kv, "characters")).await
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let roster = test_roster().await;
        assert!(roster.is_empty());

        let ayla = roster.create("Ayla", CharacterClass::Deft).await.unwrap();

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(&ayla.id), Some(ayla));
        assert_eq!(roster.get("missing"), None);
    }

    #[tokio::test]
    async fn test_update_is_copy_on_write() {
        let roster = test_roster().await;
        let ayla = roster.create("Ayla", CharacterClass::Wise).await.unwrap();

        let updated = roster
            .update(&ayla.id, |c| c.with_level(5))
            .await
            .unwrap();

        assert_eq!(updated.level, 5);
        assert_eq!(updated.wise_options.as_ref().unwrap().miracle_slots.len(), 3);
        assert_eq!(roster.get(&ayla.id).unwrap().level, 5);
        assert_eq!(ayla.level, 1);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let roster = test_roster().await;
        let result = roster.update("nope", |c| c).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_racing_delete_does_not_resurrect() {
        let roster = test_roster().await;
        let ayla = roster.create("Ayla", CharacterClass::Deft).await.unwrap();

        let (deleted, updated) = tokio::join!(
            roster.delete(&ayla.id),
            roster.update(&ayla.id, |c| c.with_level(2))
        );

        assert!(deleted.unwrap());
        assert!(updated.is_ok() || matches!(updated, Err(StoreError::NotFound(_))));
        assert!(roster.is_empty());
        assert!(roster.store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_racing_updates_keep_both_edits() {
        let roster = test_roster().await;
        let ayla = roster.create("Ayla", CharacterClass::Deft).await.unwrap();

        let (a, b) = tokio::join!(
            roster.update(&ayla.id, |mut c| {
                c.coins += 5;
                c
            }),
            roster.update(&ayla.id, |mut c| {
                c.coins += 7;
                c
            })
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(roster.get(&ayla.id).unwrap().coins, 12);
    }

    #[tokio::test]
    async fn test_save_character_clamps_attributes() {
        let roster = test_roster().await;
        let mut c = Character::new("Borg", CharacterClass::Strong);
        c.strength = 40;

        let saved = roster.save_character(c).await.unwrap();
        assert_eq!(saved.strength, 20);
    }

    #[tokio::test]
    async fn test_delete() {
        let roster = test_roster().await;
        let a = roster.create("A", CharacterClass::Deft).await.unwrap();
        roster.create("B", CharacterClass::Deft).await.unwrap();

        assert!(roster.delete(&a.id).await.unwrap());
        assert!(!roster.delete(&a.id).await.unwrap());
        assert_eq!(roster.len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let roster = test_roster().await;
        let mut rx = roster.subscribe();

        roster.create("Ayla", CharacterClass::Clever).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn test_import_text_failure_leaves_collection() {
        let roster = test_roster().await;
        roster.create("Ayla", CharacterClass::Deft).await.unwrap();
        let before = roster.characters();

        let result = roster.import_text("not json at all").await;

        assert!(matches!(result, Err(ImportError::Decode(_))));
        assert_eq!(roster.characters(), before);
    }
}
