//! Cross-format normalizer
//!
//! Character JSON arrives from this app or from a sibling app whose schema
//! differs in field names and shapes. Decoding is:
//! - parse loosely into a JSON value
//! - rebuild every record into the canonical shape
//! - decode typed records
//! - run the safety passes (attribute clamping, miracle validation)

mod detect;
mod fields;
mod rebuild;

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::character::{clamp_attributes, new_character_id, validate_miracle_actives, Character};

pub use detect::{detect_format, SourceFormat, FOREIGN_MARKERS, NATIVE_MARKERS};
pub use rebuild::rebuild_character;

/// Result of normalizing a payload
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Detected source format
    pub format: SourceFormat,
    /// Canonical JSON: an object for object input, otherwise an array
    pub value: Value,
}

/// Errors decoding a character payload
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a character or a list of characters")]
    NotCharacters,
}

/// Rebuild a record or list of records into the canonical shape
pub fn normalize(value: &Value) -> Normalized {
    let format = detect_format(value);
    let value = match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|obj| Value::Object(rebuild_character(obj)))
                .collect(),
        ),
        Value::Object(obj) => Value::Object(rebuild_character(obj)),
        _ => Value::Array(Vec::new()),
    };
    Normalized { format, value }
}

/// Safety passes run on every decoded record
pub fn apply_safety_passes(character: &mut Character) {
    clamp_attributes(character);
    validate_miracle_actives(character);
    if character.id.trim().is_empty() {
        character.id = new_character_id();
    }
}

/// Typed records decoded from a payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub characters: Vec<Character>,
    /// Input records that were not objects or failed to decode
    pub skipped: usize,
}

/// Decode characters from raw bytes in either format
///
/// Records that can't be decoded are skipped with a warning and counted;
/// only an unparseable payload is an error.
pub fn decode_records(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let raw: Value = serde_json::from_slice(bytes)?;
    let total = match &raw {
        Value::Array(items) => items.len(),
        Value::Object(_) => 1,
        _ => return Err(DecodeError::NotCharacters),
    };

    let normalized = normalize(&raw);
    debug!(format = %normalized.format, total, "Decoding character payload");

    let records = match normalized.value {
        Value::Array(items) => items,
        single => vec![single],
    };

    let mut characters = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<Character>(record) {
            Ok(mut character) => {
                apply_safety_passes(&mut character);
                characters.push(character);
            }
            Err(e) => warn!("Skipping undecodable character record: {}", e),
        }
    }

    let skipped = total - characters.len();
    if skipped > 0 {
        warn!(skipped, total, "Some character records were skipped");
    }
    Ok(Decoded {
        characters,
        skipped,
    })
}

/// Decode characters, dropping any records that can't be read
pub fn decode_characters(bytes: &[u8]) -> Result<Vec<Character>, DecodeError> {
    Ok(decode_records(bytes)?.characters)
}

/// Give every record a fresh id not in `taken`, and distinct from each other
pub fn regenerate_ids(characters: &mut [Character], taken: &HashSet<String>) {
    let mut used = taken.clone();
    for character in characters {
        let mut id = new_character_id();
        while used.contains(&id) {
            id = new_character_id();
        }
        used.insert(id.clone());
        character.id = id;
    }
}
