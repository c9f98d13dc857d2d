//! Source format detection
//!
//! The sibling app writes a few keys this app never does (grouped fields,
//! an attribute wrapper, an inverted custom-attributes flag, a cached attack
//! value). A record with any of those and none of the native-only keys is
//! treated as foreign. Detection only decides what gets logged; the rebuild
//! is safe on either shape.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Keys only the sibling app writes
pub const FOREIGN_MARKERS: [&str; 6] = [
    "speciesGroup",
    "vocationGroup",
    "affiliationGroups",
    "attributes",
    "useCustomAttributes",
    "cachedAttackValue",
];

/// Keys only this app writes
pub const NATIVE_MARKERS: [&str; 3] = ["species", "vocation", "useDefaultAttributes"];

/// Which app produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceFormat {
    Native,
    Foreign,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Native => write!(f, "native"),
            SourceFormat::Foreign => write!(f, "foreign"),
        }
    }
}

fn classify(record: &Map<String, Value>) -> SourceFormat {
    let has_foreign = FOREIGN_MARKERS.iter().any(|k| record.contains_key(*k));
    let has_native = NATIVE_MARKERS.iter().any(|k| record.contains_key(*k));
    if has_foreign && !has_native {
        SourceFormat::Foreign
    } else {
        SourceFormat::Native
    }
}

/// Classify a payload by its first record
pub fn detect_format(value: &Value) -> SourceFormat {
    let first = match value {
        Value::Array(items) => items.first().and_then(Value::as_object),
        Value::Object(obj) => Some(obj),
        _ => None,
    };
    first.map(classify).unwrap_or(SourceFormat::Native)
}
