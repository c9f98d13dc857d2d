//! Field copying with type coercion
//!
//! `Fields` reads from a source object and writes into a fresh output
//! object. Values that are missing or can't be coerced are skipped, so the
//! output only carries keys the source actually provided.

use serde_json::{Map, Value};

/// Coerce a JSON value to an integer (numbers, floats and numeric strings)
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Coerce a JSON value to a string (strings and numbers)
pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a JSON value to a bool (bools, 0/1 and "true"/"false")
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a string or array of strings into a list of non-empty strings
pub fn as_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(as_string)
                .filter(|s| !s.trim().is_empty())
                .collect(),
        ),
        Value::String(s) if !s.trim().is_empty() => Some(vec![s.clone()]),
        Value::String(_) => Some(Vec::new()),
        _ => None,
    }
}

/// "sUPERNATURAL" -> "Supernatural"
pub fn title_case(s: &str) -> String {
    let mut chars = s.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Builder copying selected keys from `src` into a new object
pub struct Fields<'a> {
    src: &'a Map<String, Value>,
    out: Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(src: &'a Map<String, Value>) -> Self {
        Self {
            src,
            out: Map::new(),
        }
    }

    /// Raw source value
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.src.get(key)
    }

    pub fn put(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.out.insert(key.to_string(), value.into());
        self
    }

    /// Copy a string if present
    pub fn string(&mut self, key: &str) -> &mut Self {
        if let Some(s) = self.get(key).and_then(as_string) {
            self.put(key, s);
        }
        self
    }

    /// Copy a string, writing `default` when missing
    pub fn string_or(&mut self, key: &str, default: &str) -> &mut Self {
        let s = self
            .get(key)
            .and_then(as_string)
            .unwrap_or_else(|| default.to_string());
        self.put(key, s)
    }

    /// Copy an integer if present, saturated into `min..=max`
    pub fn int_in(&mut self, key: &str, min: i64, max: i64) -> &mut Self {
        if let Some(i) = self.get(key).and_then(as_int) {
            self.put(key, i.clamp(min, max));
        }
        self
    }

    /// Copy a 32-bit integer if present
    pub fn int(&mut self, key: &str) -> &mut Self {
        self.int_in(key, i32::MIN as i64, i32::MAX as i64)
    }

    /// Copy a 64-bit integer if present
    pub fn long(&mut self, key: &str) -> &mut Self {
        self.int_in(key, i64::MIN, i64::MAX)
    }

    /// Copy a non-negative 32-bit count if present
    pub fn count(&mut self, key: &str) -> &mut Self {
        self.int_in(key, 0, u32::MAX as i64)
    }

    /// Copy a bool if present
    pub fn bool(&mut self, key: &str) -> &mut Self {
        if let Some(b) = self.get(key).and_then(as_bool) {
            self.put(key, b);
        }
        self
    }

    /// Copy a list of strings if present
    pub fn strings(&mut self, key: &str) -> &mut Self {
        if let Some(list) = self.get(key).and_then(as_string_list) {
            self.put(key, list);
        }
        self
    }

    /// Rebuild each object of an array with `rebuild`, dropping non-objects
    pub fn objects(
        &mut self,
        key: &str,
        rebuild: impl Fn(&Map<String, Value>) -> Map<String, Value>,
    ) -> &mut Self {
        if let Some(Value::Array(items)) = self.get(key) {
            let rebuilt: Vec<Value> = items
                .iter()
                .filter_map(Value::as_object)
                .map(|obj| Value::Object(rebuild(obj)))
                .collect();
            self.put(key, rebuilt);
        }
        self
    }

    /// Rebuild a nested object with `rebuild` if present
    pub fn object(
        &mut self,
        key: &str,
        rebuild: impl Fn(&Map<String, Value>) -> Map<String, Value>,
    ) -> &mut Self {
        if let Some(obj) = self.get(key).and_then(Value::as_object) {
            let rebuilt = rebuild(obj);
            self.put(key, rebuilt);
        }
        self
    }

    pub fn finish(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.out)
    }
}
