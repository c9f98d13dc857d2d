//! Enum tokens stored in class option slots
//!
//! Tokens are written as strings. Reading is lenient: tokens match
//! case-insensitively, a numeric token selects the variant by position,
//! and anything unrecognised reads as an empty slot (or the default).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// What a Deft attunement is bound to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AttunementType {
    Teacher,
    Item,
    Vehicle,
    Pet,
    #[default]
    Other,
}

/// Kind of Strong conflict loot
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LootType {
    #[default]
    Special,
    Substance,
    Supernatural,
}

/// Strong combat options
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CombatOption {
    ProtectAlly,
    ForcefulPush,
    Disarm,
    ClimbFoe,
    Grapple,
    Sunder,
    Riposte,
    Intimidate,
}

/// Brave quirks
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Quirk {
    /// Guards one named ally
    Protector,
    Fearless,
    Lucky,
    Stubborn,
    Scrappy,
    Vengeful,
    Wanderer,
    Unbreakable,
}

impl Quirk {
    /// Whether the quirk names a protected ally
    pub fn has_protected_ally(&self) -> bool {
        matches!(self, Quirk::Protector)
    }
}

/// Clever knacks
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Knack {
    Scholar,
    Tinkerer,
    Linguist,
    Sneak,
    Trickster,
    Survivor,
    Navigator,
    Appraiser,
    Healer,
    /// Usable once per day
    Tactician,
}

impl Knack {
    /// Whether the knack tracks daily use in its slot
    pub fn is_daily(&self) -> bool {
        matches!(self, Knack::Tactician)
    }
}

/// Parse a token by name, falling back to position for numeric tokens
pub fn parse_token<T>(token: &str) -> Option<T>
where
    T: FromStr + IntoEnumIterator,
{
    let token = token.trim();
    if let Ok(parsed) = T::from_str(token) {
        return Some(parsed);
    }
    token.parse::<usize>().ok().and_then(|i| T::iter().nth(i))
}

fn token_from_value<T>(value: &Value) -> Option<T>
where
    T: FromStr + IntoEnumIterator,
{
    match value {
        Value::String(s) => parse_token(s),
        Value::Number(n) => n.as_u64().and_then(|i| T::iter().nth(i as usize)),
        _ => None,
    }
}

/// Deserialize a token, using the default for anything unrecognised
pub(crate) fn lenient_token<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + IntoEnumIterator + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(token_from_value)
        .unwrap_or_default())
}

/// Deserialize an optional token, treating unrecognised tokens as empty
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + IntoEnumIterator,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(token_from_value))
}

/// Deserialize a list of optional tokens, keeping slot positions
pub(crate) fn lenient_slots<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + IntoEnumIterator,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .iter()
        .map(token_from_value)
        .collect())
}
