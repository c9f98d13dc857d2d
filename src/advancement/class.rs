//! Character class tags

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The six Whitehack classes
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum CharacterClass {
    #[default]
    Deft,
    Strong,
    Wise,
    Brave,
    Clever,
    Fortunate,
}

impl CharacterClass {
    /// Parse a class tag, returning None for unknown names
    pub fn parse(name: &str) -> Option<Self> {
        Self::from_str(name.trim()).ok()
    }

    /// Parse a class tag, falling back to Deft for unknown names
    pub fn parse_or_default(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl From<String> for CharacterClass {
    fn from(value: String) -> Self {
        Self::parse_or_default(&value)
    }
}

impl From<CharacterClass> for String {
    fn from(value: CharacterClass) -> Self {
        value.as_str().to_string()
    }
}
