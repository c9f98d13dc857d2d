//! Character record types

use serde::{Deserialize, Serialize};

use super::options::{
    BraveOptions, CleverOptions, DeftOptions, FortunateOptions, StrongOptions, WiseOptions,
};
use super::validate::enforce_invariants;
use crate::advancement::{CharacterClass, CharacterStats, MAX_LEVEL, MIN_LEVEL};

/// Default score for every attribute
pub const DEFAULT_ATTRIBUTE: i32 = 10;

/// Lowest legal attribute score
pub const MIN_ATTRIBUTE: i32 = 1;

/// Highest legal attribute score
pub const MAX_ATTRIBUTE: i32 = 20;

/// Attribute keys in sheet order
pub const ATTRIBUTE_KEYS: [&str; 6] = [
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

/// Generate a fresh character id
pub fn new_character_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// An equipment entry (armor and gear use this directly)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    /// Weight class (e.g., "Regular", "Minor", "Heavy")
    pub weight: String,
    pub special: String,
    pub quantity: u32,
    pub equipped: bool,
    pub stashed: bool,
    pub magical: bool,
    pub cursed: bool,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: "Regular".to_string(),
            special: String::new(),
            quantity: 1,
            equipped: false,
            stashed: false,
            magical: false,
            cursed: false,
        }
    }
}

impl Item {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// A weapon: an item with an attack bonus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Weapon {
    #[serde(flatten)]
    pub item: Item,
    pub bonus: i32,
}

/// A Whitehack character sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    /// Opaque unique identifier
    pub id: String,
    pub name: String,
    pub player_name: String,
    pub character_class: CharacterClass,
    /// 1-10
    pub level: u8,
    pub experience: u32,

    pub species: String,
    pub vocation: String,
    pub affiliations: Vec<String>,

    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    /// False when the sheet uses custom attributes
    pub use_default_attributes: bool,

    pub current_hp: i32,
    pub max_hp: i32,
    pub movement: i32,
    pub save_color: String,
    pub coins: i64,
    pub stashed_coins: i64,
    pub notes: String,
    pub languages: Vec<String>,

    pub weapons: Vec<Weapon>,
    pub armor: Vec<Item>,
    pub gear: Vec<Item>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deft_options: Option<DeftOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strong_options: Option<StrongOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wise_options: Option<WiseOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brave_options: Option<BraveOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clever_options: Option<CleverOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fortunate_options: Option<FortunateOptions>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            player_name: String::new(),
            character_class: CharacterClass::Deft,
            level: MIN_LEVEL,
            experience: 0,
            species: String::new(),
            vocation: String::new(),
            affiliations: Vec::new(),
            strength: DEFAULT_ATTRIBUTE,
            dexterity: DEFAULT_ATTRIBUTE,
            constitution: DEFAULT_ATTRIBUTE,
            intelligence: DEFAULT_ATTRIBUTE,
            wisdom: DEFAULT_ATTRIBUTE,
            charisma: DEFAULT_ATTRIBUTE,
            use_default_attributes: true,
            current_hp: 0,
            max_hp: 0,
            movement: 30,
            save_color: String::new(),
            coins: 0,
            stashed_coins: 0,
            notes: String::new(),
            languages: Vec::new(),
            weapons: Vec::new(),
            armor: Vec::new(),
            gear: Vec::new(),
            deft_options: None,
            strong_options: None,
            wise_options: None,
            brave_options: None,
            clever_options: None,
            fortunate_options: None,
        }
    }
}

impl Character {
    /// Create a new level 1 character with a fresh id and empty class slots
    pub fn new(name: &str, class: CharacterClass) -> Self {
        let mut character = Self {
            id: new_character_id(),
            name: name.to_string(),
            character_class: class,
            ..Self::default()
        };
        enforce_invariants(&mut character);
        character
    }

    /// Advancement stats for the current class and level
    pub fn stats(&self) -> CharacterStats {
        self.character_class.stats(self.level as i64)
    }

    /// Level the current experience qualifies for
    pub fn level_for_experience(&self) -> u8 {
        self.character_class.level_for_xp(self.experience as i64)
    }

    /// XP still needed for the next level, None at the top level
    pub fn xp_to_next_level(&self) -> Option<u32> {
        if self.level >= MAX_LEVEL {
            return None;
        }
        let needed = self.character_class.xp_requirement(self.level as i64 + 1);
        Some(needed.saturating_sub(self.experience))
    }

    /// Attribute scores in sheet order
    pub fn attributes(&self) -> [i32; 6] {
        [
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        ]
    }

    pub fn attributes_mut(&mut self) -> [&mut i32; 6] {
        [
            &mut self.strength,
            &mut self.dexterity,
            &mut self.constitution,
            &mut self.intelligence,
            &mut self.wisdom,
            &mut self.charisma,
        ]
    }

    /// Copy with a new level; class slots grow or shrink to match
    pub fn with_level(mut self, level: i64) -> Self {
        self.level = level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u8;
        enforce_invariants(&mut self);
        self
    }

    /// Copy with a new class; the new class's option block is created
    pub fn with_class(mut self, class: CharacterClass) -> Self {
        self.character_class = class;
        enforce_invariants(&mut self);
        self
    }

    /// Copy with added experience, raising the level if the XP allows it
    pub fn with_experience_gained(mut self, xp: u32) -> Self {
        self.experience = self.experience.saturating_add(xp);
        let earned = self.level_for_experience();
        if earned > self.level {
            return self.with_level(earned as i64);
        }
        self
    }

    /// Copy with a fresh id
    pub fn with_new_id(mut self) -> Self {
        self.id = new_character_id();
        self
    }
}
