//! Advancement table - per-class, per-level stats and experience thresholds
//!
//! Whitehack classes advance along fixed tables:
//! - Hit dice, attack value and saving value per level
//! - Slot and group counts that size the class abilities
//! - Experience thresholds for levels 2-10

mod class;
mod hit_dice;
mod table;

pub use class::CharacterClass;
pub use hit_dice::{parse_hit_dice, HitDice, HitDiceError};
pub use table::{
    level_for_xp, option_slot_capacity, stats, xp_requirement, CharacterStats, MAX_LEVEL,
    MIN_LEVEL,
};
