//! Character records - the canonical sheet model
//!
//! Records are plain values. Edits produce a new copy and finish with
//! `enforce_invariants`, which keeps class slots sized to the advancement
//! table, enum slots unique and active flags exclusive.

mod options;
mod record;
mod tokens;
mod validate;

pub use options::{
    additional_miracles_for, Attunement, AttunementSlot, BraveOptions, CleverOptions,
    ConflictLoot, DeftOptions, FortunateOptions, KnackSlot, Miracle, MiracleSlot, QuirkSlot,
    Retainer, StrongOptions, WiseOptions, BASE_MIRACLES_PER_SLOT, MAGIC_ITEM_SLOT_INDEX,
    MAX_ATTUNEMENTS_PER_SLOT, MIN_ATTUNEMENTS_PER_SLOT,
};
pub use record::{
    new_character_id, Character, Item, Weapon, ATTRIBUTE_KEYS, DEFAULT_ATTRIBUTE, MAX_ATTRIBUTE,
    MIN_ATTRIBUTE,
};
pub use tokens::{parse_token, AttunementType, CombatOption, Knack, LootType, Quirk};
pub use validate::{clamp_attributes, enforce_invariants, validate_miracle_actives};
