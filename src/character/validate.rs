//! Invariant enforcement for character records
//!
//! Every mutation of a character ends with `enforce_invariants`. Loading
//! only runs the safety passes (`clamp_attributes` and
//! `validate_miracle_actives`) so foreign data is kept as intact as possible.

use std::collections::HashSet;
use std::hash::Hash;

use super::options::{
    additional_miracles_for, AttunementSlot, BraveOptions, CleverOptions, DeftOptions,
    FortunateOptions, KnackSlot, MiracleSlot, QuirkSlot, StrongOptions, WiseOptions,
    MAGIC_ITEM_SLOT_INDEX, MAX_ATTUNEMENTS_PER_SLOT, MIN_ATTUNEMENTS_PER_SLOT,
    BASE_MIRACLES_PER_SLOT,
};
use super::record::{Character, MAX_ATTRIBUTE, MIN_ATTRIBUTE};
use crate::advancement::{option_slot_capacity, CharacterClass, MAX_LEVEL, MIN_LEVEL};

/// Clamp every attribute score into 1-20
pub fn clamp_attributes(character: &mut Character) {
    for score in character.attributes_mut() {
        *score = (*score).clamp(MIN_ATTRIBUTE, MAX_ATTRIBUTE);
    }
}

/// Keep only the first active miracle in each non-magic-item slot
pub fn validate_miracle_actives(character: &mut Character) {
    if let Some(wise) = character.wise_options.as_mut() {
        for slot in wise.miracle_slots.iter_mut().filter(|s| !s.is_magic_item) {
            keep_first_active(slot.miracles_mut().map(|m| &mut m.is_active));
        }
    }
}

/// Clear every active flag after the first
fn keep_first_active<'a>(flags: impl Iterator<Item = &'a mut bool>) {
    let mut seen = false;
    for flag in flags {
        if *flag {
            if seen {
                *flag = false;
            }
            seen = true;
        }
    }
}

/// Clear later slots holding a value already used by an earlier slot
fn dedupe_slots<'a, T>(slots: impl Iterator<Item = &'a mut Option<T>>)
where
    T: Eq + Hash + Copy + 'a,
{
    let mut seen = HashSet::new();
    for slot in slots {
        if let Some(value) = *slot {
            if !seen.insert(value) {
                *slot = None;
            }
        }
    }
}

/// Grow with `fill` or truncate from the end to exactly `len`
fn resize_with<T>(items: &mut Vec<T>, len: usize, fill: impl FnMut() -> T) {
    items.truncate(len);
    if items.len() < len {
        items.resize_with(len, fill);
    }
}

/// Bring a character back in line with every structural invariant
pub fn enforce_invariants(character: &mut Character) {
    character.level = character.level.clamp(MIN_LEVEL, MAX_LEVEL);
    clamp_attributes(character);

    let class = character.character_class;
    let level = character.level;
    let capacity = option_slot_capacity(class, level as i64);

    match class {
        CharacterClass::Deft => {
            enforce_deft(character.deft_options.get_or_insert_with(DeftOptions::default), capacity)
        }
        CharacterClass::Strong => enforce_strong(
            character
                .strong_options
                .get_or_insert_with(StrongOptions::default),
            capacity,
            level,
        ),
        CharacterClass::Wise => {
            let additional = additional_miracles_for(character.wisdom);
            enforce_wise(
                character.wise_options.get_or_insert_with(WiseOptions::default),
                capacity,
                additional,
            );
        }
        CharacterClass::Brave => enforce_brave(
            character
                .brave_options
                .get_or_insert_with(BraveOptions::default),
            capacity,
        ),
        CharacterClass::Clever => enforce_clever(
            character
                .clever_options
                .get_or_insert_with(CleverOptions::default),
            capacity,
        ),
        CharacterClass::Fortunate => enforce_fortunate(
            character
                .fortunate_options
                .get_or_insert_with(FortunateOptions::default),
            capacity,
        ),
    }

    validate_miracle_actives(character);
}

fn enforce_deft(options: &mut DeftOptions, capacity: usize) {
    resize_with(&mut options.attunement_slots, capacity, AttunementSlot::empty);
    for slot in &mut options.attunement_slots {
        slot.attunements.truncate(MAX_ATTUNEMENTS_PER_SLOT);
        if slot.attunements.len() < MIN_ATTUNEMENTS_PER_SLOT {
            slot.attunements
                .resize_with(MIN_ATTUNEMENTS_PER_SLOT, Default::default);
        }
        keep_first_active(slot.attunements.iter_mut().map(|a| &mut a.is_active));
    }
}

fn enforce_strong(options: &mut StrongOptions, capacity: usize, level: u8) {
    resize_with(&mut options.combat_options, capacity, || None);
    dedupe_slots(options.combat_options.iter_mut());
    options.conflict_loot.uses_remaining = options.conflict_loot.uses_remaining.min(level as u32);
}

fn enforce_wise(options: &mut WiseOptions, capacity: usize, additional: usize) {
    resize_with(&mut options.miracle_slots, capacity, || {
        MiracleSlot::empty(additional)
    });
    for (index, slot) in options.miracle_slots.iter_mut().enumerate() {
        if index != MAGIC_ITEM_SLOT_INDEX {
            slot.is_magic_item = false;
        }
        if !slot.is_magic_item {
            slot.magic_item_name.clear();
        }
        resize_with(&mut slot.base_miracles, BASE_MIRACLES_PER_SLOT, Default::default);
        if slot.additional_miracles.len() < additional {
            slot.additional_miracles.resize_with(additional, Default::default);
        }
    }
}

fn enforce_brave(options: &mut BraveOptions, capacity: usize) {
    resize_with(&mut options.quirk_slots, capacity, QuirkSlot::default);
    dedupe_slots(options.quirk_slots.iter_mut().map(|s| &mut s.quirk));
    for slot in &mut options.quirk_slots {
        if !slot.quirk.is_some_and(|q| q.has_protected_ally()) {
            slot.protected_ally.clear();
        }
    }
}

fn enforce_clever(options: &mut CleverOptions, capacity: usize) {
    resize_with(&mut options.knack_slots, capacity, KnackSlot::default);
    dedupe_slots(options.knack_slots.iter_mut().map(|s| &mut s.knack));
    for slot in &mut options.knack_slots {
        if !slot.knack.is_some_and(|k| k.is_daily()) {
            slot.used_today = false;
        }
    }
}

fn enforce_fortunate(options: &mut FortunateOptions, capacity: usize) {
    options.retainers.truncate(capacity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::options::Miracle;
    use crate::character::tokens::{CombatOption, Knack, Quirk};
    use crate::character::Retainer;

    fn miracle(name: &str, active: bool) -> Miracle {
        Miracle {
            name: name.to_string(),
            is_active: active,
        }
    }

    #[test]
    fn test_clamp_attributes() {
        let mut c = Character::default();
        c.strength = 99;
        c.dexterity = -5;
        c.wisdom = 0;
        clamp_attributes(&mut c);
        assert_eq!(c.strength, 20);
        assert_eq!(c.dexterity, 1);
        assert_eq!(c.wisdom, 1);
        assert_eq!(c.charisma, 10);
    }

    #[test]
    fn test_first_active_miracle_wins() {
        let mut c = Character::default();
        c.wise_options = Some(WiseOptions {
            miracle_slots: vec![
                MiracleSlot {
                    base_miracles: vec![miracle("A", false), miracle("B", true)],
                    additional_miracles: vec![miracle("C", true)],
                    ..Default::default()
                },
                MiracleSlot {
                    base_miracles: vec![miracle("D", false), miracle("E", false)],
                    additional_miracles: vec![miracle("F", true), miracle("G", true)],
                    ..Default::default()
                },
            ],
        });

        validate_miracle_actives(&mut c);

        let slots = &c.wise_options.as_ref().unwrap().miracle_slots;
        let active: Vec<Vec<bool>> = slots
            .iter()
            .map(|s| s.miracles().map(|m| m.is_active).collect())
            .collect();
        assert_eq!(active[0], vec![false, true, false]);
        assert_eq!(active[1], vec![false, false, true, false]);
    }

    #[test]
    fn test_magic_item_slot_skips_validation() {
        let mut c = Character::default();
        c.wise_options = Some(WiseOptions {
            miracle_slots: vec![MiracleSlot {
                base_miracles: vec![miracle("A", true), miracle("B", true)],
                is_magic_item: true,
                ..Default::default()
            }],
        });
        validate_miracle_actives(&mut c);
        let slot = &c.wise_options.as_ref().unwrap().miracle_slots[0];
        assert!(slot.base_miracles.iter().all(|m| m.is_active));
    }

    #[test]
    fn test_slots_grow_and_shrink_with_level() {
        let c = Character::new("Ayla", CharacterClass::Deft).with_level(9);
        assert_eq!(c.deft_options.as_ref().unwrap().attunement_slots.len(), 5);

        let mut c = c;
        c.deft_options.as_mut().unwrap().attunement_slots[0].attunements[0].name =
            "Kept".to_string();
        let c = c.with_level(1);
        let slots = &c.deft_options.as_ref().unwrap().attunement_slots;
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].attunements[0].name, "Kept");
    }

    #[test]
    fn test_attunements_bounded_and_exclusive() {
        let mut c = Character::new("Ayla", CharacterClass::Deft);
        let slot = &mut c.deft_options.as_mut().unwrap().attunement_slots[0];
        slot.attunements = vec![Default::default(); 6];
        slot.attunements[1].is_active = true;
        slot.attunements[3].is_active = true;

        enforce_invariants(&mut c);

        let slot = &c.deft_options.as_ref().unwrap().attunement_slots[0];
        assert_eq!(slot.attunements.len(), MAX_ATTUNEMENTS_PER_SLOT);
        assert_eq!(slot.attunements.iter().filter(|a| a.is_active).count(), 1);
        assert!(slot.attunements[1].is_active);
    }

    #[test]
    fn test_combat_options_unique() {
        let mut c = Character::new("Borg", CharacterClass::Strong).with_level(10);
        let strong = c.strong_options.as_mut().unwrap();
        strong.combat_options = vec![
            Some(CombatOption::Disarm),
            Some(CombatOption::Grapple),
            Some(CombatOption::Disarm),
            None,
        ];
        strong.conflict_loot.uses_remaining = 50;

        enforce_invariants(&mut c);

        let strong = c.strong_options.as_ref().unwrap();
        assert_eq!(
            strong.combat_options,
            vec![Some(CombatOption::Disarm), Some(CombatOption::Grapple), None, None]
        );
        assert_eq!(strong.conflict_loot.uses_remaining, 10);
    }

    #[test]
    fn test_quirks_unique_and_ally_only_for_protector() {
        let mut c = Character::new("Tess", CharacterClass::Brave).with_level(10);
        let brave = c.brave_options.as_mut().unwrap();
        assert_eq!(brave.quirk_slots.len(), 4);
        brave.quirk_slots[0] = QuirkSlot {
            quirk: Some(Quirk::Protector),
            protected_ally: "Ayla".to_string(),
        };
        brave.quirk_slots[1] = QuirkSlot {
            quirk: Some(Quirk::Protector),
            protected_ally: "Borg".to_string(),
        };
        brave.quirk_slots[2] = QuirkSlot {
            quirk: Some(Quirk::Lucky),
            protected_ally: "Nobody".to_string(),
        };

        enforce_invariants(&mut c);

        let slots = &c.brave_options.as_ref().unwrap().quirk_slots;
        assert_eq!(slots[0].protected_ally, "Ayla");
        assert_eq!(slots[1].quirk, None);
        assert!(slots[1].protected_ally.is_empty());
        assert!(slots[2].protected_ally.is_empty());
    }

    #[test]
    fn test_knacks_unique_and_daily_flag() {
        let mut c = Character::new("Quill", CharacterClass::Clever).with_level(4);
        let clever = c.clever_options.as_mut().unwrap();
        assert_eq!(clever.knack_slots.len(), 3);
        clever.knack_slots[0] = KnackSlot {
            knack: Some(Knack::Tactician),
            used_today: true,
        };
        clever.knack_slots[1] = KnackSlot {
            knack: Some(Knack::Scholar),
            used_today: true,
        };
        clever.knack_slots[2] = KnackSlot {
            knack: Some(Knack::Scholar),
            used_today: false,
        };

        enforce_invariants(&mut c);

        let slots = &c.clever_options.as_ref().unwrap().knack_slots;
        assert!(slots[0].used_today);
        assert!(!slots[1].used_today);
        assert_eq!(slots[2].knack, None);
    }

    #[test]
    fn test_wise_slots_and_magic_item_index() {
        let mut c = Character::new("Ayla", CharacterClass::Wise).with_level(5);
        c.wisdom = 16;
        let wise = c.wise_options.as_mut().unwrap();
        wise.miracle_slots[0].is_magic_item = true;
        wise.miracle_slots[1].is_magic_item = true;
        wise.miracle_slots[1].magic_item_name = "Staff".to_string();

        enforce_invariants(&mut c);

        let slots = &c.wise_options.as_ref().unwrap().miracle_slots;
        assert_eq!(slots.len(), 3);
        assert!(!slots[0].is_magic_item);
        assert!(slots[1].is_magic_item);
        assert_eq!(slots[1].magic_item_name, "Staff");
        assert!(slots.iter().all(|s| s.base_miracles.len() == 2));
        assert!(slots.iter().all(|s| s.additional_miracles.len() == 2));
    }

    #[test]
    fn test_extra_additional_miracles_are_kept() {
        let mut c = Character::new("Ayla", CharacterClass::Wise);
        c.wisdom = 10;
        c.wise_options.as_mut().unwrap().miracle_slots[0].additional_miracles =
            vec![miracle("Glow", false), miracle("Hush", false)];

        enforce_invariants(&mut c);

        let slot = &c.wise_options.as_ref().unwrap().miracle_slots[0];
        let names: Vec<&str> = slot.additional_miracles.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Glow", "Hush"]);

        // Wisdom still guarantees the minimum
        c.wisdom = 16;
        c.wise_options.as_mut().unwrap().miracle_slots[0].additional_miracles.clear();
        enforce_invariants(&mut c);
        let slot = &c.wise_options.as_ref().unwrap().miracle_slots[0];
        assert_eq!(slot.additional_miracles.len(), 2);
    }

    #[test]
    fn test_retainers_capped() {
        let mut c = Character::new("Lady Vell", CharacterClass::Fortunate);
        c.fortunate_options.as_mut().unwrap().retainers = vec![Retainer::default(); 3];
        enforce_invariants(&mut c);
        assert_eq!(c.fortunate_options.as_ref().unwrap().retainers.len(), 1);

        let c = c.with_level(10);
        assert_eq!(c.fortunate_options.as_ref().unwrap().retainers.len(), 1);
    }

    #[test]
    fn test_class_change_creates_block() {
        let c = Character::new("Ayla", CharacterClass::Deft).with_class(CharacterClass::Strong);
        assert!(c.strong_options.is_some());
        assert!(c.deft_options.is_some());
        assert_eq!(c.strong_options.as_ref().unwrap().combat_options.len(), 1);
    }
}
