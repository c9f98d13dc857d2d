//! Static advancement tables
//!
//! One row per level for each class. Level 1 always requires 0 XP and is
//! not part of the threshold lookup.

use serde::Serialize;

use super::{parse_hit_dice, CharacterClass, HitDice, HitDiceError};

/// Lowest character level
pub const MIN_LEVEL: u8 = 1;

/// Highest character level
pub const MAX_LEVEL: u8 = 10;

/// Brave characters never hold more than four quirks
const BRAVE_MAX_QUIRKS: u8 = 4;

/// Clever characters never hold more than ten knacks
const CLEVER_MAX_KNACKS: u8 = 10;

/// Advancement stats for a class at a given level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStats {
    /// Hit dice expression (e.g., "2+1", "1+1*")
    pub hit_dice: &'static str,
    /// Attack value
    pub attack_value: u8,
    /// Saving value
    pub saving_value: u8,
    /// Ability slots
    pub slots: u8,
    /// Group slots
    pub groups: u8,
    /// Attribute raises gained at this level ("-" at level 1)
    pub raises: &'static str,
}

impl CharacterStats {
    /// Parse the hit dice expression
    pub fn parsed_hit_dice(&self) -> Result<HitDice, HitDiceError> {
        parse_hit_dice(self.hit_dice)
    }
}

/// One table row: (xp, hd, av, sv, slots, groups, raises)
type Row = (u32, &'static str, u8, u8, u8, u8, &'static str);

#[rustfmt::skip]
static DEFT: [Row; 10] = [
    (0,      "1",   10, 7,  1, 2, "-"),
    (1500,   "2",   11, 8,  1, 2, "1"),
    (3000,   "2+1", 11, 9,  2, 3, "1"),
    (6000,   "3",   12, 10, 2, 3, "2"),
    (12000,  "3+1", 12, 11, 3, 4, "2"),
    (24000,  "4",   13, 12, 3, 4, "3"),
    (48000,  "4+1", 13, 13, 4, 5, "3"),
    (96000,  "5",   14, 14, 4, 5, "4"),
    (192000, "5+1", 14, 15, 5, 6, "4"),
    (384000, "6",   15, 16, 5, 6, "5"),
];

#[rustfmt::skip]
static STRONG: [Row; 10] = [
    (0,      "1+2", 11, 5,  1, 2, "-"),
    (2000,   "2",   11, 6,  1, 2, "1"),
    (4000,   "3",   12, 7,  1, 2, "2"),
    (8000,   "4",   13, 8,  2, 3, "2"),
    (16000,  "5",   13, 9,  2, 3, "3"),
    (32000,  "6",   14, 10, 2, 3, "3"),
    (64000,  "7",   15, 11, 3, 4, "4"),
    (128000, "8",   15, 12, 3, 4, "4"),
    (256000, "9",   16, 13, 3, 4, "5"),
    (512000, "10",  17, 14, 4, 5, "5"),
];

#[rustfmt::skip]
static WISE: [Row; 10] = [
    (0,      "1+1", 10, 6,  1, 2, "-"),
    (2500,   "2",   10, 7,  1, 2, "1"),
    (5000,   "2+1", 11, 8,  2, 3, "1"),
    (10000,  "3",   11, 9,  2, 3, "2"),
    (20000,  "3+1", 12, 10, 3, 4, "2"),
    (40000,  "4",   12, 11, 3, 4, "3"),
    (80000,  "4+1", 13, 12, 4, 5, "3"),
    (160000, "5",   13, 13, 4, 5, "4"),
    (320000, "5+1", 14, 14, 5, 6, "4"),
    (640000, "6",   14, 15, 5, 6, "5"),
];

// '*' marks levels where the Brave rolls hit dice with a comeback die
#[rustfmt::skip]
static BRAVE: [Row; 10] = [
    (0,      "1+1*", 10, 7,  1, 1, "-"),
    (2250,   "2",    10, 8,  1, 1, "1"),
    (4500,   "2+1*", 11, 9,  1, 2, "1"),
    (9000,   "3",    11, 10, 2, 2, "2"),
    (18000,  "3+1*", 12, 11, 2, 2, "2"),
    (36000,  "4",    12, 12, 2, 3, "3"),
    (72000,  "4+1*", 13, 13, 3, 3, "3"),
    (144000, "5",    13, 14, 3, 3, "4"),
    (288000, "5+1*", 14, 15, 3, 4, "4"),
    (576000, "6",    14, 16, 4, 4, "5"),
];

#[rustfmt::skip]
static CLEVER: [Row; 10] = [
    (0,      "1",   10, 7,  1,  2, "-"),
    (1750,   "1+1", 10, 8,  2,  2, "1"),
    (3500,   "2",   11, 9,  2,  2, "1"),
    (7000,   "2+1", 11, 10, 3,  3, "2"),
    (14000,  "3",   12, 11, 4,  3, "2"),
    (28000,  "3+1", 12, 12, 5,  3, "3"),
    (56000,  "4",   13, 13, 6,  4, "3"),
    (112000, "4+1", 13, 14, 7,  4, "4"),
    (224000, "5",   14, 15, 8,  4, "4"),
    (448000, "5+1", 14, 16, 10, 5, "5"),
];

#[rustfmt::skip]
static FORTUNATE: [Row; 10] = [
    (0,      "1",   10, 7,  1, 2, "-"),
    (2750,   "2",   10, 8,  1, 2, "1"),
    (5500,   "2+1", 11, 9,  2, 2, "1"),
    (11000,  "3",   11, 10, 2, 3, "2"),
    (22000,  "3+1", 12, 11, 3, 3, "2"),
    (44000,  "4",   12, 12, 3, 3, "3"),
    (88000,  "4+1", 13, 13, 4, 4, "3"),
    (176000, "5",   13, 14, 4, 4, "4"),
    (352000, "5+1", 14, 15, 5, 4, "4"),
    (704000, "6",   14, 16, 5, 5, "5"),
];

fn rows(class: CharacterClass) -> &'static [Row; 10] {
    match class {
        CharacterClass::Deft => &DEFT,
        CharacterClass::Strong => &STRONG,
        CharacterClass::Wise => &WISE,
        CharacterClass::Brave => &BRAVE,
        CharacterClass::Clever => &CLEVER,
        CharacterClass::Fortunate => &FORTUNATE,
    }
}

fn clamp_level(level: i64, min: u8) -> usize {
    level.clamp(min as i64, MAX_LEVEL as i64) as usize
}

impl CharacterClass {
    /// Stats for this class at `level` (clamped to 1-10)
    pub fn stats(&self, level: i64) -> CharacterStats {
        let (_, hit_dice, attack_value, saving_value, slots, groups, raises) =
            rows(*self)[clamp_level(level, MIN_LEVEL) - 1];
        CharacterStats {
            hit_dice,
            attack_value,
            saving_value,
            slots,
            groups,
            raises,
        }
    }

    /// XP needed to reach `target_level` (clamped to 2-10)
    pub fn xp_requirement(&self, target_level: i64) -> u32 {
        rows(*self)[clamp_level(target_level, MIN_LEVEL + 1) - 1].0
    }

    /// Highest level whose XP threshold is met
    pub fn level_for_xp(&self, xp: i64) -> u8 {
        if xp <= 0 {
            return MIN_LEVEL;
        }
        (MIN_LEVEL + 1..=MAX_LEVEL)
            .rev()
            .find(|&level| self.xp_requirement(level as i64) as i64 <= xp)
            .unwrap_or(MIN_LEVEL)
    }
}

/// Look up stats by class name. Unknown classes get the Deft level 1 row.
pub fn stats(class: &str, level: i64) -> CharacterStats {
    match CharacterClass::parse(class) {
        Some(c) => c.stats(level),
        None => CharacterClass::Deft.stats(MIN_LEVEL as i64),
    }
}

/// XP threshold for `target_level`. Unknown classes require 0.
pub fn xp_requirement(class: &str, target_level: i64) -> u32 {
    CharacterClass::parse(class)
        .map(|c| c.xp_requirement(target_level))
        .unwrap_or(0)
}

/// Level reached with `xp` experience. Unknown classes stay at level 1.
pub fn level_for_xp(class: &str, xp: i64) -> u8 {
    CharacterClass::parse(class)
        .map(|c| c.level_for_xp(xp))
        .unwrap_or(MIN_LEVEL)
}

/// Number of class-option slots (attunements, combat options, miracles,
/// quirks, knacks or retainers) a character of `class` holds at `level`
pub fn option_slot_capacity(class: CharacterClass, level: i64) -> usize {
    let slots = class.stats(level).slots;
    let capped = match class {
        CharacterClass::Brave => slots.min(BRAVE_MAX_QUIRKS),
        CharacterClass::Clever => slots.min(CLEVER_MAX_KNACKS),
        _ => slots,
    };
    capped as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_deft_table() {
        let expected = [
            ("1", 10, 7, 1, 2, "-"),
            ("2", 11, 8, 1, 2, "1"),
            ("2+1", 11, 9, 2, 3, "1"),
            ("3", 12, 10, 2, 3, "2"),
            ("3+1", 12, 11, 3, 4, "2"),
            ("4", 13, 12, 3, 4, "3"),
            ("4+1", 13, 13, 4, 5, "3"),
            ("5", 14, 14, 4, 5, "4"),
            ("5+1", 14, 15, 5, 6, "4"),
            ("6", 15, 16, 5, 6, "5"),
        ];
        for (i, (hd, av, sv, slots, groups, raises)) in expected.into_iter().enumerate() {
            let s = stats("Deft", i as i64 + 1);
            assert_eq!(
                s,
                CharacterStats {
                    hit_dice: hd,
                    attack_value: av,
                    saving_value: sv,
                    slots,
                    groups,
                    raises,
                },
                "level {}",
                i + 1
            );
        }
    }

    #[test]
    fn test_strong_and_wise_rows() {
        let s = stats("Strong", 1);
        assert_eq!(s.hit_dice, "1+2");
        assert_eq!(s.attack_value, 11);
        assert_eq!(s.saving_value, 5);

        let w = stats("Wise", 10);
        assert_eq!(w.hit_dice, "6");
        assert_eq!(w.attack_value, 14);
        assert_eq!(w.saving_value, 15);
        assert_eq!(w.slots, 5);
        assert_eq!(w.raises, "5");
    }

    #[test]
    fn test_level_clamping() {
        for class in CharacterClass::iter() {
            let name = class.as_str();
            assert_eq!(stats(name, 0), stats(name, 1));
            assert_eq!(stats(name, -5), stats(name, 1));
            assert_eq!(stats(name, 11), stats(name, 10));
            assert_eq!(stats(name, i64::MAX), stats(name, 10));
        }
    }

    #[test]
    fn test_raises_dash_at_level_one() {
        for class in CharacterClass::iter() {
            assert_eq!(class.stats(1).raises, "-");
            assert_ne!(class.stats(2).raises, "-");
        }
    }

    #[test]
    fn test_unknown_class_falls_back() {
        assert_eq!(stats("Necromancer", 7), stats("Deft", 1));
        assert_eq!(xp_requirement("Necromancer", 5), 0);
        assert_eq!(level_for_xp("Necromancer", 1_000_000), 1);
    }

    #[test]
    fn test_xp_requirement_clamping() {
        assert_eq!(xp_requirement("Deft", 1), 1500);
        assert_eq!(xp_requirement("Deft", 2), 1500);
        assert_eq!(xp_requirement("Deft", 10), 384000);
        assert_eq!(xp_requirement("Deft", 42), 384000);
        assert_eq!(xp_requirement("Wise", 3), 5000);
    }

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp("Deft", 0), 1);
        assert_eq!(level_for_xp("Deft", -100), 1);
        assert_eq!(level_for_xp("Deft", 1499), 1);
        assert_eq!(level_for_xp("Deft", 1500), 2);
        assert_eq!(level_for_xp("Deft", 5999), 3);
        assert_eq!(level_for_xp("Strong", 16000), 5);
        assert_eq!(level_for_xp("Wise", 10_000_000), 10);
    }

    #[test]
    fn test_level_for_xp_monotonic() {
        for class in CharacterClass::iter() {
            let top = class.xp_requirement(10) as i64;
            let mut previous = class.level_for_xp(0);
            assert_eq!(previous, 1);
            for xp in (0..=top + 1000).step_by(250) {
                let level = class.level_for_xp(xp);
                assert!(level >= previous, "{} at {} xp", class, xp);
                previous = level;
            }
            assert_eq!(class.level_for_xp(top), 10);
        }
    }

    #[test]
    fn test_hit_dice_all_parse() {
        for class in CharacterClass::iter() {
            for level in 1..=10 {
                assert!(class.stats(level).parsed_hit_dice().is_ok());
            }
        }
    }

    #[test]
    fn test_option_slot_capacity() {
        assert_eq!(option_slot_capacity(CharacterClass::Deft, 1), 1);
        assert_eq!(option_slot_capacity(CharacterClass::Deft, 10), 5);
        assert_eq!(option_slot_capacity(CharacterClass::Brave, 10), 4);
        assert_eq!(option_slot_capacity(CharacterClass::Clever, 10), 10);
        assert_eq!(option_slot_capacity(CharacterClass::Clever, 99), 10);
    }
}
