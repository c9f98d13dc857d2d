//! Class-specific option blocks

use serde::{Deserialize, Serialize};

use super::tokens::{
    lenient_option, lenient_slots, lenient_token, AttunementType, CombatOption, Knack, LootType,
    Quirk,
};

/// Attunements each Deft slot starts with
pub const MIN_ATTUNEMENTS_PER_SLOT: usize = 2;

/// Attunements a Deft slot can hold
pub const MAX_ATTUNEMENTS_PER_SLOT: usize = 4;

/// Base miracles in every Wise slot
pub const BASE_MIRACLES_PER_SLOT: usize = 2;

/// Only the second Wise slot may hold a magic item
pub const MAGIC_ITEM_SLOT_INDEX: usize = 1;

/// Additional miracles per Wise slot granted by wisdom
pub fn additional_miracles_for(wisdom: i32) -> usize {
    match wisdom {
        w if w >= 16 => 2,
        w if w >= 13 => 1,
        _ => 0,
    }
}

// --- Deft ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeftOptions {
    pub attunement_slots: Vec<AttunementSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttunementSlot {
    pub attunements: Vec<Attunement>,
    pub used_today: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attunement {
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_token")]
    pub kind: AttunementType,
    pub is_active: bool,
}

impl AttunementSlot {
    /// An empty slot with the minimum number of attunements
    pub fn empty() -> Self {
        Self {
            attunements: vec![Attunement::default(); MIN_ATTUNEMENTS_PER_SLOT],
            used_today: false,
        }
    }

    /// The active attunement, if any
    pub fn active(&self) -> Option<&Attunement> {
        self.attunements.iter().find(|a| a.is_active)
    }
}

// --- Strong ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrongOptions {
    #[serde(deserialize_with = "lenient_slots")]
    pub combat_options: Vec<Option<CombatOption>>,
    pub conflict_loot: ConflictLoot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConflictLoot {
    pub keyword: String,
    #[serde(rename = "type", deserialize_with = "lenient_token")]
    pub kind: LootType,
    pub uses_remaining: u32,
}

// --- Wise ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WiseOptions {
    pub miracle_slots: Vec<MiracleSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MiracleSlot {
    pub base_miracles: Vec<Miracle>,
    pub additional_miracles: Vec<Miracle>,
    pub is_magic_item: bool,
    pub magic_item_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Miracle {
    pub name: String,
    pub is_active: bool,
}

impl MiracleSlot {
    /// An empty slot with the base miracles and `additional` extra entries
    pub fn empty(additional: usize) -> Self {
        Self {
            base_miracles: vec![Miracle::default(); BASE_MIRACLES_PER_SLOT],
            additional_miracles: vec![Miracle::default(); additional],
            is_magic_item: false,
            magic_item_name: String::new(),
        }
    }

    /// Base miracles followed by additional miracles
    pub fn miracles(&self) -> impl Iterator<Item = &Miracle> {
        self.base_miracles
            .iter()
            .chain(self.additional_miracles.iter())
    }

    pub fn miracles_mut(&mut self) -> impl Iterator<Item = &mut Miracle> {
        self.base_miracles
            .iter_mut()
            .chain(self.additional_miracles.iter_mut())
    }
}

// --- Brave ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BraveOptions {
    pub quirk_slots: Vec<QuirkSlot>,
    pub comeback_dice: u32,
    pub say_no_used: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuirkSlot {
    #[serde(deserialize_with = "lenient_option")]
    pub quirk: Option<Quirk>,
    /// Only meaningful for the Protector quirk
    pub protected_ally: String,
}

// --- Clever ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CleverOptions {
    pub knack_slots: Vec<KnackSlot>,
    pub unorthodox_bonus_used: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KnackSlot {
    #[serde(deserialize_with = "lenient_option")]
    pub knack: Option<Knack>,
    /// Only meaningful for daily knacks
    pub used_today: bool,
}

// --- Fortunate ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FortunateOptions {
    pub standing: String,
    pub fortune_used: bool,
    pub signature_object: String,
    pub retainers: Vec<Retainer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Retainer {
    pub name: String,
    pub current_hp: i32,
    pub max_hp: i32,
    pub hit_dice: String,
    pub defense: i32,
    pub movement: i32,
    pub notes: String,
    pub keywords: Vec<String>,
}

impl Default for Retainer {
    fn default() -> Self {
        Self {
            name: String::new(),
            current_hp: 0,
            max_hp: 0,
            hit_dice: "1".to_string(),
            defense: 0,
            movement: 30,
            notes: String::new(),
            keywords: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additional_miracles_for() {
        assert_eq!(additional_miracles_for(3), 0);
        assert_eq!(additional_miracles_for(12), 0);
        assert_eq!(additional_miracles_for(13), 1);
        assert_eq!(additional_miracles_for(16), 2);
        assert_eq!(additional_miracles_for(20), 2);
    }

    #[test]
    fn test_attunement_slot_reads_lowercase_type() {
        let slot: AttunementSlot = serde_json::from_value(serde_json::json!({
            "attunements": [
                {"name": "Old Master", "type": "teacher", "isActive": true},
                {"name": "Rope", "type": "unknown-thing"}
            ]
        }))
        .unwrap();

        assert_eq!(slot.attunements[0].kind, AttunementType::Teacher);
        assert_eq!(slot.attunements[1].kind, AttunementType::Other);
        assert_eq!(slot.active().map(|a| a.name.as_str()), Some("Old Master"));
        assert!(!slot.used_today);
    }

    #[test]
    fn test_combat_option_slots_keep_positions() {
        let opts: StrongOptions = serde_json::from_value(serde_json::json!({
            "combatOptions": ["Disarm", null, "3", "bogus"],
            "conflictLoot": {"keyword": "Troll blood", "type": "substance", "usesRemaining": 2}
        }))
        .unwrap();

        assert_eq!(
            opts.combat_options,
            vec![Some(CombatOption::Disarm), None, Some(CombatOption::ClimbFoe), None]
        );
        assert_eq!(opts.conflict_loot.kind, LootType::Substance);
        assert_eq!(opts.conflict_loot.uses_remaining, 2);
    }

    #[test]
    fn test_miracle_slot_iteration_order() {
        let mut slot = MiracleSlot::empty(1);
        slot.base_miracles[0].name = "Heal".to_string();
        slot.additional_miracles[0].name = "Bless".to_string();

        let names: Vec<&str> = slot.miracles().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Heal", "", "Bless"]);
    }

    #[test]
    fn test_retainer_defaults() {
        let r: Retainer = serde_json::from_value(serde_json::json!({"name": "Gus"})).unwrap();
        assert_eq!(r.name, "Gus");
        assert_eq!(r.hit_dice, "1");
        assert_eq!(r.movement, 30);
    }
}
