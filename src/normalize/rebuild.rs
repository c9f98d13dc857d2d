//! Structural rebuild of character records into the canonical shape
//!
//! Each record is rebuilt key by key into a new object. Only canonical keys
//! are copied, so keys that exist only in the sibling app's schema (item
//! ids, `isLost`, `isAdditional`, retainer `attitude`, Brave
//! `protectedAllyName`, Clever `combatDieUsed`, ...) fall away. Optional
//! grouped fields and default-valued attributes are omitted rather than
//! written empty.

use serde_json::{Map, Value};

use super::fields::{as_bool, as_int, as_string, as_string_list, title_case, Fields};
use crate::advancement::{CharacterClass, MAX_LEVEL, MIN_LEVEL};
use crate::character::{ATTRIBUTE_KEYS, DEFAULT_ATTRIBUTE};

type Object = Map<String, Value>;

/// Rebuild one character record
pub fn rebuild_character(src: &Object) -> Object {
    let mut f = Fields::new(src);

    f.string("id").string_or("name", "").string_or("playerName", "");

    let class = f
        .get("characterClass")
        .and_then(as_string)
        .map(|s| CharacterClass::parse_or_default(&s))
        .unwrap_or_default();
    f.put("characterClass", class.as_str());

    let level = f
        .get("level")
        .and_then(as_int)
        .unwrap_or(MIN_LEVEL as i64)
        .clamp(MIN_LEVEL as i64, MAX_LEVEL as i64);
    f.put("level", level);
    f.count("experience");

    grouped_string(&mut f, "species", "speciesGroup");
    grouped_string(&mut f, "vocation", "vocationGroup");
    affiliations(&mut f);
    attributes(&mut f);

    let use_default = f
        .get("useDefaultAttributes")
        .and_then(as_bool)
        .or_else(|| f.get("useCustomAttributes").and_then(as_bool).map(|c| !c))
        .unwrap_or(true);
    if !use_default {
        f.put("useDefaultAttributes", false);
    }

    f.int("currentHp")
        .int("maxHp")
        .int("movement")
        .string("saveColor")
        .long("coins")
        .long("stashedCoins")
        .string("notes")
        .strings("languages");

    f.objects("weapons", rebuild_weapon)
        .objects("armor", rebuild_item)
        .objects("gear", rebuild_item);

    f.object("deftOptions", rebuild_deft)
        .object("strongOptions", rebuild_strong)
        .object("wiseOptions", rebuild_wise)
        .object("braveOptions", rebuild_brave)
        .object("cleverOptions", rebuild_clever)
        .object("fortunateOptions", rebuild_fortunate);

    f.finish()
}

/// Direct key wins over the "Group" key; empty values are omitted
fn grouped_string(f: &mut Fields<'_>, direct: &str, group: &str) {
    let value = [direct, group]
        .iter()
        .filter_map(|k| f.get(k).and_then(as_string))
        .find(|s| !s.trim().is_empty());
    if let Some(v) = value {
        f.put(direct, v);
    }
}

fn affiliations(f: &mut Fields<'_>) {
    let list = ["affiliations", "affiliationGroups"]
        .iter()
        .filter_map(|k| f.get(k).and_then(as_string_list))
        .find(|l| !l.is_empty());
    if let Some(list) = list {
        f.put("affiliations", list);
    }
}

/// Scores may sit at the top level or inside an `attributes` wrapper
fn attributes(f: &mut Fields<'_>) {
    let wrapper = f.get("attributes").and_then(Value::as_object);
    for key in ATTRIBUTE_KEYS {
        let score = f
            .get(key)
            .and_then(as_int)
            .or_else(|| wrapper.and_then(|w| w.get(key)).and_then(as_int));
        let score = score.map(|s| s.clamp(i32::MIN as i64, i32::MAX as i64));
        if let Some(score) = score.filter(|s| *s != DEFAULT_ATTRIBUTE as i64) {
            f.put(key, score);
        }
    }
}

/// Slot tokens are strings; numeric codes become their string form
fn token(value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        Value::Number(n) => Value::String(n.to_string()),
        _ => Value::Null,
    }
}

fn copy_token(f: &mut Fields<'_>, key: &str) {
    if let Some(v) = f.get(key) {
        f.put(key, token(v));
    }
}

// --- Equipment ---

fn rebuild_item(src: &Object) -> Object {
    Fields::new(src)
        .string("name")
        .string("weight")
        .string("special")
        .count("quantity")
        .bool("equipped")
        .bool("stashed")
        .bool("magical")
        .bool("cursed")
        .finish()
}

fn rebuild_weapon(src: &Object) -> Object {
    let mut out = rebuild_item(src);
    out.extend(Fields::new(src).int("bonus").finish());
    out
}

// --- Deft ---

fn rebuild_deft(src: &Object) -> Object {
    Fields::new(src)
        .objects("attunementSlots", rebuild_attunement_slot)
        .finish()
}

fn rebuild_attunement_slot(src: &Object) -> Object {
    Fields::new(src)
        .objects("attunements", rebuild_attunement)
        .bool("usedToday")
        .finish()
}

fn rebuild_attunement(src: &Object) -> Object {
    let mut f = Fields::new(src);
    f.string("name");
    if let Some(kind) = f.get("type").and_then(as_string) {
        f.put("type", kind.trim().to_uppercase());
    }
    f.bool("isActive");
    f.finish()
}

// --- Strong ---

fn rebuild_strong(src: &Object) -> Object {
    let mut f = Fields::new(src);
    if let Some(Value::Array(slots)) = f.get("combatOptions") {
        let slots: Vec<Value> = slots.iter().map(token).collect();
        f.put("combatOptions", slots);
    }
    f.object("conflictLoot", rebuild_conflict_loot);
    f.finish()
}

fn rebuild_conflict_loot(src: &Object) -> Object {
    let mut f = Fields::new(src);
    f.string("keyword");
    if let Some(kind) = f.get("type").and_then(as_string) {
        f.put("type", title_case(&kind));
    }
    f.count("usesRemaining");
    f.finish()
}

// --- Wise ---

fn rebuild_wise(src: &Object) -> Object {
    Fields::new(src)
        .objects("miracleSlots", rebuild_miracle_slot)
        .finish()
}

fn rebuild_miracle_slot(src: &Object) -> Object {
    let mut f = Fields::new(src);

    if src.contains_key("baseMiracles") || src.contains_key("additionalMiracles") {
        f.objects("baseMiracles", rebuild_miracle)
            .objects("additionalMiracles", rebuild_miracle);
    } else if let Some(Value::Array(miracles)) = f.get("miracles") {
        // Single list tagged with isAdditional
        let (additional, base): (Vec<&Object>, Vec<&Object>) = miracles
            .iter()
            .filter_map(Value::as_object)
            .partition(|m| m.get("isAdditional").and_then(as_bool).unwrap_or(false));
        let rebuild_all = |list: Vec<&Object>| -> Vec<Value> {
            list.into_iter()
                .map(|m| Value::Object(rebuild_miracle(m)))
                .collect()
        };
        f.put("baseMiracles", rebuild_all(base));
        f.put("additionalMiracles", rebuild_all(additional));
    }

    let magic_item = f
        .get("isMagicItem")
        .and_then(as_bool)
        .or_else(|| f.get("isMagicItemSlot").and_then(as_bool));
    if let Some(magic_item) = magic_item {
        f.put("isMagicItem", magic_item);
    }
    f.string("magicItemName");
    f.finish()
}

fn rebuild_miracle(src: &Object) -> Object {
    Fields::new(src).string("name").bool("isActive").finish()
}

// --- Brave ---

fn rebuild_brave(src: &Object) -> Object {
    Fields::new(src)
        .objects("quirkSlots", rebuild_quirk_slot)
        .count("comebackDice")
        .bool("sayNoUsed")
        .finish()
}

fn rebuild_quirk_slot(src: &Object) -> Object {
    let mut f = Fields::new(src);
    copy_token(&mut f, "quirk");
    f.string("protectedAlly");
    f.finish()
}

// --- Clever ---

fn rebuild_clever(src: &Object) -> Object {
    Fields::new(src)
        .objects("knackSlots", rebuild_knack_slot)
        .bool("unorthodoxBonusUsed")
        .finish()
}

fn rebuild_knack_slot(src: &Object) -> Object {
    let mut f = Fields::new(src);
    copy_token(&mut f, "knack");
    f.bool("usedToday");
    f.finish()
}

// --- Fortunate ---

fn rebuild_fortunate(src: &Object) -> Object {
    Fields::new(src)
        .string("standing")
        .bool("fortuneUsed")
        .string("signatureObject")
        .objects("retainers", rebuild_retainer)
        .finish()
}

fn rebuild_retainer(src: &Object) -> Object {
    let mut f = Fields::new(src);
    f.string("name")
        .int("currentHp")
        .int("maxHp")
        .string("hitDice");
    let defense = f
        .get("defense")
        .and_then(as_int)
        .or_else(|| f.get("defenseValue").and_then(as_int));
    if let Some(defense) = defense {
        f.put("defense", defense.clamp(i32::MIN as i64, i32::MAX as i64));
    }
    f.int("movement").string("notes").strings("keywords");
    f.finish()
}
