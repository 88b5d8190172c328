//! Loot generation system.
//!
//! Items are assembled from rarity-indexed prefixes, a material fragment, a
//! type-specific base noun and (rare and above) a suffix. Stats scale by
//! `level * rarity multiplier` with a little random variance.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{ITEM_BASE_VALUE, RARITY_WEIGHTS};

/// Item rarity, ordered common -> legendary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Scalar applied to stats and value
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.5,
            Self::Rare => 2.5,
            Self::Epic => 4.0,
            Self::Legendary => 8.0,
        }
    }

    /// Drop weight (lower = rarer)
    pub fn drop_weight(&self) -> u32 {
        RARITY_WEIGHTS[*self as usize]
    }

    pub fn has_suffix(&self) -> bool {
        *self >= Self::Rare
    }

    fn prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::Common => &["Worn", "Crude", "Basic"],
            Self::Uncommon => &["Sharp", "Sturdy", "Reliable"],
            Self::Rare => &["Masterwork", "Enchanted", "Gleaming"],
            Self::Epic => &["Ancient", "Mythic", "Forged"],
            Self::Legendary => &["Godslayer", "Eternal", "Divine"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
    Accessory,
    Material,
    Quest,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Weapon,
        ItemType::Armor,
        ItemType::Consumable,
        ItemType::Accessory,
        ItemType::Material,
        ItemType::Quest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Consumable => "consumable",
            Self::Accessory => "accessory",
            Self::Material => "material",
            Self::Quest => "quest",
        }
    }
}

const WEAPON_NAMES: &[&str] = &[
    "Sword", "Axe", "Dagger", "Spear", "Mace", "Bow", "Staff", "Wand", "Crossbow", "Halberd",
];
const ARMOR_NAMES: &[&str] = &[
    "Helmet",
    "Chestplate",
    "Gauntlets",
    "Greaves",
    "Shield",
    "Cloak",
];
const ACCESSORY_NAMES: &[&str] = &["Ring", "Amulet", "Circlet", "Charm", "Bracelet"];
const MATERIAL_NAMES: &[&str] = &["Ingot", "Shard", "Ore", "Dust", "Scale"];
const QUEST_NAMES: &[&str] = &["Relic", "Sigil", "Seal", "Idol", "Tablet"];
const POTION_EFFECTS: &[&str] = &["Power", "Healing", "Swiftness", "Warding", "Clarity"];
const MATERIALS: &[&str] = &[
    "Iron",
    "Steel",
    "Mithril",
    "Adamantite",
    "Shadow-",
    "Dragon-",
    "Crystal-",
    "Void-",
];
const SUFFIXES: &[&str] = &[
    "of Power",
    "of Speed",
    "of Protection",
    "of Fire",
    "of Ice",
    "of Lightning",
    "of the Bear",
    "of the Fox",
    "of the Eagle",
    "of Destruction",
];
const FLAVOR: &[&str] = &[
    "Found in ancient ruins.",
    "Crafted by master artisans.",
    "Imbued with magical energies.",
    "Passed down through generations.",
];

/// Generated loot item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub id: String,
    pub name: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub level: u32,
    pub stats: BTreeMap<String, f64>,
    pub description: String,
    pub value: u64,
}

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// "Shadow-" fuses with the noun, plain materials are separate words
fn with_material(material: &str, base: &str) -> String {
    if material.ends_with('-') {
        format!("{material}{base}")
    } else {
        format!("{material} {base}")
    }
}

/// Running totals of [`RARITY_WEIGHTS`], fixed at compile time
const RARITY_THRESHOLDS: [u32; 5] = {
    let mut thresholds = [0u32; 5];
    let mut total = 0;
    let mut i = 0;
    while i < RARITY_WEIGHTS.len() {
        total += RARITY_WEIGHTS[i];
        thresholds[i] = total;
        i += 1;
    }
    thresholds
};

/// Stateless item generator; all randomness comes from the caller's RNG
pub struct ItemSynthesizer;

impl ItemSynthesizer {
    /// Weighted draw over `[50, 30, 15, 4, 1]`
    pub fn roll_rarity<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
        let total = RARITY_THRESHOLDS[RARITY_THRESHOLDS.len() - 1];
        let roll = rng.gen_range(0..total);
        Rarity::ALL[RARITY_THRESHOLDS.partition_point(|&t| t <= roll)]
    }

    pub fn random_item<R: Rng + ?Sized>(rng: &mut R, level: u32) -> GeneratedItem {
        let rarity = Self::roll_rarity(rng);
        let item_type = ItemType::ALL[rng.gen_range(0..ItemType::ALL.len())];
        Self::make_item(rng, item_type, rarity, level)
    }

    /// Build an item of a fixed type and rarity. Level 0 is treated as 1.
    pub fn make_item<R: Rng + ?Sized>(
        rng: &mut R,
        item_type: ItemType,
        rarity: Rarity,
        level: u32,
    ) -> GeneratedItem {
        let level = level.max(1);
        let lvl = f64::from(level);
        let mult = rarity.multiplier();

        let prefix = pick(rng, rarity.prefixes());
        let material = pick(rng, MATERIALS);
        let suffix = if rarity.has_suffix() {
            Some(pick(rng, SUFFIXES))
        } else {
            None
        };

        let mut stats = BTreeMap::new();
        let base_name = match item_type {
            ItemType::Weapon => {
                stats.insert("damage".into(), round_to(rng.gen_range(5.0..15.0) * lvl * mult, 1));
                stats.insert("attack_speed".into(), round_to(rng.gen_range(0.8..1.5), 2));
                stats.insert("crit_chance".into(), round_to(rng.gen_range(0.02..0.1) * mult, 3));
                with_material(material, pick(rng, WEAPON_NAMES))
            }
            ItemType::Armor => {
                stats.insert("defense".into(), round_to(rng.gen_range(3.0..10.0) * lvl * mult, 1));
                stats.insert("hp_bonus".into(), round_to(rng.gen_range(0.0..20.0) * lvl * mult, 1));
                stats.insert("weight".into(), round_to(rng.gen_range(1.0..5.0), 1));
                with_material(material, pick(rng, ARMOR_NAMES))
            }
            ItemType::Accessory => {
                stats.insert("crit_chance".into(), round_to(rng.gen_range(0.01..0.05) * mult, 3));
                stats.insert("luck".into(), round_to(rng.gen_range(1.0..5.0) * mult, 1));
                stats.insert("mana_bonus".into(), round_to(rng.gen_range(2.0..12.0) * lvl * mult, 1));
                with_material(material, pick(rng, ACCESSORY_NAMES))
            }
            ItemType::Consumable => {
                stats.insert("effect_value".into(), (50.0 * lvl * mult).round());
                stats.insert("duration_secs".into(), 30.0);
                format!("Potion of {}", pick(rng, POTION_EFFECTS))
            }
            ItemType::Material => {
                stats.insert("purity".into(), round_to((rng.gen_range(0.3..0.7) * mult).min(1.0), 2));
                stats.insert("stack_size".into(), f64::from(rng.gen_range(1u32..=10)));
                with_material(material, pick(rng, MATERIAL_NAMES))
            }
            ItemType::Quest => {
                stats.insert("significance".into(), round_to(lvl * mult, 1));
                with_material(material, pick(rng, QUEST_NAMES))
            }
        };

        let name = match suffix {
            Some(suffix) => format!("{prefix} {base_name} {suffix}"),
            None => format!("{prefix} {base_name}"),
        };
        let value = (ITEM_BASE_VALUE * lvl * mult * rng.gen_range(0.8..1.2)).floor() as u64;
        let description = format!(
            "A {} {}. {}",
            rarity.as_str(),
            item_type.as_str(),
            pick(rng, FLAVOR)
        );
        let id = format!("{:06x}", rng.gen::<u32>() & 0x00FF_FFFF);

        GeneratedItem {
            id,
            name,
            item_type,
            rarity,
            level,
            stats,
            description,
            value,
        }
    }

    pub fn loot_table<R: Rng + ?Sized>(rng: &mut R, count: usize, level: u32) -> Vec<GeneratedItem> {
        (0..count).map(|_| Self::random_item(rng, level)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::rng_from_seed;

    #[test]
    fn test_random_item_deterministic() {
        let a = ItemSynthesizer::random_item(&mut rng_from_seed(42), 10);
        let b = ItemSynthesizer::random_item(&mut rng_from_seed(42), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rarity_thresholds_cover_weights() {
        assert_eq!(RARITY_THRESHOLDS, [50, 80, 95, 99, 100]);
        assert_eq!(RARITY_THRESHOLDS[4], RARITY_WEIGHTS.iter().sum::<u32>());
    }

    #[test]
    fn test_roll_rarity_reaches_every_tier() {
        let mut rng = rng_from_seed(11);
        let mut seen = BTreeMap::new();
        for _ in 0..20_000 {
            *seen.entry(ItemSynthesizer::roll_rarity(&mut rng)).or_insert(0u32) += 1;
        }
        assert_eq!(seen.len(), Rarity::ALL.len());
        assert!(seen[&Rarity::Common] > seen[&Rarity::Legendary]);
    }

    #[test]
    fn test_rarity_ordering_and_multiplier() {
        assert!(Rarity::Common < Rarity::Legendary);
        for pair in Rarity::ALL.windows(2) {
            assert!(pair[0].multiplier() < pair[1].multiplier());
            assert!(pair[0].drop_weight() > pair[1].drop_weight());
        }
    }

    #[test]
    fn test_suffix_only_rare_and_above() {
        let mut rng = rng_from_seed(3);
        for _ in 0..50 {
            let common = ItemSynthesizer::make_item(&mut rng, ItemType::Weapon, Rarity::Common, 1);
            assert!(!common.name.contains(" of "), "unexpected suffix: {}", common.name);
            let epic = ItemSynthesizer::make_item(&mut rng, ItemType::Weapon, Rarity::Epic, 1);
            assert!(epic.name.contains(" of "), "missing suffix: {}", epic.name);
        }
    }

    #[test]
    fn test_weapon_stats_scale_with_rarity() {
        let mut common_total = 0.0;
        let mut legendary_total = 0.0;
        let mut rng = rng_from_seed(11);
        for _ in 0..200 {
            let c = ItemSynthesizer::make_item(&mut rng, ItemType::Weapon, Rarity::Common, 5);
            let l = ItemSynthesizer::make_item(&mut rng, ItemType::Weapon, Rarity::Legendary, 5);
            common_total += c.stats["damage"];
            legendary_total += l.stats["damage"];
        }
        assert!(legendary_total > common_total * 4.0);
    }

    #[test]
    fn test_value_bounds() {
        let mut rng = rng_from_seed(8);
        for rarity in Rarity::ALL {
            let item = ItemSynthesizer::make_item(&mut rng, ItemType::Armor, rarity, 10);
            let base = ITEM_BASE_VALUE * 10.0 * rarity.multiplier();
            assert!(item.value as f64 >= (base * 0.8).floor());
            assert!((item.value as f64) < base * 1.2);
        }
    }

    #[test]
    fn test_every_type_has_stats() {
        let mut rng = rng_from_seed(21);
        for item_type in ItemType::ALL {
            let item = ItemSynthesizer::make_item(&mut rng, item_type, Rarity::Rare, 3);
            assert!(!item.stats.is_empty(), "{item_type:?} has no stats");
            assert!(item.description.starts_with("A rare "));
            assert_eq!(item.id.len(), 6);
        }
    }

    #[test]
    fn test_level_zero_clamped() {
        let mut rng = rng_from_seed(1);
        let item = ItemSynthesizer::make_item(&mut rng, ItemType::Consumable, Rarity::Common, 0);
        assert_eq!(item.level, 1);
        assert_eq!(item.stats["effect_value"], 50.0);
    }

    #[test]
    fn test_material_join() {
        assert_eq!(with_material("Shadow-", "Sword"), "Shadow-Sword");
        assert_eq!(with_material("Iron", "Sword"), "Iron Sword");
    }

    #[test]
    fn test_loot_table_count() {
        let items = ItemSynthesizer::loot_table(&mut rng_from_seed(5), 7, 2);
        assert_eq!(items.len(), 7);
    }
}
