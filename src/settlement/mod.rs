//! Settlement generation: districts, shops, NPCs, points of interest and a lore stub.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::naming::NameSynthesizer;
use crate::seed::rng_from_seed;
use crate::terrain::Biome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementSize {
    Village,
    Town,
    City,
    Capital,
}

impl SettlementSize {
    pub const ALL: [SettlementSize; 4] = [
        SettlementSize::Village,
        SettlementSize::Town,
        SettlementSize::City,
        SettlementSize::Capital,
    ];

    pub fn districts(&self) -> &'static [&'static str] {
        match self {
            Self::Village => &["Village Green", "Farmsteads", "Small Chapel"],
            Self::Town => &["Town Square", "Inn District", "Blacksmith Row", "Chapel"],
            Self::City => &[
                "Market",
                "Residential",
                "Temple",
                "Craftsmen Quarter",
                "Docks",
                "Guard Tower",
            ],
            Self::Capital => &[
                "Palace Quarter",
                "Noble District",
                "Market Place",
                "Temple District",
                "Scholar's Row",
                "Harbour Front",
                "Slums",
                "Barracks",
            ],
        }
    }

    pub fn shop_count(&self) -> usize {
        match self {
            Self::Village => 3,
            Self::Town => 6,
            Self::City => 12,
            Self::Capital => 20,
        }
    }

    pub fn npc_count(&self) -> usize {
        match self {
            Self::Village => 5,
            Self::Town => 15,
            Self::City => 40,
            Self::Capital => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Village => "village",
            Self::Town => "town",
            Self::City => "city",
            Self::Capital => "capital",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopKind {
    GeneralStore,
    Blacksmith,
    Alchemist,
    Tailor,
    Stable,
    Jeweller,
    Herbalist,
    Enchanter,
    Tavern,
    Library,
}

impl ShopKind {
    pub const ALL: [ShopKind; 10] = [
        ShopKind::GeneralStore,
        ShopKind::Blacksmith,
        ShopKind::Alchemist,
        ShopKind::Tailor,
        ShopKind::Stable,
        ShopKind::Jeweller,
        ShopKind::Herbalist,
        ShopKind::Enchanter,
        ShopKind::Tavern,
        ShopKind::Library,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcRole {
    Guard,
    Merchant,
    Healer,
    Sage,
    Innkeeper,
    Blacksmith,
    Farmer,
    Priest,
    Soldier,
    Noble,
    Thief,
    Bard,
}

impl NpcRole {
    pub const ALL: [NpcRole; 12] = [
        NpcRole::Guard,
        NpcRole::Merchant,
        NpcRole::Healer,
        NpcRole::Sage,
        NpcRole::Innkeeper,
        NpcRole::Blacksmith,
        NpcRole::Farmer,
        NpcRole::Priest,
        NpcRole::Soldier,
        NpcRole::Noble,
        NpcRole::Thief,
        NpcRole::Bard,
    ];
}

const POINTS_OF_INTEREST: &[&str] = &[
    "Ancient Ruins",
    "Hidden Cellar",
    "Mysterious Well",
    "Old Cemetery",
    "Underground Arena",
    "Secret Garden",
    "Crumbling Tower",
    "Lost Library",
];

const ORIGINS: &[&str] = &[
    "Founded centuries ago by wandering settlers.",
    "Built on the ruins of an ancient civilization.",
    "Grown rich from trade along the river.",
    "A strategic fortress town guarding the mountain pass.",
];

const SHOP_NOUNS: &[&str] = &["Shop", "Emporium", "Stand"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub name: String,
    pub buildings: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub kind: ShopKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    pub role: NpcRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: String,
    pub name: String,
    pub size: SettlementSize,
    pub biome: Biome,
    pub districts: Vec<District>,
    pub shops: Vec<Shop>,
    pub npcs: Vec<Npc>,
    pub points_of_interest: Vec<String>,
    pub lore: String,
}

pub struct SettlementGenerator;

impl SettlementGenerator {
    pub fn generate(size: SettlementSize, biome: Biome, seed: u64) -> Settlement {
        let mut rng = rng_from_seed(seed);
        let name = NameSynthesizer::city_name(seed);

        let districts = size
            .districts()
            .iter()
            .map(|d| District {
                name: (*d).to_string(),
                buildings: rng.gen_range(5..=20),
            })
            .collect();

        let shops = (0..size.shop_count() as u64)
            .map(|i| {
                let kind = ShopKind::ALL[rng.gen_range(0..ShopKind::ALL.len())];
                let noun = SHOP_NOUNS.choose(&mut rng).copied().unwrap_or("Shop");
                Shop {
                    name: format!("The {} {noun}", NameSynthesizer::word(seed.wrapping_add(i))),
                    kind,
                }
            })
            .collect();

        let npcs = (0..size.npc_count() as u64)
            .map(|i| Npc {
                name: NameSynthesizer::person_name(seed.wrapping_add(i)),
                role: NpcRole::ALL[rng.gen_range(0..NpcRole::ALL.len())],
            })
            .collect();

        let poi_count = rng.gen_range(1..=3);
        let points_of_interest = POINTS_OF_INTEREST
            .choose_multiple(&mut rng, poi_count)
            .map(|p| (*p).to_string())
            .collect();

        let origin = ORIGINS.choose(&mut rng).copied().unwrap_or_default();
        let lore = format!(
            "{name} is a {} nestled in the {} region. {origin}",
            size.as_str(),
            biome.as_str()
        );
        let id = format!("{:08x}", rng.gen::<u32>());

        debug!(settlement = %name, size = size.as_str(), "Settlement generated");

        Settlement {
            id,
            name,
            size,
            biome,
            districts,
            shops,
            npcs,
            points_of_interest,
            lore,
        }
    }
}
