//! Narrative enrichment boundary.
//!
//! The crate never produces prose itself beyond a fixed fallback line. A caller
//! that owns a text service implements [`NarrativeEnricher`] (or passes a closure)
//! and receives a [`WorldSummary`] digest of what was generated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generation::{Dungeon, DungeonStyle, RoomType};
use crate::loot::GeneratedItem;
use crate::naming::NameSynthesizer;
use crate::settlement::{Settlement, SettlementSize};
use crate::terrain::{Biome, TerrainGrid};

const FALLBACK_LORE: &str = "A land shaped by ancient wars and forgotten gods.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonDigest {
    pub style: DungeonStyle,
    pub rooms: usize,
    pub boss_enemies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementDigest {
    pub name: String,
    pub size: SettlementSize,
    pub biome: Biome,
    pub lore: String,
}

/// Serializable digest of generated content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSummary {
    pub seed: u64,
    pub terrain_size: Option<(u32, u32)>,
    pub biomes: BTreeMap<Biome, usize>,
    pub dungeons: Vec<DungeonDigest>,
    pub settlements: Vec<SettlementDigest>,
    pub notable_items: Vec<String>,
}

impl WorldSummary {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_terrain(mut self, terrain: &TerrainGrid) -> Self {
        self.terrain_size = Some((terrain.width, terrain.height));
        self.biomes = terrain.biome_histogram();
        self
    }

    pub fn with_dungeon(mut self, dungeon: &Dungeon) -> Self {
        let boss_enemies = dungeon
            .rooms
            .iter()
            .filter(|r| r.room_type == RoomType::Boss)
            .flat_map(|r| r.enemies.iter().cloned())
            .collect();
        self.dungeons.push(DungeonDigest {
            style: dungeon.style,
            rooms: dungeon.rooms.len(),
            boss_enemies,
        });
        self
    }

    pub fn with_settlement(mut self, settlement: &Settlement) -> Self {
        self.settlements.push(SettlementDigest {
            name: settlement.name.clone(),
            size: settlement.size,
            biome: settlement.biome,
            lore: settlement.lore.clone(),
        });
        self
    }

    /// Keeps only rare-and-above item names
    pub fn with_items(mut self, items: &[GeneratedItem]) -> Self {
        self.notable_items.extend(
            items
                .iter()
                .filter(|i| i.rarity.has_suffix())
                .map(|i| i.name.clone()),
        );
        self
    }

    /// Most common biome, if terrain was attached
    pub fn dominant_biome(&self) -> Option<Biome> {
        self.biomes
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(biome, _)| *biome)
    }
}

/// Text or sequence of passages returned by an enricher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Narrative {
    Text(String),
    Passages(Vec<String>),
}

impl Narrative {
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Passages(passages) => passages.join("\n\n"),
        }
    }
}

pub trait NarrativeEnricher {
    fn enrich(&self, summary: &WorldSummary) -> Option<Narrative>;
}

impl<F> NarrativeEnricher for F
where
    F: Fn(&WorldSummary) -> Option<Narrative>,
{
    fn enrich(&self, summary: &WorldSummary) -> Option<Narrative> {
        self(summary)
    }
}

/// Enricher that never answers, so `narrate` always falls back
pub struct NoEnrichment;

impl NarrativeEnricher for NoEnrichment {
    fn enrich(&self, _summary: &WorldSummary) -> Option<Narrative> {
        None
    }
}

pub fn fallback_lore(seed: u64) -> String {
    format!("{}: {FALLBACK_LORE}", NameSynthesizer::city_name(seed))
}

/// Enricher's text, or the deterministic fallback when it returns nothing
pub fn narrate(summary: &WorldSummary, enricher: &impl NarrativeEnricher) -> String {
    enricher
        .enrich(summary)
        .map(Narrative::into_text)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| fallback_lore(summary.seed))
}
