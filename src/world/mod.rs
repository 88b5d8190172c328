//! Seeded entry point composing every generator.
//!
//! # Call ordering
//!
//! [`WorldFacade`] owns one [`SeedStream`]. Each convenience method draws the next
//! sub-seed from it, so output is reproducible for a fixed seed *and* a fixed call
//! sequence. Calling `generate_dungeon` before `generate_settlement` gives
//! different results than the reverse order.
//!
//! Callers that need order independence pass their own stream to the `*_with`
//! variants, typically one per concern from [`WorldFacade::stream_for`].

pub mod narrative;

use rand::Rng;
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generation::{
    AdjacencyRules, DungeonParams, DungeonStyle, LayoutGenerator, LayoutOutcome,
    TileConstraintSolver, TileGrid,
};
use crate::logging::TimingSpan;
use crate::loot::{GeneratedItem, ItemSynthesizer, ItemType, Rarity};
use crate::naming::NameSynthesizer;
use crate::noise::NoiseField;
use crate::seed::{rng_from_seed, SeedStream};
use crate::settlement::{Settlement, SettlementGenerator, SettlementSize};
use crate::terrain::{Biome, TerrainGrid, TerrainSynthesizer};

pub struct WorldFacade {
    seed: u64,
    stream: SeedStream,
    noise: NoiseField,
    config: GeneratorConfig,
}

impl WorldFacade {
    pub fn new(seed: u64) -> Self {
        Self::from_valid_config(GeneratorConfig {
            seed,
            ..GeneratorConfig::default()
        })
    }

    /// Build from a caller-supplied config, rejecting it with
    /// [`GenError::InvalidConfig`](crate::GenError::InvalidConfig) when
    /// [`GeneratorConfig::validate`] fails.
    pub fn with_config(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GeneratorConfig) -> Self {
        info!(seed = config.seed, "World facade created");
        Self {
            seed: config.seed,
            stream: SeedStream::new(config.seed),
            noise: NoiseField::with_capacity(config.noise_cache_capacity),
            config,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Sub-seeds handed out by the internal stream so far
    pub fn draws(&self) -> u64 {
        self.stream.draws()
    }

    /// Independent stream for one concern, unaffected by other calls
    pub fn stream_for(&self, label: &str) -> SeedStream {
        SeedStream::labelled(self.seed, label)
    }

    // =========================================================================
    // Ordering-sensitive convenience API
    // =========================================================================

    pub fn generate_world(&mut self, width: u32, height: u32) -> TerrainGrid {
        let seed = self.stream.next_seed();
        self.terrain_for(seed, width, height)
    }

    pub fn generate_dungeon(
        &mut self,
        style: DungeonStyle,
        min_rooms: u32,
        max_rooms: u32,
        difficulty: u32,
    ) -> LayoutOutcome {
        let seed = self.stream.next_seed();
        self.dungeon_for(seed, style, min_rooms, max_rooms, difficulty)
    }

    pub fn generate_settlement(&mut self, size: SettlementSize, biome: Biome) -> Settlement {
        let seed = self.stream.next_seed();
        Self::settlement_for(seed, size, biome)
    }

    pub fn generate_loot(&mut self, count: usize, level: u32) -> Vec<GeneratedItem> {
        let seed = self.stream.next_seed();
        Self::loot_for(seed, count, level)
    }

    /// One item; `None` lets type and rarity roll
    pub fn generate_item(
        &mut self,
        item_type: Option<ItemType>,
        rarity: Option<Rarity>,
        level: u32,
    ) -> GeneratedItem {
        let seed = self.stream.next_seed();
        Self::item_for(seed, item_type, rarity, level)
    }

    pub fn person_name(&mut self) -> String {
        NameSynthesizer::person_name(self.stream.next_seed())
    }

    pub fn city_name(&mut self) -> String {
        NameSynthesizer::city_name(self.stream.next_seed())
    }

    pub fn quest_name(&mut self) -> String {
        NameSynthesizer::quest_name(self.stream.next_seed())
    }

    pub fn generate_tilemap(
        &mut self,
        rules: &AdjacencyRules,
        width: u32,
        height: u32,
    ) -> Result<TileGrid> {
        let seed = self.stream.next_seed();
        self.tilemap_for(seed, rules, width, height)
    }

    // =========================================================================
    // Explicit-stream API
    // =========================================================================

    pub fn generate_world_with(&self, stream: &mut SeedStream, width: u32, height: u32) -> TerrainGrid {
        self.terrain_for(stream.next_seed(), width, height)
    }

    pub fn generate_dungeon_with(
        &self,
        stream: &mut SeedStream,
        style: DungeonStyle,
        min_rooms: u32,
        max_rooms: u32,
        difficulty: u32,
    ) -> LayoutOutcome {
        self.dungeon_for(stream.next_seed(), style, min_rooms, max_rooms, difficulty)
    }

    pub fn generate_settlement_with(
        &self,
        stream: &mut SeedStream,
        size: SettlementSize,
        biome: Biome,
    ) -> Settlement {
        Self::settlement_for(stream.next_seed(), size, biome)
    }

    pub fn generate_loot_with(&self, stream: &mut SeedStream, count: usize, level: u32) -> Vec<GeneratedItem> {
        Self::loot_for(stream.next_seed(), count, level)
    }

    pub fn generate_item_with(
        &self,
        stream: &mut SeedStream,
        item_type: Option<ItemType>,
        rarity: Option<Rarity>,
        level: u32,
    ) -> GeneratedItem {
        Self::item_for(stream.next_seed(), item_type, rarity, level)
    }

    pub fn generate_tilemap_with(
        &self,
        stream: &mut SeedStream,
        rules: &AdjacencyRules,
        width: u32,
        height: u32,
    ) -> Result<TileGrid> {
        self.tilemap_for(stream.next_seed(), rules, width, height)
    }

    // =========================================================================
    // Delegation
    // =========================================================================

    fn terrain_for(&self, seed: u64, width: u32, height: u32) -> TerrainGrid {
        let _span = TimingSpan::new("terrain");
        let settings = self.config.terrain.clone();
        let sea_level = settings.sea_level;
        TerrainSynthesizer::with_settings(&self.noise, settings).generate(width, height, seed, sea_level)
    }

    fn dungeon_for(
        &self,
        seed: u64,
        style: DungeonStyle,
        min_rooms: u32,
        max_rooms: u32,
        difficulty: u32,
    ) -> LayoutOutcome {
        let _span = TimingSpan::new("dungeon");
        let params = DungeonParams {
            style,
            min_rooms,
            max_rooms,
            difficulty,
            ..self.config.dungeon.clone()
        };
        LayoutGenerator::generate(&params, seed)
    }

    fn settlement_for(seed: u64, size: SettlementSize, biome: Biome) -> Settlement {
        let _span = TimingSpan::new("settlement");
        SettlementGenerator::generate(size, biome, seed)
    }

    fn loot_for(seed: u64, count: usize, level: u32) -> Vec<GeneratedItem> {
        ItemSynthesizer::loot_table(&mut rng_from_seed(seed), count, level)
    }

    fn item_for(seed: u64, item_type: Option<ItemType>, rarity: Option<Rarity>, level: u32) -> GeneratedItem {
        let mut rng = rng_from_seed(seed);
        let rarity = rarity.unwrap_or_else(|| ItemSynthesizer::roll_rarity(&mut rng));
        let item_type =
            item_type.unwrap_or_else(|| ItemType::ALL[rng.gen_range(0..ItemType::ALL.len())]);
        ItemSynthesizer::make_item(&mut rng, item_type, rarity, level)
    }

    fn tilemap_for(&self, seed: u64, rules: &AdjacencyRules, width: u32, height: u32) -> Result<TileGrid> {
        let _span = TimingSpan::new("tilemap");
        TileConstraintSolver::with_policy(rules.clone(), self.config.contradiction).generate(width, height, seed)
    }
}
