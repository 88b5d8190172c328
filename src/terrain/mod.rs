//! Terrain synthesis.
//!
//! Each cell samples three decorrelated fractal channels (height, moisture,
//! temperature), classifies a biome and scatters decoration objects. Cells share
//! only read-only noise tables, so the grid is built in parallel; scatter draws
//! are keyed by `(seed, x, z)` and do not depend on visiting order.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DEFAULT_MOUNTAIN_THRESHOLD, DEFAULT_SCATTER_CHANCE, DEFAULT_SEA_LEVEL, DEFAULT_TERRAIN_SCALE,
    HEIGHT_CHANNEL_OFFSET, MOISTURE_CHANNEL_OFFSET, TEMPERATURE_CHANNEL_OFFSET,
};
use crate::error::{GenError, Result};
use crate::noise::{Fractal, NoiseField};
use crate::seed::{coordinate_seed, rng_from_seed};

/// Discrete terrain classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Plains,
    Forest,
    Desert,
    Tundra,
    Swamp,
    Mountain,
    Ocean,
    Jungle,
    Volcanic,
    Magical,
}

impl Biome {
    pub const ALL: [Biome; 10] = [
        Biome::Plains,
        Biome::Forest,
        Biome::Desert,
        Biome::Tundra,
        Biome::Swamp,
        Biome::Mountain,
        Biome::Ocean,
        Biome::Jungle,
        Biome::Volcanic,
        Biome::Magical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Forest => "forest",
            Self::Desert => "desert",
            Self::Tundra => "tundra",
            Self::Swamp => "swamp",
            Self::Mountain => "mountain",
            Self::Ocean => "ocean",
            Self::Jungle => "jungle",
            Self::Volcanic => "volcanic",
            Self::Magical => "magical",
        }
    }

    /// Decoration objects that may be scattered on this biome
    pub fn scatter_pool(&self) -> &'static [&'static str] {
        match self {
            Self::Forest => &["pine", "oak", "birch"],
            Self::Jungle => &["palm", "fern", "vine"],
            Self::Desert => &["cactus", "dune"],
            Self::Mountain => &["boulder", "cliff"],
            Self::Plains => &["grass_patch", "flower", "shrub"],
            Self::Swamp => &["reed", "mangrove"],
            Self::Tundra => &["snow_drift", "ice_rock"],
            Self::Volcanic => &["obsidian", "vent"],
            Self::Magical => &["crystal", "glowing_mushroom"],
            Self::Ocean => &[],
        }
    }
}

/// Tunables for terrain synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub sea_level: f64,
    pub mountain_threshold: f64,
    pub scale: f64,
    pub height_octaves: u32,
    pub moisture_octaves: u32,
    pub temperature_octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub scatter_chance: f64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            sea_level: DEFAULT_SEA_LEVEL,
            mountain_threshold: DEFAULT_MOUNTAIN_THRESHOLD,
            scale: DEFAULT_TERRAIN_SCALE,
            height_octaves: 6,
            moisture_octaves: 4,
            temperature_octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
            scatter_chance: DEFAULT_SCATTER_CHANCE,
        }
    }
}

impl TerrainSettings {
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.sea_level) {
            return Err(GenError::InvalidConfig(format!(
                "sea_level {} outside [0, 1]",
                self.sea_level
            )));
        }
        if !unit.contains(&self.mountain_threshold) || self.mountain_threshold <= self.sea_level {
            return Err(GenError::InvalidConfig(format!(
                "mountain_threshold {} must lie in (sea_level, 1]",
                self.mountain_threshold
            )));
        }
        if self.height_octaves == 0 || self.moisture_octaves == 0 || self.temperature_octaves == 0
        {
            return Err(GenError::InvalidConfig("octave counts must be >= 1".into()));
        }
        if !(self.scale > 0.0 && self.lacunarity > 0.0) {
            return Err(GenError::InvalidConfig(
                "scale and lacunarity must be positive".into(),
            ));
        }
        if !unit.contains(&self.scatter_chance) {
            return Err(GenError::InvalidConfig(format!(
                "scatter_chance {} outside [0, 1]",
                self.scatter_chance
            )));
        }
        Ok(())
    }
}

/// One synthesized terrain cell. `walkable == (height > sea_level)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainCell {
    pub x: u32,
    pub z: u32,
    pub height: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub biome: Biome,
    pub walkable: bool,
    pub scatter_objects: Vec<String>,
}

/// Row-major grid of terrain cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub sea_level: f64,
    pub cells: Vec<TerrainCell>,
}

impl TerrainGrid {
    pub fn cell(&self, x: u32, z: u32) -> Option<&TerrainCell> {
        if x >= self.width || z >= self.height {
            return None;
        }
        self.cells.get(z as usize * self.width as usize + x as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TerrainCell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    pub fn biome_histogram(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for cell in &self.cells {
            *counts.entry(cell.biome).or_insert(0) += 1;
        }
        counts
    }

    pub fn walkable_ratio(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let walkable = self.cells.iter().filter(|c| c.walkable).count();
        walkable as f64 / self.cells.len() as f64
    }
}

/// Ordered decision table, first match wins
pub fn classify_biome(
    height: f64,
    moisture: f64,
    temperature: f64,
    sea_level: f64,
    mountain_threshold: f64,
) -> Biome {
    if height <= sea_level {
        return Biome::Ocean;
    }
    if height > mountain_threshold {
        return Biome::Mountain;
    }
    match (temperature, moisture) {
        (t, m) if t > 0.75 && m > 0.6 => Biome::Jungle,
        (t, m) if t > 0.7 && m < 0.3 => Biome::Desert,
        (t, m) if t < 0.3 && m > 0.4 => Biome::Tundra,
        (_, m) if m > 0.7 => Biome::Swamp,
        (_, m) if m > 0.5 => Biome::Forest,
        _ => Biome::Plains,
    }
}

/// Scatter draw for one cell, keyed by coordinates rather than generation order
pub fn scatter_objects(
    seed: u64,
    x: u32,
    z: u32,
    biome: Biome,
    walkable: bool,
    chance: f64,
) -> Vec<String> {
    if !walkable {
        return Vec::new();
    }
    let mut rng = rng_from_seed(coordinate_seed(seed, x, z));
    if rng.gen::<f64>() >= chance {
        return Vec::new();
    }
    biome
        .scatter_pool()
        .choose(&mut rng)
        .map(|obj| vec![obj.to_string()])
        .unwrap_or_default()
}

fn to_unit(v: f64) -> f64 {
    ((v + 1.0) / 2.0).clamp(0.0, 1.0)
}

struct Channels {
    height: Fractal,
    moisture: Fractal,
    temperature: Fractal,
}

/// Noise-driven terrain generator
pub struct TerrainSynthesizer<'a> {
    noise: &'a NoiseField,
    settings: TerrainSettings,
}

impl<'a> TerrainSynthesizer<'a> {
    pub fn new(noise: &'a NoiseField) -> Self {
        Self::with_settings(noise, TerrainSettings::default())
    }

    pub fn with_settings(noise: &'a NoiseField, settings: TerrainSettings) -> Self {
        Self { noise, settings }
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// Generate a `width * height` grid. `sea_level` overrides the configured one.
    pub fn generate(&self, width: u32, height: u32, seed: u64, sea_level: f64) -> TerrainGrid {
        let s = &self.settings;
        let channels = Channels {
            height: self.noise.fractal(seed, s.height_octaves),
            moisture: self.noise.fractal(seed.wrapping_add(1), s.moisture_octaves),
            temperature: self.noise.fractal(seed.wrapping_add(2), s.temperature_octaves),
        };

        let cell_count = width as usize * height as usize;
        let cells: Vec<TerrainCell> = (0..cell_count)
            .into_par_iter()
            .map(|i| {
                let x = (i % width as usize) as u32;
                let z = (i / width as usize) as u32;
                self.synthesize_cell(&channels, width, height, x, z, seed, sea_level)
            })
            .collect();

        let grid = TerrainGrid {
            width,
            height,
            seed,
            sea_level,
            cells,
        };
        debug!(
            width,
            height,
            seed,
            walkable_ratio = grid.walkable_ratio(),
            "terrain generated"
        );
        grid
    }

    #[allow(clippy::too_many_arguments)]
    fn synthesize_cell(
        &self,
        channels: &Channels,
        width: u32,
        height: u32,
        x: u32,
        z: u32,
        seed: u64,
        sea_level: f64,
    ) -> TerrainCell {
        let s = &self.settings;
        let nx = x as f64 / width as f64 * s.scale;
        let nz = z as f64 / height as f64 * s.scale;

        let h = to_unit(channels.height.sample(
            nx + HEIGHT_CHANNEL_OFFSET,
            nz + HEIGHT_CHANNEL_OFFSET,
            s.persistence,
            s.lacunarity,
        ));
        let m = to_unit(channels.moisture.sample(
            nx + MOISTURE_CHANNEL_OFFSET,
            nz + MOISTURE_CHANNEL_OFFSET,
            s.persistence,
            s.lacunarity,
        ));
        let t = to_unit(channels.temperature.sample(
            nx + TEMPERATURE_CHANNEL_OFFSET,
            nz + TEMPERATURE_CHANNEL_OFFSET,
            s.persistence,
            s.lacunarity,
        ));

        let biome = classify_biome(h, m, t, sea_level, s.mountain_threshold);
        let walkable = h > sea_level;
        TerrainCell {
            x,
            z,
            height: h,
            moisture: m,
            temperature: t,
            biome,
            walkable,
            scatter_objects: scatter_objects(seed, x, z, biome, walkable, s.scatter_chance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_decision_order() {
        assert_eq!(classify_biome(0.35, 0.9, 0.9, 0.35, 0.82), Biome::Ocean);
        assert_eq!(classify_biome(0.9, 0.9, 0.9, 0.35, 0.82), Biome::Mountain);
        assert_eq!(classify_biome(0.5, 0.7, 0.8, 0.35, 0.82), Biome::Jungle);
        assert_eq!(classify_biome(0.5, 0.1, 0.8, 0.35, 0.82), Biome::Desert);
        assert_eq!(classify_biome(0.5, 0.5, 0.1, 0.35, 0.82), Biome::Tundra);
        assert_eq!(classify_biome(0.5, 0.8, 0.5, 0.35, 0.82), Biome::Swamp);
        assert_eq!(classify_biome(0.5, 0.6, 0.5, 0.35, 0.82), Biome::Forest);
        assert_eq!(classify_biome(0.5, 0.4, 0.5, 0.35, 0.82), Biome::Plains);
    }

    #[test]
    fn test_generate_size_and_invariants() {
        let noise = NoiseField::new();
        let grid = TerrainSynthesizer::new(&noise).generate(8, 8, 1, 0.35);
        assert_eq!(grid.cells.len(), 64);
        for cell in &grid.cells {
            assert_eq!(cell.walkable, cell.height > 0.35);
            if cell.height <= 0.35 {
                assert_eq!(cell.biome, Biome::Ocean);
                assert!(!cell.walkable);
                assert!(cell.scatter_objects.is_empty());
            }
            for v in [cell.height, cell.moisture, cell.temperature] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_generate_deterministic() {
        let noise = NoiseField::new();
        let synth = TerrainSynthesizer::new(&noise);
        assert_eq!(synth.generate(16, 12, 77, 0.35), synth.generate(16, 12, 77, 0.35));
    }

    #[test]
    fn test_cells_row_major() {
        let noise = NoiseField::new();
        let grid = TerrainSynthesizer::new(&noise).generate(5, 3, 9, 0.35);
        let cell = grid.cell(4, 2).unwrap();
        assert_eq!((cell.x, cell.z), (4, 2));
        assert!(grid.cell(5, 0).is_none());
        assert_eq!(grid.rows().count(), 3);
    }

    #[test]
    fn test_scatter_independent_of_order() {
        let a = scatter_objects(5, 10, 20, Biome::Forest, true, 1.0);
        // Unrelated draws in between must not matter
        let _ = scatter_objects(5, 11, 20, Biome::Forest, true, 1.0);
        let b = scatter_objects(5, 10, 20, Biome::Forest, true, 1.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        assert!(Biome::Forest.scatter_pool().contains(&a[0].as_str()));
    }

    #[test]
    fn test_scatter_skips_unwalkable_and_ocean() {
        assert!(scatter_objects(5, 1, 1, Biome::Forest, false, 1.0).is_empty());
        assert!(scatter_objects(5, 1, 1, Biome::Ocean, true, 1.0).is_empty());
        assert!(scatter_objects(5, 1, 1, Biome::Plains, true, 0.0).is_empty());
    }

    #[test]
    fn test_empty_grid() {
        let noise = NoiseField::new();
        let grid = TerrainSynthesizer::new(&noise).generate(0, 4, 1, 0.35);
        assert!(grid.cells.is_empty());
        assert_eq!(grid.walkable_ratio(), 0.0);
    }

    #[test]
    fn test_settings_validation() {
        assert!(TerrainSettings::default().validate().is_ok());
        let bad = TerrainSettings {
            sea_level: 1.5,
            ..TerrainSettings::default()
        };
        assert!(bad.validate().is_err());
        let bad = TerrainSettings {
            height_octaves: 0,
            ..TerrainSettings::default()
        };
        assert!(bad.validate().is_err());
    }
}
