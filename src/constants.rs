//! Centralized generation constants.
//!
//! Tunables shared between generators and their defaults in `config`.
//! Per-module word pools (names, enemies, affixes) stay in their modules.

// =====================================================
// Noise
// =====================================================

/// Entries in a permutation table (doubled internally to avoid wrapping)
pub const PERMUTATION_SIZE: usize = 256;

/// Default number of per-seed permutation tables kept in the LRU cache
pub const DEFAULT_NOISE_CACHE_CAPACITY: usize = 64;

// =====================================================
// Terrain
// =====================================================

/// Height at or below which a cell is ocean and not walkable
pub const DEFAULT_SEA_LEVEL: f64 = 0.35;

/// Height above which a cell is always mountain
pub const DEFAULT_MOUNTAIN_THRESHOLD: f64 = 0.82;

/// Grid-to-noise coordinate scale (a full grid spans this many noise units)
pub const DEFAULT_TERRAIN_SCALE: f64 = 3.0;

/// Noise-space offsets that decorrelate the three terrain channels
pub const HEIGHT_CHANNEL_OFFSET: f64 = 0.0;
pub const MOISTURE_CHANNEL_OFFSET: f64 = 100.0;
pub const TEMPERATURE_CHANNEL_OFFSET: f64 = 200.0;

/// Probability that a walkable cell receives a scatter object
pub const DEFAULT_SCATTER_CHANCE: f64 = 0.15;

// =====================================================
// Dungeon layout
// =====================================================

/// Room placement attempts before the layout degrades to a partial result
pub const ROOM_PLACEMENT_ATTEMPTS: u32 = 500;

/// Gap (in cells) required between any two room bounding boxes
pub const ROOM_PADDING: u32 = 1;

/// Inclusive room width range
pub const ROOM_MIN_WIDTH: u32 = 5;
pub const ROOM_MAX_WIDTH: u32 = 15;

/// Inclusive room height range
pub const ROOM_MIN_HEIGHT: u32 = 5;
pub const ROOM_MAX_HEIGHT: u32 = 12;

/// Enemies guarding a boss room
pub const BOSS_ENEMY_COUNT: usize = 3;

// =====================================================
// Items
// =====================================================

/// Rarity draw weights, common -> legendary
pub const RARITY_WEIGHTS: [u32; 5] = [50, 30, 15, 4, 1];

/// Base gold value per level before rarity scaling
pub const ITEM_BASE_VALUE: f64 = 10.0;

// =====================================================
// Tile solver
// =====================================================

/// Default restart budget when the restart policy is selected
pub const DEFAULT_WFC_RESTARTS: u32 = 16;
