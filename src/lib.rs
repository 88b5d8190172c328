//! World Generator - Procedural Core Library
//!
//! This crate provides deterministic, seed-driven content generation:
//! - Fractal noise field with per-seed permutation caching
//! - Terrain synthesis (height / moisture / temperature, biome classification)
//! - Dungeon layouts (padded room placement, L-shaped corridors, typed rooms)
//! - Settlements (districts, shops, NPCs, lore stub)
//! - Loot items (rarity-weighted stats, procedural names)
//! - Syllable/template name synthesis
//! - Tile constraint solver (simplified Wave Function Collapse)
//! - A seeded facade composing all of the above
//!
//! Everything returned is plain, serde-serializable data owned by the caller.

pub mod config;
pub mod constants;
pub mod error;
pub mod generation;
pub mod logging;
pub mod loot;
pub mod naming;
pub mod noise;
pub mod seed;
pub mod settlement;
pub mod terrain;
pub mod world;

pub use error::{GenError, Result};
pub use world::WorldFacade;
