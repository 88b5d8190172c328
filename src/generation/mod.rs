//! Spatial layout generation.
//!
//! - [`dungeon`]: rooms placed by rejection sampling, joined by L-shaped corridors
//! - [`wfc`]: simplified Wave Function Collapse over user-supplied adjacency rules

pub mod dungeon;
pub mod wfc;

pub use dungeon::{Cell, Dungeon, DungeonParams, DungeonStyle, LayoutGenerator, LayoutOutcome, Room, RoomId, RoomType};
pub use wfc::{AdjacencyMode, AdjacencyRules, ContradictionPolicy, TileConstraintSolver, TileGrid};
