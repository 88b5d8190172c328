//! Wave Function Collapse tile solver (simplified).
//!
//! Each cell starts with every tile possible. The solver repeatedly collapses a
//! minimum-entropy cell to one tile and narrows its four neighbours to the tiles
//! that collapsed tile lists. There is no backtracking; what happens when a
//! neighbour runs out of options is chosen by [`ContradictionPolicy`].

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::DEFAULT_WFC_RESTARTS;
use crate::error::{GenError, Result};
use crate::seed::{rng_from_seed, GenRng};

/// How declared neighbour lists are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyMode {
    /// A collapsed tile narrows its neighbours to its own list.
    #[default]
    Directional,
    /// Two tiles may touch only when each lists the other.
    Mutual,
}

/// Validated tile set with per-tile neighbour lists
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyRules {
    tiles: Vec<String>,
    /// `listed[a][b]`: tile `a` accepts `b` as a neighbour
    listed: Vec<Vec<bool>>,
    mode: AdjacencyMode,
}

impl AdjacencyRules {
    /// Build from `(tile, allowed neighbours)` pairs, keeping declaration order.
    ///
    /// Fails on an empty set, a tile declared twice, or a neighbour that is not
    /// itself declared.
    pub fn new<I, K, N, S>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, N)>,
        K: Into<String>,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declared: Vec<(String, Vec<String>)> = rules
            .into_iter()
            .map(|(tile, neighbors)| {
                (
                    tile.into(),
                    neighbors.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        if declared.is_empty() {
            return Err(GenError::EmptyTileSet);
        }

        let mut index = HashMap::with_capacity(declared.len());
        for (i, (tile, _)) in declared.iter().enumerate() {
            if index.insert(tile.clone(), i).is_some() {
                return Err(GenError::DuplicateTile(tile.clone()));
            }
        }

        let n = declared.len();
        let mut listed = vec![vec![false; n]; n];
        for (i, (tile, neighbors)) in declared.iter().enumerate() {
            for neighbor in neighbors {
                let Some(&j) = index.get(neighbor) else {
                    return Err(GenError::UnknownTile {
                        tile: tile.clone(),
                        neighbor: neighbor.clone(),
                    });
                };
                listed[i][j] = true;
            }
        }

        let tiles = declared.into_iter().map(|(tile, _)| tile).collect();
        Ok(Self {
            tiles,
            listed,
            mode: AdjacencyMode::Directional,
        })
    }

    /// Switch how neighbour lists are read. `Mutual` drops every pairing that
    /// only one side declares; switching back does not restore them.
    pub fn with_mode(mut self, mode: AdjacencyMode) -> Self {
        if mode == AdjacencyMode::Mutual {
            let n = self.tiles.len();
            let listed = (0..n)
                .map(|a| (0..n).map(|b| self.listed[a][b] && self.listed[b][a]).collect())
                .collect();
            self.listed = listed;
        }
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> AdjacencyMode {
        self.mode
    }

    pub fn tiles(&self) -> &[String] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn index_of(&self, tile: &str) -> Option<usize> {
        self.tiles.iter().position(|t| t == tile)
    }

    /// Whether tile `a` lists `b` as a neighbour
    pub fn lists(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => self.listed[i][j],
            _ => false,
        }
    }

    /// Whether tiles `a` and `b` may be 4-neighbours: either one lists the
    /// other. Whichever of the pair collapses first narrows the second, so a
    /// grid solved without forced cells satisfies this for every pair.
    /// Unknown ids never may.
    pub fn allows(&self, a: &str, b: &str) -> bool {
        self.lists(a, b) || self.lists(b, a)
    }
}

/// What to do when propagation leaves a cell with no legal tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionPolicy {
    /// Force the cell to a random tile from the full set and keep going.
    /// Always terminates; the grid may contain adjacency violations.
    #[default]
    RandomFallback,
    /// Throw the attempt away and start over from a fresh wave.
    /// Fails with [`GenError::Unsatisfiable`] once `max_attempts` are spent.
    Restart { max_attempts: u32 },
}

impl ContradictionPolicy {
    pub fn restart() -> Self {
        Self::Restart {
            max_attempts: DEFAULT_WFC_RESTARTS,
        }
    }
}

/// Solved grid of tile ids, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<String>,
    /// Cells force-assigned after a contradiction
    pub forced_resolutions: u32,
    /// Attempts discarded before this grid was produced
    pub restarts: u32,
}

impl TileGrid {
    pub fn get(&self, x: u32, z: u32) -> Option<&str> {
        if x >= self.width || z >= self.height {
            return None;
        }
        self.tiles
            .get((z * self.width + x) as usize)
            .map(String::as_str)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }

    /// Neighbouring cell pairs `((x, z), (nx, nz))` whose tiles may not touch
    pub fn violations(&self, rules: &AdjacencyRules) -> Vec<((u32, u32), (u32, u32))> {
        let mut out = Vec::new();
        for z in 0..self.height {
            for x in 0..self.width {
                let Some(tile) = self.get(x, z) else { continue };
                for (nx, nz) in [(x + 1, z), (x, z + 1)] {
                    if let Some(other) = self.get(nx, nz) {
                        if !rules.allows(tile, other) {
                            out.push(((x, z), (nx, nz)));
                        }
                    }
                }
            }
        }
        out
    }

    pub fn is_consistent(&self, rules: &AdjacencyRules) -> bool {
        self.violations(rules).is_empty()
    }
}

enum Attempt {
    Solved { tiles: Vec<usize>, forced: u32 },
    Contradiction,
}

pub struct TileConstraintSolver {
    rules: AdjacencyRules,
    policy: ContradictionPolicy,
}

impl TileConstraintSolver {
    pub fn new(rules: AdjacencyRules) -> Self {
        Self::with_policy(rules, ContradictionPolicy::default())
    }

    pub fn with_policy(rules: AdjacencyRules, policy: ContradictionPolicy) -> Self {
        Self { rules, policy }
    }

    pub fn rules(&self) -> &AdjacencyRules {
        &self.rules
    }

    pub fn policy(&self) -> ContradictionPolicy {
        self.policy
    }

    pub fn generate(&self, width: u32, height: u32, seed: u64) -> Result<TileGrid> {
        let mut rng = rng_from_seed(seed);
        let max_attempts = match self.policy {
            ContradictionPolicy::RandomFallback => 1,
            ContradictionPolicy::Restart { max_attempts } => max_attempts.max(1),
        };

        for attempt in 0..max_attempts {
            match self.run(width, height, &mut rng) {
                Attempt::Solved { tiles, forced } => {
                    debug!(width, height, seed, forced, restarts = attempt, "Tile grid solved");
                    return Ok(TileGrid {
                        width,
                        height,
                        tiles: tiles.into_iter().map(|t| self.rules.tiles[t].clone()).collect(),
                        forced_resolutions: forced,
                        restarts: attempt,
                    });
                }
                Attempt::Contradiction => {
                    debug!(attempt, "Contradiction, restarting");
                }
            }
        }

        warn!(attempts = max_attempts, seed, "Tile solver exhausted its restart budget");
        Err(GenError::Unsatisfiable {
            attempts: max_attempts,
        })
    }

    fn run(&self, width: u32, height: u32, rng: &mut GenRng) -> Attempt {
        let (w, h) = (width as usize, height as usize);
        let all: Vec<usize> = (0..self.rules.len()).collect();
        let mut domains = vec![all; w * h];
        let mut resolved: Vec<Option<usize>> = vec![None; w * h];
        let mut forced = 0;

        loop {
            let Some(min_entropy) = (0..w * h)
                .filter(|&i| resolved[i].is_none())
                .map(|i| domains[i].len())
                .min()
            else {
                break;
            };
            let candidates: Vec<usize> = (0..w * h)
                .filter(|&i| resolved[i].is_none() && domains[i].len() == min_entropy)
                .collect();
            let Some(&cell) = candidates.choose(rng) else {
                break;
            };
            let Some(&tile) = domains[cell].choose(rng) else {
                break;
            };
            resolved[cell] = Some(tile);
            domains[cell] = vec![tile];

            let (x, z) = (cell % w, cell / w);
            let neighbors = [
                (x.wrapping_sub(1), z),
                (x + 1, z),
                (x, z.wrapping_sub(1)),
                (x, z + 1),
            ];
            for (nx, nz) in neighbors {
                if nx >= w || nz >= h {
                    continue;
                }
                let n = nz * w + nx;
                if resolved[n].is_some() {
                    continue;
                }
                domains[n].retain(|&t| self.rules.listed[tile][t]);
                if domains[n].is_empty() {
                    match self.policy {
                        ContradictionPolicy::RandomFallback => {
                            let fallback = rng.gen_range(0..self.rules.len());
                            domains[n] = vec![fallback];
                            forced += 1;
                            warn!(x = nx, z = nz, "Contradiction forced a random tile");
                        }
                        ContradictionPolicy::Restart { .. } => return Attempt::Contradiction,
                    }
                }
            }
        }

        Attempt::Solved {
            tiles: resolved.into_iter().flatten().collect(),
            forced,
        }
    }
}
