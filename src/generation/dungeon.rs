//! Dungeon layout generator.
//!
//! Rooms are sampled as random rectangles and kept only when their padded bounds
//! clear every room placed before them. The accepted rooms are shuffled and each is
//! joined to its predecessor by an L-shaped corridor, so the corridors form a path
//! through every room and the whole carved area is one connected region.

use std::collections::{BTreeSet, VecDeque};

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{
    BOSS_ENEMY_COUNT, ROOM_MAX_HEIGHT, ROOM_MAX_WIDTH, ROOM_MIN_HEIGHT, ROOM_MIN_WIDTH,
    ROOM_PADDING, ROOM_PLACEMENT_ATTEMPTS,
};
use crate::loot::ItemSynthesizer;
use crate::seed::{rng_from_seed, GenRng};

/// Grid cell of a carved dungeon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Wall,
    Floor,
    Door,
}

impl Cell {
    pub fn is_walkable(&self) -> bool {
        matches!(self, Self::Floor | Self::Door)
    }

    fn glyph(&self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
            Self::Door => '+',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DungeonStyle {
    Cave,
    Ruins,
    Castle,
    Sewer,
    Crypt,
    Temple,
    Mine,
    Laboratory,
}

impl DungeonStyle {
    pub const ALL: [DungeonStyle; 8] = [
        DungeonStyle::Cave,
        DungeonStyle::Ruins,
        DungeonStyle::Castle,
        DungeonStyle::Sewer,
        DungeonStyle::Crypt,
        DungeonStyle::Temple,
        DungeonStyle::Mine,
        DungeonStyle::Laboratory,
    ];

    pub fn enemy_pool(&self) -> &'static [&'static str] {
        match self {
            Self::Cave => &["bat", "cave_spider", "troll", "cave_bear"],
            Self::Ruins => &["skeleton", "ghost", "cursed_knight", "lich"],
            Self::Castle => &["guard", "archer", "knight", "dark_lord"],
            Self::Sewer => &["rat", "slime", "rogue", "plague_rat"],
            Self::Crypt => &["zombie", "vampire", "wraith", "death_knight"],
            Self::Temple => &["cultist", "golem", "high_priest", "divine_guardian"],
            Self::Mine => &["miner_zombie", "rock_golem", "cave_in", "drill_bot"],
            Self::Laboratory => &["experiment", "robot", "mad_scientist", "mutant"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Start,
    Boss,
    Treasure,
    Shop,
    Normal,
    Puzzle,
}

impl RoomType {
    fn enemy_count(&self, rng: &mut GenRng, difficulty: u32) -> usize {
        match self {
            Self::Start | Self::Treasure | Self::Shop => 0,
            Self::Boss => BOSS_ENEMY_COUNT,
            Self::Puzzle => 1,
            Self::Normal => rng.gen_range(1..=difficulty as usize + 1),
        }
    }

    fn holds_loot(&self) -> bool {
        matches!(self, Self::Treasure | Self::Boss)
    }
}

/// Room identifier, assigned in placement order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub x: u32,
    pub z: u32,
    pub width: u32,
    pub height: u32,
    pub room_type: RoomType,
    pub connections: BTreeSet<RoomId>,
    pub enemies: Vec<String>,
    pub items: Vec<String>,
}

impl Room {
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.z + self.height / 2)
    }

    pub fn contains(&self, x: u32, z: u32) -> bool {
        x >= self.x && x < self.x + self.width && z >= self.z && z < self.z + self.height
    }

    /// Bounding boxes grown by `padding` on every side intersect
    pub fn overlaps_padded(&self, other: &Room, padding: u32) -> bool {
        overlaps(
            (self.x, self.z, self.width, self.height),
            (other.x, other.z, other.width, other.height),
            padding,
        )
    }
}

fn overlaps(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32), padding: u32) -> bool {
    let (ax, az, aw, ah) = a;
    let (bx, bz, bw, bh) = b;
    ax < bx + bw + padding
        && ax + aw + padding > bx
        && az < bz + bh + padding
        && az + ah + padding > bz
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub style: DungeonStyle,
    pub rooms: Vec<Room>,
    /// Row-major, `grid[z][x]`
    pub grid: Vec<Vec<Cell>>,
}

impl Dungeon {
    pub fn cell(&self, x: u32, z: u32) -> Option<Cell> {
        self.grid
            .get(z as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    pub fn start_room(&self) -> Option<&Room> {
        self.rooms.iter().find(|r| r.room_type == RoomType::Start)
    }

    pub fn walkable_cells(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|c| c.is_walkable())
            .count()
    }

    /// Walkable cells reachable from the start room's center by 4-connected steps
    pub fn reachable_from_start(&self) -> usize {
        let Some(start) = self.start_room() else {
            return 0;
        };
        let (sx, sz) = start.center();
        let (w, h) = (self.width as usize, self.height as usize);
        let mut seen = vec![false; w * h];
        let mut queue = VecDeque::from([(sx as usize, sz as usize)]);
        seen[sz as usize * w + sx as usize] = true;
        let mut count = 0;

        while let Some((x, z)) = queue.pop_front() {
            count += 1;
            let neighbors = [
                (x.wrapping_sub(1), z),
                (x + 1, z),
                (x, z.wrapping_sub(1)),
                (x, z + 1),
            ];
            for (nx, nz) in neighbors {
                if nx >= w || nz >= h || seen[nz * w + nx] {
                    continue;
                }
                if self.grid[nz][nx].is_walkable() {
                    seen[nz * w + nx] = true;
                    queue.push_back((nx, nz));
                }
            }
        }
        count
    }

    /// Room adjacency as an undirected graph, node index == placement index
    pub fn room_graph(&self) -> UnGraph<RoomId, ()> {
        let mut graph = UnGraph::with_capacity(self.rooms.len(), self.rooms.len());
        let nodes: Vec<_> = self.rooms.iter().map(|r| graph.add_node(r.id)).collect();
        for (i, room) in self.rooms.iter().enumerate() {
            for other in &room.connections {
                let j = other.0 as usize;
                if i < j && j < nodes.len() {
                    graph.add_edge(nodes[i], nodes[j], ());
                }
            }
        }
        graph
    }

    pub fn is_connected(&self) -> bool {
        self.rooms.is_empty() || connected_components(&self.room_graph()) == 1
    }

    pub fn to_ascii(&self) -> String {
        self.grid
            .iter()
            .map(|row| row.iter().map(Cell::glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A dungeon plus how far it fell short of the requested room count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOutcome {
    pub dungeon: Dungeon,
    pub requested_min: u32,
    pub unmet_quota: u32,
}

impl LayoutOutcome {
    pub fn is_complete(&self) -> bool {
        self.unmet_quota == 0
    }

    pub fn into_dungeon(self) -> Dungeon {
        self.dungeon
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonParams {
    pub width: u32,
    pub height: u32,
    pub style: DungeonStyle,
    pub min_rooms: u32,
    pub max_rooms: u32,
    pub difficulty: u32,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            style: DungeonStyle::Ruins,
            min_rooms: 8,
            max_rooms: 20,
            difficulty: 3,
        }
    }
}

pub struct LayoutGenerator;

impl LayoutGenerator {
    /// Generate a dungeon. Never fails: when the attempt budget runs out the rooms
    /// placed so far are kept and the shortfall is reported in `unmet_quota`.
    pub fn generate(params: &DungeonParams, seed: u64) -> LayoutOutcome {
        let mut rng = rng_from_seed(seed);
        let (width, height) = (params.width, params.height);
        let mut grid = vec![vec![Cell::Wall; width as usize]; height as usize];

        let mut rooms = place_rooms(width, height, params.max_rooms, &mut rng);
        carve_rooms(&mut grid, &rooms);

        rooms.shuffle(&mut rng);
        connect_rooms(&mut grid, &mut rooms, &mut rng);
        assign_room_types(&mut rooms);
        populate_rooms(&mut rooms, params, &mut rng);
        place_doors(&mut grid, &rooms);

        // Restore placement order so RoomId(n) == rooms[n]
        rooms.sort_by_key(|r| r.id);

        let placed = rooms.len() as u32;
        let unmet_quota = params.min_rooms.saturating_sub(placed);
        if unmet_quota > 0 {
            warn!(
                placed,
                requested = params.min_rooms,
                "Room placement budget exhausted before quota"
            );
        }
        debug!(width, height, seed, rooms = placed, "Dungeon generated");

        LayoutOutcome {
            dungeon: Dungeon {
                width,
                height,
                seed,
                style: params.style,
                rooms,
                grid,
            },
            requested_min: params.min_rooms,
            unmet_quota,
        }
    }
}

fn place_rooms(width: u32, height: u32, max_rooms: u32, rng: &mut GenRng) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();
    let mut attempts = 0;

    while (rooms.len() as u32) < max_rooms && attempts < ROOM_PLACEMENT_ATTEMPTS {
        attempts += 1;

        let w = rng.gen_range(ROOM_MIN_WIDTH..=ROOM_MAX_WIDTH);
        let h = rng.gen_range(ROOM_MIN_HEIGHT..=ROOM_MAX_HEIGHT);
        // Keep a one-cell wall border around the map
        if w + 2 > width || h + 2 > height {
            continue;
        }
        let x = rng.gen_range(1..=width - w - 1);
        let z = rng.gen_range(1..=height - h - 1);

        let overlapping = rooms
            .iter()
            .any(|r| overlaps((x, z, w, h), (r.x, r.z, r.width, r.height), ROOM_PADDING));
        if overlapping {
            continue;
        }

        rooms.push(Room {
            id: RoomId(rooms.len() as u32),
            x,
            z,
            width: w,
            height: h,
            room_type: RoomType::Normal,
            connections: BTreeSet::new(),
            enemies: Vec::new(),
            items: Vec::new(),
        });
    }
    rooms
}

fn carve_rooms(grid: &mut [Vec<Cell>], rooms: &[Room]) {
    for room in rooms {
        for z in room.z..room.z + room.height {
            for x in room.x..room.x + room.width {
                grid[z as usize][x as usize] = Cell::Floor;
            }
        }
    }
}

fn connect_rooms(grid: &mut [Vec<Cell>], rooms: &mut [Room], rng: &mut GenRng) {
    for i in 1..rooms.len() {
        let (ax, az) = rooms[i - 1].center();
        let (bx, bz) = rooms[i].center();

        if rng.gen_bool(0.5) {
            carve_h_corridor(grid, ax, bx, az);
            carve_v_corridor(grid, az, bz, bx);
        } else {
            carve_v_corridor(grid, az, bz, ax);
            carve_h_corridor(grid, ax, bx, bz);
        }

        let (prev, next) = (rooms[i - 1].id, rooms[i].id);
        rooms[i - 1].connections.insert(next);
        rooms[i].connections.insert(prev);
    }
}

fn carve_h_corridor(grid: &mut [Vec<Cell>], x1: u32, x2: u32, z: u32) {
    for x in x1.min(x2)..=x1.max(x2) {
        grid[z as usize][x as usize] = Cell::Floor;
    }
}

fn carve_v_corridor(grid: &mut [Vec<Cell>], z1: u32, z2: u32, x: u32) {
    for z in z1.min(z2)..=z1.max(z2) {
        grid[z as usize][x as usize] = Cell::Floor;
    }
}

/// Positional typing over the shuffled order. Start is never overwritten.
fn assign_room_types(rooms: &mut [Room]) {
    let len = rooms.len();
    if len == 0 {
        return;
    }
    rooms[0].room_type = RoomType::Start;
    if len < 2 {
        return;
    }
    let last = len - 1;
    rooms[last].room_type = RoomType::Boss;

    let treasure = len / 3;
    let shop = 2 * len / 3;
    if treasure > 0 && treasure < last {
        rooms[treasure].room_type = RoomType::Treasure;
    }
    if shop > 0 && shop < last && shop != treasure {
        rooms[shop].room_type = RoomType::Shop;
    }
}

fn populate_rooms(rooms: &mut [Room], params: &DungeonParams, rng: &mut GenRng) {
    let pool = params.style.enemy_pool();
    for room in rooms.iter_mut() {
        let count = room.room_type.enemy_count(rng, params.difficulty);
        room.enemies = (0..count)
            .filter_map(|_| pool.choose(rng).map(|e| (*e).to_string()))
            .collect();

        if room.room_type.holds_loot() {
            let item_count = rng.gen_range(1..=3);
            room.items = ItemSynthesizer::loot_table(rng, item_count, params.difficulty)
                .into_iter()
                .map(|item| item.name)
                .collect();
        }
    }
}

/// Corridor cells where a corridor enters a room become doors
fn place_doors(grid: &mut [Vec<Cell>], rooms: &[Room]) {
    let height = grid.len();
    let width = grid.first().map_or(0, Vec::len);
    let view: &[Vec<Cell>] = grid;
    let in_room = |x: usize, z: usize| rooms.iter().any(|r| r.contains(x as u32, z as u32));
    let corridor = |x: usize, z: usize| {
        x < width && z < height && view[z][x].is_walkable() && !in_room(x, z)
    };

    // An entry cell has a room on one side and the corridor carrying on
    // directly opposite. Cells running along a room wall do not qualify.
    let mut doors: Vec<(usize, usize)> = Vec::new();
    for z in 0..height {
        for x in 0..width {
            if view[z][x] != Cell::Floor || in_room(x, z) {
                continue;
            }
            let entry = [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)]
                .into_iter()
                .any(|(dx, dz)| {
                    let (rx, rz) = (x.wrapping_add_signed(dx), z.wrapping_add_signed(dz));
                    let (cx, cz) = (x.wrapping_add_signed(-dx), z.wrapping_add_signed(-dz));
                    rx < width && rz < height && in_room(rx, rz) && corridor(cx, cz)
                });
            // Two corridors meeting the same wall side by side get one door
            let beside_door = doors
                .iter()
                .any(|&(ox, oz)| ox.abs_diff(x) + oz.abs_diff(z) == 1);
            if entry && !beside_door {
                doors.push((x, z));
            }
        }
    }
    for (x, z) in doors {
        grid[z][x] = Cell::Door;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: u32, height: u32, min_rooms: u32, max_rooms: u32) -> DungeonParams {
        DungeonParams {
            width,
            height,
            style: DungeonStyle::Cave,
            min_rooms,
            max_rooms,
            difficulty: 2,
        }
    }

    #[test]
    fn test_generate_deterministic() {
        let p = DungeonParams::default();
        assert_eq!(LayoutGenerator::generate(&p, 42), LayoutGenerator::generate(&p, 42));
    }

    #[test]
    fn test_different_seeds_different_layouts() {
        let p = DungeonParams::default();
        let a = LayoutGenerator::generate(&p, 1).dungeon;
        let b = LayoutGenerator::generate(&p, 2).dungeon;
        assert_ne!(a.grid, b.grid);
    }

    #[test]
    fn test_cave_scenario() {
        let outcome = LayoutGenerator::generate(&params(40, 30, 5, 8), 7);
        let rooms = &outcome.dungeon.rooms;
        assert!(rooms.len() <= 8);
        if !rooms.is_empty() {
            let starts = rooms.iter().filter(|r| r.room_type == RoomType::Start).count();
            assert_eq!(starts, 1, "exactly one start room");
        }
        assert_eq!(outcome.unmet_quota, 5u32.saturating_sub(rooms.len() as u32));
    }

    #[test]
    fn test_all_walkable_reachable() {
        for seed in 0..20 {
            let d = LayoutGenerator::generate(&DungeonParams::default(), seed).dungeon;
            assert_eq!(d.reachable_from_start(), d.walkable_cells(), "seed {seed}");
            assert!(d.is_connected());
        }
    }

    #[test]
    fn test_padded_rooms_do_not_overlap() {
        let d = LayoutGenerator::generate(&DungeonParams::default(), 9).dungeon;
        for (i, a) in d.rooms.iter().enumerate() {
            for b in &d.rooms[i + 1..] {
                assert!(!a.overlaps_padded(b, ROOM_PADDING), "{:?} overlaps {:?}", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_room_ids_match_index() {
        let d = LayoutGenerator::generate(&DungeonParams::default(), 3).dungeon;
        for (i, room) in d.rooms.iter().enumerate() {
            assert_eq!(room.id, RoomId(i as u32));
        }
    }

    #[test]
    fn test_connections_are_bidirectional() {
        let d = LayoutGenerator::generate(&DungeonParams::default(), 5).dungeon;
        for room in &d.rooms {
            for other in &room.connections {
                assert!(d.rooms[other.0 as usize].connections.contains(&room.id));
            }
        }
    }

    #[test]
    fn test_room_population() {
        let d = LayoutGenerator::generate(&DungeonParams::default(), 11).dungeon;
        let pool = DungeonStyle::Ruins.enemy_pool();
        for room in &d.rooms {
            match room.room_type {
                RoomType::Start | RoomType::Treasure | RoomType::Shop => {
                    assert!(room.enemies.is_empty())
                }
                RoomType::Boss => assert_eq!(room.enemies.len(), BOSS_ENEMY_COUNT),
                RoomType::Normal => assert!((1..=4).contains(&room.enemies.len())),
                RoomType::Puzzle => assert_eq!(room.enemies.len(), 1),
            }
            assert!(room.enemies.iter().all(|e| pool.contains(&e.as_str())));
            if room.room_type.holds_loot() {
                assert!((1..=3).contains(&room.items.len()));
            } else {
                assert!(room.items.is_empty());
            }
        }
    }

    #[test]
    fn test_room_typing_positions() {
        let mut rooms: Vec<Room> = (0..6)
            .map(|i| Room {
                id: RoomId(i),
                x: 0,
                z: 0,
                width: 5,
                height: 5,
                room_type: RoomType::Normal,
                connections: BTreeSet::new(),
                enemies: Vec::new(),
                items: Vec::new(),
            })
            .collect();
        assign_room_types(&mut rooms);
        let types: Vec<_> = rooms.iter().map(|r| r.room_type).collect();
        assert_eq!(
            types,
            vec![
                RoomType::Start,
                RoomType::Normal,
                RoomType::Treasure,
                RoomType::Normal,
                RoomType::Shop,
                RoomType::Boss
            ]
        );

        assign_room_types(&mut rooms[..2]);
        assert_eq!(rooms[0].room_type, RoomType::Start);
        assert_eq!(rooms[1].room_type, RoomType::Boss);
    }

    #[test]
    fn test_grid_too_small_for_rooms() {
        let outcome = LayoutGenerator::generate(&params(6, 6, 1, 4), 1);
        assert!(outcome.dungeon.rooms.is_empty());
        assert_eq!(outcome.unmet_quota, 1);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.dungeon.reachable_from_start(), 0);
    }

    fn bare_room(id: u32, x: u32, z: u32, width: u32, height: u32) -> Room {
        Room {
            id: RoomId(id),
            x,
            z,
            width,
            height,
            room_type: RoomType::Normal,
            connections: BTreeSet::new(),
            enemies: Vec::new(),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_doors_only_at_corridor_entries() {
        for seed in [21, 22, 23, 24] {
            let d = LayoutGenerator::generate(&DungeonParams::default(), seed).dungeon;
            let in_room = |x: i64, z: i64| {
                x >= 0 && z >= 0 && d.rooms.iter().any(|r| r.contains(x as u32, z as u32))
            };
            let walkable = |x: i64, z: i64| {
                x >= 0 && z >= 0 && d.cell(x as u32, z as u32).is_some_and(|c| c.is_walkable())
            };
            let mut doors = Vec::new();
            for (z, row) in d.grid.iter().enumerate() {
                for (x, cell) in row.iter().enumerate() {
                    if *cell != Cell::Door {
                        continue;
                    }
                    let (x, z) = (x as i64, z as i64);
                    assert!(!in_room(x, z));
                    let entry = [(-1, 0), (1, 0), (0, -1), (0, 1)].into_iter().any(|(dx, dz)| {
                        in_room(x + dx, z + dz) && walkable(x - dx, z - dz) && !in_room(x - dx, z - dz)
                    });
                    assert!(entry, "seed {seed}: door at ({x}, {z}) is not an entry");
                    doors.push((x, z));
                }
            }
            assert!(!doors.is_empty(), "seed {seed}: no doors placed");
            for &(ax, az) in &doors {
                assert!(
                    !doors.iter().any(|&(bx, bz)| (ax - bx).abs() + (az - bz).abs() == 1),
                    "seed {seed}: adjacent doors at ({ax}, {az})"
                );
            }
        }
    }

    #[test]
    fn test_corridor_along_wall_gets_single_door() {
        // Room occupies x 2..6, z 2..6. A corridor hugs its top wall on z = 1
        // and turns north at x = 4 to leave through z = 0.
        let room = bare_room(0, 2, 2, 4, 4);
        let mut grid = vec![vec![Cell::Wall; 9]; 8];
        carve_rooms(&mut grid, std::slice::from_ref(&room));
        for x in 1..8 {
            grid[1][x] = Cell::Floor;
        }
        grid[0][4] = Cell::Floor;
        // Straight corridor entering the bottom wall
        grid[6][3] = Cell::Floor;
        grid[7][3] = Cell::Floor;

        place_doors(&mut grid, std::slice::from_ref(&room));

        let doors: Vec<(usize, usize)> = (0..8)
            .flat_map(|z| (0..9).map(move |x| (x, z)))
            .filter(|&(x, z)| grid[z][x] == Cell::Door)
            .collect();
        assert_eq!(doors, vec![(4, 1), (3, 6)]);
    }

    #[test]
    fn test_ascii_dimensions() {
        let d = LayoutGenerator::generate(&params(40, 30, 3, 6), 4).dungeon;
        let ascii = d.to_ascii();
        let lines: Vec<_> = ascii.lines().collect();
        assert_eq!(lines.len(), 30);
        assert!(lines.iter().all(|l| l.chars().count() == 40));
    }
}
