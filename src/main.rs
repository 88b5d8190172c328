use anyhow::Context;
use tracing::info;

use worldgen_core::config::GeneratorConfig;
use worldgen_core::generation::{AdjacencyRules, DungeonStyle};
use worldgen_core::logging;
use worldgen_core::settlement::SettlementSize;
use worldgen_core::terrain::Biome;
use worldgen_core::world::narrative::{narrate, NoEnrichment, WorldSummary};
use worldgen_core::WorldFacade;

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => GeneratorConfig::load(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => GeneratorConfig::default(),
    };
    logging::init_tracing(&config.tracing);
    info!(seed = config.seed, "Generating sample world");

    let dungeon_params = config.dungeon.clone();
    let mut world = WorldFacade::with_config(config)?;

    let terrain = world.generate_world(64, 48);
    let outcome = world.generate_dungeon(
        dungeon_params.style,
        dungeon_params.min_rooms,
        dungeon_params.max_rooms,
        dungeon_params.difficulty,
    );
    let crypt = world.generate_dungeon(DungeonStyle::Crypt, 3, 6, 2);
    let dominant = WorldSummary::new(world.seed())
        .with_terrain(&terrain)
        .dominant_biome()
        .unwrap_or(Biome::Plains);
    let town = world.generate_settlement(SettlementSize::Town, dominant);
    let loot = world.generate_loot(5, dungeon_params.difficulty);

    let rules = AdjacencyRules::new([
        ("water", vec!["water", "sand"]),
        ("sand", vec!["water", "sand", "grass"]),
        ("grass", vec!["sand", "grass"]),
    ])?;
    let tiles = world.generate_tilemap(&rules, 24, 8)?;

    println!("== Terrain {}x{} ==", terrain.width, terrain.height);
    for (biome, count) in terrain.biome_histogram() {
        println!("  {:<10} {count}", biome.as_str());
    }
    println!("  walkable: {:.1}%", terrain.walkable_ratio() * 100.0);

    println!(
        "\n== Dungeon ({:?}, {} rooms, quota met: {}) ==",
        outcome.dungeon.style,
        outcome.dungeon.rooms.len(),
        outcome.is_complete()
    );
    println!("{}", outcome.dungeon.to_ascii());

    println!("\n== {} ==\n  {}", town.name, town.lore);
    for shop in &town.shops {
        println!("  {} ({:?})", shop.name, shop.kind);
    }

    println!("\n== Loot ==");
    for item in &loot {
        println!("  [{}] {} (value {})", item.rarity.as_str(), item.name, item.value);
    }

    println!("\n== Tiles (forced: {}) ==", tiles.forced_resolutions);
    for row in tiles.rows() {
        let line: String = row
            .iter()
            .map(|t| match t.as_str() {
                "water" => '~',
                "sand" => ':',
                _ => '"',
            })
            .collect();
        println!("  {line}");
    }

    println!(
        "\n== Names ==\n  {}, {}, {}",
        world.person_name(),
        world.city_name(),
        world.quest_name()
    );

    let summary = WorldSummary::new(world.seed())
        .with_terrain(&terrain)
        .with_dungeon(&outcome.dungeon)
        .with_dungeon(&crypt.dungeon)
        .with_settlement(&town)
        .with_items(&loot);
    println!("\n{}", narrate(&summary, &NoEnrichment));
    println!("\n{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
