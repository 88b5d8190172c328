use criterion::{black_box, criterion_group, criterion_main, Criterion};

use worldgen_core::generation::{AdjacencyRules, DungeonParams, LayoutGenerator, TileConstraintSolver};
use worldgen_core::loot::ItemSynthesizer;
use worldgen_core::naming::NameSynthesizer;
use worldgen_core::noise::NoiseField;
use worldgen_core::seed::rng_from_seed;
use worldgen_core::settlement::{SettlementGenerator, SettlementSize};
use worldgen_core::terrain::{Biome, TerrainSynthesizer};

fn bench_noise(c: &mut Criterion) {
    let noise = NoiseField::new();

    c.bench_function("octave_sample_cached", |b| {
        b.iter(|| noise.octave_sample(black_box(1.5), black_box(2.5), 4, 0.5, 2.0, black_box(42)))
    });

    let fractal = noise.fractal(42, 6);
    c.bench_function("fractal_sample_6_octaves", |b| {
        b.iter(|| fractal.sample(black_box(1.5), black_box(2.5), 0.5, 2.0))
    });
}

fn bench_terrain(c: &mut Criterion) {
    let noise = NoiseField::new();
    let synth = TerrainSynthesizer::new(&noise);

    c.bench_function("terrain_128x128", |b| {
        b.iter(|| synth.generate(black_box(128), black_box(128), black_box(7), 0.35))
    });
}

fn bench_dungeon(c: &mut Criterion) {
    let params = DungeonParams::default();

    c.bench_function("dungeon_80x60", |b| {
        b.iter(|| LayoutGenerator::generate(black_box(&params), black_box(42)))
    });
}

fn bench_tiles(c: &mut Criterion) {
    let rules = AdjacencyRules::new([
        ("water", vec!["water", "sand"]),
        ("sand", vec!["water", "sand", "grass"]),
        ("grass", vec!["sand", "grass"]),
    ])
    .unwrap();
    let solver = TileConstraintSolver::new(rules);

    c.bench_function("wfc_24x24", |b| {
        b.iter(|| solver.generate(black_box(24), black_box(24), black_box(3)))
    });
}

fn bench_content(c: &mut Criterion) {
    c.bench_function("loot_table_20", |b| {
        b.iter(|| ItemSynthesizer::loot_table(&mut rng_from_seed(black_box(9)), 20, 10))
    });

    c.bench_function("settlement_capital", |b| {
        b.iter(|| SettlementGenerator::generate(SettlementSize::Capital, Biome::Plains, black_box(5)))
    });

    c.bench_function("person_name", |b| {
        b.iter(|| NameSynthesizer::person_name(black_box(12345)))
    });
}

criterion_group!(
    benches,
    bench_noise,
    bench_terrain,
    bench_dungeon,
    bench_tiles,
    bench_content
);
criterion_main!(benches);
