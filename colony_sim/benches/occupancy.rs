// Criterion benchmarks for the per-frame placement path.
//
// The validator runs every poll while a placement is armed, so point
// queries, full-rectangle validation on a busy map, and one complete
// `poll_frame` are the numbers that matter.
//
// Run with: cargo bench -p colony_sim --bench occupancy

use colony_sim::colony::ColonyState;
use colony_sim::config::GameConfig;
use colony_sim::grid::TileRect;
use colony_sim::occupancy::OccupancyIndex;
use colony_sim::session::PointerInput;
use colony_sim::structure::PlacementRequirement;
use colony_sim::terrain::TerrainMap;
use colony_sim::types::{Footprint, StructureKind, TileCoord};
use colony_sim::validator::PlacementValidator;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const MAP: u32 = 128;

/// A map with a 2x2 structure on every third tile in both axes.
fn busy_index() -> OccupancyIndex {
    let mut index = OccupancyIndex::new();
    for row in (0..MAP as i32 - 1).step_by(3) {
        for col in (0..MAP as i32 - 1).step_by(3) {
            let rect = TileRect::new(TileCoord::new(col, row), Footprint::new(2, 2));
            index
                .insert(StructureKind::Warehouse, rect, 0)
                .expect("disjoint slot");
        }
    }
    index
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("occupancy_query");
    let index = busy_index();

    group.bench_function("point_hit", |b| {
        b.iter(|| black_box(index.query(black_box(TileCoord::new(64, 64)))));
    });
    group.bench_function("point_miss", |b| {
        b.iter(|| black_box(index.query(black_box(TileCoord::new(65, 65)))));
    });
    group.bench_function("range_8x8", |b| {
        let rect = TileRect::new(TileCoord::new(40, 40), Footprint::new(8, 8));
        b.iter(|| black_box(index.query_range(black_box(rect))));
    });

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement_validation");
    let terrain = TerrainMap::new(MAP, MAP);
    let index = busy_index();
    let validator = PlacementValidator::new(&terrain, &index);
    let none = PlacementRequirement::none();

    // A free 1x1 slot between structures.
    group.bench_function("single_free", |b| {
        b.iter(|| black_box(validator.is_valid(black_box(&[TileCoord::new(2, 2)]), &none)));
    });
    // A 1x16 strip down a free column: every tile is checked.
    group.bench_function("strip_1x16", |b| {
        let rect = TileRect::new(TileCoord::new(2, 2), Footprint::new(1, 16));
        b.iter(|| black_box(validator.is_valid_rect(black_box(rect), &none)));
    });

    group.finish();
}

fn bench_poll_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_poll");
    let config = GameConfig {
        map_size: (MAP, MAP),
        settle_polls: 0,
        ..GameConfig::default()
    };
    let mut colony = ColonyState::new(config);
    colony.occupancy = busy_index();
    if colony.begin_placement(StructureKind::Warehouse).is_err() {
        return;
    }

    group.bench_function("hover_single_tile", |b| {
        let input = PointerInput::new(2.0 * 64.0 + 5.0, 2.0 * 64.0 + 5.0, false);
        b.iter(|| black_box(colony.poll_frame(black_box(input))));
    });

    group.finish();
}

criterion_group!(benches, bench_queries, bench_validation, bench_poll_frame);
criterion_main!(benches);
