use criterion::*;

use mapclip::glam::Vec2;
use mapclip::{
    ClipConfig, ClipContext, DefaultHooks, Level, LineDefDef, LineDefFlags, MapData,
    MapDataBuilder, MapObjKind, PT_ADDLINES, PT_ADDTHINGS, SectorDef, ThingId, path_traverse,
};

/// A 2048 square hall with a raised dais in the middle
fn hall() -> MapData {
    let sector = |floor, ceiling| SectorDef {
        floor,
        ceiling,
        lightlevel: 160,
        ..SectorDef::default()
    };
    let wall = |v1, v2, front| LineDefDef {
        v1,
        v2,
        front,
        flags: LineDefFlags::Blocking as u32,
        ..LineDefDef::default()
    };
    let edge = |v1, v2| LineDefDef {
        v1,
        v2,
        front: 1,
        back: Some(0),
        flags: LineDefFlags::TwoSided as u32,
        ..LineDefDef::default()
    };
    MapDataBuilder::new("hall")
        .vertex(-1024.0, 1024.0)
        .vertex(1024.0, 1024.0)
        .vertex(1024.0, -1024.0)
        .vertex(-1024.0, -1024.0)
        .vertex(-128.0, 128.0)
        .vertex(128.0, 128.0)
        .vertex(128.0, -128.0)
        .vertex(-128.0, -128.0)
        .sector(sector(0.0, 256.0))
        .sector(sector(16.0, 256.0))
        .line(wall(0, 1, 0))
        .line(wall(1, 2, 0))
        .line(wall(2, 3, 0))
        .line(wall(3, 0, 0))
        .line(edge(4, 5))
        .line(edge(5, 6))
        .line(edge(6, 7))
        .line(edge(7, 4))
        .build()
        .expect("hall")
}

fn crowded_hall() -> (Level, ThingId) {
    let mut level = Level::new(hall(), ClipConfig::default());
    for i in 0..400 {
        let xy = Vec2::new(-950.0 + (i % 20) as f32 * 100.0, -950.0 + (i / 20) as f32 * 100.0);
        level.spawn_map_object(xy, f32::MIN, MapObjKind::MT_TROOP);
    }
    let player = level.spawn_map_object(Vec2::new(-300.0, 10.0), f32::MIN, MapObjKind::MT_PLAYER);
    level.add_player(player);
    (level, player)
}

fn bench_check_position(b: &mut Bencher) {
    let (mut level, player) = crowded_hall();
    let mut hooks = DefaultHooks::new();
    let mut ctx = ClipContext::default();
    b.iter(|| {
        level.check_position(player, black_box(Vec2::new(-120.0, 10.0)), &mut ctx, &mut hooks)
    });
}

fn bench_path_traverse(b: &mut Bencher) {
    let (mut level, _) = crowded_hall();
    b.iter(|| {
        let mut hits = 0;
        path_traverse(
            &mut level,
            black_box(Vec2::new(-1000.0, -900.0)),
            Vec2::new(1000.0, 870.0),
            PT_ADDLINES | PT_ADDTHINGS,
            |_, _| {
                hits += 1;
                true
            },
        );
        hits
    });
}

fn bench_sight(b: &mut Bencher) {
    let (mut level, player) = crowded_hall();
    let far = level.spawn_map_object(Vec2::new(900.0, -40.0), f32::MIN, MapObjKind::MT_BRUISER);
    b.iter(|| level.check_sight(player, far));
}

fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Clipping queries");

    group.bench_function("Position check among 400 imps", bench_check_position);
    group.bench_function("Trace across the hall", bench_path_traverse);
    group.bench_function("Sight across the dais", bench_sight);
}

criterion_group!(benches, bench,);
criterion_main!(benches);
