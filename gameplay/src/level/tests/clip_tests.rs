use glam::Vec2;

use super::{ledge_map, one_sided, sector, square_room, walled_room};
use crate::config::ClipConfig;
use crate::doom_def::{FRICTION_MASK, ONFLOORZ};
use crate::env::{DefaultHooks, SfxName};
use crate::info::MapObjKind;
use crate::level::Level;
use crate::level::map_data::{MapData, MapDataBuilder};
use crate::thing::ThingId;

/// Everything a refused move must leave alone
#[derive(Debug, PartialEq)]
struct Snapshot {
    xy: Vec2,
    z: f32,
    momxy: Vec2,
    floorz: f32,
    ceilingz: f32,
    sectors: Vec<usize>,
    listed: Vec<Vec<ThingId>>,
}

fn snapshot(level: &Level, id: ThingId) -> Snapshot {
    let t = &level.things[id];
    Snapshot {
        xy: t.xy,
        z: t.z,
        momxy: t.momxy,
        floorz: t.floorz,
        ceilingz: t.ceilingz,
        sectors: level.touching_sectors(id),
        listed: (0..level.map_data.sectors.len())
            .map(|s| level.sector_things(s))
            .collect(),
    }
}

/// A room with its north-east corner cut off by a wall along x + y = 256
fn cut_corner_room() -> MapData {
    MapDataBuilder::new("cut")
        .vertex(-256.0, 256.0)
        .vertex(0.0, 256.0)
        .vertex(256.0, 0.0)
        .vertex(256.0, -256.0)
        .vertex(-256.0, -256.0)
        .sector(sector(0.0, 128.0))
        .line(one_sided(0, 1, 0))
        .line(one_sided(1, 2, 0))
        .line(one_sided(2, 3, 0))
        .line(one_sided(3, 4, 0))
        .line(one_sided(4, 0, 0))
        .build()
        .expect("cut corner room")
}

#[test]
fn wall_refuses_move_without_mutation() {
    for kind in [MapObjKind::MT_PLAYER, MapObjKind::MT_TROOP] {
        // Ending against the wall, and ending clear past it
        for x in [40.0, 100.0] {
            let mut level = Level::new(walled_room(), ClipConfig::default());
            let mut hooks = DefaultHooks::new();
            let id = level.spawn_map_object(Vec2::ZERO, ONFLOORZ, kind);
            level.things[id].radius = 16.0;
            if kind == MapObjKind::MT_PLAYER {
                level.add_player(id);
            }
            let before = snapshot(&level, id);

            let outcome = level.try_move_ex(id, Vec2::new(x, 0.0), false, &mut hooks);
            assert!(!outcome.ok, "{kind:?} moved to {x}");
            assert_eq!(outcome.blockline, Some(1));
            assert_eq!(snapshot(&level, id), before);
        }
    }
}

#[test]
fn missiles_never_skip_walls() {
    let mut level = Level::new(walled_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let rocket = level.spawn_map_object(Vec2::ZERO, 28.0, MapObjKind::MT_ROCKET);
    let before = snapshot(&level, rocket);
    let outcome = level.try_move_ex(rocket, Vec2::new(100.0, 0.0), false, &mut hooks);
    assert!(!outcome.ok);
    assert_eq!(outcome.blockline, Some(1));
    assert_eq!(snapshot(&level, rocket), before);
}

#[test]
fn noclip_things_pass_through_walls() {
    let mut level = Level::new(walled_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let imp = level.spawn_map_object(Vec2::ZERO, ONFLOORZ, MapObjKind::MT_TROOP);
    level.things[imp].flags |= crate::thing::MapObjFlag::Noclip as u32;
    assert!(level.try_move(imp, Vec2::new(100.0, 0.0), false, &mut hooks));
    assert_eq!(level.things[imp].xy, Vec2::new(100.0, 0.0));
}

#[test]
fn stuck_player_may_back_away() {
    let mut level = Level::new(walled_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    // Overlapping the wall at x = 50
    let player = level.spawn_map_object(Vec2::new(40.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
    level.add_player(player);

    let before = snapshot(&level, player);
    assert!(!level.try_move(player, Vec2::new(45.0, 0.0), false, &mut hooks));
    assert_eq!(snapshot(&level, player), before);

    assert!(level.try_move(player, Vec2::new(30.0, 0.0), false, &mut hooks));
    assert_eq!(level.things[player].xy, Vec2::new(30.0, 0.0));
}

#[test]
fn stuck_monster_stays_stuck() {
    let mut level = Level::new(walled_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let imp = level.spawn_map_object(Vec2::new(40.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
    let before = snapshot(&level, imp);
    assert!(!level.try_move(imp, Vec2::new(35.0, 0.0), false, &mut hooks));
    assert_eq!(snapshot(&level, imp), before);
}

#[test]
fn momentum_never_carries_through_walls() {
    let mut level = Level::new(walled_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let imp = level.spawn_map_object(Vec2::ZERO, ONFLOORZ, MapObjKind::MT_TROOP);
    level.things[imp].momxy = Vec2::new(25.0, 0.0);

    for _ in 0..10 {
        level.xy_movement(imp, &mut hooks);
        assert!(level.things[imp].xy.x < 30.0);
    }
    // Monsters stop dead against walls
    assert_eq!(level.things[imp].momxy, Vec2::ZERO);
}

#[test]
fn sliding_along_a_wall_never_speeds_up() {
    let mut level = Level::new(walled_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let player = level.spawn_map_object(Vec2::ZERO, ONFLOORZ, MapObjKind::MT_PLAYER);
    level.add_player(player);
    level.things[player].momxy = Vec2::new(20.0, 10.0);

    let mut speed = level.things[player].momxy.length();
    for _ in 0..20 {
        level.xy_movement(player, &mut hooks);
        let thing = &level.things[player];
        assert!(thing.xy.x + thing.radius <= 50.0);
        let now = thing.momxy.length();
        assert!(now <= speed + f32::EPSILON, "sped up from {speed} to {now}");
        speed = now;
    }
    // Still sliding north
    assert!(level.things[player].xy.y > 40.0);
}

#[test]
fn sliding_along_a_diagonal_never_speeds_up() {
    let mut level = Level::new(cut_corner_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let player = level.spawn_map_object(Vec2::new(100.0, 100.0), ONFLOORZ, MapObjKind::MT_PLAYER);
    level.add_player(player);
    level.things[player].momxy = Vec2::new(20.0, 0.0);

    let mut speed = 20.0;
    for _ in 0..20 {
        level.xy_movement(player, &mut hooks);
        let thing = &level.things[player];
        // The leading corner stays behind the wall
        assert!(thing.xy.x + thing.xy.y + 2.0 * thing.radius <= 256.0 + 0.01);
        let now = thing.momxy.length();
        assert!(now <= speed + 0.001, "sped up from {speed} to {now}");
        speed = now;
    }
}

/// A player standing on ice at `xy`
fn skater(mut map: MapData, xy: Vec2) -> (Level, ThingId) {
    map.sectors[0].special = FRICTION_MASK;
    map.sectors[0].set_friction(0.97);
    let mut level = Level::new(map, ClipConfig::default());
    let player = level.spawn_map_object(xy, ONFLOORZ, MapObjKind::MT_PLAYER);
    level.add_player(player);
    (level, player)
}

fn oofs(hooks: &DefaultHooks) -> usize {
    hooks.sounds.iter().filter(|(_, s)| *s == SfxName::Oof).count()
}

#[test]
fn ice_bounces_off_straight_walls() {
    let (mut level, player) = skater(walled_room(), Vec2::new(30.0, 230.0));
    let mut hooks = DefaultHooks::new();

    // the east wall runs north to south
    let out = level.hit_slide_line(player, 1, Vec2::new(10.0, 1.0), &mut hooks);
    assert_eq!(out, Vec2::new(-5.0, 0.5));
    assert_eq!(oofs(&hooks), 1);

    // the north wall runs west to east
    let out = level.hit_slide_line(player, 0, Vec2::new(1.0, 10.0), &mut hooks);
    assert_eq!(out, Vec2::new(0.5, -5.0));
    assert_eq!(oofs(&hooks), 2);
}

#[test]
fn soft_or_glancing_hits_slide_on_ice() {
    let (mut level, player) = skater(walled_room(), Vec2::new(30.0, 0.0));
    let mut hooks = DefaultHooks::new();

    // too slow to bounce
    let out = level.hit_slide_line(player, 1, Vec2::new(3.0, 1.0), &mut hooks);
    assert_eq!(out, Vec2::new(0.0, 1.0));
    // more along the wall than into it
    let out = level.hit_slide_line(player, 1, Vec2::new(4.0, 6.0), &mut hooks);
    assert_eq!(out, Vec2::new(0.0, 6.0));
    assert_eq!(oofs(&hooks), 0);
}

#[test]
fn dry_floors_never_bounce() {
    let mut level = Level::new(walled_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let player = level.spawn_map_object(Vec2::new(30.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
    level.add_player(player);

    let out = level.hit_slide_line(player, 1, Vec2::new(10.0, 1.0), &mut hooks);
    assert_eq!(out, Vec2::new(0.0, 1.0));
    assert!(hooks.sounds.is_empty());
}

#[test]
fn ice_bounces_off_diagonals_only_head_on() {
    // the cut wall runs at 315 degrees, facing the room
    let into = |degrees: f32| {
        let (mut level, player) = skater(cut_corner_room(), Vec2::new(100.0, 100.0));
        let mut hooks = DefaultHooks::new();
        let mv = Vec2::from_angle(degrees.to_radians()) * 10.0;
        let out = level.hit_slide_line(player, 1, mv, &mut hooks);
        (out, oofs(&hooks))
    };

    // Hits between 45 and 135 degrees off the wall bounce back into the room
    for degrees in [2.0, 45.0, 88.0] {
        let (out, oof) = into(degrees);
        assert_eq!(oof, 1, "no bounce at {degrees}");
        assert!(out.x + out.y < -1.0, "{out} at {degrees}");
        assert!(out.length() < 6.0);
    }
    // Anything shallower follows the wall
    for degrees in [-2.0, 92.0] {
        let (out, oof) = into(degrees);
        assert_eq!(oof, 0, "bounced at {degrees}");
        assert!((out.x + out.y).abs() < 0.001, "{out} at {degrees}");
    }
}

#[test]
fn pickups_go_even_when_a_wall_refuses() {
    let mut level = Level::new(walled_room(), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let player = level.spawn_map_object(Vec2::ZERO, ONFLOORZ, MapObjKind::MT_PLAYER);
    level.add_player(player);
    let stim = level.spawn_map_object(Vec2::new(40.0, 0.0), ONFLOORZ, MapObjKind::MT_STIMPACK);

    assert!(!level.try_move(player, Vec2::new(40.0, 0.0), false, &mut hooks));
    assert!(!level.things.contains(stim));
    assert_eq!(level.things[player].xy, Vec2::ZERO);
}

#[test]
fn pickups_go_even_when_a_step_refuses() {
    let mut level = Level::new(ledge_map(40.0), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let player = level.spawn_map_object(Vec2::new(-30.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
    level.add_player(player);
    let stim = level.spawn_map_object(Vec2::new(10.0, 0.0), ONFLOORZ, MapObjKind::MT_STIMPACK);
    assert_eq!(level.things[stim].z, 40.0);

    let outcome = level.try_move_ex(player, Vec2::new(10.0, 0.0), false, &mut hooks);
    assert!(!outcome.ok);
    assert_eq!(outcome.floorline, Some(6));
    assert!(!level.things.contains(stim));
    assert_eq!(level.things[player].xy, Vec2::new(-30.0, 0.0));
}

#[test]
fn blast_falls_off_with_distance() {
    let mut level = Level::new(square_room(1024.0), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    let rocket = level.spawn_map_object(Vec2::ZERO, 28.0, MapObjKind::MT_ROCKET);
    // Barons are radius 24 and tough enough to show the whole blast
    let centre = level.spawn_map_object(Vec2::ZERO, ONFLOORZ, MapObjKind::MT_BRUISER);
    let edge = level.spawn_map_object(Vec2::new(152.0, 0.0), ONFLOORZ, MapObjKind::MT_BRUISER);
    let inside = level.spawn_map_object(Vec2::new(0.0, -151.5), ONFLOORZ, MapObjKind::MT_BRUISER);
    let far = level.spawn_map_object(Vec2::new(-300.0, 300.0), ONFLOORZ, MapObjKind::MT_BRUISER);

    level.radius_attack(rocket, None, 128, false, &mut hooks);
    assert_eq!(level.things[centre].health, 1000 - 128);
    assert_eq!(level.things[edge].health, 1000);
    assert_eq!(level.things[inside].health, 999);
    assert_eq!(level.things[far].health, 1000);
}

#[test]
fn blast_height_counts_with_verticality() {
    let mut level = Level::new(square_room(1024.0), ClipConfig::default());
    let mut hooks = DefaultHooks::new();
    // High above a baron standing beside the blast
    let rocket = level.spawn_map_object(Vec2::ZERO, 118.0, MapObjKind::MT_ROCKET);
    let baron = level.spawn_map_object(Vec2::new(40.0, 0.0), ONFLOORZ, MapObjKind::MT_BRUISER);

    level.radius_attack(rocket, None, 128, true, &mut hooks);
    // 86 up from its middle beats the 16 across
    assert_eq!(level.things[baron].health, 1000 - (128 - 86));

    level.radius_attack(rocket, None, 128, false, &mut hooks);
    assert_eq!(level.things[baron].health, 1000 - 42 - (128 - 16));
}
