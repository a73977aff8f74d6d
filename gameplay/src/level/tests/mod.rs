//! Small hand built maps shared by the tests, and the tests that need a whole
//! level to say anything useful.

mod clip_tests;

use glam::Vec2;

use crate::level::flags::LineDefFlags;
use crate::level::map_data::{LineDefDef, MapData, MapDataBuilder, SectorDef};

const TWO_SIDED: u32 = LineDefFlags::TwoSided as u32;

fn sector(floor: f32, ceiling: f32) -> SectorDef {
    SectorDef {
        floor,
        ceiling,
        lightlevel: 160,
        ..SectorDef::default()
    }
}

fn one_sided(v1: usize, v2: usize, front: usize) -> LineDefDef {
    LineDefDef {
        v1,
        v2,
        front,
        flags: LineDefFlags::Blocking as u32,
        ..LineDefDef::default()
    }
}

/// A single sector box, floor 0 and ceiling 128. Walls are wound so the front
/// of each faces in.
pub(crate) fn rect_room(min: Vec2, max: Vec2) -> MapData {
    MapDataBuilder::new("rect")
        .vertex(min.x, max.y)
        .vertex(max.x, max.y)
        .vertex(max.x, min.y)
        .vertex(min.x, min.y)
        .sector(sector(0.0, 128.0))
        .line(one_sided(0, 1, 0))
        .line(one_sided(1, 2, 0))
        .line(one_sided(2, 3, 0))
        .line(one_sided(3, 0, 0))
        .build()
        .expect("rect room")
}

/// A `size` by `size` room centred on the origin
pub(crate) fn square_room(size: f32) -> MapData {
    let h = size / 2.0;
    rect_room(Vec2::splat(-h), Vec2::splat(h))
}

/// Two rooms side by side, split by a two-sided line at `split_x` running
/// from north to south, so its front faces west. The west room is floor 0,
/// ceiling 128. Both span -256..256.
pub(crate) fn split_map(split_x: f32, east_floor: f32, east_ceiling: f32, special: i16) -> MapData {
    MapDataBuilder::new("split")
        // 0..=2 along the north edge, 3..=5 along the south
        .vertex(-256.0, 256.0)
        .vertex(split_x, 256.0)
        .vertex(256.0, 256.0)
        .vertex(256.0, -256.0)
        .vertex(split_x, -256.0)
        .vertex(-256.0, -256.0)
        .sector(sector(0.0, 128.0))
        .sector(sector(east_floor, east_ceiling))
        // west
        .line(one_sided(0, 1, 0))
        .line(one_sided(4, 5, 0))
        .line(one_sided(5, 0, 0))
        // east
        .line(one_sided(1, 2, 1))
        .line(one_sided(2, 3, 1))
        .line(one_sided(3, 4, 1))
        // divider, line 6
        .line(LineDefDef {
            v1: 1,
            v2: 4,
            flags: TWO_SIDED,
            special,
            front: 0,
            back: Some(1),
            ..LineDefDef::default()
        })
        .build()
        .expect("split map")
}

/// Rooms split at x = 50, the east room with the given heights. The divider
/// carries `special`.
pub(crate) fn two_rooms(east_floor: f32, east_ceiling: f32, special: i16) -> MapData {
    split_map(50.0, east_floor, east_ceiling, special)
}

/// Rooms split at x = 0, the east room raised to `height`
pub(crate) fn ledge_map(height: f32) -> MapData {
    split_map(0.0, height, height + 128.0, 0)
}

/// A room whose east wall is one-sided at x = 50, facing west
pub(crate) fn walled_room() -> MapData {
    rect_room(Vec2::new(-256.0, -256.0), Vec2::new(50.0, 256.0))
}
