use crate::thing::{MapObjFlag, MapObjFlag2};

use super::{MapObjInfo, MapObjKind};

/// This variable exists only to help create the mobs array
const NUM_CATEGORIES: usize = MapObjKind::NUMMOBJTYPES as usize;

const MONSTER: u32 =
    MapObjFlag::Solid as u32 | MapObjFlag::Shootable as u32 | MapObjFlag::Countkill as u32;
const FLOATER: u32 = MONSTER | MapObjFlag::Float as u32 | MapObjFlag::Nogravity as u32;
const PROJECTILE: u32 = MapObjFlag::Noblockmap as u32
    | MapObjFlag::Missile as u32
    | MapObjFlag::Dropoff as u32
    | MapObjFlag::Nogravity as u32;
const EFFECT: u32 = MapObjFlag::Noblockmap as u32 | MapObjFlag::Nogravity as u32;
const WALKER2: u32 =
    MapObjFlag2::FootClip as u32 | MapObjFlag2::Crushable as u32 | MapObjFlag2::PassMobj as u32;

pub const MOBJINFO: [MapObjInfo; NUM_CATEGORIES] = [
    // MT_PLAYER
    MapObjInfo::new(
        -1,    // doomednum
        100,   // spawnhealth
        0.0,   // speed
        16.0,  // radius
        56.0,  // height
        16.0,  // pickup_radius
        0.0,   // projectile_pass_height
        100,   // mass
        0,     // damage
        MapObjFlag::Solid as u32
            | MapObjFlag::Shootable as u32
            | MapObjFlag::Dropoff as u32
            | MapObjFlag::Pickup as u32
            | MapObjFlag::Notdmatch as u32, // flags
        WALKER2, // flags2
        Some(MapObjKind::MT_BLOOD),
    ),
    // MT_POSSESSED
    MapObjInfo::new(3004, 20, 8.0, 20.0, 56.0, 20.0, 0.0, 100, 0, MONSTER, WALKER2, Some(MapObjKind::MT_BLOOD)),
    // MT_TROOP
    MapObjInfo::new(3001, 60, 8.0, 20.0, 56.0, 20.0, 0.0, 100, 0, MONSTER, WALKER2, Some(MapObjKind::MT_BLOOD)),
    // MT_SERGEANT
    MapObjInfo::new(3002, 150, 10.0, 30.0, 56.0, 30.0, 0.0, 400, 0, MONSTER, WALKER2, Some(MapObjKind::MT_BLOOD)),
    // MT_SKULL
    MapObjInfo::new(
        3006,
        100,
        8.0,
        16.0,
        56.0,
        16.0,
        0.0,
        50,
        3,
        FLOATER | MapObjFlag::Noblood as u32,
        MapObjFlag2::PassMobj as u32,
        None,
    ),
    // MT_HEAD
    MapObjInfo::new(3005, 400, 8.0, 31.0, 56.0, 31.0, 0.0, 400, 0, FLOATER, MapObjFlag2::FloatBob as u32 | MapObjFlag2::PassMobj as u32, Some(MapObjKind::MT_BLUEBLOOD)),
    // MT_PAIN
    MapObjInfo::new(71, 400, 8.0, 31.0, 56.0, 31.0, 0.0, 400, 0, FLOATER, MapObjFlag2::FloatBob as u32 | MapObjFlag2::PassMobj as u32, Some(MapObjKind::MT_BLOOD)),
    // MT_KNIGHT
    MapObjInfo::new(69, 500, 8.0, 24.0, 64.0, 24.0, 0.0, 1000, 0, MONSTER, WALKER2, Some(MapObjKind::MT_GREENBLOOD)),
    // MT_BRUISER
    MapObjInfo::new(3003, 1000, 8.0, 24.0, 64.0, 24.0, 0.0, 1000, 0, MONSTER, WALKER2, Some(MapObjKind::MT_GREENBLOOD)),
    // MT_CYBORG
    MapObjInfo::new(16, 4000, 16.0, 40.0, 110.0, 40.0, 0.0, 1000, 0, MONSTER, WALKER2, Some(MapObjKind::MT_BLOOD)),
    // MT_SPIDER
    MapObjInfo::new(7, 3000, 12.0, 128.0, 100.0, 128.0, 0.0, 1000, 0, MONSTER, WALKER2, Some(MapObjKind::MT_BLOOD)),
    // MT_BOSSBRAIN
    MapObjInfo::new(88, 250, 0.0, 16.0, 16.0, 16.0, 0.0, 10_000_000, 0, MapObjFlag::Solid as u32 | MapObjFlag::Shootable as u32, 0, Some(MapObjKind::MT_BLOOD)),
    // MT_BARREL
    MapObjInfo::new(
        2035,
        20,
        0.0,
        10.0,
        42.0,
        10.0,
        0.0,
        100,
        0,
        MapObjFlag::Solid as u32 | MapObjFlag::Shootable as u32 | MapObjFlag::Noblood as u32,
        MapObjFlag2::FootClip as u32 | MapObjFlag2::PassMobj as u32,
        None,
    ),
    // MT_ROCKET
    MapObjInfo::new(-1, 1000, 20.0, 11.0, 8.0, 11.0, 0.0, 100, 20, PROJECTILE, 0, None),
    // MT_PLASMA
    MapObjInfo::new(-1, 1000, 25.0, 13.0, 8.0, 13.0, 0.0, 100, 5, PROJECTILE, 0, None),
    // MT_TROOPSHOT
    MapObjInfo::new(-1, 1000, 10.0, 6.0, 8.0, 6.0, 0.0, 100, 3, PROJECTILE, 0, None),
    // MT_PUFF
    MapObjInfo::new(-1, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, EFFECT, 0, None),
    // MT_BLOOD
    MapObjInfo::new(-1, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, MapObjFlag::Noblockmap as u32, 0, None),
    // MT_GREENBLOOD
    MapObjInfo::new(-1, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, MapObjFlag::Noblockmap as u32, 0, None),
    // MT_BLUEBLOOD
    MapObjInfo::new(-1, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, MapObjFlag::Noblockmap as u32, 0, None),
    // MT_FUZZYBLOOD
    MapObjInfo::new(-1, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, MapObjFlag::Noblockmap as u32 | MapObjFlag::Shadow as u32, 0, None),
    // MT_CLIP
    MapObjInfo::new(2007, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, MapObjFlag::Special as u32, MapObjFlag2::FootClip as u32, None),
    // MT_STIMPACK
    MapObjInfo::new(2011, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, MapObjFlag::Special as u32, MapObjFlag2::FootClip as u32, None),
    // MT_HANGINGBODY
    MapObjInfo::new(
        63,
        1000,
        0.0,
        16.0,
        68.0,
        16.0,
        0.0,
        100,
        0,
        MapObjFlag::Solid as u32 | MapObjFlag::Spawnceiling as u32 | MapObjFlag::Nogravity as u32,
        0,
        None,
    ),
    // MT_TELEPORTMAN
    MapObjInfo::new(14, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, MapObjFlag::Noblockmap as u32 | MapObjFlag::Nosector as u32, 0, None),
    // MT_TFOG
    MapObjInfo::new(-1, 1000, 0.0, 20.0, 16.0, 20.0, 0.0, 100, 0, EFFECT, 0, None),
];
