//! Per-kind constants for map objects.

mod map_object_info;

use serde::{Deserialize, Serialize};

pub use map_object_info::MOBJINFO;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapObjKind {
    MT_PLAYER,
    MT_POSSESSED,
    MT_TROOP,
    MT_SERGEANT,
    MT_SKULL,
    MT_HEAD,
    MT_PAIN,
    MT_KNIGHT,
    MT_BRUISER,
    MT_CYBORG,
    MT_SPIDER,
    MT_BOSSBRAIN,
    MT_BARREL,
    MT_ROCKET,
    MT_PLASMA,
    MT_TROOPSHOT,
    MT_PUFF,
    MT_BLOOD,
    MT_GREENBLOOD,
    MT_BLUEBLOOD,
    MT_FUZZYBLOOD,
    MT_CLIP,
    MT_STIMPACK,
    MT_HANGINGBODY,
    MT_TELEPORTMAN,
    MT_TFOG,
    NUMMOBJTYPES,
}

impl MapObjKind {
    #[inline]
    pub fn info(self) -> &'static MapObjInfo {
        &MOBJINFO[self as usize]
    }
}

/// The states the movement code asks a thing to enter. Animation is driven
/// elsewhere, these are only the requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateNum {
    Spawn,
    See,
    Death,
    XDeath,
    /// Crushed corpse
    Gibs,
}

#[derive(Debug, Clone, Copy)]
pub struct MapObjInfo {
    pub doomednum: i32,
    pub spawnhealth: i32,
    pub speed: f32,
    pub radius: f32,
    pub height: f32,
    /// Radius used against other things and when gathering touched sectors.
    /// Some kinds clip with a smaller radius than they touch with.
    pub pickup_radius: f32,
    /// Height that missiles must clear to pass over. 0 uses the real height.
    pub projectile_pass_height: f32,
    pub mass: i32,
    pub damage: i32,
    pub flags: u32,
    pub flags2: u32,
    /// Kind of blood this bleeds, `None` to never bleed
    pub blood: Option<MapObjKind>,
}

impl MapObjInfo {
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn new(
        doomednum: i32,
        spawnhealth: i32,
        speed: f32,
        radius: f32,
        height: f32,
        pickup_radius: f32,
        projectile_pass_height: f32,
        mass: i32,
        damage: i32,
        flags: u32,
        flags2: u32,
        blood: Option<MapObjKind>,
    ) -> Self {
        Self {
            doomednum,
            spawnhealth,
            speed,
            radius,
            height,
            pickup_radius,
            projectile_pass_height,
            mass,
            damage,
            flags,
            flags2,
            blood,
        }
    }
}
