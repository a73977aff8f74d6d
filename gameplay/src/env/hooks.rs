//! Everything the clipping code asks of the rest of the game. Line specials,
//! damage, pickups, state changes and sounds are owned elsewhere, the movement
//! code only decides *when* they happen.

use glam::Vec2;
use log::{debug, trace};
use math::point_to_angle_2;

use crate::info::{MapObjKind, StateNum};
use crate::level::Level;
use crate::thing::{MapObjFlag, ThingId};

/// The few sounds the movement code starts itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SfxName {
    /// Player slammed into a wall or landed hard
    Oof,
    /// Use pressed against nothing usable
    Noway,
    /// Corpse crushed to gibs
    Slop,
}

/// Callbacks into the game. Each is handed the level so it may change the
/// world, including moving or removing the thing that triggered it.
pub trait LevelHooks {
    /// `thing` moved across `line`, starting on `side`
    ///
    /// Doom function name `P_CrossSpecialLine`
    fn cross_special_line(&mut self, level: &mut Level, line: usize, side: usize, thing: ThingId);

    /// A hitscan attack from `thing` struck `line`
    ///
    /// Doom function name `P_ShootSpecialLine`
    fn shoot_special_line(&mut self, level: &mut Level, line: usize, thing: ThingId);

    /// `thing` pressed use on `line` from `side`. Returns true if the line did
    /// something.
    ///
    /// Doom function name `P_UseSpecialLine`
    fn use_special_line(
        &mut self,
        level: &mut Level,
        line: usize,
        side: usize,
        thing: ThingId,
    ) -> bool;

    /// Doom function name `P_DamageMobj`
    ///
    /// - `inflictor` is what struck (missile, puff owner, explosion). `None`
    ///   for crushers and the like.
    /// - `source` is who to retaliate against.
    fn damage_thing(
        &mut self,
        level: &mut Level,
        target: ThingId,
        inflictor: Option<ThingId>,
        source: Option<ThingId>,
        damage: i32,
    );

    /// Doom function name `P_TouchSpecialThing`
    fn touch_special(&mut self, level: &mut Level, special: ThingId, toucher: ThingId);

    /// Doom function name `P_SetMobjState`
    fn set_state(&mut self, level: &mut Level, thing: ThingId, state: StateNum);

    /// Doom function name `S_StartSound`
    fn start_sound(&mut self, level: &mut Level, thing: ThingId, sfx: SfxName);

    /// A purely decorative splat on the floor of a crushed corpse
    fn spawn_blood_splat(&mut self, level: &mut Level, xy: Vec2, floorz: f32, kind: MapObjKind);

    /// Doom function name `P_ExplodeMissile`
    fn explode_missile(&mut self, level: &mut Level, missile: ThingId);
}

/// Enough of the game for things to live and die in: damage takes health and
/// kills, pickups vanish, missiles stop dead. Specials and sounds are logged.
#[derive(Debug, Default)]
pub struct DefaultHooks {
    /// Line specials triggered by crossing, in order
    pub crossed: Vec<(usize, usize, ThingId)>,
    /// Line specials used, in order
    pub used: Vec<(usize, usize, ThingId)>,
    pub sounds: Vec<(ThingId, SfxName)>,
    /// Where crushed corpses left splats
    pub splats: Vec<Vec2>,
}

impl DefaultHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Doom function name `P_KillMobj`
    fn kill(&mut self, level: &mut Level, target: ThingId) {
        let Some(thing) = level.things.get_mut(target) else {
            return;
        };
        thing.flags &= !(MapObjFlag::Shootable as u32
            | MapObjFlag::Float as u32
            | MapObjFlag::Skullfly as u32);
        if thing.kind != MapObjKind::MT_SKULL {
            thing.flags &= !(MapObjFlag::Nogravity as u32);
        }
        thing.flags |= MapObjFlag::Corpse as u32 | MapObjFlag::Dropoff as u32;
        thing.flags &= !(MapObjFlag::Solid as u32);
        thing.height /= 4.0;

        let state = if thing.health < -thing.info.spawnhealth {
            StateNum::XDeath
        } else {
            StateNum::Death
        };
        debug!("Killed {:?}", thing.kind);
        self.set_state(level, target, state);
    }
}

impl LevelHooks for DefaultHooks {
    fn cross_special_line(&mut self, level: &mut Level, line: usize, side: usize, thing: ThingId) {
        trace!(
            "Crossed line {line} (special {}) from side {side}",
            level.map_data.linedefs[line].special
        );
        self.crossed.push((line, side, thing));
    }

    fn shoot_special_line(&mut self, level: &mut Level, line: usize, _thing: ThingId) {
        trace!(
            "Shot line {line} (special {})",
            level.map_data.linedefs[line].special
        );
    }

    fn use_special_line(
        &mut self,
        level: &mut Level,
        line: usize,
        side: usize,
        thing: ThingId,
    ) -> bool {
        trace!(
            "Used line {line} (special {}) from side {side}",
            level.map_data.linedefs[line].special
        );
        self.used.push((line, side, thing));
        // Only the front of a line can be used
        side == 0
    }

    fn damage_thing(
        &mut self,
        level: &mut Level,
        target: ThingId,
        inflictor: Option<ThingId>,
        source: Option<ThingId>,
        damage: i32,
    ) {
        let Some(thing) = level.things.get(target) else {
            return;
        };
        if !thing.has_flag(MapObjFlag::Shootable) || thing.health <= 0 {
            return;
        }
        if let Some(player) = thing.player.and_then(|p| level.players.get(p)) {
            // Below certain threshold, ignore damage in GOD mode, or with INVUL power.
            if damage < 1000 && player.is_invulnerable() {
                return;
            }
        }

        // Push away from whatever hit
        let push_from = inflictor
            .or(source)
            .and_then(|id| level.things.get(id))
            .map(|t| t.xy);
        let thing = &mut level.things[target];
        if thing.has_flag(MapObjFlag::Skullfly) {
            thing.momxy = Vec2::ZERO;
            thing.momz = 0.0;
            thing.flags &= !(MapObjFlag::Skullfly as u32);
        }
        if let Some(from) = push_from {
            if !thing.has_flag(MapObjFlag::Noclip) && from != thing.xy {
                let angle = point_to_angle_2(thing.xy, from);
                let thrust = damage as f32 * 16.66 / thing.info.mass as f32;
                thing.momxy += angle.unit() * thrust;
            }
        }

        debug!("Applying {damage} damage to {:?}", thing.kind);
        thing.health -= damage;
        if thing.health <= 0 {
            self.kill(level, target);
        }
    }

    fn touch_special(&mut self, level: &mut Level, special: ThingId, toucher: ThingId) {
        let (Some(s), Some(t)) = (level.things.get(special), level.things.get(toucher)) else {
            return;
        };
        let delta = s.z - t.z;
        if delta > t.height || delta < -8.0 || t.health <= 0 {
            // Can't reach it, or dead
            return;
        }
        debug!("{:?} picked up {:?}", t.kind, s.kind);
        level.remove_map_object(special);
    }

    fn set_state(&mut self, level: &mut Level, thing: ThingId, state: StateNum) {
        if let Some(t) = level.things.get_mut(thing) {
            t.state = state;
        }
    }

    fn start_sound(&mut self, _level: &mut Level, thing: ThingId, sfx: SfxName) {
        trace!("Sound {sfx:?} from {thing:?}");
        self.sounds.push((thing, sfx));
    }

    fn spawn_blood_splat(&mut self, _level: &mut Level, xy: Vec2, floorz: f32, kind: MapObjKind) {
        trace!("Splat {kind:?} at {xy}, {floorz}");
        self.splats.push(xy);
    }

    fn explode_missile(&mut self, level: &mut Level, missile: ThingId) {
        let Some(thing) = level.things.get_mut(missile) else {
            return;
        };
        thing.momxy = Vec2::ZERO;
        thing.momz = 0.0;
        thing.flags &= !(MapObjFlag::Missile as u32);
        debug!("{:?} exploded at {}", thing.kind, thing.xy);
        self.set_state(level, missile, StateNum::Death);
    }
}
