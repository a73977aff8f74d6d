//! Shooting and aiming, explosions, line of sight and the use button. Each is
//! a `path_traverse` along a ray with a small traverser deciding what every
//! intercept does.

use glam::Vec2;
use log::{debug, trace};
use math::{Angle, Trace};

use crate::doom_def::{AIM_SLOPE, FOOTCLIPSIZE, MAXRADIUS, USERANGE};
use crate::env::{LevelHooks, SfxName};
use crate::info::MapObjKind;
use crate::level::Level;
use crate::level::flags::LineDefFlags;
use crate::level::map_defs::{LineDef, Sector};
use crate::utilities::{
    Intercept, InterceptKind, PT_ADDLINES, PT_ADDTHINGS, PortalZ, path_traverse,
};

use super::{MapObjFlag, MapObjFlag2, ThingId};

/// What an aim found, and the slope that strikes the middle of the part of it
/// that can be seen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimResult {
    pub aimslope: f32,
    pub line_target: ThingId,
}

/// A vertical window of slopes from `z`, narrowed by every opening the ray
/// passes through
struct SlopeWindow {
    top_slope: f32,
    bot_slope: f32,
    /// Scales an intercept fraction into the distance a slope is taken over.
    /// Aiming works per map unit, sight per whole trace.
    range: f32,
    z: f32,
    result: Option<AimResult>,
}

impl SlopeWindow {
    fn new(top_slope: f32, bot_slope: f32, range: f32, z: f32) -> Self {
        Self {
            top_slope,
            bot_slope,
            range,
            z,
            result: None,
        }
    }

    /// Narrow the window to what fits through the line. False if the line is
    /// solid or nothing fits.
    fn pass_line(&mut self, line: &LineDef, sectors: &[Sector], frac: f32) -> bool {
        // Check if solid line and stop
        if line.flags & LineDefFlags::TwoSided as u32 == 0 {
            return false;
        }
        let Some(back) = line.backsector else {
            return false;
        };
        let portal = PortalZ::new(line, sectors);
        if portal.bottom_z >= portal.top_z {
            return false;
        }

        let dist = self.range * frac;
        let (front, back) = (&sectors[line.frontsector], &sectors[back]);
        if front.floorheight != back.floorheight {
            let slope = (portal.bottom_z - self.z) / dist;
            if slope > self.bot_slope {
                self.bot_slope = slope;
            }
        }
        if front.ceilingheight != back.ceilingheight {
            let slope = (portal.top_z - self.z) / dist;
            if slope < self.top_slope {
                self.top_slope = slope;
            }
        }

        self.top_slope > self.bot_slope
    }

    /// Doom function name `PTR_AimTraverse`
    fn check_aim(
        &mut self,
        level: &Level,
        shooter: ThingId,
        mask: u32,
        intercept: &Intercept,
    ) -> bool {
        let other = match intercept.kind {
            InterceptKind::Line(l) => {
                return self.pass_line(
                    &level.map_data.linedefs[l],
                    &level.map_data.sectors,
                    intercept.frac,
                );
            }
            InterceptKind::Thing(other) => other,
        };

        // Don't aim at self
        if other == shooter {
            return true;
        }
        let (Some(thing), Some(src)) = (level.things.get(other), level.things.get(shooter)) else {
            return true;
        };
        // Corpse?
        if !thing.has_flag(MapObjFlag::Shootable) {
            return true;
        }
        // Things sharing a masked flag don't aim at each other, players aside
        if thing.flags & src.flags & mask != 0 && thing.player.is_none() {
            return true;
        }

        let dist = self.range * intercept.frac;
        let thing_top_slope = (thing.top() - self.z) / dist;
        if thing_top_slope < self.bot_slope {
            return true; // Shot over
        }
        let thing_bot_slope = (thing.z - self.z) / dist;
        if thing_bot_slope > self.top_slope {
            return true; // Shot under
        }

        let top = thing_top_slope.min(self.top_slope);
        let bot = thing_bot_slope.max(self.bot_slope);
        self.result = Some(AimResult {
            aimslope: (top + bot) / 2.0,
            line_target: other,
        });
        false
    }
}

struct ShootTraverse {
    aim_slope: f32,
    attack_range: f32,
    damage: i32,
    shootz: f32,
    trace: Trace,
}

impl ShootTraverse {
    /// Doom function name `PTR_ShootTraverse`
    fn resolve(
        &self,
        level: &mut Level,
        shooter: ThingId,
        intercept: &Intercept,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        match intercept.kind {
            InterceptKind::Line(l) => self.shoot_line(level, shooter, l, intercept.frac, hooks),
            InterceptKind::Thing(other) => {
                self.shoot_thing(level, shooter, other, intercept.frac, hooks)
            }
        }
    }

    fn shoot_line(
        &self,
        level: &mut Level,
        shooter: ThingId,
        l: usize,
        frac: f32,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        if level.map_data.linedefs[l].special != 0 {
            hooks.shoot_special_line(level, l, shooter);
        }

        let line = &level.map_data.linedefs[l];
        if line.flags & LineDefFlags::TwoSided as u32 != 0 {
            let sectors = &level.map_data.sectors;
            let portal = PortalZ::new(line, sectors);
            let dist = self.attack_range * frac;
            let under_bottom = (portal.bottom_z - self.shootz) / dist <= self.aim_slope;
            let under_top = (portal.top_z - self.shootz) / dist >= self.aim_slope;

            let passes = match line.backsector {
                None => under_bottom && under_top,
                Some(back) => {
                    let (front, back) = (&sectors[line.frontsector], &sectors[back]);
                    (front.floorheight == back.floorheight || under_bottom)
                        && (front.ceilingheight == back.ceilingheight || under_top)
                }
            };
            if passes {
                // shot continues
                return true;
            }
        }

        self.hit_line(level, l, frac);
        false
    }

    /// Puff on the wall, or on the floor or ceiling in front of it when the
    /// shot meets those first. Shots into the sky vanish.
    fn hit_line(&self, level: &mut Level, l: usize, frac: f32) {
        // position a bit closer
        let mut frac = frac - 4.0 / self.attack_range;
        let distz = self.aim_slope * self.attack_range * frac;
        let mut z = self.shootz + distz;

        let line = &level.map_data.linedefs[l];
        if let Some(sector) = line
            .sector_on_side(self.trace.xy)
            .map(|s| &level.map_data.sectors[s])
        {
            if z > sector.ceilingheight && distz != 0.0 {
                if level.is_sky(sector.ceilingpic) {
                    return;
                }
                frac *= (sector.ceilingheight - self.shootz) / distz;
                z = sector.ceilingheight;
            } else if z < sector.floorheight && distz != 0.0 {
                if sector.is_liquid() || level.is_sky(sector.floorpic) {
                    return;
                }
                frac *= (sector.floorheight - self.shootz) / distz;
                z = sector.floorheight;
            }
        }

        let front = &level.map_data.sectors[line.frontsector];
        if level.is_sky(front.ceilingpic) {
            // don't shoot the sky
            if z > front.ceilingheight {
                return;
            }
            // it's a sky hack wall
            if let Some(back) = line.backsector.map(|b| &level.map_data.sectors[b]) {
                if level.is_sky(back.ceilingpic) && back.ceilingheight < z {
                    return;
                }
            }
        }

        let xy = self.trace.xy + self.trace.dxy * frac;
        trace!("Shot struck line {l} at {xy}, {z}");
        level.spawn_puff(xy, z);
    }

    fn shoot_thing(
        &self,
        level: &mut Level,
        shooter: ThingId,
        other: ThingId,
        frac: f32,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        // Don't shoot self
        if other == shooter {
            return true;
        }
        let Some(thing) = level.things.get(other) else {
            return true;
        };
        // Corpse?
        if !thing.has_flag(MapObjFlag::Shootable) {
            return true;
        }

        let dist = self.attack_range * frac;
        if (thing.top() - self.shootz) / dist < self.aim_slope {
            return true; // Shot over
        }
        if (thing.z - self.shootz) / dist > self.aim_slope {
            return true; // Shot under
        }

        // position a bit closer
        let frac = frac - 10.0 / self.attack_range;
        let xy = self.trace.xy + self.trace.dxy * frac;
        let z = self.shootz + self.aim_slope * frac * self.attack_range;

        let noblood = thing.has_flag(MapObjFlag::Noblood);
        let kind = thing.kind;
        let invulnerable = thing
            .player
            .and_then(|p| level.players.get(p))
            .is_some_and(|p| p.is_invulnerable());

        if noblood {
            level.spawn_puff(xy, z);
        } else if kind == MapObjKind::MT_SKULL {
            level.spawn_puff(xy, z - 8.0);
        } else if kind != MapObjKind::MT_PLAYER {
            level.spawn_blood(xy, z, other);
        } else if !invulnerable {
            let z = z + level.rng.m_random_int(4, 16) as f32;
            level.spawn_blood(xy, z, other);
        }

        if self.damage != 0 {
            debug!("Shot {kind:?} for {}", self.damage);
            hooks.damage_thing(level, other, Some(shooter), Some(shooter), self.damage);
        }
        // don't go any farther
        false
    }
}

impl Level {
    /// Find the first shootable thing along `angle` within the vertical view
    /// range of the shooter. Things sharing any of the shooter's flags in
    /// `mask` are looked past unless they are players.
    ///
    /// Doom function name `P_AimLineAttack`
    pub fn aim_line_attack(
        &mut self,
        id: ThingId,
        angle: Angle,
        distance: f32,
        mask: u32,
    ) -> Option<AimResult> {
        let thing = self.things.get(id)?;
        let origin = thing.xy;
        let endpoint = origin + angle.unit() * distance;
        let shootz = thing.z + (thing.height as i32 >> 1) as f32 + 8.0;

        // can't shoot outside view angles
        let mut aim = SlopeWindow::new(AIM_SLOPE, -AIM_SLOPE, distance, shootz);
        path_traverse(
            self,
            origin,
            endpoint,
            PT_ADDLINES | PT_ADDTHINGS,
            |level, intercept| aim.check_aim(level, id, mask, intercept),
        );

        if let Some(res) = aim.result {
            trace!("{id:?} aimed at {:?}, slope {}", res.line_target, res.aimslope);
        }
        aim.result
    }

    /// Fire a hitscan shot along `angle` and `slope`. A `damage` of zero
    /// still spawns the puffs and blood.
    ///
    /// Doom function name `P_LineAttack`
    pub fn line_attack(
        &mut self,
        id: ThingId,
        angle: Angle,
        distance: f32,
        slope: f32,
        damage: i32,
        hooks: &mut dyn LevelHooks,
    ) {
        let Some(thing) = self.things.get(id) else {
            return;
        };
        let origin = thing.xy;
        let mut shootz = thing.z + (thing.height as i32 >> 1) as f32 + 8.0;
        if thing.has_flag2(MapObjFlag2::FeetAreClipped) {
            shootz -= FOOTCLIPSIZE;
        }

        let shoot = ShootTraverse {
            aim_slope: slope,
            attack_range: distance,
            damage,
            shootz,
            trace: Trace::new(origin, angle.unit() * distance),
        };
        path_traverse(
            self,
            origin,
            origin + shoot.trace.dxy,
            PT_ADDLINES | PT_ADDTHINGS,
            |level, intercept| shoot.resolve(level, id, intercept, hooks),
        );
    }

    /// Hurt everything near the explosion at `spot` that it can see. `source`
    /// is the creature that caused it. Without `verticality` height is
    /// ignored.
    ///
    /// Doom function name `P_RadiusAttack`
    pub fn radius_attack(
        &mut self,
        spot: ThingId,
        source: Option<ThingId>,
        damage: i32,
        verticality: bool,
        hooks: &mut dyn LevelHooks,
    ) {
        let Some(bomb) = self.things.get(spot) else {
            return;
        };
        let xy = bomb.xy;
        let dist = damage as f32 + MAXRADIUS;

        let bmap = &self.map_data.blockmap;
        let xl = bmap.safe_block_x(xy.x - dist);
        let xh = bmap.safe_block_x(xy.x + dist);
        let yl = bmap.safe_block_y(xy.y - dist);
        let yh = bmap.safe_block_y(xy.y + dist);

        for by in yl..=yh {
            for bx in xl..=xh {
                self.block_things_iterator(bx, by, |level, other| {
                    level.radius_damage_other(spot, source, other, damage, verticality, hooks);
                    true
                });
            }
        }
    }

    /// Doom function name `PIT_RadiusAttack`
    fn radius_damage_other(
        &mut self,
        spot: ThingId,
        source: Option<ThingId>,
        other: ThingId,
        damage: i32,
        verticality: bool,
        hooks: &mut dyn LevelHooks,
    ) {
        let (Some(bomb), Some(thing)) = (self.things.get(spot), self.things.get(other)) else {
            return;
        };
        // Corpses still get thrown about
        if !thing.has_flag(MapObjFlag::Shootable) && !thing.has_flag(MapObjFlag::Corpse) {
            return;
        }
        let kind = thing.kind;
        if matches!(kind, MapObjKind::MT_CYBORG | MapObjKind::MT_SPIDER) {
            return;
        }

        // Could just use vector lengths but it changes Doom behaviour...
        let d = (thing.xy - bomb.xy).abs();
        let dist = d.x.max(d.y) - thing.radius;

        let dist = if !verticality || self.config.infinite_height || kind == MapObjKind::MT_BOSSBRAIN
        {
            (dist.floor() as i32).max(0)
        } else {
            let dz = (thing.z + (thing.height as i32 >> 1) as f32 - bomb.z).abs();
            let dist = (dist.max(dz).floor() as i32).max(0);
            if dist >= damage {
                return;
            }
            // A floor or ceiling lies between
            if (thing.floorz > bomb.z && bomb.ceilingz < thing.z)
                || (thing.ceilingz < bomb.z && bomb.floorz > thing.z)
            {
                return;
            }
            dist
        };
        if dist >= damage {
            return; // out of range of blowy
        }
        let spot_kind = bomb.kind;

        // must be in direct path
        if !self.check_sight(other, spot) {
            return;
        }
        trace!("Blast of {spot_kind:?} reached {kind:?}");
        hooks.damage_thing(self, other, Some(spot), source, damage - dist);

        // Count the monsters a player's rocket hits, once per rocket
        let corpse = self
            .things
            .get(other)
            .is_some_and(|t| t.has_flag(MapObjFlag::Corpse));
        if spot_kind == MapObjKind::MT_ROCKET && kind != MapObjKind::MT_BARREL && !corpse {
            let first = self.things.get_mut(spot).map(|b| {
                b.nudge += 1;
                b.nudge == 2
            });
            if first == Some(true) {
                if let Some(player) = self.view_player_mut() {
                    player.shots_hit += 1;
                }
            }
        }
    }

    /// Check for a clear line of sight from the eyes of `a` to any part of
    /// `b`. Only lines block sight.
    ///
    /// Doom function name `P_CheckSight`
    pub fn check_sight(&mut self, a: ThingId, b: ThingId) -> bool {
        let (Some(t1), Some(t2)) = (self.things.get(a), self.things.get(b)) else {
            return false;
        };
        let sightz = t1.z + t1.height - (t1.height as i32 >> 2) as f32;
        let (from, to) = (t1.xy, t2.xy);
        let mut sight = SlopeWindow::new(t2.top() - sightz, t2.z - sightz, 1.0, sightz);

        path_traverse(self, from, to, PT_ADDLINES, |level, intercept| {
            match intercept.kind {
                InterceptKind::Line(l) => sight.pass_line(
                    &level.map_data.linedefs[l],
                    &level.map_data.sectors,
                    intercept.frac,
                ),
                InterceptKind::Thing(_) => true,
            }
        })
    }

    /// Press use: activate the first special line in reach, or grunt at
    /// whatever is in the way.
    ///
    /// Doom function name `P_UseLines`
    pub fn use_lines(&mut self, id: ThingId, hooks: &mut dyn LevelHooks) {
        let Some(thing) = self.things.get(id) else {
            return;
        };
        let origin = thing.xy;
        let endpoint = origin + thing.angle.unit() * USERANGE;

        // The second pass makes the sound work on two-sided lines too
        if path_traverse(self, origin, endpoint, PT_ADDLINES, |level, intercept| {
            level.use_traverse(id, origin, intercept, hooks)
        }) && !path_traverse(self, origin, endpoint, PT_ADDLINES, |level, intercept| {
            level.no_way_traverse(id, intercept)
        }) {
            hooks.start_sound(self, id, SfxName::Noway);
        }
    }

    /// Doom function name `PTR_UseTraverse`
    fn use_traverse(
        &mut self,
        id: ThingId,
        origin: Vec2,
        intercept: &Intercept,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        let InterceptKind::Line(l) = intercept.kind else {
            return true;
        };
        let line = &self.map_data.linedefs[l];

        if line.special == 0 {
            if PortalZ::new(line, &self.map_data.sectors).range <= 0.0 {
                hooks.start_sound(self, id, SfxName::Noway);
                // can't use through a wall
                return false;
            }
            // not a special line, but keep checking
            return true;
        }

        let side = line.point_on_side(origin);
        let pass_use = line.flags & LineDefFlags::PassUse as u32 != 0;
        debug!("{id:?} used line {l}");
        hooks.use_special_line(self, l, side, id);

        // can't use more than one special line in a row, unless it's the
        // wrong side
        side == 1 || pass_use
    }

    /// False for lines that should make a player grunt when used: blocking
    /// or closed lines, and steps too high or openings too low to pass.
    /// Specials in reach were already handled.
    ///
    /// Doom function name `PTR_NoWayTraverse`
    fn no_way_traverse(&self, id: ThingId, intercept: &Intercept) -> bool {
        let InterceptKind::Line(l) = intercept.kind else {
            return true;
        };
        let Some(thing) = self.things.get(id) else {
            return true;
        };
        let line = &self.map_data.linedefs[l];
        if line.special != 0 {
            return true;
        }
        if line.flags & LineDefFlags::Blocking as u32 != 0 {
            return false;
        }
        let open = PortalZ::new(line, &self.map_data.sectors);
        !(open.range <= 0.0 || open.bottom_z > thing.z + 24.0 || open.top_z < thing.top())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use glam::Vec2;
    use math::Angle;

    use crate::config::ClipConfig;
    use crate::doom_def::{MISSILERANGE, ONFLOORZ};
    use crate::env::{DefaultHooks, SfxName};
    use crate::info::MapObjKind;
    use crate::level::Level;
    use crate::level::map_defs::TerrainType;
    use crate::level::tests::{ledge_map, square_room, two_rooms, walled_room};
    use crate::thing::ThingId;

    fn of_kind(level: &Level, kind: MapObjKind) -> Vec<ThingId> {
        level
            .things
            .iter()
            .filter(|(_, t)| t.kind == kind)
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn aim_finds_the_nearest_target() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let player = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
        let imp = level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        level.spawn_map_object(Vec2::new(200.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);

        let res = level
            .aim_line_attack(player, Angle::new(0.0), MISSILERANGE, 0)
            .expect("target");
        assert_eq!(res.line_target, imp);
        // Eyes at 36, the imp spans 0..56 at 200 units
        assert!((res.aimslope + 0.04).abs() < 0.001);

        // Nothing to the west
        assert!(level.aim_line_attack(player, Angle::new(PI), MISSILERANGE, 0).is_none());
    }

    #[test]
    fn aim_stops_at_closed_door() {
        let mut level = Level::new(two_rooms(0.0, 0.0, 0), ClipConfig::default());
        let player = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
        level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        assert!(level.aim_line_attack(player, Angle::new(0.0), MISSILERANGE, 0).is_none());
    }

    #[test]
    fn aim_mask_skips_friends() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let shooter = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        let mask = crate::thing::MapObjFlag::Countkill as u32;
        assert!(level.aim_line_attack(shooter, Angle::new(0.0), MISSILERANGE, mask).is_none());
        assert!(level.aim_line_attack(shooter, Angle::new(0.0), MISSILERANGE, 0).is_some());
    }

    #[test]
    fn shot_draws_blood() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
        let imp = level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);

        level.line_attack(player, Angle::new(0.0), MISSILERANGE, -0.04, 10, &mut hooks);
        assert_eq!(level.things[imp].health, 50);
        let blood = of_kind(&level, MapObjKind::MT_BLOOD);
        assert_eq!(blood.len(), 1);
        // Ten units short of where the shot met the imp
        assert!((level.things[blood[0]].xy.x - 90.0).abs() < 0.01);
        assert!(of_kind(&level, MapObjKind::MT_PUFF).is_empty());
    }

    #[test]
    fn shot_puffs_on_walls() {
        let mut level = Level::new(walled_room(), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(0.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);

        level.line_attack(player, Angle::new(0.0), MISSILERANGE, 0.0, 10, &mut hooks);
        let puffs = of_kind(&level, MapObjKind::MT_PUFF);
        assert_eq!(puffs.len(), 1);
        let puff = &level.things[puffs[0]];
        assert!((puff.xy.x - 46.0).abs() < 0.01);
        assert!(puff.xy.y.abs() < 0.01);
    }

    #[test]
    fn shots_clip_to_ceiling_and_sky_swallows_them() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
        let imp = level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);

        // Steeply up, over the imp and into the ceiling before the east wall
        level.line_attack(player, Angle::new(0.0), MISSILERANGE, 1.0, 10, &mut hooks);
        assert_eq!(level.things[imp].health, 60);
        let puffs = of_kind(&level, MapObjKind::MT_PUFF);
        assert_eq!(puffs.len(), 1);
        let puff = &level.things[puffs[0]];
        assert!((puff.xy.x + 8.0).abs() < 0.01);
        assert!((puff.z - 128.0).abs() <= 4.0);
        level.remove_map_object(puffs[0]);

        level.sky_num = Some(7);
        level.map_data.sectors[0].ceilingpic = 7;
        level.line_attack(player, Angle::new(0.0), MISSILERANGE, 1.0, 10, &mut hooks);
        assert!(of_kind(&level, MapObjKind::MT_PUFF).is_empty());
    }

    #[test]
    fn shots_into_liquid_floors_vanish() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);

        level.line_attack(player, Angle::new(0.0), MISSILERANGE, -1.0, 10, &mut hooks);
        let puffs = of_kind(&level, MapObjKind::MT_PUFF);
        assert_eq!(puffs.len(), 1);
        assert!((level.things[puffs[0]].xy.x + 64.0).abs() < 0.01);
        level.remove_map_object(puffs[0]);

        level.map_data.sectors[0].terrain = TerrainType::Water;
        level.line_attack(player, Angle::new(0.0), MISSILERANGE, -1.0, 10, &mut hooks);
        assert!(of_kind(&level, MapObjKind::MT_PUFF).is_empty());
    }

    #[test]
    fn explosion_reaches_what_it_can_see() {
        let mut level = Level::new(two_rooms(0.0, 128.0, 0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let rocket = level.spawn_map_object(Vec2::new(0.0, 0.0), 28.0, MapObjKind::MT_ROCKET);
        let imp = level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);

        level.radius_attack(rocket, None, 128, true, &mut hooks);
        // 80 units from the centre
        assert_eq!(level.things[imp].health, 12);

        let mut level = Level::new(two_rooms(0.0, 0.0, 0), ClipConfig::default());
        let rocket = level.spawn_map_object(Vec2::new(0.0, 0.0), 28.0, MapObjKind::MT_ROCKET);
        let imp = level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        level.radius_attack(rocket, None, 128, true, &mut hooks);
        assert_eq!(level.things[imp].health, 60);
    }

    #[test]
    fn big_bosses_shrug_off_explosions() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let rocket = level.spawn_map_object(Vec2::new(0.0, 0.0), 28.0, MapObjKind::MT_ROCKET);
        let cyborg = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_CYBORG);
        level.radius_attack(rocket, None, 128, false, &mut hooks);
        assert_eq!(level.things[cyborg].health, 4000);
    }

    #[test]
    fn rocket_hits_count_once() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(-200.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
        level.add_player(player);
        let rocket = level.spawn_map_object(Vec2::new(0.0, 0.0), 28.0, MapObjKind::MT_ROCKET);
        level.things[rocket].nudge = 1;
        level.spawn_map_object(Vec2::new(60.0, 0.0), ONFLOORZ, MapObjKind::MT_BRUISER);
        level.spawn_map_object(Vec2::new(0.0, 60.0), ONFLOORZ, MapObjKind::MT_BRUISER);

        level.radius_attack(rocket, Some(player), 128, true, &mut hooks);
        assert_eq!(level.players[0].shots_hit, 1);
        assert_eq!(level.things[rocket].nudge, 3);
    }

    #[test]
    fn sight_over_ledges() {
        let mut level = Level::new(ledge_map(64.0), ClipConfig::default());
        let low = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        let high = level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        assert!(level.check_sight(low, high));

        let mut level = Level::new(ledge_map(100.0), ClipConfig::default());
        let low = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        let high = level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        assert!(!level.check_sight(low, high));
    }

    #[test]
    fn sight_through_doors() {
        let mut level = Level::new(two_rooms(0.0, 128.0, 0), ClipConfig::default());
        let a = level.spawn_map_object(Vec2::new(-100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        let b = level.spawn_map_object(Vec2::new(100.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        assert!(level.check_sight(a, b));
        assert!(level.check_sight(b, a));

        level.map_data.sectors[1].ceilingheight = 0.0;
        assert!(!level.check_sight(a, b));
    }

    #[test]
    fn use_activates_special_line() {
        let mut level = Level::new(two_rooms(0.0, 128.0, 11), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(20.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);

        level.use_lines(player, &mut hooks);
        assert_eq!(hooks.used, vec![(6, 0, player)]);
        assert!(hooks.sounds.is_empty());

        // Out of reach
        level.things[player].angle = Angle::new(PI);
        level.use_lines(player, &mut hooks);
        assert_eq!(hooks.used.len(), 1);
        assert!(hooks.sounds.is_empty());
    }

    #[test]
    fn use_grunts_at_walls_and_steps() {
        let mut level = Level::new(walled_room(), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(20.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
        level.use_lines(player, &mut hooks);
        assert_eq!(hooks.sounds, vec![(player, SfxName::Noway)]);

        // A step too high to climb
        let mut level = Level::new(two_rooms(40.0, 128.0, 0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(20.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
        level.use_lines(player, &mut hooks);
        assert_eq!(hooks.sounds, vec![(player, SfxName::Noway)]);

        // One that isn't
        let mut level = Level::new(two_rooms(16.0, 128.0, 0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let player = level.spawn_map_object(Vec2::new(20.0, 0.0), ONFLOORZ, MapObjKind::MT_PLAYER);
        level.use_lines(player, &mut hooks);
        assert!(hooks.sounds.is_empty());
    }
}
