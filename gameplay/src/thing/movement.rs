//! Movement, collision handling.
//!
//! Position checks gather their results in a `ClipContext` owned by the
//! caller, so a hook that starts a check of its own while another is running
//! (a pickup teleporting the player, say) cannot disturb it.

use glam::Vec2;
use log::{debug, trace};
use math::{
    ANG45, ANG135, ANG180, Angle, FRACUNIT_DIV4, Trace, approx_distance, point_on_side,
    speed_squared,
};

use crate::doom_def::{
    FLOATSPEED, FRICTION_MASK, GRAVITY, MAXGEAR, MAXMOVE, MAXRADIUS, MAXSTEP,
    MORE_FRICTION_MOMENTUM, ORIG_FRICTION, ORIG_FRICTION_FACTOR, OVERDRIVE, SLIDE_FUDGE,
    STOPSPEED, TICRATE,
};
use crate::env::{LevelHooks, SfxName};
use crate::info::{MapObjKind, StateNum};
use crate::level::Level;
use crate::level::flags::LineDefFlags;
use crate::level::map_defs::{BBox, LineDef, SlopeType};
use crate::utilities::{
    BestSlide, Intercept, InterceptKind, PT_ADDLINES, PortalZ, box_on_line_side, path_traverse,
};

use super::{MapObjFlag, MapObjFlag2, MapObject, ThingId};

/// Everything a position check learns about a candidate position
#[derive(Debug, Default, Clone)]
pub struct ClipContext {
    pub xy: Vec2,
    pub bbox: BBox,
    /// The closest interval over all contacted sectors and things
    pub floorz: f32,
    pub ceilingz: f32,
    /// The lowest floor contacted
    pub dropoffz: f32,
    /// If true, the move would be ok if within `floorz - ceilingz`
    pub floatok: bool,
    /// The move drops the thing more than a step
    pub felldown: bool,
    /// The line that lowered the ceiling. A missile hitting one with a sky
    /// behind it vanishes instead of exploding.
    pub ceilingline: Option<usize>,
    /// The line that raised the floor
    pub floorline: Option<usize>,
    /// The last line that blocked, or changed the bounds
    pub blockline: Option<usize>,
    /// A real player may move out of a position they are stuck in
    pub unstuck: bool,
    /// Special lines touched at the new position, in the order found
    pub spec_hits: Vec<usize>,
}

/// What a `try_move_ex` did
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// The move was allowed. A stuck player may be allowed without moving.
    pub ok: bool,
    pub floatok: bool,
    pub felldown: bool,
    pub floorz: f32,
    pub ceilingline: Option<usize>,
    pub floorline: Option<usize>,
    pub blockline: Option<usize>,
}

impl MoveOutcome {
    fn from_context(ok: bool, ctx: &ClipContext) -> Self {
        Self {
            ok,
            floatok: ctx.floatok,
            felldown: ctx.felldown,
            floorz: ctx.floorz,
            ceilingline: ctx.ceilingline,
            floorline: ctx.floorline,
            blockline: ctx.blockline,
        }
    }
}

/// True if the thing's box at its current position does not touch the line.
/// A player already overlapping a wall may move away from it.
fn untouched(thing: &MapObject, ld: &LineDef) -> bool {
    let bbox = BBox::around(thing.xy, thing.radius);
    !bbox.overlaps(&ld.bbox) || box_on_line_side(&bbox, ld) != -1
}

/// Living things that move by themselves never topple off ledges
fn sentient(thing: &MapObject) -> bool {
    thing.health > 0 && (thing.player.is_some() || thing.has_flag(MapObjFlag::Countkill))
}

impl Level {
    /// Check whether the thing could stand at `xy`. Nothing is changed except
    /// `ctx`, and whatever the hooks do for things touched along the way
    /// (pickups, missile hits, a skull slamming into something).
    ///
    /// The results are left in `ctx`:
    /// - `floorz`, `ceilingz` and `dropoffz` for the new position
    /// - `ceilingline`, `floorline` and `blockline`
    /// - `spec_hits` for lines with specials that the box touches
    ///
    /// Doom function name `P_CheckPosition`
    pub fn check_position(
        &mut self,
        id: ThingId,
        xy: Vec2,
        ctx: &mut ClipContext,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        let Some(thing) = self.things.get(id) else {
            return false;
        };
        let flags = thing.flags;

        ctx.xy = xy;
        ctx.bbox = BBox::around(xy, thing.radius);
        let sector = &self.map_data.sectors[self.map_data.point_in_sector(xy)];
        ctx.floorz = sector.floorheight;
        ctx.dropoffz = sector.floorheight;
        ctx.ceilingz = sector.ceilingheight;
        ctx.ceilingline = None;
        ctx.floorline = None;
        ctx.blockline = None;
        ctx.unstuck = self.is_real_player(id);
        ctx.spec_hits.clear();

        self.next_valid_count();

        if flags & MapObjFlag::Noclip as u32 != 0 || self.freeze {
            return true;
        }

        // Check things first, possibly picking things up. The bounding box is
        // extended by MAXRADIUS because things are grouped into cells by their
        // origin, and can overlap into adjacent cells.
        let bbox = ctx.bbox;
        let bmap = &self.map_data.blockmap;
        let xl = bmap.safe_block_x(bbox.left - MAXRADIUS);
        let xh = bmap.safe_block_x(bbox.right + MAXRADIUS);
        let yl = bmap.safe_block_y(bbox.bottom - MAXRADIUS);
        let yh = bmap.safe_block_y(bbox.top + MAXRADIUS);

        for bx in xl..=xh {
            for by in yl..=yh {
                let clear = self.block_things_iterator(bx, by, |level, other| {
                    level.pit_check_thing(id, other, ctx, hooks)
                });
                if !clear {
                    return false;
                }
            }
        }

        // A touched special may have moved or removed the mover
        let Some(thing) = self.things.get(id) else {
            return false;
        };
        // Lines are clipped with the touch radius, unless standing still
        if thing.flags & MapObjFlag::Dropped as u32 == 0 && thing.xy != xy {
            ctx.bbox = BBox::around(xy, thing.info.pickup_radius);
        }

        // Hooks run for touched things may have walked lines themselves
        self.next_valid_count();

        let bbox = ctx.bbox;
        let bmap = &self.map_data.blockmap;
        let xl = bmap.safe_block_x(bbox.left);
        let xh = bmap.safe_block_x(bbox.right);
        let yl = bmap.safe_block_y(bbox.bottom);
        let yh = bmap.safe_block_y(bbox.top);

        for bx in xl..=xh {
            for by in yl..=yh {
                let clear =
                    self.block_lines_iterator(bx, by, |level, l| level.pit_check_line(id, l, ctx));
                if !clear {
                    return false;
                }
            }
        }
        true
    }

    /// Adjusts `ctx` floor and ceiling as lines are contacted. Returns false
    /// if the line blocks.
    ///
    /// Doom function name `PIT_CheckLine`
    fn pit_check_line(&self, id: ThingId, l: usize, ctx: &mut ClipContext) -> bool {
        let ld = &self.map_data.linedefs[l];
        if !ctx.bbox.overlaps(&ld.bbox) {
            return true;
        }
        if box_on_line_side(&ctx.bbox, ld) != -1 {
            return true;
        }
        let Some(thing) = self.things.get(id) else {
            return false;
        };

        // A line has been hit
        //
        // The moving thing's destination position will cross the given line.
        // If this should not be allowed, return false. If the line is special,
        // keep track of it to process later if the move is proven ok.

        if ld.backsector.is_none() {
            // one sided line
            ctx.blockline = Some(l);
            // A stuck player may still move away from the wall
            let d = ctx.xy - thing.xy;
            return ctx.unstuck && !untouched(thing, ld) && d.x * ld.delta.y > d.y * ld.delta.x;
        }

        if thing.flags & MapObjFlag::Missile as u32 == 0 {
            if ld.flags & LineDefFlags::Blocking as u32 != 0 {
                // explicitly blocking everything
                return ctx.unstuck && !untouched(thing, ld);
            }
            if thing.player.is_none()
                && thing.flags & (MapObjFlag::Corpse as u32 | MapObjFlag::Friend as u32) == 0
                && ld.flags & LineDefFlags::BlockMonsters as u32 != 0
            {
                // block monsters only
                return false;
            }
        }

        // set openrange, opentop, openbottom
        let portal = PortalZ::new(ld, &self.map_data.sectors);

        // adjust floor / ceiling heights
        if portal.top_z < ctx.ceilingz {
            ctx.ceilingz = portal.top_z;
            ctx.ceilingline = Some(l);
            ctx.blockline = Some(l);
        }
        if portal.bottom_z > ctx.floorz {
            ctx.floorz = portal.bottom_z;
            ctx.floorline = Some(l);
            ctx.blockline = Some(l);
        }
        if portal.lowest_z < ctx.dropoffz {
            ctx.dropoffz = portal.lowest_z;
        }

        if ld.special != 0 {
            ctx.spec_hits.push(l);
        }
        true
    }

    /// Returns false if `other` blocks the mover
    ///
    /// Doom function name `PIT_CheckThing`
    fn pit_check_thing(
        &mut self,
        id: ThingId,
        other: ThingId,
        ctx: &mut ClipContext,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        if other == id {
            // don't clip against self
            return true;
        }
        let (Some(mover), Some(thing)) = (self.things.get(id), self.things.get(other)) else {
            return true;
        };
        let (m_xy, m_z, m_top, m_radius) = (mover.xy, mover.z, mover.top(), mover.radius);
        let (m_flags, m_flags2, m_kind) = (mover.flags, mover.flags2, mover.kind);
        let (m_target, m_damage) = (mover.target, mover.info.damage);
        let (o_xy, o_z, o_height, o_top) = (thing.xy, thing.z, thing.height, thing.top());
        let (o_flags, o_flags2, o_kind, o_player) =
            (thing.flags, thing.flags2, thing.kind, thing.player);
        let infinite_height = self.config.infinite_height;
        let corpse = o_flags & MapObjFlag::Corpse as u32 != 0;

        // walking over a corpse shoves it a little
        if corpse
            && self.config.corpses_nudge
            && m_flags & MapObjFlag::Shootable as u32 != 0
            && o_kind != MapObjKind::MT_BARREL
            && thing.nudge == 0
            && o_z == m_z
            && approx_distance(o_xy.x - m_xy.x, o_xy.y - m_xy.y) < 16.0
        {
            let rx = self.rng.m_random_int(-1, 1);
            let ry = self
                .rng
                .m_random_int_no_repeat(-1, 1, if rx == 0 { 0 } else { 2 });
            let thing = &mut self.things[other];
            thing.momxy += Vec2::new(rx as f32, ry as f32);
            thing.nudge = TICRATE;
            if !thing.has_flag2(MapObjFlag2::FeetAreClipped) {
                thing.momxy /= 2.0;
            }
            trace!("Nudged corpse {other:?}");
        }

        if o_flags
            & (MapObjFlag::Solid as u32 | MapObjFlag::Special as u32 | MapObjFlag::Shootable as u32)
            == 0
        {
            return true;
        }

        let blockdist = self.things[other].info.pickup_radius + m_radius;
        if (o_xy.x - ctx.xy.x).abs() >= blockdist || (o_xy.y - ctx.xy.y).abs() >= blockdist {
            // didn't hit it
            return true;
        }

        // A monster standing inside another may walk out of it, if the move
        // takes it further away
        let mut unblocking = false;
        if o_player.is_none() && !corpse {
            if ctx.xy == m_xy {
                unblocking = true;
            } else if approx_distance(o_xy.x - ctx.xy.x, o_xy.y - ctx.xy.y)
                > approx_distance(o_xy.x - m_xy.x, o_xy.y - m_xy.y)
            {
                unblocking = m_z < o_top && m_top > o_z;
            }
        }

        if m_flags2 & MapObjFlag2::PassMobj as u32 != 0
            && !infinite_height
            && o_flags & MapObjFlag::Special as u32 == 0
        {
            if m_z >= o_top {
                // over thing
                return true;
            }
            if m_top <= o_z {
                // under thing
                return true;
            }
        }

        // check for skulls slamming into things
        if m_flags & MapObjFlag::Skullfly as u32 != 0
            && (o_flags & MapObjFlag::Solid as u32 != 0 || infinite_height)
        {
            let damage = ((self.rng.m_random() & 7) + 1) * m_damage;
            hooks.damage_thing(self, other, Some(id), Some(id), damage);
            if let Some(mover) = self.things.get_mut(id) {
                mover.flags &= !(MapObjFlag::Skullfly as u32);
                mover.momxy = Vec2::ZERO;
                mover.momz = 0.0;
            }
            hooks.set_state(self, id, StateNum::Spawn);
            // stop moving
            return false;
        }

        // missiles can hit other things
        if m_flags & MapObjFlag::Missile as u32 != 0 {
            let mut height = self.things[other].info.projectile_pass_height;
            if height == 0.0 || infinite_height {
                height = o_height;
            }
            if m_z > o_z + height {
                // overhead
                return true;
            }
            if m_top < o_z {
                // underneath
                return true;
            }

            let target = m_target.filter(|&t| self.things.contains(t));
            if let Some(shooter) = target.and_then(|t| self.things.get(t)) {
                if shooter.same_species(o_kind) {
                    // Don't hit same species as originator.
                    if target == Some(other) {
                        return true;
                    }
                    // Explode, but do no damage. Let players missile other
                    // players.
                    if o_kind != MapObjKind::MT_PLAYER && !self.config.species_infighting {
                        return false;
                    }
                }
            }

            if o_flags & MapObjFlag::Shootable as u32 == 0 {
                // didn't do any damage
                return o_flags & MapObjFlag::Solid as u32 == 0;
            }

            // damage / explode
            let damage = ((self.rng.m_random() & 7) + 1) * m_damage;
            hooks.damage_thing(self, other, Some(id), target, damage);

            if o_kind != MapObjKind::MT_BARREL {
                match m_kind {
                    MapObjKind::MT_PLASMA => {
                        if let Some(player) = self.view_player_mut() {
                            player.shots_hit += 1;
                        }
                    }
                    MapObjKind::MT_ROCKET => {
                        // A rocket only counts once however much it hits
                        let first = self.things.get_mut(id).map(|m| {
                            m.nudge += 1;
                            m.nudge == 2
                        });
                        if first == Some(true) {
                            if let Some(player) = self.view_player_mut() {
                                player.shots_hit += 1;
                            }
                        }
                    }
                    _ => {}
                }
            }
            // don't traverse any more
            return false;
        }

        // check for special pickup
        if o_flags & MapObjFlag::Special as u32 != 0 {
            if m_flags & MapObjFlag::Pickup as u32 != 0 {
                hooks.touch_special(self, other, id);
            }
            return o_flags & MapObjFlag::Solid as u32 == 0;
        }

        // corpses don't block, unless one is coming back to life
        if o_flags2 & MapObjFlag2::Resurrecting as u32 == 0
            && (corpse || m_flags & MapObjFlag::Corpse as u32 != 0)
            && o_kind != MapObjKind::MT_BARREL
        {
            return true;
        }

        // hanging bodies lower the ceiling for things walking under them
        if o_flags & (MapObjFlag::Solid as u32 | MapObjFlag::Spawnceiling as u32)
            == MapObjFlag::Solid as u32 | MapObjFlag::Spawnceiling as u32
            && m_top <= o_z
        {
            ctx.ceilingz = o_z;
            return true;
        }

        !(o_flags & MapObjFlag::Solid as u32 != 0
            && o_flags & MapObjFlag::Noclip as u32 == 0
            && !self.freeze
            && m_flags & MapObjFlag::Solid as u32 != 0)
            || unblocking
    }

    /// Attempt to move to a new position, crossing special lines unless
    /// `Teleport` is set. With `dropoff` the thing may step off a ledge.
    ///
    /// Doom function name `P_TryMove`
    pub fn try_move(
        &mut self,
        id: ThingId,
        xy: Vec2,
        dropoff: bool,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        self.try_move_ex(id, xy, dropoff, hooks).ok
    }

    /// As `try_move`, also reporting why the move was refused and the lines
    /// that limited it
    pub fn try_move_ex(
        &mut self,
        id: ThingId,
        xy: Vec2,
        dropoff: bool,
        hooks: &mut dyn LevelHooks,
    ) -> MoveOutcome {
        let mut ctx = ClipContext::default();
        if !self.check_position(id, xy, &mut ctx, hooks) {
            // solid wall or thing
            return MoveOutcome::from_context(false, &ctx);
        }
        let Some(flags) = self.things.get(id).map(|t| t.flags) else {
            return MoveOutcome::from_context(false, &ctx);
        };
        if flags & (MapObjFlag::Noclip as u32 | MapObjFlag::Teleport as u32) == 0 && !self.freeze
        {
            if let Some(l) = self.wall_across_path(id, xy, ctx.unstuck) {
                debug!("Thing {id:?} would pass through line {l}");
                ctx.blockline = Some(l);
                return MoveOutcome::from_context(false, &ctx);
            }
        }
        let Some(thing) = self.things.get(id) else {
            return MoveOutcome::from_context(false, &ctx);
        };

        if thing.flags & MapObjFlag::Noclip as u32 == 0 && !self.freeze {
            let teleport = thing.flags & MapObjFlag::Teleport as u32 != 0;
            let blocked = if ctx.ceilingz - ctx.floorz < thing.height {
                // doesn't fit
                true
            } else {
                ctx.floatok = true;
                // mobj must lower itself to fit, or is too big a step up
                (!teleport && ctx.ceilingz - thing.z < thing.height)
                    || (!teleport && ctx.floorz - thing.z > MAXSTEP)
            };
            if blocked {
                // A stuck player may move, so long as the lines in the way
                // were already being touched
                let lines = &self.map_data.linedefs;
                let ok = ctx.unstuck
                    && !ctx.ceilingline.is_some_and(|l| untouched(thing, &lines[l]))
                    && !ctx.floorline.is_some_and(|l| untouched(thing, &lines[l]));
                return MoveOutcome::from_context(ok, &ctx);
            }

            if thing.flags & (MapObjFlag::Dropoff as u32 | MapObjFlag::Float as u32) == 0 {
                if !dropoff {
                    if thing.floorz - ctx.floorz > MAXSTEP || thing.dropoffz - ctx.dropoffz > MAXSTEP
                    {
                        // don't stand over a dropoff
                        return MoveOutcome::from_context(false, &ctx);
                    }
                } else {
                    ctx.felldown = thing.flags & MapObjFlag::Nogravity as u32 == 0
                        && thing.z - ctx.floorz > MAXSTEP;
                }
            }

            // a toppling thing may not climb
            if thing.has_flag2(MapObjFlag2::Falling)
                && ctx.floorz - thing.z > speed_squared(thing.momxy)
            {
                return MoveOutcome::from_context(false, &ctx);
            }
        }

        // the move is ok, so link the thing into its new position
        let chain = self.unset_thing_position(id);
        let thing = &mut self.things[id];
        let old_xy = thing.xy;
        thing.floorz = ctx.floorz;
        thing.ceilingz = ctx.ceilingz;
        thing.dropoffz = ctx.dropoffz;
        thing.xy = xy;
        self.set_thing_position(id, chain);

        if self.is_real_player(id) {
            let d = xy.floor() - old_xy.floor();
            let dist = d.x.hypot(d.y) as u32;
            if let Some(player) = self.things[id].player.and_then(|p| self.players.get_mut(p)) {
                player.distance_traveled = player.distance_traveled.saturating_add(dist);
            }
        }
        self.update_foot_clip(id);

        // if any special lines were hit, do the effect
        let flags = self.things[id].flags;
        if flags & (MapObjFlag::Teleport as u32 | MapObjFlag::Noclip as u32) == 0 && !self.freeze {
            for &l in ctx.spec_hits.iter().rev() {
                // A special may have sent the thing elsewhere
                let Some(now) = self.things.get(id).map(|t| t.xy) else {
                    break;
                };
                let ld = &self.map_data.linedefs[l];
                let oldside = ld.point_on_side(old_xy);
                if oldside != ld.point_on_side(now) && ld.special != 0 {
                    hooks.cross_special_line(self, l, oldside, id);
                }
            }
        }
        MoveOutcome::from_context(true, &ctx)
    }

    /// Sink the thing's feet if it is standing in liquid
    pub(crate) fn update_foot_clip(&mut self, id: ThingId) {
        let clip = self
            .things
            .get(id)
            .is_some_and(|t| t.has_flag2(MapObjFlag2::FootClip))
            && self.is_in_liquid(id);
        if let Some(thing) = self.things.get_mut(id) {
            thing.set_flag2(MapObjFlag2::FeetAreClipped, clip);
        }
    }

    /// True if every sector the thing touches is liquid. Things that can't be
    /// shot only look at the sector under their origin.
    ///
    /// Doom function name `P_IsInLiquid`
    pub fn is_in_liquid(&self, id: ThingId) -> bool {
        let Some(thing) = self.things.get(id) else {
            return false;
        };
        let sectors = &self.map_data.sectors;
        if !thing.has_flag(MapObjFlag::Shootable) {
            return sectors[thing.sector].is_liquid();
        }
        self.sec_nodes
            .thing_chain(thing.touching_sectorlist)
            .all(|n| sectors[self.sec_nodes.node(n).sector].is_liquid())
    }

    /// Returns true if the straight path from the thing to `xy` crosses a
    /// one-sided or blocking line. Used to keep spawned lost souls on the
    /// pain elemental's side of a wall.
    ///
    /// Doom function name `P_CheckLineSide`
    pub fn check_line_side(&mut self, id: ThingId, xy: Vec2) -> bool {
        let Some(origin) = self.things.get(id).map(|t| t.xy) else {
            return false;
        };
        self.line_across_path(origin, xy, |_, ld| {
            ld.flags & LineDefFlags::TwoSided as u32 == 0
                || ld.flags & LineDefFlags::Blocking as u32 != 0
        })
        .is_some()
    }

    /// The first line found whose sides hold `origin` and `xy` apart, and
    /// that `walls` says stops the path.
    ///
    /// Doom function name `PIT_CrossLine`
    fn line_across_path(
        &mut self,
        origin: Vec2,
        xy: Vec2,
        mut walls: impl FnMut(&Level, &LineDef) -> bool,
    ) -> Option<usize> {
        // the bounding box of the trajectory
        let bbox = BBox::new(origin, xy);

        self.next_valid_count();
        let bmap = &self.map_data.blockmap;
        let xl = bmap.safe_block_x(bbox.left);
        let xh = bmap.safe_block_x(bbox.right);
        let yl = bmap.safe_block_y(bbox.bottom);
        let yh = bmap.safe_block_y(bbox.top);

        let mut found = None;
        for bx in xl..=xh {
            for by in yl..=yh {
                let clear = self.block_lines_iterator(bx, by, |level, l| {
                    let ld = &level.map_data.linedefs[l];
                    let missed = bbox.left > ld.bbox.right
                        || bbox.right < ld.bbox.left
                        || bbox.top < ld.bbox.bottom
                        || bbox.bottom > ld.bbox.top
                        || ld.point_on_side(origin) == ld.point_on_side(xy);
                    if missed || !walls(level, ld) {
                        return true;
                    }
                    found = Some(l);
                    false
                });
                if !clear {
                    return found;
                }
            }
        }
        None
    }

    /// A wall the thing's centre would pass through going straight to `xy`.
    /// Position checks only look at where the thing ends up, so without this
    /// a long enough step hops clean over a wall. Missiles ignore blocking
    /// flags as they do at the destination, and a stuck player may still
    /// back away from a wall they already overlap.
    fn wall_across_path(&mut self, id: ThingId, xy: Vec2, unstuck: bool) -> Option<usize> {
        let thing = self.things.get(id)?;
        let origin = thing.xy;
        let missile = thing.has_flag(MapObjFlag::Missile);
        let path = Trace::from_points(origin, xy);
        let d = xy - origin;

        self.line_across_path(origin, xy, |level, ld| {
            let solid = ld.backsector.is_none()
                || (!missile && ld.flags & LineDefFlags::Blocking as u32 != 0);
            if !solid || point_on_side(path, ld.v1) == point_on_side(path, ld.v2) {
                // the path passes beside the line's ends
                return false;
            }
            let escaping = unstuck
                && level.things.get(id).is_some_and(|t| !untouched(t, ld))
                && d.x * ld.delta.y > d.y * ld.delta.x;
            !escaping
        })
    }

    /// Find the friction and move factor for the thing from the sectors it
    /// touches. The slipperiest floor it stands on wins.
    ///
    /// Doom function name `P_GetFriction`
    pub fn get_friction(&self, id: ThingId) -> (f32, f32) {
        let mut friction = ORIG_FRICTION;
        let mut movefactor = ORIG_FRICTION_FACTOR;
        let Some(thing) = self.things.get(id) else {
            return (friction, movefactor);
        };
        if thing.flags & (MapObjFlag::Noclip as u32 | MapObjFlag::Nogravity as u32) != 0 {
            return (friction, movefactor);
        }

        let sectors = &self.map_data.sectors;
        for n in self.sec_nodes.thing_chain(thing.touching_sectorlist) {
            let sec = &sectors[self.sec_nodes.node(n).sector];
            if sec.special & FRICTION_MASK == 0 {
                continue;
            }
            let on_floor = thing.z <= sec.floorheight
                || sec
                    .heightsec
                    .is_some_and(|h| thing.z <= sectors[h].floorheight);
            if (sec.friction < friction || friction == ORIG_FRICTION) && on_floor {
                friction = sec.friction;
                movefactor = sec.movefactor;
            }
        }
        (friction, movefactor)
    }

    /// How strongly thrust acts on the thing. Mud scales it down, ice scales
    /// it up with the thing's speed.
    ///
    /// Doom function name `P_GetMoveFactor`
    pub fn get_move_factor(&self, id: ThingId) -> f32 {
        let (friction, mut movefactor) = self.get_friction(id);
        if friction < ORIG_FRICTION {
            let Some(thing) = self.things.get(id) else {
                return movefactor;
            };
            let momentum = approx_distance(thing.momxy.x, thing.momxy.y);
            if momentum > MORE_FRICTION_MOMENTUM * 4.0 {
                movefactor *= 8.0;
            } else if momentum > MORE_FRICTION_MOMENTUM * 2.0 {
                movefactor *= 4.0;
            } else if momentum > MORE_FRICTION_MOMENTUM {
                movefactor *= 2.0;
            }
        }
        movefactor
    }

    /// Push a thing hanging over a ledge off it, harder the further over it
    /// is. The push grows over successive tics while the thing keeps falling.
    ///
    /// Doom function name `P_ApplyTorque`
    pub fn apply_torque(&mut self, id: ThingId) {
        let Some(thing) = self.things.get(id) else {
            return;
        };
        let bbox = BBox::around(thing.xy, thing.radius);
        let flags2 = thing.flags2;

        self.next_valid_count();
        let bmap = &self.map_data.blockmap;
        let xl = bmap.safe_block_x(bbox.left);
        let xh = bmap.safe_block_x(bbox.right);
        let yl = bmap.safe_block_y(bbox.bottom);
        let yh = bmap.safe_block_y(bbox.top);

        for bx in xl..=xh {
            for by in yl..=yh {
                self.block_lines_iterator(bx, by, |level, l| {
                    level.pit_apply_torque(id, l, &bbox);
                    true
                });
            }
        }

        let thing = &mut self.things[id];
        // Falling while there's momentum, else settled
        let moving = thing.momxy != Vec2::ZERO;
        thing.set_flag2(MapObjFlag2::Falling, moving);

        if (flags2 | thing.flags2) & MapObjFlag2::Falling as u32 == 0 {
            // was and still is at rest
            thing.gear = 0;
        } else if thing.gear < MAXGEAR {
            thing.gear += 1;
        }
    }

    /// Doom function name `PIT_ApplyTorque`
    fn pit_apply_torque(&mut self, id: ThingId, l: usize, bbox: &BBox) {
        let ld = &self.map_data.linedefs[l];
        let Some(back) = ld.backsector else {
            return;
        };
        if !bbox.overlaps(&ld.bbox) || box_on_line_side(bbox, ld) != -1 {
            return;
        }
        let thing = &self.things[id];

        // Which side the thing's centre is on, and how far, in whole units
        let (dx, dy) = (ld.delta.x.floor(), ld.delta.y.floor());
        let lever = dx * thing.xy.y.floor()
            - dy * thing.xy.x.floor()
            - dx * ld.v1.y.floor()
            + dy * ld.v1.x.floor();

        let front_floor = self.map_data.sectors[ld.frontsector].floorheight;
        let back_floor = self.map_data.sectors[back].floorheight;
        let z = thing.z;
        let overhang = if lever < 0.0 {
            // centre is on the front, and the front drops away
            front_floor < z && back_floor >= z
        } else {
            back_floor < z && front_floor >= z
        };
        if !overhang {
            return;
        }

        // Normalise the lever by the line length. The longer axis stands in
        // for the length, corrected by the cosine of the line's slope.
        let mut x = ld.delta.x.abs();
        let mut y = ld.delta.y.abs();
        if y > x {
            std::mem::swap(&mut x, &mut y);
        }
        let ycos = (y / x).atan().cos();
        let scale = 2f32.powi(OVERDRIVE - thing.gear);
        let dist = lever * ycos * scale / x / 65536.0;

        let mut mx = ld.delta.y * dist;
        let mut my = ld.delta.x * dist;
        let mut d = mx * mx + my * my;

        let thing = &mut self.things[id];
        // Damp the push while the thing is slow to get going
        while d > 4.0 && thing.gear < MAXGEAR {
            thing.gear += 1;
            mx /= 2.0;
            my /= 2.0;
            d /= 2.0;
        }
        thing.momxy.x -= mx;
        thing.momxy.y += my;
    }

    /// Takes a valid thing and adjusts its floor and ceiling to the sectors
    /// around it, as after a sector height change. Returns false if the thing
    /// no longer fits.
    ///
    /// Doom function name `P_ThingHeightClip`
    pub fn thing_height_clip(&mut self, id: ThingId, hooks: &mut dyn LevelHooks) -> bool {
        let Some(thing) = self.things.get(id) else {
            return true;
        };
        let oldfloorz = thing.floorz;
        let onfloor = thing.z == oldfloorz;
        let (xy, flags2, player) = (thing.xy, thing.flags2, thing.player);

        let mut ctx = ClipContext::default();
        self.check_position(id, xy, &mut ctx, hooks);
        let liquid_bob = self.config.liquid_bob;

        // what about stranding a monster partially off an edge?
        let Some(thing) = self.things.get_mut(id) else {
            return true;
        };
        thing.floorz = ctx.floorz;
        thing.ceilingz = ctx.ceilingz;
        thing.dropoffz = ctx.dropoffz;

        if flags2 & MapObjFlag2::FeetAreClipped as u32 != 0 && player.is_none() && liquid_bob {
            // ride the liquid
            thing.z = ctx.floorz;
        } else if flags2 & MapObjFlag2::FloatBob as u32 != 0 {
            if ctx.floorz > oldfloorz || !thing.has_flag(MapObjFlag::Nogravity) {
                thing.z = thing.z - oldfloorz + ctx.floorz;
            }
            if thing.top() > thing.ceilingz {
                thing.z = thing.ceilingz - thing.height;
            }
        } else if onfloor {
            // walking monsters rise and fall with the floor
            thing.z = ctx.floorz;
            // a body toppling off a ledge that moved settles
            if flags2 & MapObjFlag2::Falling as u32 != 0 && thing.gear >= MAXGEAR {
                thing.gear = 0;
            }
        } else if thing.top() > thing.ceilingz {
            // don't adjust a floating monster unless forced to
            thing.z = thing.ceilingz - thing.height;
        }

        thing.ceilingz - ctx.floorz >= thing.height
    }

    /// Adjusts the move so that the next move will slide along the wall.
    /// On ice, a steep hit bounces off instead.
    ///
    /// Doom function name `P_HitSlideLine`
    pub(crate) fn hit_slide_line(
        &mut self,
        id: ThingId,
        line: usize,
        mut tmmove: Vec2,
        hooks: &mut dyn LevelHooks,
    ) -> Vec2 {
        let Some(thing) = self.things.get(id) else {
            return tmmove;
        };
        let icy = approx_distance(tmmove.x, tmmove.y) > 4.0
            && thing.z <= thing.floorz
            && self.get_friction(id).0 > ORIG_FRICTION;
        let can_oof = thing.player.is_some() && thing.health > 0;
        let ld = &self.map_data.linedefs[line];
        let mut bumped = false;

        match ld.slopetype {
            SlopeType::Horizontal => {
                if icy && tmmove.y.abs() > tmmove.x.abs() {
                    bumped = true;
                    tmmove.x /= 2.0;
                    tmmove.y = -tmmove.y / 2.0;
                } else {
                    tmmove.y = 0.0;
                }
            }
            SlopeType::Vertical => {
                if icy && tmmove.x.abs() > tmmove.y.abs() {
                    bumped = true;
                    tmmove.x = -tmmove.x / 2.0;
                    tmmove.y /= 2.0;
                } else {
                    tmmove.x = 0.0;
                }
            }
            _ => {
                let side = ld.point_on_side(thing.xy);
                let mut lineangle = Angle::from_vector(ld.delta);
                if side == 1 {
                    lineangle += ANG180;
                }
                // Nudged so a move straight into the wall still goes one way
                let moveangle = Angle::from_vector(tmmove) + Angle::from_bam(10);
                let mut deltaangle = moveangle - lineangle;
                let mut movelen = approx_distance(tmmove.x, tmmove.y);

                if icy && deltaangle.rad() > ANG45 && deltaangle.rad() < ANG135 {
                    // bounce off at the mirrored angle
                    bumped = true;
                    let angle = lineangle - deltaangle;
                    movelen /= 2.0;
                    tmmove = angle.unit() * movelen;
                } else {
                    if deltaangle.rad() > ANG180 {
                        deltaangle += ANG180;
                    }
                    let newlen = movelen * deltaangle.cos();
                    tmmove = lineangle.unit() * newlen;
                }
            }
        }

        if bumped && can_oof {
            hooks.start_sound(self, id, SfxName::Oof);
        }
        tmmove
    }

    /// Doom function name `PTR_SlideTraverse`
    fn slide_traverse(&self, id: ThingId, intercept: &Intercept, best: &mut BestSlide) -> bool {
        let InterceptKind::Line(l) = intercept.kind else {
            return true;
        };
        let Some(thing) = self.things.get(id) else {
            return false;
        };
        let li = &self.map_data.linedefs[l];

        if li.flags & LineDefFlags::TwoSided as u32 == 0 {
            if li.point_on_side(thing.xy) != 0 {
                // don't hit the back side
                return true;
            }
        } else {
            // set openrange, opentop, openbottom
            let portal = PortalZ::new(li, &self.map_data.sectors);
            let fits = portal.range >= thing.height
                && portal.top_z - thing.z >= thing.height
                && portal.bottom_z - thing.z <= MAXSTEP;
            if fits {
                // this line doesn't block movement
                return true;
            }
        }

        // the line does block movement, see if it is closer than best so far
        if intercept.frac < best.best_slide_frac {
            best.best_slide_frac = intercept.frac;
            best.best_slide_line = Some(l);
        }
        // stop
        false
    }

    /// The momentum didn't fit. Find the first wall the thing's leading
    /// corners would hit, move up to it, and slide the rest of the way along
    /// it.
    ///
    /// Doom function name `P_SlideMove`
    pub fn slide_move(&mut self, id: ThingId, hooks: &mut dyn LevelHooks) {
        let mut hitcount = 3;

        loop {
            hitcount -= 1;
            if hitcount == 0 {
                // don't loop forever
                self.stair_step(id, hooks);
                return;
            }
            let Some(thing) = self.things.get(id) else {
                return;
            };
            let (xy, mom, radius) = (thing.xy, thing.momxy, thing.radius);

            // trace along the three leading corners
            let (leadx, trailx) = if mom.x > 0.0 {
                (xy.x + radius, xy.x - radius)
            } else {
                (xy.x - radius, xy.x + radius)
            };
            let (leady, traily) = if mom.y > 0.0 {
                (xy.y + radius, xy.y - radius)
            } else {
                (xy.y - radius, xy.y + radius)
            };

            let mut best = BestSlide::new();
            for start in [
                Vec2::new(leadx, leady),
                Vec2::new(trailx, leady),
                Vec2::new(leadx, traily),
            ] {
                path_traverse(self, start, start + mom, PT_ADDLINES, |level, intercept| {
                    level.slide_traverse(id, intercept, &mut best)
                });
            }

            // move up to the wall
            let Some(line) = best.best_slide_line else {
                // the move must have hit the middle, so stairstep
                self.stair_step(id, hooks);
                return;
            };

            // fudge a bit to make sure it doesn't hit
            best.best_slide_frac -= SLIDE_FUDGE;
            if best.best_slide_frac > 0.0 {
                let new_xy = xy + mom * best.best_slide_frac;
                if !self.try_move(id, new_xy, true, hooks) {
                    self.stair_step(id, hooks);
                    return;
                }
            }

            // Now continue along the wall. First calculate remainder.
            let mut frac = 1.0 - (best.best_slide_frac + SLIDE_FUDGE);
            if frac > 1.0 {
                frac = 1.0;
            } else if frac <= 0.0 {
                return;
            }

            let tmmove = self.hit_slide_line(id, line, mom * frac, hooks);
            let Some(thing) = self.things.get_mut(id) else {
                return;
            };
            thing.momxy = tmmove;
            let xy = thing.xy;
            let player = thing.player;

            // clip the view bob to the new momentum
            if self.is_real_player(id) {
                if let Some(player) = player.and_then(|p| self.players.get_mut(p)) {
                    player.momxy.x = player.momxy.x.clamp(-tmmove.x.abs(), tmmove.x.abs());
                    player.momxy.y = player.momxy.y.clamp(-tmmove.y.abs(), tmmove.y.abs());
                }
            }

            if self.try_move(id, xy + tmmove, true, hooks) {
                return;
            }
        }
    }

    /// Try the move one axis at a time
    fn stair_step(&mut self, id: ThingId, hooks: &mut dyn LevelHooks) {
        let Some(thing) = self.things.get(id) else {
            return;
        };
        let (xy, mom) = (thing.xy, thing.momxy);
        if !self.try_move(id, Vec2::new(xy.x, xy.y + mom.y), true, hooks) {
            self.try_move(id, Vec2::new(xy.x + mom.x, xy.y), true, hooks);
        }
    }

    /// Apply horizontal momentum, in steps no larger than half of `MAXMOVE`,
    /// then slow the thing by friction.
    ///
    /// Doom function name `P_XYMovement`
    pub fn xy_movement(&mut self, id: ThingId, hooks: &mut dyn LevelHooks) {
        let Some(thing) = self.things.get_mut(id) else {
            return;
        };

        if thing.momxy == Vec2::ZERO {
            if thing.has_flag(MapObjFlag::Skullfly) {
                // the skull slammed into something
                thing.flags &= !(MapObjFlag::Skullfly as u32);
                thing.momz = 0.0;
                hooks.set_state(self, id, StateNum::Spawn);
            }
            return;
        }

        thing.momxy = thing
            .momxy
            .clamp(Vec2::splat(-MAXMOVE), Vec2::splat(MAXMOVE));
        let mut remaining = thing.momxy;

        loop {
            let Some(xy) = self.things.get(id).map(|t| t.xy) else {
                return;
            };
            let ptry = if remaining.x.abs() > MAXMOVE / 2.0 || remaining.y.abs() > MAXMOVE / 2.0 {
                remaining /= 2.0;
                xy + remaining
            } else {
                let ptry = xy + remaining;
                remaining = Vec2::ZERO;
                ptry
            };

            let outcome = self.try_move_ex(id, ptry, true, hooks);
            if !outcome.ok {
                let Some(thing) = self.things.get(id) else {
                    return;
                };
                if thing.player.is_some() {
                    // try to slide along it
                    self.slide_move(id, hooks);
                } else if thing.has_flag(MapObjFlag::Missile) {
                    // Hit a ceiling with the sky behind it, vanish into it
                    let sectors = &self.map_data.sectors;
                    let into_sky = outcome
                        .ceilingline
                        .and_then(|l| self.map_data.linedefs[l].backsector)
                        .is_some_and(|b| {
                            self.is_sky(sectors[b].ceilingpic) && thing.z > sectors[b].ceilingheight
                        });
                    if into_sky {
                        debug!("{:?} flew into the sky", thing.kind);
                        self.remove_map_object(id);
                    } else {
                        hooks.explode_missile(self, id);
                    }
                    return;
                } else if let Some(thing) = self.things.get_mut(id) {
                    thing.momxy = Vec2::ZERO;
                }
            }

            if remaining == Vec2::ZERO {
                break;
            }
        }

        // slow down
        let Some(thing) = self.things.get(id) else {
            return;
        };
        if thing.flags & (MapObjFlag::Missile as u32 | MapObjFlag::Skullfly as u32) != 0 {
            // no friction for missiles or lost souls ever
            return;
        }
        if thing.z > thing.floorz && !thing.has_flag2(MapObjFlag2::OnMobj) {
            // no friction when airborne
            return;
        }
        if thing.has_flag(MapObjFlag::Corpse)
            && (thing.momxy.x.abs() > FRACUNIT_DIV4 || thing.momxy.y.abs() > FRACUNIT_DIV4)
            && thing.floorz != self.map_data.sectors[thing.sector].floorheight
        {
            // do not stop sliding if halfway off a step with some momentum
            return;
        }

        let player = thing.player;
        if thing.momxy.x.abs() < STOPSPEED && thing.momxy.y.abs() < STOPSPEED {
            self.things[id].momxy = Vec2::ZERO;
            if let Some(player) = player.and_then(|p| self.players.get_mut(p)) {
                player.momxy = Vec2::ZERO;
            }
        } else {
            let (friction, _) = self.get_friction(id);
            self.things[id].momxy *= friction;
            if let Some(player) = player.and_then(|p| self.players.get_mut(p)) {
                player.momxy *= ORIG_FRICTION;
            }
        }
    }

    /// Floaters with a target drift toward its height
    fn float_to_target(&mut self, id: ThingId) {
        let Some(thing) = self.things.get(id) else {
            return;
        };
        if thing.flags & MapObjFlag::Float as u32 == 0
            || thing.flags & (MapObjFlag::Skullfly as u32 | MapObjFlag::Infloat as u32) != 0
        {
            return;
        }
        let Some(target) = thing.target.and_then(|t| self.things.get(t)) else {
            return;
        };
        let dist = approx_distance(thing.xy.x - target.xy.x, thing.xy.y - target.xy.y);
        let delta = (target.z + thing.height / 2.0 - thing.z) * 3.0;
        if dist < delta.abs() {
            let step = if delta < 0.0 { -FLOATSPEED } else { FLOATSPEED };
            self.things[id].z += step;
        }
    }

    /// Apply vertical momentum and gravity, landing on the floor or stopping
    /// at the ceiling.
    ///
    /// Doom function name `P_ZMovement`
    pub fn z_movement(&mut self, id: ThingId, hooks: &mut dyn LevelHooks) {
        let Some(thing) = self.things.get_mut(id) else {
            return;
        };
        // adjust height
        thing.z += thing.momz;
        self.float_to_target(id);

        let thing = &mut self.things[id];
        let flags = thing.flags;
        let missile = flags & MapObjFlag::Missile as u32 != 0
            && flags & MapObjFlag::Noclip as u32 == 0;

        // clip movement
        if thing.z <= thing.floorz {
            // hit the floor
            if flags & MapObjFlag::Skullfly as u32 != 0 {
                // the skull slammed into something
                thing.momz = -thing.momz;
            }

            let mut oof = false;
            if thing.momz < 0.0 {
                // landed hard
                oof = thing.player.is_some() && thing.momz < -GRAVITY * 8.0 && thing.health > 0;
                thing.momz = 0.0;
            }
            thing.z = thing.floorz;

            if oof {
                hooks.start_sound(self, id, SfxName::Oof);
            }
            if missile {
                hooks.explode_missile(self, id);
                return;
            }
        } else if flags & MapObjFlag::Nogravity as u32 == 0 {
            if thing.momz == 0.0 {
                thing.momz = -GRAVITY;
            }
            thing.momz -= GRAVITY;
        }

        let Some(thing) = self.things.get_mut(id) else {
            return;
        };
        if thing.top() > thing.ceilingz {
            // hit the ceiling
            if thing.momz > 0.0 {
                thing.momz = 0.0;
            }
            thing.z = thing.ceilingz - thing.height;

            if flags & MapObjFlag::Skullfly as u32 != 0 {
                // the skull slammed into something
                thing.momz = -thing.momz;
            }

            if missile {
                let ceilingpic = self.map_data.sectors[thing.sector].ceilingpic;
                if self.is_sky(ceilingpic) {
                    self.remove_map_object(id);
                } else {
                    hooks.explode_missile(self, id);
                }
            }
        }
    }

    /// `z_movement` without any of the side effects, used to see where the
    /// thing would end up
    ///
    /// Doom function name `P_FakeZMovement`
    pub fn fake_z_movement(&mut self, id: ThingId) {
        let Some(thing) = self.things.get_mut(id) else {
            return;
        };
        thing.z += thing.momz;
        self.float_to_target(id);

        let thing = &mut self.things[id];
        let skullfly = thing.has_flag(MapObjFlag::Skullfly);
        if thing.z <= thing.floorz {
            if skullfly {
                thing.momz = -thing.momz;
            }
            if thing.momz < 0.0 {
                thing.momz = 0.0;
            }
            thing.z = thing.floorz;
        } else if !thing.has_flag(MapObjFlag::Nogravity) {
            if thing.momz == 0.0 {
                thing.momz = -GRAVITY;
            }
            thing.momz -= GRAVITY;
        }

        if thing.top() > thing.ceilingz {
            if thing.momz > 0.0 {
                thing.momz = 0.0;
            }
            if skullfly {
                thing.momz = -thing.momz;
            }
            thing.z = thing.ceilingz - thing.height;
        }
    }

    /// Find a solid thing the thing would land on, or bump its head on, after
    /// this tic's vertical movement. The thing's z and momentum are left as
    /// they were.
    ///
    /// Doom function name `P_CheckOnmobj`
    pub fn check_on_mobj(&mut self, id: ThingId) -> Option<ThingId> {
        let thing = self.things.get(id)?;
        let (z, momz) = (thing.z, thing.momz);
        let (xy, radius) = (thing.xy, thing.radius);
        if thing.has_flag(MapObjFlag::Noclip) || self.freeze {
            return None;
        }

        self.fake_z_movement(id);

        let bbox = BBox::around(xy, radius);
        let bmap = &self.map_data.blockmap;
        let xl = bmap.safe_block_x(bbox.left - MAXRADIUS);
        let xh = bmap.safe_block_x(bbox.right + MAXRADIUS);
        let yl = bmap.safe_block_y(bbox.bottom - MAXRADIUS);
        let yh = bmap.safe_block_y(bbox.top + MAXRADIUS);

        let mut found = None;
        'cells: for bx in xl..=xh {
            for by in yl..=yh {
                let clear = self.block_things_iterator(bx, by, |level, other| {
                    if level.pit_check_on_mobj_z(id, other) {
                        return true;
                    }
                    found = Some(other);
                    false
                });
                if !clear {
                    break 'cells;
                }
            }
        }

        let thing = &mut self.things[id];
        thing.z = z;
        thing.momz = momz;
        found
    }

    /// Returns false if `other` is in the way vertically
    ///
    /// Doom function name `PIT_CheckOnmobjZ`
    fn pit_check_on_mobj_z(&self, id: ThingId, other: ThingId) -> bool {
        if other == id {
            // don't clip against self
            return true;
        }
        let (Some(mover), Some(thing)) = (self.things.get(id), self.things.get(other)) else {
            return true;
        };
        if !thing.has_flag(MapObjFlag::Solid)
            || thing.flags & (MapObjFlag::Corpse as u32 | MapObjFlag::Special as u32) != 0
        {
            return true;
        }
        if mover.z > thing.top() {
            // over thing
            return true;
        }
        if mover.top() <= thing.z {
            // under thing
            return true;
        }
        let blockdist = thing.radius + mover.radius;
        (thing.xy.x - mover.xy.x).abs() >= blockdist || (thing.xy.y - mover.xy.y).abs() >= blockdist
    }

    /// One tic of movement for a thing. Horizontal first, then vertical,
    /// standing on other things where they pass over each other. Things left
    /// hanging over a ledge are pushed off it.
    ///
    /// Doom function name `P_MobjThinker` (movement part)
    pub fn thing_movement(&mut self, id: ThingId, hooks: &mut dyn LevelHooks) {
        let Some(thing) = self.things.get(id) else {
            return;
        };
        if thing.momxy != Vec2::ZERO || thing.has_flag(MapObjFlag::Skullfly) {
            self.xy_movement(id, hooks);
        }

        let Some(thing) = self.things.get_mut(id) else {
            // removed
            return;
        };
        if thing.has_flag(MapObjFlag::Corpse) && thing.nudge > 0 {
            thing.nudge -= 1;
        }

        if thing.z != thing.floorz || thing.momz != 0.0 {
            if thing.has_flag2(MapObjFlag2::PassMobj) && !self.config.infinite_height {
                match self.check_on_mobj(id) {
                    None => {
                        self.z_movement(id, hooks);
                        if let Some(thing) = self.things.get_mut(id) {
                            thing.set_flag2(MapObjFlag2::OnMobj, false);
                        }
                    }
                    Some(below) => {
                        trace!("{id:?} stands on {below:?}");
                        let thing = &mut self.things[id];
                        thing.momz = 0.0;
                        thing.set_flag2(MapObjFlag2::OnMobj, true);
                    }
                }
            } else {
                self.z_movement(id, hooks);
            }
        } else if thing.momxy == Vec2::ZERO && !sentient(thing) {
            // objects fall off ledges if they are hanging off
            if thing.z > thing.dropoffz && !thing.has_flag(MapObjFlag::Nogravity) {
                self.apply_torque(id);
            } else {
                thing.set_flag2(MapObjFlag2::Falling, false);
                thing.gear = 0;
            }
        }
    }
}
