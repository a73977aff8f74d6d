use glam::Vec2;
use log::debug;

use crate::doom_def::{MAXRADIUS, TELEFRAG_DAMAGE};
use crate::env::LevelHooks;
use crate::level::Level;
use crate::thing::{MapObjFlag, MapObjFlag2, ThingId};

impl Level {
    /// Move a thing straight to `xy`, ignoring lines. Shootable things in the
    /// way are telefragged if the mover is allowed to (players, bosses, or any
    /// monster on a boss level when configured), otherwise they block and
    /// nothing changes. `z` is only used to pass over or under; the caller
    /// places the thing vertically.
    ///
    /// Doom function name `P_TeleportMove`
    pub fn teleport_move(
        &mut self,
        id: ThingId,
        xy: Vec2,
        z: f32,
        boss: bool,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        let Some(thing) = self.things.get(id) else {
            return false;
        };
        let radius = thing.radius;
        let telefrag = thing.player.is_some()
            || boss
            || (self.boss_level && self.config.telefrag_boss_level);

        let sector = &self.map_data.sectors[self.map_data.point_in_sector(xy)];
        let (floorz, ceilingz) = (sector.floorheight, sector.ceilingheight);
        self.next_valid_count();

        let bmap = &self.map_data.blockmap;
        let xl = bmap.safe_block_x(xy.x - radius - MAXRADIUS);
        let xh = bmap.safe_block_x(xy.x + radius + MAXRADIUS);
        let yl = bmap.safe_block_y(xy.y - radius - MAXRADIUS);
        let yh = bmap.safe_block_y(xy.y + radius + MAXRADIUS);

        for bx in xl..=xh {
            for by in yl..=yh {
                let clear = self.block_things_iterator(bx, by, |level, other| {
                    level.stomp_thing(id, other, xy, z, telefrag, hooks)
                });
                if !clear {
                    debug!("Teleport of {id:?} to {xy} blocked");
                    return false;
                }
            }
        }

        let chain = self.unset_thing_position(id);
        let thing = &mut self.things[id];
        thing.floorz = floorz;
        thing.ceilingz = ceilingz;
        thing.dropoffz = floorz;
        thing.xy = xy;
        self.set_thing_position(id, chain);
        self.update_foot_clip(id);
        true
    }

    /// Doom function name `PIT_StompThing`
    fn stomp_thing(
        &mut self,
        id: ThingId,
        other: ThingId,
        xy: Vec2,
        z: f32,
        telefrag: bool,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        if other == id {
            return true;
        }
        let (Some(mover), Some(thing)) = (self.things.get(id), self.things.get(other)) else {
            return true;
        };
        if !thing.has_flag(MapObjFlag::Shootable) {
            return true;
        }

        let blockdist = thing.radius + mover.radius;
        if (thing.xy.x - xy.x).abs() >= blockdist || (thing.xy.y - xy.y).abs() >= blockdist {
            // didn't hit it
            return true;
        }

        // monsters don't stomp things except on boss level
        if !telefrag {
            return false;
        }

        if mover.has_flag2(MapObjFlag2::PassMobj) && !self.config.infinite_height {
            if z > thing.top() {
                // overhead
                return true;
            }
            if z + mover.height < thing.z {
                // underneath
                return true;
            }
        }

        debug!("{:?} telefragged {:?}", mover.kind, thing.kind);
        hooks.damage_thing(self, other, Some(id), Some(id), TELEFRAG_DAMAGE);
        true
    }
}
