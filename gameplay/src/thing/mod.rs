//! The bulk of map entities, typically shown as sprites. Things like monsters,
//! giblets, rockets and plasma shots etc, items.
//!
//! Things are owned by the level's `ThingAlloc` and referred to everywhere else
//! by `ThingId`.

mod alloc;
pub use alloc::*;
mod movement;
pub use movement::*;
mod shooting;
pub use shooting::*;

use std::fmt::Debug;

use glam::Vec2;
use log::{debug, trace};
use math::Angle;

use crate::config::BloodMode;
use crate::doom_def::{ONCEILINGZ, ONFLOORZ};
use crate::info::{MapObjInfo, MapObjKind, StateNum};
use crate::level::Level;
use crate::level::map_defs::BBox;
use crate::level::secnodes::NodeId;
use crate::utilities::box_on_line_side;

#[derive(Debug, PartialEq)]
pub enum MapObjFlag {
    /// Call the touch hook when touched.
    Special = 1,
    /// Blocks.
    Solid = 2,
    /// Can be hit.
    Shootable = 4,
    /// Don't use the sector links (invisible but touchable).
    Nosector = 8,
    /// Don't use the block links (inert but displayable)
    Noblockmap = 16,
    /// Not to be activated by sound, deaf monster.
    Ambush = 32,
    /// Will try to attack right back.
    Justhit = 64,
    /// Will take at least one step before attacking.
    Justattacked = 128,
    /// On level spawning (initial position), hang from ceiling instead of stand
    /// on floor.
    Spawnceiling = 256,
    /// Don't apply gravity (every tic), that is, object will float, keeping
    /// current height  or changing it actively.
    Nogravity = 512,
    /// This allows jumps from high places.
    Dropoff = 0x400,
    /// For players, will pick up items.
    Pickup = 0x800,
    /// Player cheat.
    Noclip = 0x1000,
    /// Player: keep info about sliding along walls.
    Slide = 0x2000,
    /// Allow moves to any height, no gravity. For active floaters, e.g.
    /// cacodemons, pain elementals.
    Float = 0x4000,
    /// Don't cross lines or look at heights on teleport.
    Teleport = 0x8000,
    /// Don't hit same species, explode on block. Player missiles as well as
    /// fireballs of various kinds.
    Missile = 0x10000,
    /// Dropped by a demon, not level spawned. E.g. ammo clips dropped by dying
    /// former humans.
    Dropped = 0x20000,
    /// Use fuzzy draw (shadow demons or spectres),  temporary player
    /// invisibility powerup.
    Shadow = 0x40000,
    /// Flag: don't bleed when shot (use puff),  barrels and shootable furniture
    /// shall not bleed.
    Noblood = 0x80000,
    /// Don't stop moving halfway off a step, that is, have dead bodies slide
    /// down all the way.
    Corpse = 0x100000,
    /// Floating to a height for a move, don't auto float to target's
    /// height.
    Infloat = 0x200000,
    /// On kill, count this enemy object towards intermission kill total.
    Countkill = 0x400000,
    /// On picking up, count this item object towards intermission item total.
    Countitem = 0x800000,
    /// Special handling: skull in flight. Neither a cacodemon nor a missile.
    Skullfly = 0x1000000,
    /// Don't spawn this object in death match mode (e.g. key cards).
    Notdmatch = 0x2000000,
    /// Monster on the player's side. Ignores monster-blocking lines.
    Friend = 0x40000000,
}

/// Engine-internal flags, kept apart from the flags a map may set
#[derive(Debug, PartialEq)]
pub enum MapObjFlag2 {
    /// Feet sink into liquid floors
    FootClip = 1,
    /// Feet are currently sunk
    FeetAreClipped = 2,
    /// Bobs up and down while floating
    FloatBob = 4,
    /// May pass over or under other things
    PassMobj = 8,
    /// Toppling off a ledge
    Falling = 0x10,
    /// Corpse may be crushed to gibs
    Crushable = 0x20,
    /// Being raised, blocks even while a corpse
    Resurrecting = 0x40,
    /// Draw flipped
    Mirrored = 0x80,
    /// Standing on top of another thing
    OnMobj = 0x100,
}

pub struct MapObject {
    /// Info for drawing: position.
    pub xy: Vec2,
    pub z: f32,
    /// orientation
    pub angle: Angle,
    /// For movement checking.
    pub radius: f32,
    pub height: f32,
    /// Momentum, used to update position.
    pub momxy: Vec2,
    pub momz: f32,
    pub flags: u32,
    pub flags2: u32,
    /// The closest interval over all contacted Sectors.
    pub floorz: f32,
    pub ceilingz: f32,
    /// The lowest floor over all contacted Sectors.
    pub dropoffz: f32,
    /// The sector the origin point is in
    pub sector: usize,
    /// Head of the chain of sectors this thing touches
    pub touching_sectorlist: Option<NodeId>,
    /// Links in the blockmap cell chain
    pub(crate) b_next: Option<ThingId>,
    pub(crate) b_prev: Option<ThingId>,
    /// Ledge torque damping, `0..=MAXGEAR`
    pub gear: i32,
    /// Thing being chased/attacked (or None),
    /// also the originator for missiles.
    pub target: Option<ThingId>,
    pub tracer: Option<ThingId>,
    /// Index of the player driving this thing
    pub player: Option<usize>,
    pub health: i32,
    /// The type of object
    pub kind: MapObjKind,
    pub info: &'static MapObjInfo,
    pub state: StateNum,
    pub tics: i32,
    /// Corpse shove cooldown in tics. Missiles use it to count hits.
    pub nudge: i32,
    /// If == validcount, already checked.
    pub(crate) valid_count: usize,
}

impl Debug for MapObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapObject")
            .field("kind", &self.kind)
            .field("xy", &self.xy)
            .field("z", &self.z)
            .field("floorz", &self.floorz)
            .field("ceilingz", &self.ceilingz)
            .field("dropoffz", &self.dropoffz)
            .field("radius", &self.radius)
            .field("height", &self.height)
            .field("momxy", &self.momxy)
            .field("momz", &self.momz)
            .field("flags", &self.flags)
            .field("flags2", &self.flags2)
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}

impl MapObject {
    pub fn new(xy: Vec2, z: f32, kind: MapObjKind) -> Self {
        let info = kind.info();
        Self {
            xy,
            z,
            angle: Angle::default(),
            radius: info.radius,
            height: info.height,
            momxy: Vec2::default(),
            momz: 0.0,
            flags: info.flags,
            flags2: info.flags2,
            floorz: 0.0,
            ceilingz: 0.0,
            dropoffz: 0.0,
            sector: 0,
            touching_sectorlist: None,
            b_next: None,
            b_prev: None,
            gear: 0,
            target: None,
            tracer: None,
            player: None,
            health: info.spawnhealth,
            kind,
            info,
            state: StateNum::Spawn,
            tics: 0,
            nudge: 0,
            valid_count: 0,
        }
    }

    #[inline]
    pub fn has_flag(&self, flag: MapObjFlag) -> bool {
        self.flags & flag as u32 != 0
    }

    #[inline]
    pub fn has_flag2(&self, flag: MapObjFlag2) -> bool {
        self.flags2 & flag as u32 != 0
    }

    #[inline]
    pub fn set_flag2(&mut self, flag: MapObjFlag2, on: bool) {
        if on {
            self.flags2 |= flag as u32;
        } else {
            self.flags2 &= !(flag as u32);
        }
    }

    /// Top of the thing
    #[inline]
    pub fn top(&self) -> f32 {
        self.z + self.height
    }

    /// Knights and barons count as one species for missile clipping
    pub fn same_species(&self, kind: MapObjKind) -> bool {
        use MapObjKind::{MT_BRUISER, MT_KNIGHT};
        self.kind == kind
            || (self.kind == MT_KNIGHT && kind == MT_BRUISER)
            || (self.kind == MT_BRUISER && kind == MT_KNIGHT)
    }
}

impl Level {
    /// Spawn a thing and link it into the level. `z` may be `ONFLOORZ` or
    /// `ONCEILINGZ` to rest on the sector floor or hang from its ceiling.
    ///
    /// Doom function name `P_SpawnMobj`
    pub fn spawn_map_object(&mut self, xy: Vec2, z: f32, kind: MapObjKind) -> ThingId {
        let thing = MapObject::new(xy, z, kind);
        let id = self.things.insert(thing);
        self.set_thing_position(id, None);

        let sectors = self.map_data.sectors();
        let thing = &mut self.things[id];
        let sector = &sectors[thing.sector];
        thing.floorz = sector.floorheight;
        thing.ceilingz = sector.ceilingheight;
        thing.dropoffz = thing.floorz;

        if z == ONFLOORZ {
            thing.z = thing.floorz;
        } else if z == ONCEILINGZ {
            thing.z = thing.ceilingz - thing.height;
        }

        if thing.has_flag2(MapObjFlag2::FootClip) && sector.is_liquid() {
            thing.flags2 |= MapObjFlag2::FeetAreClipped as u32;
        }
        trace!("Spawned {:?} at {}", kind, xy);
        id
    }

    /// Unlink and free a thing. Ids to it no longer resolve.
    ///
    /// Doom function name `P_RemoveMobj`
    pub fn remove_map_object(&mut self, id: ThingId) {
        if !self.things.contains(id) {
            return;
        }
        let chain = self.unset_thing_position(id);
        self.sec_nodes
            .del_seclist(&mut self.map_data.sectors, chain);
        for player in self.players.iter_mut() {
            if player.mobj == Some(id) {
                player.mobj = None;
            }
        }
        if let Some(thing) = self.things.remove(id) {
            debug!("Removed {:?}", thing.kind);
        }
    }

    /// Unlink a thing from the blockmap, and detach its sector chain. The chain
    /// is returned so the next `set_thing_position` can reuse the nodes.
    ///
    /// Doom function name `P_UnsetThingPosition`
    pub fn unset_thing_position(&mut self, id: ThingId) -> Option<NodeId> {
        let Some(thing) = self.things.get_mut(id) else {
            return None;
        };
        let mut chain = None;
        if !thing.has_flag(MapObjFlag::Nosector) {
            chain = thing.touching_sectorlist.take();
        }

        if !thing.has_flag(MapObjFlag::Noblockmap) {
            let (b_next, b_prev, xy) = (thing.b_next.take(), thing.b_prev.take(), thing.xy);
            if let Some(next) = b_next {
                if let Some(n) = self.things.get_mut(next) {
                    n.b_prev = b_prev;
                }
            }
            match b_prev {
                Some(prev) => {
                    if let Some(p) = self.things.get_mut(prev) {
                        p.b_next = b_next;
                    }
                }
                None => {
                    let bmap = &mut self.map_data.blockmap;
                    if let Some(cell) = bmap.cell_of(xy) {
                        if bmap.thing_head_at(cell) == Some(id) {
                            bmap.set_thing_head(cell, b_next);
                        }
                    }
                }
            }
        }
        chain
    }

    /// Link a thing into the sector and blockmap at its current position.
    /// `chain` is the sector chain returned by `unset_thing_position`, or None
    /// for a fresh thing.
    ///
    /// Doom function name `P_SetThingPosition`
    pub fn set_thing_position(&mut self, id: ThingId, chain: Option<NodeId>) {
        let Some(xy) = self.things.get(id).map(|t| t.xy) else {
            return;
        };
        let sector = self.map_data.point_in_sector(xy);
        let flags = {
            let thing = &mut self.things[id];
            thing.sector = sector;
            thing.flags
        };

        if flags & MapObjFlag::Nosector as u32 == 0 {
            let head = self.create_sec_node_list(id, xy, chain);
            self.things[id].touching_sectorlist = head;
        } else if chain.is_some() {
            self.sec_nodes
                .del_seclist(&mut self.map_data.sectors, chain);
        }

        if flags & MapObjFlag::Noblockmap as u32 == 0 {
            let bmap = &mut self.map_data.blockmap;
            match bmap.cell_of(xy) {
                Some(cell) => {
                    let head = bmap.thing_head_at(cell);
                    bmap.set_thing_head(cell, Some(id));
                    if let Some(h) = head {
                        if let Some(old) = self.things.get_mut(h) {
                            old.b_prev = Some(id);
                        }
                    }
                    let thing = &mut self.things[id];
                    thing.b_prev = None;
                    thing.b_next = head;
                }
                None => {
                    // Thing is off the map
                    let thing = &mut self.things[id];
                    thing.b_prev = None;
                    thing.b_next = None;
                }
            }
        }
    }

    /// Rebuild the chain of sectors a thing at `xy` touches, reusing the nodes
    /// of `prev` where the sector is unchanged. Every node left untouched is
    /// freed. Returns the new chain head.
    ///
    /// Doom function name `P_CreateSecNodeList`
    pub fn create_sec_node_list(
        &mut self,
        id: ThingId,
        xy: Vec2,
        prev: Option<NodeId>,
    ) -> Option<NodeId> {
        let Some(thing) = self.things.get(id) else {
            return prev;
        };
        let origin_sector = thing.sector;
        let bbox = BBox::around(xy, thing.info.pickup_radius);

        let mut head = prev;
        let mut node = head;
        while let Some(n) = node {
            let sn = self.sec_nodes.node_mut(n);
            sn.thing = None;
            node = sn.t_next;
        }

        let valid = self.next_valid_count();
        let bmap = &self.map_data.blockmap;
        let xl = bmap.safe_block_x(bbox.left);
        let xh = bmap.safe_block_x(bbox.right);
        let yl = bmap.safe_block_y(bbox.bottom);
        let yh = bmap.safe_block_y(bbox.top);

        for bx in xl..=xh {
            for by in yl..=yh {
                let count = self.map_data.blockmap.lines_in(bx, by).len();
                for i in 0..count {
                    let l = self.map_data.blockmap.lines_in(bx, by)[i];
                    let line = &mut self.map_data.linedefs[l];
                    if line.valid_count == valid {
                        continue;
                    }
                    line.valid_count = valid;
                    if !bbox.overlaps(&line.bbox) || box_on_line_side(&bbox, line) != -1 {
                        continue;
                    }
                    let (front, back) = (line.frontsector, line.backsector);
                    head = Some(self.sec_nodes.add_secnode(
                        &mut self.map_data.sectors,
                        front,
                        id,
                        head,
                    ));
                    if let Some(back) = back {
                        if back != front {
                            head = Some(self.sec_nodes.add_secnode(
                                &mut self.map_data.sectors,
                                back,
                                id,
                                head,
                            ));
                        }
                    }
                }
            }
        }

        head = Some(
            self.sec_nodes
                .add_secnode(&mut self.map_data.sectors, origin_sector, id, head),
        );

        // Drop the nodes for sectors that were left
        let mut node = head;
        while let Some(n) = node {
            if self.sec_nodes.node(n).thing.is_none() {
                if node == head {
                    head = self.sec_nodes.node(n).t_next;
                }
                node = self.sec_nodes.del_secnode(&mut self.map_data.sectors, n);
            } else {
                node = self.sec_nodes.node(n).t_next;
            }
        }
        head
    }

    /// Sectors a thing currently touches, in chain order
    pub fn touching_sectors(&self, id: ThingId) -> Vec<usize> {
        let head = self.things.get(id).and_then(|t| t.touching_sectorlist);
        self.sec_nodes
            .thing_chain(head)
            .map(|n| self.sec_nodes.node(n).sector)
            .collect()
    }

    /// Things touching a sector, in chain order
    pub fn sector_things(&self, sector: usize) -> Vec<ThingId> {
        let head = self.map_data.sectors()[sector].touching_thinglist;
        self.sec_nodes
            .sector_chain(head)
            .filter_map(|n| self.sec_nodes.node(n).thing)
            .collect()
    }

    /// A metal spark, for shots striking walls or non-fleshy things.
    ///
    /// Doom function name `P_SpawnPuff`
    pub fn spawn_puff(&mut self, xy: Vec2, z: f32) -> ThingId {
        let z = z + self.rng.p_subrandom() as f32 / 64.0;
        let id = self.spawn_map_object(xy, z, MapObjKind::MT_PUFF);
        let tics = self.rng.p_random() & 3;
        let puff = &mut self.things[id];
        puff.momz = 1.0;
        puff.tics = (puff.tics - tics).max(1);
        id
    }

    /// Blood from a hit on `target`. The kind of blood follows the blood mode.
    ///
    /// Doom function name `P_SpawnBlood`
    pub fn spawn_blood(&mut self, xy: Vec2, z: f32, target: ThingId) -> Option<ThingId> {
        let kind = self.blood_kind(target)?;
        let z = z + self.rng.p_subrandom() as f32 / 64.0;
        let id = self.spawn_map_object(xy, z, kind);
        let blood = &mut self.things[id];
        blood.momz = 2.0;
        blood.target = Some(target);
        Some(id)
    }

    /// The blood a thing sprays, or None if it does not bleed
    pub(crate) fn blood_kind(&self, id: ThingId) -> Option<MapObjKind> {
        let thing = self.things.get(id)?;
        let own = thing.info.blood?;
        match self.config.blood {
            BloodMode::None => None,
            BloodMode::Red => Some(MapObjKind::MT_BLOOD),
            BloodMode::All => {
                if thing.has_flag(MapObjFlag::Shadow) {
                    Some(MapObjKind::MT_FUZZYBLOOD)
                } else {
                    Some(own)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MapObjFlag2, MapObject};
    use crate::info::MapObjKind;
    use glam::Vec2;

    #[test]
    fn new_thing_takes_info() {
        let t = MapObject::new(Vec2::new(1.0, 2.0), 0.0, MapObjKind::MT_SERGEANT);
        assert_eq!(t.radius, 30.0);
        assert_eq!(t.health, 150);
        assert!(t.has_flag2(MapObjFlag2::Crushable));
        assert!(!t.has_flag2(MapObjFlag2::Falling));
    }

    #[test]
    fn knights_and_barons_are_kin() {
        let t = MapObject::new(Vec2::ZERO, 0.0, MapObjKind::MT_KNIGHT);
        assert!(t.same_species(MapObjKind::MT_BRUISER));
        assert!(t.same_species(MapObjKind::MT_KNIGHT));
        assert!(!t.same_species(MapObjKind::MT_TROOP));
    }
}
