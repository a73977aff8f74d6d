//! Reclipping everything standing in a sector after its floor or ceiling
//! moved, crushing what no longer fits.

use glam::Vec2;
use log::{debug, trace};
use math::Angle;

use crate::config::BloodMode;
use crate::doom_def::CRUSH_DAMAGE;
use crate::env::{LevelHooks, SfxName};
use crate::info::{MapObjKind, StateNum};
use crate::level::Level;
use crate::thing::{MapObjFlag, MapObjFlag2, ThingId};

/// Fine angles in a circle, for the splat spread
const FINEANGLES: i32 = 8192;

impl Level {
    /// Reclip every thing touching `sector` to its new heights. Returns true
    /// if something no longer fits, in which case a moving plane should stop
    /// or reverse. With `crunch` set the things that don't fit are hurt.
    ///
    /// Each thing is visited exactly once, even when crushing removes things
    /// or spawns new ones into the sector.
    ///
    /// Doom function name `P_ChangeSector`
    pub fn change_sector(
        &mut self,
        sector: usize,
        crunch: bool,
        hooks: &mut dyn LevelHooks,
    ) -> bool {
        let mut nofit = false;

        let head = self.map_data.sectors[sector].touching_thinglist;
        let nodes: Vec<_> = self.sec_nodes.sector_chain(head).collect();
        for n in nodes {
            self.sec_nodes.node_mut(n).visited = false;
        }

        // Processing a thing may unlink any number of nodes, so start over
        // from the head after each one
        loop {
            let head = self.map_data.sectors[sector].touching_thinglist;
            let next = self
                .sec_nodes
                .sector_chain(head)
                .find(|&n| !self.sec_nodes.node(n).visited);
            let Some(node) = next else {
                break;
            };

            let node = self.sec_nodes.node_mut(node);
            node.visited = true;
            let Some(thing) = node.thing else {
                continue;
            };
            if self
                .things
                .get(thing)
                .is_some_and(|t| !t.has_flag(MapObjFlag::Noblockmap))
            {
                self.pit_change_sector(thing, crunch, &mut nofit, hooks);
            }
        }
        nofit
    }

    /// Doom function name `PIT_ChangeSector`
    fn pit_change_sector(
        &mut self,
        id: ThingId,
        crunch: bool,
        nofit: &mut bool,
        hooks: &mut dyn LevelHooks,
    ) {
        if self.thing_height_clip(id, hooks) {
            // keep checking
            return;
        }

        let Some(thing) = self.things.get(id) else {
            return;
        };
        let flags = thing.flags;

        // crunch bodies to giblets
        if thing.health <= 0 && thing.has_flag2(MapObjFlag2::Crushable) {
            if thing.player.is_some() {
                *nofit = true;
                return;
            }
            if flags & MapObjFlag::Noblood as u32 == 0 {
                if let Some(blood) = thing.info.blood {
                    self.gib_corpse(id, blood, hooks);
                }
            }
            // keep checking
            return;
        }

        // crunch dropped items
        if flags & MapObjFlag::Dropped as u32 != 0 {
            trace!("Crushed dropped {:?}", thing.kind);
            self.remove_map_object(id);
            return;
        }

        if flags & MapObjFlag::Shootable as u32 == 0 {
            // assume it is bloody gibs or something
            return;
        }

        *nofit = true;

        if crunch && self.level_time & 3 == 0 {
            let invulnerable = thing
                .player
                .and_then(|p| self.players.get(p))
                .is_some_and(|p| p.is_invulnerable());
            if flags & MapObjFlag::Noblood as u32 == 0 && !invulnerable {
                if let Some(own) = thing.info.blood {
                    let kind = match self.config.blood {
                        BloodMode::None => None,
                        BloodMode::All if flags & MapObjFlag::Shadow as u32 != 0 => {
                            Some(MapObjKind::MT_FUZZYBLOOD)
                        }
                        BloodMode::All => Some(own),
                        BloodMode::Red => Some(MapObjKind::MT_BLOOD),
                    };
                    if let Some(kind) = kind {
                        let xy = thing.xy;
                        let z = thing.z + thing.height * 2.0 / 3.0;
                        for _ in 0..4 {
                            // spray blood in a random direction
                            let mo = self.spawn_map_object(xy, z, kind);
                            let momx = self.rng.m_subrandom() as f32 / 32.0;
                            let momy = self.rng.m_subrandom() as f32 / 32.0;
                            self.things[mo].momxy = Vec2::new(momx, momy);
                        }
                    }
                }
            }
            debug!("Crushing {:?}", self.things[id].kind);
            hooks.damage_thing(self, id, None, None, CRUSH_DAMAGE);
        }
    }

    fn gib_corpse(&mut self, id: ThingId, blood: MapObjKind, hooks: &mut dyn LevelHooks) {
        let thing = &self.things[id];
        let (xy, floorz, shadow) = (
            thing.xy,
            thing.floorz,
            thing.has_flag(MapObjFlag::Shadow),
        );
        if !shadow {
            let radius = thing.radius as i32 + 12;
            let max = self.rng.m_random_int(50, 100) + radius;
            for _ in 0..max {
                let fine = self.rng.m_random_int(0, FINEANGLES - 1);
                let angle = Angle::new(fine as f32 * std::f32::consts::TAU / FINEANGLES as f32);
                // each axis draws its own distance
                let fx = self.rng.m_random_int(0, radius) as f32;
                let fy = self.rng.m_random_int(0, radius) as f32;
                let (sin, cos) = angle.sin_cos();
                let at = xy + Vec2::new(cos * fx, sin * fy);
                hooks.spawn_blood_splat(self, at, floorz, blood);
            }
        }

        hooks.set_state(self, id, StateNum::Gibs);
        let mirror = self.config.corpses_mirrored && self.rng.m_random() & 1 != 0;
        if let Some(thing) = self.things.get_mut(id) {
            thing.flags &= !(MapObjFlag::Solid as u32);
            if mirror {
                thing.flags2 |= MapObjFlag2::Mirrored as u32;
            }
            thing.height = 0.0;
            thing.radius = 0.0;
        }
        hooks.start_sound(self, id, SfxName::Slop);
        trace!("Gibbed corpse at {xy}");
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::config::ClipConfig;
    use crate::doom_def::ONFLOORZ;
    use crate::env::{DefaultHooks, LevelHooks};
    use crate::info::{MapObjKind, StateNum};
    use crate::level::Level;
    use crate::level::tests::square_room;
    use crate::thing::MapObjFlag;
    use math::{Angle, RandomSource};

    /// Cosmetic draws count up from zero
    struct Counting(i32);

    impl RandomSource for Counting {
        fn p_random(&mut self) -> i32 {
            0
        }

        fn m_random(&mut self) -> i32 {
            let r = self.0 & 0xFF;
            self.0 += 1;
            r
        }
    }

    #[test]
    fn things_that_fit_are_left_alone() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let imp = level.spawn_map_object(Vec2::new(0.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        level.map_data.sectors[0].floorheight = 16.0;
        assert!(!level.change_sector(0, true, &mut hooks));
        assert_eq!(level.things[imp].z, 16.0);
        assert_eq!(level.things[imp].floorz, 16.0);
    }

    #[test]
    fn crusher_hurts_every_fourth_tic() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let imp = level.spawn_map_object(Vec2::new(0.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        level.map_data.sectors[0].ceilingheight = 40.0;

        level.level_time = 1;
        assert!(level.change_sector(0, true, &mut hooks));
        assert_eq!(level.things[imp].health, 60);

        level.level_time = 4;
        assert!(level.change_sector(0, true, &mut hooks));
        assert_eq!(level.things[imp].health, 50);
        // Four sprays of blood joined the sector
        let blood = level
            .things
            .iter()
            .filter(|(_, t)| t.kind == MapObjKind::MT_BLOOD)
            .count();
        assert_eq!(blood, 4);
    }

    #[test]
    fn corpses_are_gibbed_and_dropped_items_removed() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let imp = level.spawn_map_object(Vec2::new(0.0, 0.0), ONFLOORZ, MapObjKind::MT_TROOP);
        let clip = level.spawn_map_object(Vec2::new(64.0, 0.0), ONFLOORZ, MapObjKind::MT_CLIP);
        level.things[clip].flags |= MapObjFlag::Dropped as u32;
        hooks.damage_thing(&mut level, imp, None, None, 100);

        // Squeeze below even a corpse
        level.map_data.sectors[0].ceilingheight = 4.0;
        assert!(!level.change_sector(0, true, &mut hooks));

        let corpse = &level.things[imp];
        assert_eq!(corpse.state, StateNum::Gibs);
        assert_eq!(corpse.height, 0.0);
        assert!(!corpse.has_flag(MapObjFlag::Solid));
        assert!(hooks.splats.len() >= 50);
        assert!(!level.things.contains(clip));
    }

    #[test]
    fn splats_spread_on_each_axis_apart() {
        let mut level = Level::new(square_room(512.0), ClipConfig::default());
        let mut hooks = DefaultHooks::new();
        let imp = level.spawn_map_object(Vec2::new(10.0, -20.0), ONFLOORZ, MapObjKind::MT_TROOP);
        let radius = level.things[imp].radius as i32 + 12;
        level.rng = Box::new(Counting(0));

        level.gib_corpse(imp, MapObjKind::MT_BLOOD, &mut hooks);
        // 50 from the first draw, then three draws per splat
        assert_eq!(hooks.splats.len() as i32, 50 + radius);

        let angle = Angle::new(std::f32::consts::TAU / 8192.0);
        let (sin, cos) = angle.sin_cos();
        let first = hooks.splats[0] - Vec2::new(10.0, -20.0);
        assert!((first.x - cos * 2.0).abs() < 1e-4, "{first}");
        assert!((first.y - sin * 3.0).abs() < 1e-4, "{first}");

        for at in &hooks.splats {
            let off = *at - Vec2::new(10.0, -20.0);
            assert!(off.x.abs() <= radius as f32 && off.y.abs() <= radius as f32);
        }
    }
}
