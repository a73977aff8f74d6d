//! The data that makes up an entire level, along with the things in it and the
//! bookkeeping every clipping query shares.

pub mod blockmap;
pub mod flags;
pub mod map_data;
pub mod map_defs;
pub mod secnodes;

#[cfg(test)]
pub(crate) mod tests;

use log::info;
use math::{RandomSource, RndTable};

use crate::config::ClipConfig;
use crate::level::map_data::MapData;
use crate::player::Player;
use crate::thing::{ThingAlloc, ThingId};

use self::secnodes::SecNodes;

/// The level is considered a `World` or sorts. One that exists only while
/// things are moving in it. Everything the movement code touches is reached
/// through here, and every query takes it by `&mut`.
pub struct Level {
    pub map_data: MapData,
    pub things: ThingAlloc,
    pub sec_nodes: SecNodes,
    pub config: ClipConfig,
    pub rng: Box<dyn RandomSource>,
    pub level_time: u32,
    /// The flat number used to signify a floor or ceiling is a sky
    pub sky_num: Option<usize>,
    /// `players[0]` is the player whose statistics are kept
    pub players: Vec<Player>,
    /// Everything but players stands still, and no thing blocks another
    pub freeze: bool,
    /// Monsters may telefrag on this map
    pub boss_level: bool,
    /// Marker count for lines and things checked
    pub(crate) valid_count: usize,
    /// Reused by `block_things_iterator` for the cell chains it walks
    pub(crate) thing_scratch: Vec<ThingId>,
}

impl Level {
    /// Doom function name `P_SetupLevel` (minus loading)
    pub fn new(map_data: MapData, config: ClipConfig) -> Self {
        Self::with_rng(map_data, config, Box::new(RndTable::new()))
    }

    pub fn with_rng(map_data: MapData, config: ClipConfig, rng: Box<dyn RandomSource>) -> Self {
        info!(
            "{}: Level ready, {} sectors, {} lines",
            map_data.name,
            map_data.sectors.len(),
            map_data.linedefs.len()
        );
        Self {
            things: ThingAlloc::new(map_data.sectors.len() * 4),
            map_data,
            sec_nodes: SecNodes::new(),
            config,
            rng,
            level_time: 0,
            sky_num: None,
            players: Vec::new(),
            freeze: false,
            boss_level: false,
            valid_count: 0,
            thing_scratch: Vec::new(),
        }
    }

    /// Attach a new player to `thing`, returns the player index
    pub fn add_player(&mut self, thing: ThingId) -> usize {
        let num = self.players.len();
        self.players.push(Player::new(thing));
        if let Some(t) = self.things.get_mut(thing) {
            t.player = Some(num);
        }
        num
    }

    /// The player that statistics are credited to, if one is in the level
    pub fn view_player_mut(&mut self) -> Option<&mut Player> {
        self.players.first_mut()
    }

    /// True if the thing is the body of the player driving it. Things with a
    /// player index but no matching body are voodoo dolls.
    pub fn is_real_player(&self, id: ThingId) -> bool {
        self.things
            .get(id)
            .and_then(|t| t.player)
            .and_then(|p| self.players.get(p))
            .is_some_and(|p| p.mobj == Some(id))
    }

    #[inline]
    pub fn is_sky(&self, pic: usize) -> bool {
        self.sky_num == Some(pic)
    }

    /// Bump the marker used to visit each line or thing once per query
    #[inline]
    pub fn next_valid_count(&mut self) -> usize {
        self.valid_count = self.valid_count.wrapping_add(1);
        self.valid_count
    }

    /// Call `func` on each line in the cell that has not been seen since the
    /// last `next_valid_count`. Stops and returns false as soon as `func`
    /// does.
    ///
    /// Doom function name `P_BlockLinesIterator`
    pub fn block_lines_iterator(
        &mut self,
        bx: i32,
        by: i32,
        mut func: impl FnMut(&mut Level, usize) -> bool,
    ) -> bool {
        let count = self.map_data.blockmap.lines_in(bx, by).len();
        for i in 0..count {
            let l = self.map_data.blockmap.lines_in(bx, by)[i];
            let line = &mut self.map_data.linedefs[l];
            if line.valid_count == self.valid_count {
                continue;
            }
            line.valid_count = self.valid_count;
            if !func(self, l) {
                return false;
            }
        }
        true
    }

    /// Call `func` on each thing whose origin is in the cell. The cell chain
    /// is read up front, so `func` may move or remove things, and things that
    /// are gone by the time they are reached are skipped.
    ///
    /// Doom function name `P_BlockThingsIterator`
    pub fn block_things_iterator(
        &mut self,
        bx: i32,
        by: i32,
        mut func: impl FnMut(&mut Level, ThingId) -> bool,
    ) -> bool {
        // A walk started from inside `func` finds the buffer empty and
        // makes its own
        let mut chain = std::mem::take(&mut self.thing_scratch);
        chain.clear();
        let mut next = self.map_data.blockmap.thing_head(bx, by);
        while let Some(id) = next {
            chain.push(id);
            next = self.things.get(id).and_then(|t| t.b_next);
        }

        let mut clear = true;
        for &id in &chain {
            if !self.things.contains(id) {
                continue;
            }
            if !func(self, id) {
                clear = false;
                break;
            }
        }

        chain.clear();
        if chain.capacity() >= self.thing_scratch.capacity() {
            self.thing_scratch = chain;
        }
        clear
    }

    /// Drop every membership node and the free stack
    ///
    /// Doom function name `P_FreeSecNodeList`
    pub fn clear_sec_nodes(&mut self) {
        for sector in self.map_data.sectors.iter_mut() {
            sector.touching_thinglist = None;
        }
        for id in self.things.ids() {
            self.things[id].touching_sectorlist = None;
        }
        self.sec_nodes.clear();
    }

    /// Tear the level down, freeing every thing
    pub fn clear(&mut self) {
        self.clear_sec_nodes();
        self.map_data.blockmap.clear_things();
        self.things.clear();
        for player in self.players.iter_mut() {
            player.mobj = None;
        }
        info!("{}: Level cleared", self.map_data.name);
    }
}
