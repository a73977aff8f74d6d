//! The parts of a player the movement code reads or updates. Input, weapons
//! and the view live with whatever drives the player.

use glam::Vec2;

use crate::thing::ThingId;

/// player_t, cut down
#[derive(Debug, Clone)]
pub struct Player {
    /// The body. A thing pointing back at a player that does not point at it
    /// is a voodoo doll.
    pub mobj: Option<ThingId>,
    /// Momentum used for view bob. Sliding along a wall clamps it.
    pub momxy: Vec2,
    /// Map units walked, in whole units
    pub distance_traveled: u32,
    /// Power up, tics remaining
    pub invulnerable: i32,
    /// Cheat
    pub god_mode: bool,
    /// For the hit accuracy statistic
    pub shots_hit: u32,
}

impl Player {
    pub const fn new(mobj: ThingId) -> Self {
        Self {
            mobj: Some(mobj),
            momxy: Vec2::ZERO,
            distance_traveled: 0,
            invulnerable: 0,
            god_mode: false,
            shots_hit: 0,
        }
    }

    /// Ignores damage from blood-drawing sources
    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0 || self.god_mode
    }
}
