use math::fixed_to_float;

/// Tics per second
pub const TICRATE: i32 = 35;

pub const MISSILERANGE: f32 = 32.0 * 64.0;
pub const USERANGE: f32 = 64.0;
pub const FLOATSPEED: f32 = 4.0;
pub const GRAVITY: f32 = 1.0;

/// Things are grouped in blockmap cells by origin only, so every sweep for
/// things is widened by the largest radius a thing may have.
pub const MAXRADIUS: f32 = 32.0;

/// Highest step a walking thing can climb, also the largest drop a non
/// dropoff thing accepts.
pub const MAXSTEP: f32 = 24.0;

pub const MAXMOVE: f32 = 30.0;
/// 0x1000
pub const STOPSPEED: f32 = 0.0625;

pub const ORIG_FRICTION: f32 = fixed_to_float(0xE800);
pub const ORIG_FRICTION_FACTOR: f32 = fixed_to_float(0x800);
/// Below this momentum on sludge the push is weakened further
pub const MORE_FRICTION_MOMENTUM: f32 = fixed_to_float(15000);
/// Sector special bit marking a sector as having non-default friction
pub const FRICTION_MASK: i16 = 0x100;

/// How far feet sink in liquid sectors
pub const FOOTCLIPSIZE: f32 = 10.0;

/// Torque momentum is scaled by `2 ^ (OVERDRIVE - gear)`
pub const OVERDRIVE: i32 = 6;
pub const MAXGEAR: i32 = OVERDRIVE + 16;

/// Size of a blockmap cell in map units
pub const MAPBLOCKUNITS: f32 = 128.0;

/// Pulled back from the contact point when moving up to a wall
pub const SLIDE_FUDGE: f32 = fixed_to_float(0x800);

pub const TELEFRAG_DAMAGE: i32 = 10000;
pub const CRUSH_DAMAGE: i32 = 10;

/// Top and bottom of the vertical auto-aim window, `100 / 160`
pub const AIM_SLOPE: f32 = 100.0 / 160.0;

/// Spawn z meaning "on the floor of the sector"
pub const ONFLOORZ: f32 = f32::MIN;
/// Spawn z meaning "hanging from the ceiling of the sector"
pub const ONCEILINGZ: f32 = f32::MAX;
