mod angle;
mod intercept;
mod random;

use std::f32::consts::PI;

pub use angle::*;
use glam::Vec2;
pub use intercept::*;
pub use random::*;

const FRACBITS: i32 = 16;
const FRACUNIT: f32 = (1 << FRACBITS) as f32;
pub const FRACUNIT_DIV4: f32 = 0.25;

/// Convert a Doom `fixed_t` fixed-point float to `f32`
pub const fn fixed_to_float(value: i32) -> f32 {
    value as f32 / FRACUNIT
}

const DEG_TO_RAD: f32 = PI / 180.0;

/// Convert a BAM (Binary Angle Measure) to radians
#[inline]
pub const fn bam_to_radian(value: u32) -> f32 {
    (value as f32 * 8.381_903e-8) * DEG_TO_RAD
}

/// Doom's octagonal distance approximation. Cheaper than a square root and
/// the comparisons in the movement code are tuned against it.
///
/// Doom function name `P_AproxDistance`
#[inline]
pub fn approx_distance(dx: f32, dy: f32) -> f32 {
    let dx = dx.abs();
    let dy = dy.abs();
    dx + dy - dx.min(dy) / 2.0
}

/// Squared length of a momentum vector, used for the ledge and falling checks
#[inline]
pub fn speed_squared(mom: Vec2) -> f32 {
    mom.x * mom.x + mom.y * mom.y
}
