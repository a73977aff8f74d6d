use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::bam_to_radian;

pub const ANG45: f32 = FRAC_PI_4;
pub const ANG90: f32 = FRAC_PI_2;
pub const ANG135: f32 = FRAC_PI_2 + FRAC_PI_4;
pub const ANG180: f32 = PI;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Angle(f32);

impl Angle {
    /// Will always wrap < 0 to > PI
    #[inline]
    pub const fn new(mut radians: f32) -> Self {
        radians %= TAU;
        if radians < 0.0 {
            radians += TAU;
        }
        Angle(radians)
    }

    /// From a Doom `angle_t`
    #[inline]
    pub const fn from_bam(bam: u32) -> Self {
        Angle::new(bam_to_radian(bam))
    }

    #[inline]
    const fn inner_wrap(&mut self) {
        self.0 %= TAU;
        if self.0 < 0.0 {
            self.0 += TAU;
        }
    }

    #[inline]
    pub const fn rad(&self) -> f32 {
        self.0
    }

    #[inline]
    pub fn sin(&self) -> f32 {
        self.0.sin()
    }

    #[inline]
    pub fn cos(&self) -> f32 {
        self.0.cos()
    }

    #[inline]
    pub fn sin_cos(&self) -> (f32, f32) {
        self.0.sin_cos()
    }

    #[inline(always)]
    pub fn unit(&self) -> Vec2 {
        let (y, x) = self.sin_cos();
        Vec2::new(x, y)
    }

    pub fn from_vector(input: Vec2) -> Self {
        Angle::new(input.y.atan2(input.x))
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, other: Angle) -> Angle {
        Angle::new(self.0 + other.0)
    }
}

impl Add<f32> for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, other: f32) -> Angle {
        Angle::new(self.0 + other)
    }
}

impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, other: Angle) {
        self.0 += other.0;
        self.inner_wrap();
    }
}

impl AddAssign<f32> for Angle {
    #[inline]
    fn add_assign(&mut self, other: f32) {
        self.0 += other;
        self.inner_wrap();
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, other: Angle) -> Angle {
        Angle::new(self.0 - other.0)
    }
}

impl Sub<f32> for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, other: f32) -> Angle {
        Angle::new(self.0 - other)
    }
}

impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, other: Angle) {
        self.0 -= other.0;
        self.inner_wrap();
    }
}

impl SubAssign<f32> for Angle {
    #[inline]
    fn sub_assign(&mut self, other: f32) {
        self.0 -= other;
        self.inner_wrap();
    }
}

impl Neg for Angle {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Angle::new(-self.0)
    }
}

/// Angle of the vector pointing from `point2` to `point1`
///
/// Doom function name `R_PointToAngle2`
#[inline]
pub fn point_to_angle_2(point1: Vec2, point2: Vec2) -> Angle {
    let x = point1.x - point2.x;
    let y = point1.y - point2.y;
    Angle::new(y.atan2(x))
}

#[cfg(test)]
mod tests {
    use super::{ANG90, ANG180, Angle, point_to_angle_2};
    use glam::Vec2;
    use std::f32::consts::TAU;

    #[test]
    fn wraps_negative() {
        let a = Angle::new(-ANG90);
        assert!((a.rad() - (TAU - ANG90)).abs() < 0.0001);
        let b = Angle::new(ANG180) + ANG180;
        assert!(b.rad().abs() < 0.0001);
    }

    #[test]
    fn unit_of_vector_angle() {
        let a = Angle::from_vector(Vec2::new(0.0, 5.0));
        assert!((a.rad() - ANG90).abs() < 0.0001);
        let u = a.unit();
        assert!(u.x.abs() < 0.0001);
        assert!((u.y - 1.0).abs() < 0.0001);
    }

    #[test]
    fn point_to_point() {
        let a = point_to_angle_2(Vec2::new(-10.0, 0.0), Vec2::ZERO);
        assert!((a.rad() - ANG180).abs() < 0.0001);
    }
}
