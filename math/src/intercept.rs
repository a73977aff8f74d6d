use glam::Vec2;

/// Used in path tracing for intercepts
/// Is divline + trace types
#[derive(Debug, Clone, Copy)]
pub struct Trace {
    pub xy: Vec2,
    pub dxy: Vec2,
}

impl Trace {
    #[inline]
    pub const fn new(xy: Vec2, dxy: Vec2) -> Self {
        Self { xy, dxy }
    }

    /// A trace running from `v1` to `v2`
    #[inline]
    pub fn from_points(v1: Vec2, v2: Vec2) -> Self {
        Self { xy: v1, dxy: v2 - v1 }
    }
}

/// Determine which side of the trace the vector point is on
///
/// Doom function name `P_PointOnDivlineSide`
#[inline]
pub fn point_on_side(trace: Trace, v2: Vec2) -> usize {
    let dx = v2.x - trace.xy.x;
    let dy = v2.y - trace.xy.y;

    if (dy * trace.dxy.x) <= (trace.dxy.y * dx) {
        // Front side
        return 0;
    }
    // Backside
    1
}

/// Returns the fractional intercept point along the first divline.
///
/// The lines can be pictured as arg1 being an infinite plane, and arg2 being
/// the line to check if intersected by the plane. Parallel lines give `0.0`.
///
/// P_InterceptVector
#[inline]
pub fn intercept_vector(v2: Trace, v1: Trace) -> f32 {
    let denominator = (v1.dxy.y * v2.dxy.x) - (v1.dxy.x * v2.dxy.y);
    if denominator == 0.0 {
        return 0.0;
    }
    let numerator = ((v1.xy.x - v2.xy.x) * v1.dxy.y) + ((v2.xy.y - v1.xy.y) * v1.dxy.x);
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::{Trace, intercept_vector, point_on_side};
    use glam::Vec2;

    #[test]
    fn sides_of_trace() {
        let trace = Trace::from_points(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(point_on_side(trace, Vec2::new(5.0, -5.0)), 0);
        assert_eq!(point_on_side(trace, Vec2::new(5.0, 5.0)), 1);
    }

    #[test]
    fn half_way_intercept() {
        let trace = Trace::from_points(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        let wall = Trace::from_points(Vec2::new(50.0, -10.0), Vec2::new(50.0, 10.0));
        let frac = intercept_vector(trace, wall);
        assert!((frac - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn parallel_is_zero() {
        let trace = Trace::from_points(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        let wall = Trace::from_points(Vec2::new(0.0, 10.0), Vec2::new(100.0, 10.0));
        assert_eq!(intercept_vector(trace, wall), 0.0);
    }
}
