//! Many helper functions related to traversing the map, crossing or finding
//! lines.

use glam::Vec2;
use log::debug;
use math::{Trace, intercept_vector, point_on_side};

use crate::doom_def::MAPBLOCKUNITS;
use crate::level::Level;
use crate::level::map_defs::{BBox, LineDef, Sector, SlopeType};
use crate::thing::ThingId;

pub const PT_ADDLINES: i32 = 1;
pub const PT_ADDTHINGS: i32 = 2;
pub const PT_EARLYOUT: i32 = 4;

/// Returns 0 or 1 for the side the box is on, or -1 if the line runs through
/// the box at all
///
/// Doom function name `P_BoxOnLineSide`
#[inline]
pub fn box_on_line_side(tmbox: &BBox, ld: &LineDef) -> i32 {
    let mut p1;
    let mut p2;

    match ld.slopetype {
        SlopeType::Horizontal => {
            p1 = (tmbox.top > ld.v1.y) as i32;
            p2 = (tmbox.bottom > ld.v1.y) as i32;
            if ld.delta.x < 0.0 {
                p1 ^= 1;
                p2 ^= 1;
            }
        }
        SlopeType::Vertical => {
            p1 = (tmbox.right < ld.v1.x) as i32;
            p2 = (tmbox.left < ld.v1.x) as i32;
            if ld.delta.y < 0.0 {
                p1 ^= 1;
                p2 ^= 1;
            }
        }
        SlopeType::Positive => {
            p1 = ld.point_on_side(Vec2::new(tmbox.left, tmbox.top)) as i32;
            p2 = ld.point_on_side(Vec2::new(tmbox.right, tmbox.bottom)) as i32;
        }
        SlopeType::Negative => {
            p1 = ld.point_on_side(Vec2::new(tmbox.right, tmbox.top)) as i32;
            p2 = ld.point_on_side(Vec2::new(tmbox.left, tmbox.bottom)) as i32;
        }
    }

    if p1 == p2 { p1 } else { -1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptKind {
    Line(usize),
    Thing(ThingId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// Fraction along the trace
    pub frac: f32,
    pub kind: InterceptKind,
}

/// The nearest line blocking a slide
#[derive(Debug, Clone, Copy)]
pub struct BestSlide {
    pub best_slide_frac: f32,
    pub best_slide_line: Option<usize>,
}

impl BestSlide {
    /// Nothing hit yet. The starting fraction is just past the end of a trace.
    #[inline]
    pub fn new() -> Self {
        BestSlide {
            best_slide_frac: 1.0 + 1.0 / 65536.0,
            best_slide_line: None,
        }
    }

    #[inline]
    pub fn hit(&self) -> bool {
        self.best_slide_line.is_some()
    }
}

impl Default for BestSlide {
    fn default() -> Self {
        Self::new()
    }
}

/// Functions like `P_LineOpening`
#[derive(Default, Debug, Clone, Copy)]
pub struct PortalZ {
    /// The lowest ceiling of the portal line
    pub top_z: f32,
    /// The highest floor of the portal line
    pub bottom_z: f32,
    /// Range between `bottom_z` and `top_z`
    pub range: f32,
    /// The lowest floor of the portal line
    pub lowest_z: f32,
}

impl PortalZ {
    /// A one-sided line has no opening, all zero
    #[inline]
    pub fn new(line: &LineDef, sectors: &[Sector]) -> Self {
        let Some(back) = line.backsector else {
            return Self::default();
        };
        let front = &sectors[line.frontsector];
        let back = &sectors[back];

        let top_z = front.ceilingheight.min(back.ceilingheight);
        let (bottom_z, lowest_z) = if front.floorheight > back.floorheight {
            (front.floorheight, back.floorheight)
        } else {
            (back.floorheight, front.floorheight)
        };

        PortalZ {
            top_z,
            bottom_z,
            range: top_z - bottom_z,
            lowest_z,
        }
    }
}

/// Walk the blockmap cells the segment from `origin` to `endpoint` passes
/// through, gathering the lines and/or things it crosses, then call `trav` on
/// each in order of distance along the segment. Returns false if `trav` or an
/// early out stopped the walk.
///
/// Doom function name `P_PathTraverse`
pub fn path_traverse(
    level: &mut Level,
    origin: Vec2,
    endpoint: Vec2,
    flags: i32,
    trav: impl FnMut(&mut Level, &Intercept) -> bool,
) -> bool {
    let earlyout = flags & PT_EARLYOUT != 0;
    let trace = Trace::from_points(origin, endpoint);
    let mut intercepts: Vec<Intercept> = Vec::with_capacity(20);
    let valid = level.next_valid_count();

    let bmap = &level.map_data.blockmap;
    let (mut bx, mut by) = (bmap.block_x(origin.x), bmap.block_y(origin.y));
    let (bx2, by2) = (bmap.block_x(endpoint.x), bmap.block_y(endpoint.y));
    let cells = (bx2 - bx).abs() + (by2 - by).abs() + 1;

    // Parametric distance to the next cell edge on each axis, and between
    // edges
    let step_x = if trace.dxy.x < 0.0 { -1 } else { 1 };
    let step_y = if trace.dxy.y < 0.0 { -1 } else { 1 };
    let (mut t_max_x, t_delta_x) = edge_params(
        origin.x - bmap.x_origin,
        trace.dxy.x,
        bx,
        step_x,
    );
    let (mut t_max_y, t_delta_y) = edge_params(
        origin.y - bmap.y_origin,
        trace.dxy.y,
        by,
        step_y,
    );

    for _ in 0..cells {
        if flags & PT_ADDLINES != 0 {
            let lines_ok = level.block_lines_iterator(bx, by, |level, l| {
                add_line_intercepts(trace, &level.map_data.linedefs[l], &mut intercepts, earlyout)
            });
            if !lines_ok {
                // early out
                return false;
            }
        }
        if flags & PT_ADDTHINGS != 0 {
            level.block_things_iterator(bx, by, |level, id| {
                add_thing_intercept(level, trace, id, valid, &mut intercepts);
                true
            });
        }

        if bx == bx2 && by == by2 {
            break;
        }
        if t_max_x <= t_max_y {
            t_max_x += t_delta_x;
            bx += step_x;
        } else {
            t_max_y += t_delta_y;
            by += step_y;
        }
    }

    debug!("Path traverse: {} intercepts", intercepts.len());
    traverse_intercepts(level, &mut intercepts, 1.0, trav)
}

/// Trace fraction at which the first cell edge along one axis is reached,
/// and the fraction between successive edges.
fn edge_params(start: f32, delta: f32, cell: i32, step: i32) -> (f32, f32) {
    if delta == 0.0 {
        return (f32::INFINITY, f32::INFINITY);
    }
    let edge = if step > 0 {
        (cell + 1) as f32 * MAPBLOCKUNITS
    } else {
        cell as f32 * MAPBLOCKUNITS
    };
    ((edge - start) / delta, (MAPBLOCKUNITS / delta).abs())
}

/// Call `trav` on each intercept in order of `frac`, intercepts at the same
/// fraction in the order they were found. Stops with true at the first past
/// `max_frac`, or with false if `trav` does.
///
/// Doom function name `P_TraverseIntercepts`
pub fn traverse_intercepts(
    level: &mut Level,
    intercepts: &mut [Intercept],
    max_frac: f32,
    mut trav: impl FnMut(&mut Level, &Intercept) -> bool,
) -> bool {
    intercepts.sort_by(|a, b| a.frac.total_cmp(&b.frac));
    for intercept in intercepts.iter() {
        if intercept.frac > max_frac {
            return true;
        }
        if !trav(level, intercept) {
            return false;
        }
    }
    true
}

/// Check the line and add the intercept if the trace crosses it. With
/// `earlyout` a one-sided line inside the trace stops the walk.
///
/// Doom function name `PIT_AddLineIntercepts`
#[inline]
pub fn add_line_intercepts(
    trace: Trace,
    line: &LineDef,
    intercepts: &mut Vec<Intercept>,
    earlyout: bool,
) -> bool {
    // Long traces use the trace's own sides, short ones the line's, avoiding
    // precision trouble either way
    let (s1, s2) = if trace.dxy.x.abs() > 16.0 || trace.dxy.y.abs() > 16.0 {
        (point_on_side(trace, line.v1), point_on_side(trace, line.v2))
    } else {
        (
            line.point_on_side(trace.xy),
            line.point_on_side(trace.xy + trace.dxy),
        )
    };
    if s1 == s2 {
        // line isn't crossed
        return true;
    }

    let frac = intercept_vector(trace, line.trace());
    if frac < 0.0 {
        // behind source
        return true;
    }
    if earlyout && frac < 1.0 && line.backsector.is_none() {
        return false;
    }

    intercepts.push(Intercept {
        frac,
        kind: InterceptKind::Line(line.num),
    });
    true
}

/// Add the thing if the trace crosses the diagonal of its box that faces
/// the trace.
///
/// Doom function name `PIT_AddThingIntercepts`
#[inline]
pub fn add_thing_intercept(
    level: &mut Level,
    trace: Trace,
    id: ThingId,
    valid_count: usize,
    intercepts: &mut Vec<Intercept>,
) {
    let Some(thing) = level.things.get_mut(id) else {
        return;
    };
    if thing.valid_count == valid_count {
        // Already checked it
        return;
    }
    thing.valid_count = valid_count;

    let r = thing.radius;
    let (v1, v2) = if trace.dxy.x * trace.dxy.y > 0.0 {
        (
            Vec2::new(thing.xy.x - r, thing.xy.y + r),
            Vec2::new(thing.xy.x + r, thing.xy.y - r),
        )
    } else {
        (
            Vec2::new(thing.xy.x - r, thing.xy.y - r),
            Vec2::new(thing.xy.x + r, thing.xy.y + r),
        )
    };

    if point_on_side(trace, v1) == point_on_side(trace, v2) {
        return;
    }

    let frac = intercept_vector(trace, Trace::from_points(v1, v2));
    if frac < 0.0 {
        // behind source
        return;
    }
    intercepts.push(Intercept {
        frac,
        kind: InterceptKind::Thing(id),
    });
}
