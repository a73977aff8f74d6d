use glam::Vec2;
use math::{Trace, point_on_side};
use serde::{Deserialize, Serialize};

use crate::doom_def::{ORIG_FRICTION, ORIG_FRICTION_FACTOR};

use super::secnodes::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlopeType {
    Horizontal,
    Vertical,
    Positive,
    Negative,
}

/// What the floor of a sector is made of. Anything but `Solid` is a liquid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainType {
    #[default]
    Solid,
    Water,
    Nukage,
    Blood,
    Lava,
    Slime,
}

/// The SECTORS record, at runtime.
#[derive(Default)]
pub struct Sector {
    /// An incremented "ID" of sorts.
    pub num: u32,
    pub floorheight: f32,
    pub ceilingheight: f32,
    /// Is a tag or index to patch
    pub floorpic: usize,
    /// Is a tag or index to patch
    pub ceilingpic: usize,
    pub lightlevel: usize,
    pub special: i16,
    pub tag: i16,
    pub terrain: TerrainType,
    /// Friction applied to things standing in this sector when the friction
    /// bit of `special` is set
    pub friction: f32,
    pub movefactor: f32,
    /// Boom deep water control sector
    pub heightsec: Option<usize>,

    // if == validcount, already checked
    pub validcount: usize,

    /// Head of the chain of membership nodes for every thing touching this
    /// sector
    pub touching_thinglist: Option<NodeId>,

    /// Indexes of every line bounding this sector
    pub lines: Vec<usize>,
    /// Extent of the bounding lines
    pub bbox: BBox,
    /// Blockmap cells covering `bbox`, widened by `MAXRADIUS`
    pub blockbox: BlockBox,
}

impl std::fmt::Debug for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sector")
            .field("num", &self.num)
            .field("floorheight", &self.floorheight)
            .field("ceilingheight", &self.ceilingheight)
            .field("floorpic", &self.floorpic)
            .field("ceilingpic", &self.ceilingpic)
            .finish_non_exhaustive()
    }
}

impl Sector {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num: u32,
        floorheight: f32,
        ceilingheight: f32,
        floorpic: usize,
        ceilingpic: usize,
        lightlevel: usize,
        special: i16,
        tag: i16,
    ) -> Self {
        Self {
            num,
            floorheight,
            ceilingheight,
            floorpic,
            ceilingpic,
            lightlevel,
            special,
            tag,
            friction: ORIG_FRICTION,
            movefactor: ORIG_FRICTION_FACTOR,
            ..Self::default()
        }
    }

    /// Set the friction and derive the matching move factor. Values over
    /// `ORIG_FRICTION` are icy, under are muddy.
    pub fn set_friction(&mut self, friction: f32) {
        // Boom's curve, worked in 16.16 to keep the clamp in the same place
        let fixed = (friction * 65536.0) as i64;
        let movefactor = if fixed > 0xE800 {
            ((0x10092 - fixed) * 0x70) / 0x158
        } else {
            ((fixed - 0xDB34) * 0xA) / 0x80
        };
        self.friction = friction;
        self.movefactor = movefactor.max(32) as f32 / 65536.0;
    }

    #[inline]
    pub fn is_liquid(&self) -> bool {
        self.terrain != TerrainType::Solid
    }
}

/// Blockmap cell range, inclusive
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlockBox {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BBox {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl BBox {
    pub fn new(v1: Vec2, v2: Vec2) -> Self {
        let mut bbox = BBox::default();

        if v1.x < v2.x {
            bbox.left = v1.x;
            bbox.right = v2.x;
        } else {
            bbox.left = v2.x;
            bbox.right = v1.x;
        }

        if v1.y < v2.y {
            bbox.bottom = v1.y;
            bbox.top = v2.y;
        } else {
            bbox.bottom = v2.y;
            bbox.top = v1.y;
        }

        bbox
    }

    /// The square of half-width `radius` centred on `xy`
    #[inline]
    pub fn around(xy: Vec2, radius: f32) -> Self {
        Self {
            top: xy.y + radius,
            bottom: xy.y - radius,
            left: xy.x - radius,
            right: xy.x + radius,
        }
    }

    /// An inverted box, ready to be grown with `add_point`
    pub fn cleared() -> Self {
        Self {
            top: f32::MIN,
            bottom: f32::MAX,
            left: f32::MAX,
            right: f32::MIN,
        }
    }

    /// Doom function name `M_AddToBox`
    pub fn add_point(&mut self, p: Vec2) {
        self.left = self.left.min(p.x);
        self.right = self.right.max(p.x);
        self.bottom = self.bottom.min(p.y);
        self.top = self.top.max(p.y);
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }

    /// True if the boxes share interior area. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &BBox) -> bool {
        !(self.right <= other.left
            || self.left >= other.right
            || self.top <= other.bottom
            || self.bottom >= other.top)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        (self.right - self.left) * (self.top - self.bottom)
    }
}

#[derive(Debug, Clone)]
pub struct LineDef {
    pub num: usize,
    // Vertices, from v1 to v2.
    pub v1: Vec2,
    pub v2: Vec2,
    // Precalculated v2 - v1 for side checking.
    pub delta: Vec2,
    pub flags: u32,
    pub special: i16,
    pub tag: i16,

    // Neat. Another bounding box, for the extent
    //  of the LineDef.
    pub bbox: BBox,
    // To aid move clipping.
    pub slopetype: SlopeType,

    // Front and back sector.
    pub frontsector: usize,
    pub backsector: Option<usize>,

    // if == validcount, already checked
    pub valid_count: usize,
}

impl LineDef {
    pub fn new(
        num: usize,
        v1: Vec2,
        v2: Vec2,
        flags: u32,
        special: i16,
        tag: i16,
        frontsector: usize,
        backsector: Option<usize>,
    ) -> Self {
        let delta = v2 - v1;
        let slopetype = if delta.x == 0.0 {
            SlopeType::Vertical
        } else if delta.y == 0.0 {
            SlopeType::Horizontal
        } else if delta.y / delta.x > 0.0 {
            SlopeType::Positive
        } else {
            SlopeType::Negative
        };

        Self {
            num,
            v1,
            v2,
            delta,
            flags,
            special,
            tag,
            bbox: BBox::new(v1, v2),
            slopetype,
            frontsector,
            backsector,
            valid_count: 0,
        }
    }

    /// True if the right side of the segment faces the point
    ///
    /// Doom function name `P_PointOnLineSide`
    #[inline]
    pub fn point_on_side(&self, v: Vec2) -> usize {
        point_on_side(self.trace(), v)
    }

    #[inline]
    pub fn trace(&self) -> Trace {
        Trace::new(self.v1, self.delta)
    }

    /// Sector facing the point, `None` for the back of a one-sided line
    #[inline]
    pub fn sector_on_side(&self, v: Vec2) -> Option<usize> {
        if self.point_on_side(v) == 0 {
            Some(self.frontsector)
        } else {
            self.backsector
        }
    }
}
