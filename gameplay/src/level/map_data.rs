use std::error::Error;
use std::fmt;

use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::doom_def::MAXRADIUS;
use crate::level::map_defs::{BBox, BlockBox, LineDef, Sector, TerrainType};

use super::blockmap::{Blockmap, BlockmapDef};

#[derive(Debug, Clone, PartialEq)]
pub enum MapBuildError {
    NoSectors,
    NoLines,
    /// Line index, vertex index
    BadVertex(usize, usize),
    /// Line index, sector index
    BadSector(usize, usize),
    /// Line index
    ZeroLength(usize),
    /// Sector index, control sector index
    BadHeightSector(usize, usize),
    /// Sector index
    InvertedSector(usize),
}

impl Error for MapBuildError {}

impl fmt::Display for MapBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapBuildError::NoSectors => write!(f, "map has no sectors"),
            MapBuildError::NoLines => write!(f, "map has no lines"),
            MapBuildError::BadVertex(l, v) => {
                write!(f, "line {l} references missing vertex {v}")
            }
            MapBuildError::BadSector(l, s) => {
                write!(f, "line {l} references missing sector {s}")
            }
            MapBuildError::ZeroLength(l) => write!(f, "line {l} has zero length"),
            MapBuildError::BadHeightSector(s, h) => {
                write!(f, "sector {s} references missing control sector {h}")
            }
            MapBuildError::InvertedSector(s) => {
                write!(f, "sector {s} has its floor above its ceiling")
            }
        }
    }
}

fn default_light() -> usize {
    160
}

/// A sector as described by a map file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectorDef {
    pub floor: f32,
    pub ceiling: f32,
    #[serde(default)]
    pub floorpic: usize,
    #[serde(default)]
    pub ceilingpic: usize,
    #[serde(default = "default_light")]
    pub lightlevel: usize,
    #[serde(default)]
    pub special: i16,
    #[serde(default)]
    pub tag: i16,
    /// Non-default friction, applied when the special has the friction bit
    #[serde(default)]
    pub friction: Option<f32>,
    #[serde(default)]
    pub terrain: TerrainType,
    #[serde(default)]
    pub heightsec: Option<usize>,
}

/// A line as described by a map file. Sides are reduced to the sector they
/// face.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineDefDef {
    pub v1: usize,
    pub v2: usize,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub special: i16,
    #[serde(default)]
    pub tag: i16,
    pub front: usize,
    #[serde(default)]
    pub back: Option<usize>,
}

/// Everything needed to build a `MapData`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapDef {
    #[serde(default)]
    pub name: String,
    pub vertexes: Vec<[f32; 2]>,
    pub sectors: Vec<SectorDef>,
    pub lines: Vec<LineDefDef>,
    #[serde(default)]
    pub blockmap: Option<BlockmapDef>,
}

/// Validates map records and derives everything the clipping code relies on:
/// line deltas, boxes and slopes, sector line lists and block boxes, and the
/// blockmap.
pub struct MapDataBuilder {
    def: MapDef,
}

impl MapDataBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            def: MapDef {
                name: name.to_owned(),
                ..MapDef::default()
            },
        }
    }

    pub fn vertex(mut self, x: f32, y: f32) -> Self {
        self.def.vertexes.push([x, y]);
        self
    }

    pub fn sector(mut self, sector: SectorDef) -> Self {
        self.def.sectors.push(sector);
        self
    }

    pub fn line(mut self, line: LineDefDef) -> Self {
        self.def.lines.push(line);
        self
    }

    pub fn blockmap(mut self, blockmap: BlockmapDef) -> Self {
        self.def.blockmap = Some(blockmap);
        self
    }

    pub fn build(self) -> Result<MapData, MapBuildError> {
        let def = self.def;
        let name = def.name.as_str();
        if def.sectors.is_empty() {
            return Err(MapBuildError::NoSectors);
        }
        if def.lines.is_empty() {
            return Err(MapBuildError::NoLines);
        }

        let vertexes: Vec<Vec2> = def.vertexes.iter().map(|v| Vec2::new(v[0], v[1])).collect();
        info!("{}: Loaded {} vertexes", name, vertexes.len());

        let num_sectors = def.sectors.len();
        let mut sectors = Vec::with_capacity(num_sectors);
        for (i, s) in def.sectors.iter().enumerate() {
            if s.floor > s.ceiling {
                return Err(MapBuildError::InvertedSector(i));
            }
            if let Some(h) = s.heightsec {
                if h >= num_sectors {
                    return Err(MapBuildError::BadHeightSector(i, h));
                }
            }
            let mut sector = Sector::new(
                i as u32,
                s.floor,
                s.ceiling,
                s.floorpic,
                s.ceilingpic,
                s.lightlevel,
                s.special,
                s.tag,
            );
            sector.terrain = s.terrain;
            sector.heightsec = s.heightsec;
            if let Some(friction) = s.friction {
                sector.set_friction(friction);
            }
            sectors.push(sector);
        }
        info!("{}: Loaded {} sectors", name, sectors.len());

        let mut linedefs = Vec::with_capacity(def.lines.len());
        for (i, l) in def.lines.iter().enumerate() {
            let v1 = *vertexes.get(l.v1).ok_or(MapBuildError::BadVertex(i, l.v1))?;
            let v2 = *vertexes.get(l.v2).ok_or(MapBuildError::BadVertex(i, l.v2))?;
            if v1 == v2 {
                return Err(MapBuildError::ZeroLength(i));
            }
            if l.front >= num_sectors {
                return Err(MapBuildError::BadSector(i, l.front));
            }
            if let Some(back) = l.back {
                if back >= num_sectors {
                    return Err(MapBuildError::BadSector(i, back));
                }
            }
            linedefs.push(LineDef::new(
                i, v1, v2, l.flags, l.special, l.tag, l.front, l.back,
            ));
        }
        info!("{}: Loaded {} linedefs", name, linedefs.len());

        let blockmap = match def
            .blockmap
            .as_ref()
            .and_then(|b| Blockmap::from_def(b, linedefs.len()))
        {
            Some(b) => {
                info!("{}: Loaded blockmap, {} blocks", name, b.columns * b.rows);
                b
            }
            None => {
                if def.blockmap.is_some() {
                    warn!("{}: Supplied blockmap is invalid, rebuilding", name);
                }
                let b = Blockmap::build(&vertexes, &linedefs);
                info!("{}: Built blockmap, {} blocks", name, b.columns * b.rows);
                b
            }
        };

        let mut map = MapData {
            name: def.name.clone(),
            vertexes,
            linedefs,
            sectors,
            blockmap,
        };
        map.group_lines();
        Ok(map)
    }
}

impl From<MapDef> for MapDataBuilder {
    fn from(def: MapDef) -> Self {
        Self { def }
    }
}

#[derive(Default)]
pub struct MapData {
    pub name: String,
    pub vertexes: Vec<Vec2>,
    pub linedefs: Vec<LineDef>,
    pub sectors: Vec<Sector>,
    pub blockmap: Blockmap,
}

impl MapData {
    pub fn linedefs(&self) -> &[LineDef] {
        &self.linedefs
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn blockmap(&self) -> &Blockmap {
        &self.blockmap
    }

    /// Build the sector line lists, bounding boxes, and the blockmap cells
    /// each sector (plus the largest thing radius) covers.
    ///
    /// Doom function name `P_GroupLines`
    fn group_lines(&mut self) {
        for sector in self.sectors.iter_mut() {
            sector.lines.clear();
            sector.bbox = BBox::cleared();
        }

        for line in self.linedefs.iter() {
            let add = |s: &mut Sector| {
                s.lines.push(line.num);
                s.bbox.add_point(line.v1);
                s.bbox.add_point(line.v2);
            };
            add(&mut self.sectors[line.frontsector]);
            if let Some(back) = line.backsector {
                if back != line.frontsector {
                    add(&mut self.sectors[back]);
                }
            }
        }

        let bmap = &self.blockmap;
        for (i, sector) in self.sectors.iter_mut().enumerate() {
            if sector.lines.is_empty() {
                warn!("{}: Sector {} has no lines", self.name, i);
                sector.bbox = BBox::default();
                continue;
            }
            let bbox = sector.bbox;
            sector.blockbox = BlockBox {
                top: bmap.safe_block_y(bbox.top + MAXRADIUS),
                bottom: bmap.safe_block_y(bbox.bottom - MAXRADIUS),
                right: bmap.safe_block_x(bbox.right + MAXRADIUS),
                left: bmap.safe_block_x(bbox.left - MAXRADIUS),
            };
        }
    }

    /// Find the sector containing the point. A point on a line counts as being
    /// in the sector on the line's front side. When sectors nest, the smallest
    /// enclosing one wins. Points outside the map get the sector facing the
    /// closest line.
    ///
    /// Doom function name `R_PointInSubsector` (resolved to a sector)
    pub fn point_in_sector(&self, point: Vec2) -> usize {
        let mut best: Option<(usize, f32)> = None;

        for (i, sector) in self.sectors.iter().enumerate() {
            if !sector.bbox.contains(point) {
                continue;
            }
            let area = sector.bbox.area();
            if best.is_some_and(|(_, a)| a <= area) {
                continue;
            }
            if self.sector_contains(sector, i, point) {
                best = Some((i, area));
            }
        }

        if let Some((i, _)) = best {
            return i;
        }
        self.nearest_line_sector(point)
    }

    /// Crossing-number test against the sector's own boundary. Lines with the
    /// same sector on both sides are not boundary.
    fn sector_contains(&self, sector: &Sector, num: usize, point: Vec2) -> bool {
        let mut inside = false;
        for &l in &sector.lines {
            let line = &self.linedefs[l];
            if line.backsector == Some(line.frontsector) {
                continue;
            }
            let (a, b) = (line.v1, line.v2);
            // Exactly on a boundary line: the front owns it
            if line.bbox.contains(point) && (b - a).perp_dot(point - a) == 0.0 {
                return line.frontsector == num;
            }
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn nearest_line_sector(&self, point: Vec2) -> usize {
        let mut best = (f32::MAX, 0);
        for line in &self.linedefs {
            let d = line.delta;
            let t = ((point - line.v1).dot(d) / d.length_squared()).clamp(0.0, 1.0);
            let dist = point.distance_squared(line.v1 + d * t);
            if dist < best.0 {
                let sector = line.sector_on_side(point).unwrap_or(line.frontsector);
                best = (dist, sector);
            }
        }
        best.1
    }
}
