//! The uniform grid used as the broad phase for every clipping query. Each
//! cell holds the lines passing through it and the head of the chain of things
//! whose origin lies in it.

use glam::Vec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::doom_def::MAPBLOCKUNITS;
use crate::thing::ThingId;

use super::map_defs::LineDef;

/// A prebuilt blockmap as shipped with a map. Cells are row-major, each a list
/// of line indexes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockmapDef {
    pub x_origin: f32,
    pub y_origin: f32,
    pub columns: i32,
    pub rows: i32,
    pub cells: Vec<Vec<usize>>,
}

#[derive(Debug, Default)]
pub struct Blockmap {
    pub x_origin: f32,
    pub y_origin: f32,
    pub columns: i32,
    pub rows: i32,
    lines: Vec<Vec<usize>>,
    things: Vec<Option<ThingId>>,
}

impl Blockmap {
    /// Generate a blockmap from the level geometry. Each line is walked from
    /// the cell of its first vertex to the cell of its second, stepping to
    /// whichever neighbouring cell the line passes into next.
    ///
    /// Doom function name `P_CreateBlockMap`
    pub fn build(vertexes: &[Vec2], lines: &[LineDef]) -> Self {
        let mut minx = i32::MAX;
        let mut miny = i32::MAX;
        let mut maxx = i32::MIN;
        let mut maxy = i32::MIN;
        for v in vertexes {
            let (x, y) = (v.x.floor() as i32, v.y.floor() as i32);
            minx = minx.min(x);
            maxx = maxx.max(x);
            miny = miny.min(y);
            maxy = maxy.max(y);
        }
        if vertexes.is_empty() {
            (minx, miny, maxx, maxy) = (0, 0, 0, 0);
        }
        minx -= 8;
        miny -= 8;
        maxx += 8;
        maxy += 8;

        let unit = MAPBLOCKUNITS as i32;
        let columns = (maxx - minx) / unit + 1;
        let rows = (maxy - miny) / unit + 1;
        let total = (columns * rows) as usize;
        let mut cells: Vec<Vec<usize>> = vec![Vec::new(); total];

        for (i, line) in lines.iter().enumerate() {
            let x = line.v1.x.floor() as i32 - minx;
            let y = line.v1.y.floor() as i32 - miny;
            let mut adx = line.delta.x.trunc() as i32;
            let mut ady = line.delta.y.trunc() as i32;
            let dx = adx.signum();
            let mut dy = ady.signum();

            // Positive prefers a step along y, negative a step along x
            let mut diff = if adx == 0 {
                1
            } else if ady == 0 {
                -1
            } else {
                ady = ady.abs();
                adx = adx.abs();
                let to_x_edge = (x / unit) * unit + if dx > 0 { unit - 1 } else { 0 } - x;
                let to_y_edge = (y / unit) * unit + if dy > 0 { unit - 1 } else { 0 } - y;
                to_x_edge * ady * dx - to_y_edge * adx * dy
            };

            let mut b = (y / unit) * columns + x / unit;
            let end_x = (line.v2.x.floor() as i32 - minx) / unit;
            let end_y = (line.v2.y.floor() as i32 - miny) / unit;
            let bend = end_y * columns + end_x;

            dy *= columns;
            adx *= unit;
            ady *= unit;

            while b >= 0 && (b as usize) < total {
                cells[b as usize].push(i);
                if b == bend {
                    break;
                }
                if diff < 0 {
                    diff += ady;
                    b += dx;
                } else {
                    diff -= adx;
                    b += dy;
                }
            }
        }

        // Lines are listed last added first
        for cell in cells.iter_mut() {
            cell.reverse();
        }

        debug!("Built blockmap: {columns}x{rows} cells");
        Self {
            x_origin: minx as f32,
            y_origin: miny as f32,
            columns,
            rows,
            lines: cells,
            things: vec![None; total],
        }
    }

    /// Use a supplied blockmap if it is consistent with the map, `None` if it
    /// is not and one must be built.
    ///
    /// Doom function name `P_VerifyBlockMap`
    pub fn from_def(def: &BlockmapDef, num_lines: usize) -> Option<Self> {
        if def.columns <= 0 || def.rows <= 0 {
            warn!("Blockmap has no cells");
            return None;
        }
        let total = (def.columns * def.rows) as usize;
        if def.cells.len() != total {
            warn!(
                "Blockmap has {} cells, expected {}",
                def.cells.len(),
                total
            );
            return None;
        }
        for (n, cell) in def.cells.iter().enumerate() {
            if let Some(bad) = cell.iter().find(|l| **l >= num_lines) {
                warn!("Blockmap cell {n} references missing line {bad}");
                return None;
            }
        }
        Some(Self {
            x_origin: def.x_origin,
            y_origin: def.y_origin,
            columns: def.columns,
            rows: def.rows,
            lines: def.cells.clone(),
            things: vec![None; total],
        })
    }

    /// Cell column of a world x, may be out of the grid
    #[inline]
    pub fn block_x(&self, x: f32) -> i32 {
        ((x - self.x_origin) / MAPBLOCKUNITS).floor() as i32
    }

    /// Cell row of a world y, may be out of the grid
    #[inline]
    pub fn block_y(&self, y: f32) -> i32 {
        ((y - self.y_origin) / MAPBLOCKUNITS).floor() as i32
    }

    /// Cell column clamped into the grid
    ///
    /// Doom function name `P_GetSafeBlockX`
    #[inline]
    pub fn safe_block_x(&self, x: f32) -> i32 {
        self.block_x(x).clamp(0, (self.columns - 1).max(0))
    }

    /// Cell row clamped into the grid
    ///
    /// Doom function name `P_GetSafeBlockY`
    #[inline]
    pub fn safe_block_y(&self, y: f32) -> i32 {
        self.block_y(y).clamp(0, (self.rows - 1).max(0))
    }

    #[inline]
    pub fn in_bounds(&self, bx: i32, by: i32) -> bool {
        bx >= 0 && by >= 0 && bx < self.columns && by < self.rows
    }

    #[inline]
    fn cell(&self, bx: i32, by: i32) -> Option<usize> {
        if self.in_bounds(bx, by) {
            Some((by * self.columns + bx) as usize)
        } else {
            None
        }
    }

    /// Cell index for a world point, `None` outside the grid
    #[inline]
    pub fn cell_of(&self, xy: Vec2) -> Option<usize> {
        self.cell(self.block_x(xy.x), self.block_y(xy.y))
    }

    pub fn lines_in(&self, bx: i32, by: i32) -> &[usize] {
        match self.cell(bx, by) {
            Some(c) => &self.lines[c],
            None => &[],
        }
    }

    pub fn thing_head(&self, bx: i32, by: i32) -> Option<ThingId> {
        self.cell(bx, by).and_then(|c| self.things[c])
    }

    pub(crate) fn thing_head_at(&self, cell: usize) -> Option<ThingId> {
        self.things.get(cell).copied().flatten()
    }

    pub(crate) fn set_thing_head(&mut self, cell: usize, head: Option<ThingId>) {
        if let Some(slot) = self.things.get_mut(cell) {
            *slot = head;
        }
    }

    /// Forget every thing link, used when a level is torn down
    pub(crate) fn clear_things(&mut self) {
        self.things.iter_mut().for_each(|t| *t = None);
    }
}

#[cfg(test)]
mod tests {
    use super::{Blockmap, BlockmapDef};
    use crate::level::map_defs::LineDef;
    use glam::Vec2;

    fn line(v1: Vec2, v2: Vec2) -> LineDef {
        LineDef::new(0, v1, v2, 0, 0, 0, 0, None)
    }

    #[test]
    fn build_covers_every_cell_a_line_crosses() {
        let verts = [Vec2::new(0.0, 0.0), Vec2::new(512.0, 300.0)];
        let lines = [line(verts[0], verts[1])];
        let bmap = Blockmap::build(&verts, &lines);
        assert_eq!(bmap.x_origin, -8.0);
        assert_eq!(bmap.y_origin, -8.0);
        assert_eq!(bmap.columns, 5);
        assert_eq!(bmap.rows, 3);

        // Every point sampled along the line must be in a cell listing it
        for i in 0..=100 {
            let p = verts[0].lerp(verts[1], i as f32 / 100.0);
            let bx = bmap.block_x(p.x);
            let by = bmap.block_y(p.y);
            assert!(bmap.lines_in(bx, by).contains(&0), "missing at {p}");
        }
        // And the far corner does not
        assert!(bmap.lines_in(4, 0).is_empty());
    }

    #[test]
    fn axis_lines_stay_in_their_row() {
        let verts = [Vec2::new(0.0, 0.0), Vec2::new(400.0, 0.0), Vec2::new(0.0, 400.0)];
        let lines = [line(verts[0], verts[1]), line(verts[0], verts[2])];
        let bmap = Blockmap::build(&verts, &lines);
        for bx in 0..bmap.columns {
            assert!(bmap.lines_in(bx, 0).contains(&0));
        }
        for by in 1..bmap.rows {
            assert!(!bmap.lines_in(1, by).contains(&0));
            assert!(bmap.lines_in(0, by).contains(&1));
        }
    }

    #[test]
    fn safe_blocks_clamp() {
        let verts = [Vec2::new(0.0, 0.0), Vec2::new(256.0, 256.0)];
        let bmap = Blockmap::build(&verts, &[]);
        assert_eq!(bmap.safe_block_x(-10_000.0), 0);
        assert_eq!(bmap.safe_block_y(10_000.0), bmap.rows - 1);
        assert!(bmap.lines_in(-1, 0).is_empty());
        assert!(bmap.thing_head(99, 99).is_none());
    }

    #[test]
    fn reject_bad_lump() {
        let def = BlockmapDef {
            x_origin: 0.0,
            y_origin: 0.0,
            columns: 2,
            rows: 1,
            cells: vec![vec![0], vec![3]],
        };
        assert!(Blockmap::from_def(&def, 2).is_none());
        assert!(Blockmap::from_def(&def, 4).is_some());
        let short = BlockmapDef {
            cells: vec![vec![0]],
            ..def
        };
        assert!(Blockmap::from_def(&short, 4).is_none());
    }
}
