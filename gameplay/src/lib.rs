//! Movement and collision clipping for things in a sector-based map: where a
//! thing may stand, how it slides off walls, what a shot or explosion hits,
//! and which sectors each thing overlaps.
//!
//! The game around it (damage, pickups, line specials, sound) is reached
//! through the `LevelHooks` trait.
#![allow(clippy::new_without_default)]

pub mod config;
pub mod doom_def;
pub mod env;
#[rustfmt::skip]
pub mod info;
pub mod level;
pub mod player;
pub mod thing;
pub(crate) mod utilities;

pub use config::{BloodMode, ClipConfig};
pub use env::{DefaultHooks, LevelHooks, SfxName};
pub use glam;
pub use info::{MapObjKind, StateNum};
pub use level::{
    Level,
    flags::LineDefFlags,
    map_data::{LineDefDef, MapBuildError, MapData, MapDataBuilder, MapDef, SectorDef},
    map_defs::{BBox, LineDef, Sector, TerrainType},
};
pub use log;
pub use math::{Angle, RandomSource, RndTable};
pub use player::Player;
pub use thing::{
    AimResult, ClipContext, MapObjFlag, MapObjFlag2, MapObject, MoveOutcome, ThingAlloc, ThingId,
};
pub use utilities::{Intercept, InterceptKind, PT_ADDLINES, PT_ADDTHINGS, PT_EARLYOUT, path_traverse};
