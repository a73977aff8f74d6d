//! Scenario files: a map, the things in it, and how long to let them move.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use mapclip::doom_def::ONFLOORZ;
use mapclip::glam::Vec2;
use mapclip::log::{debug, info};
use mapclip::{
    ClipConfig, DefaultHooks, Level, LineDefDef, MapBuildError, MapDataBuilder, MapDef,
    MapObjKind, SectorDef, ThingId,
};
use serde::Deserialize;

#[derive(Debug)]
pub enum ScenarioError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Map(MapBuildError),
    /// A thing placed outside every sector's reach
    ThingOffMap(usize),
}

impl Error for ScenarioError {}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io(e) => write!(f, "could not read scenario: {e}"),
            ScenarioError::Parse(e) => write!(f, "bad scenario: {e}"),
            ScenarioError::Map(e) => write!(f, "bad map: {e}"),
            ScenarioError::ThingOffMap(i) => write!(f, "thing {i} is outside the map"),
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e)
    }
}

impl From<toml::de::Error> for ScenarioError {
    fn from(e: toml::de::Error) -> Self {
        ScenarioError::Parse(e)
    }
}

impl From<MapBuildError> for ScenarioError {
    fn from(e: MapBuildError) -> Self {
        ScenarioError::Map(e)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThingDef {
    pub kind: MapObjKind,
    pub x: f32,
    pub y: f32,
    /// Height, or on the floor if missing
    #[serde(default)]
    pub z: Option<f32>,
    #[serde(default)]
    pub mom: [f32; 3],
    /// Attach a player to this thing
    #[serde(default)]
    pub player: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub vertexes: Vec<[f32; 2]>,
    pub sectors: Vec<SectorDef>,
    pub lines: Vec<LineDefDef>,
    #[serde(default)]
    pub things: Vec<ThingDef>,
    #[serde(default)]
    pub ticks: Option<u32>,
    /// The flat used for sky, so missiles can vanish into it
    #[serde(default)]
    pub sky: Option<usize>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(text)?)
    }

    /// Build the level and place every thing in it
    pub fn build(&self, config: ClipConfig) -> Result<(Level, Vec<ThingId>), ScenarioError> {
        let map = MapDataBuilder::from(MapDef {
            name: self.name.clone(),
            vertexes: self.vertexes.clone(),
            sectors: self.sectors.clone(),
            lines: self.lines.clone(),
            blockmap: None,
        })
        .build()?;

        let mut level = Level::new(map, config);
        level.sky_num = self.sky;
        let mut ids = Vec::with_capacity(self.things.len());
        for (i, def) in self.things.iter().enumerate() {
            let xy = Vec2::new(def.x, def.y);
            if level.map_data.blockmap.cell_of(xy).is_none() {
                return Err(ScenarioError::ThingOffMap(i));
            }
            let id = level.spawn_map_object(xy, def.z.unwrap_or(ONFLOORZ), def.kind);
            let thing = &mut level.things[id];
            thing.momxy = Vec2::new(def.mom[0], def.mom[1]);
            thing.momz = def.mom[2];
            if def.player {
                level.add_player(id);
            }
            ids.push(id);
        }
        info!(
            "Scenario {} ready: {} sectors, {} lines, {} things",
            self.name,
            level.map_data.sectors.len(),
            level.map_data.linedefs.len(),
            ids.len()
        );
        Ok((level, ids))
    }
}

/// Where a thing ended up
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub index: usize,
    pub kind: MapObjKind,
    pub xy: Vec2,
    pub z: f32,
    pub health: i32,
    pub sectors: Vec<usize>,
}

/// Run every thing for `ticks` tics. Things spawned along the way (blood,
/// puffs) move too. Returns the state of the scenario's own things, those
/// removed are left out.
pub fn run(level: &mut Level, ids: &[ThingId], ticks: u32) -> Vec<Outcome> {
    let mut hooks = DefaultHooks::new();
    for _ in 0..ticks {
        for id in level.things.ids() {
            level.thing_movement(id, &mut hooks);
        }
        level.level_time += 1;
    }
    debug!(
        "{} lines crossed, {} sounds after {ticks} tics",
        hooks.crossed.len(),
        hooks.sounds.len()
    );

    ids.iter()
        .enumerate()
        .filter_map(|(index, &id)| {
            let thing = level.things.get(id)?;
            Some(Outcome {
                index,
                kind: thing.kind,
                xy: thing.xy,
                z: thing.z,
                health: thing.health,
                sectors: level.touching_sectors(id),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Scenario, ScenarioError, run};
    use mapclip::ClipConfig;
    use mapclip::MapObjKind;

    const ROOM: &str = r#"
        name = "room"
        ticks = 20
        vertexes = [[-128.0, 128.0], [128.0, 128.0], [128.0, -128.0], [-128.0, -128.0]]

        [[sectors]]
        floor = 0.0
        ceiling = 128.0

        [[lines]]
        v1 = 0
        v2 = 1
        front = 0
        flags = 1

        [[lines]]
        v1 = 1
        v2 = 2
        front = 0
        flags = 1

        [[lines]]
        v1 = 2
        v2 = 3
        front = 0
        flags = 1

        [[lines]]
        v1 = 3
        v2 = 0
        front = 0
        flags = 1

        [[things]]
        kind = "MT_PLAYER"
        x = 0.0
        y = 0.0
        mom = [20.0, 0.0, 0.0]
        player = true

        [[things]]
        kind = "MT_BARREL"
        x = -64.0
        y = 64.0
        z = 40.0
    "#;

    #[test]
    fn runs_a_room() {
        let scenario = Scenario::parse(ROOM).unwrap();
        assert_eq!(scenario.ticks, Some(20));
        let (mut level, ids) = scenario.build(ClipConfig::default()).unwrap();
        let out = run(&mut level, &ids, 20);
        assert_eq!(out.len(), 2);

        let player = &out[0];
        assert_eq!(player.kind, MapObjKind::MT_PLAYER);
        // Stopped by the east wall
        assert!(player.xy.x > 60.0 && player.xy.x + 16.0 <= 128.0);
        assert_eq!(player.sectors, vec![0]);

        // The barrel dropped to the floor
        assert_eq!(out[1].z, 0.0);
    }

    #[test]
    fn broken_scenarios_are_reported() {
        let bad = ROOM.replace("v2 = 2", "v2 = 9");
        let scenario = Scenario::parse(&bad).unwrap();
        assert!(matches!(
            scenario.build(ClipConfig::default()),
            Err(ScenarioError::Map(_))
        ));

        let off = ROOM.replace("x = -64.0", "x = -6400.0");
        let scenario = Scenario::parse(&off).unwrap();
        assert!(matches!(
            scenario.build(ClipConfig::default()),
            Err(ScenarioError::ThingOffMap(1))
        ));

        assert!(matches!(Scenario::parse("ticks = 1"), Err(ScenarioError::Parse(_))));
    }
}
