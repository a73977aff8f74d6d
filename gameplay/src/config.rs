//! Gameplay tunables. The movement code reads these where the classic engines
//! read console variables.

use serde::{Deserialize, Serialize};

/// How much blood is spawned by hits and crushers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodMode {
    None,
    /// Every bleeder uses plain red blood
    Red,
    /// Each bleeder uses its own blood kind
    #[default]
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    /// Things are infinitely tall for thing-vs-thing clipping
    pub infinite_height: bool,
    /// Missiles may hurt the shooter's own species
    pub species_infighting: bool,
    /// Walking over a corpse gives it a small shove
    pub corpses_nudge: bool,
    /// Corpses crushed to gibs may be flipped
    pub corpses_mirrored: bool,
    /// Things with clipped feet stay on the liquid floor when it moves
    pub liquid_bob: bool,
    /// Monsters may telefrag, normally only on the boss level
    pub telefrag_boss_level: bool,
    pub blood: BloodMode,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            infinite_height: false,
            species_infighting: false,
            corpses_nudge: true,
            corpses_mirrored: true,
            liquid_bob: true,
            telefrag_boss_level: false,
            blood: BloodMode::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BloodMode, ClipConfig};

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg: ClipConfig = toml::from_str("infinite_height = true\nblood = \"Red\"").unwrap();
        assert!(cfg.infinite_height);
        assert!(cfg.corpses_nudge);
        assert_eq!(cfg.blood, BloodMode::Red);
    }
}
