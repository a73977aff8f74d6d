//! User configuration options.

use crate::{BASE_DIR, CLIOptions};
use dirs::config_dir;
use mapclip::ClipConfig;
use mapclip::log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::{File, OpenOptions, create_dir_all},
    io::{Read, Seek, Write},
    path::PathBuf,
};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> Option<PathBuf> {
    let mut dir = config_dir()?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        if let Err(e) = create_dir_all(&dir) {
            error!(target: LOG_TAG, "Couldn't create {dir:?}: {e}");
            return None;
        }
    }
    dir.push("user.toml");
    Some(dir)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Tics to run when a scenario doesn't say
    pub ticks: u32,
    pub clip: ClipConfig,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            ticks: 35,
            clip: ClipConfig::default(),
        }
    }
}

impl UserConfig {
    /// `load` will attempt to read the config, falling back to defaults if
    /// there is nowhere to keep one
    pub fn load() -> Self {
        let Some(path) = get_cfg_file() else {
            warn!(target: LOG_TAG, "No user config dir, using defaults");
            return UserConfig::default();
        };

        let mut file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) => {
                warn!(target: LOG_TAG, "Couldn't open {path:?}, {e}");
                return UserConfig::default();
            }
        };
        let mut buf = String::new();
        if let Ok(read_len) = file.read_to_string(&mut buf) {
            if read_len == 0 {
                return UserConfig::create_default(&mut file);
            } else {
                if let Ok(data) = toml::from_str(&buf) {
                    info!(target: LOG_TAG, "Loaded user config file");
                    return data;
                }
                warn!("Could not deserialise {:?} recreating config", path);
            }
        }
        UserConfig::create_default(&mut file)
    }

    fn create_default(file: &mut File) -> Self {
        let config = UserConfig::default();
        match toml::to_string_pretty(&config) {
            Ok(data) => {
                // a config that failed to parse is replaced, not appended to
                let written = file
                    .set_len(0)
                    .and_then(|_| file.rewind())
                    .and_then(|_| file.write_all(data.as_bytes()));
                if let Err(e) = written {
                    error!(target: LOG_TAG, "Could not write default config: {e}");
                } else {
                    info!("Created default user config file");
                }
            }
            Err(e) => error!(target: LOG_TAG, "Could not serialise default config: {e}"),
        }
        config
    }

    pub fn write(&self) {
        let Some(path) = get_cfg_file() else {
            return;
        };
        let data = match toml::to_string_pretty(self) {
            Ok(data) => data,
            Err(e) => {
                error!(target: LOG_TAG, "Could not serialise config: {e}");
                return;
            }
        };
        match File::create(&path) {
            Ok(mut file) => file
                .write_all(data.as_bytes())
                .unwrap_or_else(|err| error!("Could not write config: {}", err)),
            Err(e) => error!("Couldn't overwrite {path:?}: {e}"),
        }
    }

    /// Sync the CLI options and UserOptions with each other. Tunables given on
    /// the command line are remembered for the next run.
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!("Checking CLI options");

        if let Some(f) = cli.infinite_height {
            if f != self.clip.infinite_height {
                self.clip.infinite_height = f;
                info!("Infinitely tall things: {f}");
            }
        } else {
            cli.infinite_height = Some(self.clip.infinite_height);
        }

        if let Some(f) = cli.infighting {
            if f != self.clip.species_infighting {
                self.clip.species_infighting = f;
            }
        } else {
            cli.infighting = Some(self.clip.species_infighting);
        }

        if let Some(blood) = cli.blood {
            if blood != self.clip.blood {
                self.clip.blood = blood;
            }
        } else {
            cli.blood = Some(self.clip.blood);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UserConfig;
    use crate::CLIOptions;
    use mapclip::BloodMode;

    fn cli() -> CLIOptions {
        CLIOptions {
            verbose: None,
            ticks: None,
            infinite_height: None,
            infighting: None,
            blood: None,
            scenario: "room.toml".to_owned(),
        }
    }

    #[test]
    fn cli_overrides_and_fills_in() {
        let mut config = UserConfig::default();
        let mut options = CLIOptions {
            blood: Some(BloodMode::Red),
            ..cli()
        };
        config.sync_cli(&mut options);
        assert_eq!(config.clip.blood, BloodMode::Red);
        assert_eq!(options.infinite_height, Some(false));
        assert_eq!(options.infighting, Some(false));
    }

    #[test]
    fn config_survives_toml() {
        let mut config = UserConfig::default();
        config.ticks = 70;
        config.clip.corpses_nudge = false;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: UserConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
        let partial: UserConfig = toml::from_str("ticks = 10").unwrap();
        assert_eq!(partial.ticks, 10);
        assert_eq!(partial.clip, mapclip::ClipConfig::default());
    }
}
