#![doc = include_str!("../../README.md")]

mod cli;
mod config;
mod scenario;

use cli::*;
use simplelog::TermLogger;
use std::error::Error;
use std::path::PathBuf;

use crate::config::UserConfig;
use crate::scenario::{Scenario, run};
use mapclip::log::{self, info};

const BASE_DIR: &str = "mapclip/";

/// The main `game-exe` crate should take care of initialising a few things
fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load();
    user_config.sync_cli(&mut options);
    user_config.write();

    let path: PathBuf = options.scenario.clone().into();
    let scenario = Scenario::load(&path)?;
    let ticks = options
        .ticks
        .or(scenario.ticks)
        .unwrap_or(user_config.ticks);

    let (mut level, ids) = scenario.build(user_config.clip.clone())?;
    info!("Running {ticks} tics");
    for out in run(&mut level, &ids, ticks) {
        println!(
            "{:>3} {:<14} x {:>9.3} y {:>9.3} z {:>8.3} health {:>5} sectors {:?}",
            out.index,
            format!("{:?}", out.kind),
            out.xy.x,
            out.xy.y,
            out.z,
            out.health,
            out.sectors
        );
    }
    Ok(())
}
