use argh::FromArgs;
use mapclip::{BloodMode, log};

/// Run a scenario through the movement and clipping engine
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// number of tics to run, overriding the scenario
    #[argh(option)]
    pub ticks: Option<u32>,
    /// things are infinitely tall when clipping against each other
    #[argh(option)]
    pub infinite_height: Option<bool>,
    /// missiles may hurt their shooter's own species
    #[argh(option)]
    pub infighting: Option<bool>,
    /// blood mode <none, red, all>
    #[argh(option, from_str_fn(parse_blood))]
    pub blood: Option<BloodMode>,
    /// path to the scenario TOML
    #[argh(positional)]
    pub scenario: String,
}

fn parse_blood(value: &str) -> Result<BloodMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "none" => Ok(BloodMode::None),
        "red" => Ok(BloodMode::Red),
        "all" => Ok(BloodMode::All),
        _ => Err(format!("Invalid blood mode: {value}")),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_blood;
    use mapclip::BloodMode;

    #[test]
    fn blood_modes_parse() {
        assert_eq!(parse_blood("Red"), Ok(BloodMode::Red));
        assert_eq!(parse_blood("none"), Ok(BloodMode::None));
        assert!(parse_blood("green").is_err());
    }
}
