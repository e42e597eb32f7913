use clap::Parser;

use crate::constants;

/// Runtime configuration for a simulation run.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "pacman-sim", version, about = "Run a seeded headless Pac-Man simulation")]
pub struct SimConfig {
    /// Seed for the frightened-mode random choices
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Level the first round starts on (1-based)
    #[arg(
        long = "level",
        value_name = "LEVEL",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub start_level: u32,
    /// Lives at the start of the game
    #[arg(long, default_value_t = constants::LIVES_START)]
    pub lives: u32,
    /// Frames the player freezes after eating a pellet
    #[arg(long, value_name = "FRAMES", default_value_t = constants::PELLET_PAUSE_FRAMES)]
    pub pellet_pause_frames: u32,
    /// Frames the player freezes after eating a power pellet
    #[arg(long, value_name = "FRAMES", default_value_t = constants::POWER_PAUSE_FRAMES)]
    pub power_pause_frames: u32,
    /// Seconds without a pellet before a waiting pursuer is forced out
    #[arg(long = "house-stall", value_name = "SECONDS", default_value_t = constants::HOUSE_STALL_SECONDS, value_parser = parse_seconds)]
    pub house_stall_timeout: f32,
    /// Length of a headless run in simulated seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 60.0, value_parser = parse_seconds)]
    pub seconds: f32,
    /// Pace the headless loop to wall-clock time
    #[arg(long)]
    pub realtime: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            start_level: 1,
            lives: constants::LIVES_START,
            pellet_pause_frames: constants::PELLET_PAUSE_FRAMES,
            power_pause_frames: constants::POWER_PAUSE_FRAMES,
            house_stall_timeout: constants::HOUSE_STALL_SECONDS,
            seconds: 60.0,
            realtime: false,
        }
    }
}

/// Accepts a finite, non-negative number of seconds.
fn parse_seconds(value: &str) -> Result<f32, String> {
    let seconds: f32 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("`{value}` must be a finite, non-negative number of seconds"));
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_arguments() {
        assert_eq!(SimConfig::try_parse_from(["pacman-sim"]).unwrap(), SimConfig::default());
    }

    #[test]
    fn test_parses_all_flags() {
        let config = SimConfig::try_parse_from([
            "pacman-sim",
            "--seed",
            "42",
            "--level",
            "3",
            "--lives",
            "2",
            "--seconds",
            "12.5",
            "--house-stall",
            "5",
            "--realtime",
        ])
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.start_level, 3);
        assert_eq!(config.lives, 2);
        assert_eq!(config.seconds, 12.5);
        assert_eq!(config.house_stall_timeout, 5.0);
        assert!(config.realtime);
    }

    #[test]
    fn test_rejects_bad_input() {
        let kind = |args: &[&str]| SimConfig::try_parse_from(args.iter().copied()).unwrap_err().kind();

        assert!(SimConfig::try_parse_from(["pacman-sim", "--seed"]).is_err());
        assert_eq!(kind(&["pacman-sim", "--lives", "many"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["pacman-sim", "--fast"]), ErrorKind::UnknownArgument);
        assert_eq!(kind(&["pacman-sim", "--level", "0"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["pacman-sim", "--seconds=-1"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["pacman-sim", "--seconds", "inf"]), ErrorKind::ValueValidation);
    }
}
