use std::env;
use std::path::PathBuf;

use super::sim_error::SimError;
use super::{DEFAULT_TIME_RATE_SECONDS, MAX_TIME_RATE_SECONDS, TICK_FREQUENCY_MILLIS};

pub const TICK_MILLIS_VAR: &str = "REPLAY_TICK_MILLIS";
pub const TIME_RATE_VAR: &str = "REPLAY_TIME_RATE";

/// Runtime settings of the console replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    pub data_dir: PathBuf,
    pub log_dir: Option<PathBuf>,
    /// Real milliseconds between ticks.
    pub tick_millis: u64,
    /// Simulated seconds advanced per tick.
    pub time_rate: i64,
}

impl ReplayConfig {
    /// Reads `<data_dir> [log_dir]` from the command line (program name
    /// included) and the tick settings from the environment.
    pub fn from_args(args: &[String]) -> Result<Self, SimError> {
        Self::from_parts(
            args,
            env::var(TICK_MILLIS_VAR).ok(),
            env::var(TIME_RATE_VAR).ok(),
        )
    }

    fn from_parts(
        args: &[String],
        tick_millis: Option<String>,
        time_rate: Option<String>,
    ) -> Result<Self, SimError> {
        if args.len() < 2 || args.len() > 3 {
            return Err(SimError::InvalidConfig(
                "Usage: flight-sim <data_dir> [log_dir]".to_string(),
            ));
        }

        let tick_millis = match tick_millis {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .ok_or_else(|| {
                    SimError::InvalidConfig(format!(
                        "{} must be a positive integer",
                        TICK_MILLIS_VAR
                    ))
                })?,
            None => TICK_FREQUENCY_MILLIS,
        };

        let time_rate = match time_rate {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|rate| (1..=MAX_TIME_RATE_SECONDS).contains(rate))
                .ok_or_else(|| SimError::InvalidDuration(value.clone()))?,
            None => DEFAULT_TIME_RATE_SECONDS,
        };

        Ok(ReplayConfig {
            data_dir: PathBuf::from(&args[1]),
            log_dir: args.get(2).map(PathBuf::from),
            tick_millis,
            time_rate,
        })
    }
}
