const TICK_FREQUENCY_MILLIS: u64 = 1000;

const DEFAULT_TIME_RATE_SECONDS: i64 = 1;

const MAX_TIME_RATE_SECONDS: i64 = 3600;

pub mod geo;

pub mod mission;

pub mod drone;

pub mod energy;

pub mod loader;

pub mod flight_status;

pub mod sim_error;

pub mod flight;

pub mod simulation;

pub mod timer;

pub mod replay;

pub mod config;
