//! Replay of pre-recorded drone missions.
//!
//! Missions, drone configurations and drones are loaded from a data
//! directory ([`types::loader`]), stepped over elapsed time
//! ([`types::flight`], [`types::simulation`]) and driven by a periodic timer
//! that hands updates to a presentation layer ([`types::replay`]).

pub mod types;

pub use types::flight::{Flight, StepResult, TerminalTransition};
pub use types::flight_status::FlightStatus;
pub use types::geo::LatLng;
pub use types::loader::MissionSet;
pub use types::sim_error::SimError;
pub use types::simulation::{MissionView, Simulation};
