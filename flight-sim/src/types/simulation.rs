use super::flight::{Flight, StepResult};
use super::flight_status::FlightStatus;
use super::geo::LatLng;
use super::loader::MissionSet;
use super::sim_error::SimError;

/// What the presentation layer needs to draw a mission before the replay
/// starts: a marker on the takeoff waypoint and the full path.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionView {
    pub name: String,
    pub marker: LatLng,
    pub label: &'static str,
    pub path: Vec<LatLng>,
}

/// Replay state of every loaded mission, indexed in load order.
///
/// The simulation is pure: it only computes positions and transitions and
/// leaves drawing them to the caller.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    flights: Vec<Flight>,
}

impl Simulation {
    pub fn new(flights: Vec<Flight>) -> Self {
        Simulation { flights }
    }

    /// Builds the replay state of every entry of a loaded data directory.
    pub fn from_mission_set(set: MissionSet) -> Result<Self, SimError> {
        let flights = set
            .entries
            .into_iter()
            .map(|entry| Flight::new(&entry.key, entry.mission, &entry.config, entry.drone))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Simulation { flights })
    }

    /// Initial marker and rendered path of each mission.
    pub fn initialize(&self) -> Vec<MissionView> {
        self.flights
            .iter()
            .map(|flight| MissionView {
                name: flight.name().to_string(),
                marker: flight.position,
                label: flight.status.as_str(),
                path: flight.mission.path(),
            })
            .collect()
    }

    /// Advances a single mission.
    pub fn step(&mut self, index: usize, elapsed: f64) -> Result<StepResult, SimError> {
        self.flights
            .get_mut(index)
            .map(|flight| flight.step(elapsed))
            .ok_or(SimError::MissionNotFound(index))
    }

    /// Advances every mission that is still flying, in index order.
    pub fn tick(&mut self, elapsed: f64) -> Vec<(usize, StepResult)> {
        self.flights
            .iter_mut()
            .enumerate()
            .filter(|(_, flight)| !flight.status.is_terminal())
            .map(|(index, flight)| (index, flight.step(elapsed)))
            .collect()
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// True once no mission can produce further updates.
    pub fn is_finished(&self) -> bool {
        self.flights.iter().all(|flight| flight.status.is_terminal())
    }

    pub fn count_with_status(&self, status: FlightStatus) -> usize {
        self.flights.iter().filter(|f| f.status == status).count()
    }
}
