use super::drone::{Drone, DroneConfig};
use super::flight_status::FlightStatus;
use super::geo::{interpolate, LatLng};
use super::mission::{Mission, Point};
use super::sim_error::SimError;

/// One-time switch of a mission into a terminal status.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalTransition {
    pub status: FlightStatus,
    pub mission_name: String,
}

impl TerminalTransition {
    pub fn label(&self) -> &'static str {
        self.status.as_str()
    }
}

/// Outcome of advancing a mission to a given elapsed time.
///
/// An empty result (no position and no transition) means "no update".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepResult {
    pub new_position: Option<LatLng>,
    pub terminal_transition: Option<TerminalTransition>,
}

impl StepResult {
    pub fn is_empty(&self) -> bool {
        self.new_position.is_none() && self.terminal_transition.is_none()
    }

    fn moved(position: LatLng) -> Self {
        StepResult {
            new_position: Some(position),
            terminal_transition: None,
        }
    }
}

/// Replay state of a single mission: the recorded mission, the energy
/// available to the drone flying it, and where the marker currently is.
#[derive(Debug, Clone)]
pub struct Flight {
    pub key: String,
    pub mission: Mission,
    pub drone: Drone,
    pub total_energy_capacity: f64,
    pub position: LatLng,
    pub status: FlightStatus,
}

impl Flight {
    /// Creates the replay state of `mission` with the marker on its takeoff
    /// waypoint.
    pub fn new(
        key: &str,
        mission: Mission,
        config: &DroneConfig,
        drone: Drone,
    ) -> Result<Self, SimError> {
        mission.validate()?;

        let total_energy_capacity = config.total_energy_capacity();
        if !total_energy_capacity.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "configuration {} has a non-finite energy capacity ({})",
                key, total_energy_capacity
            )));
        }

        let position = mission
            .first_point()
            .map(Point::lat_lng)
            .ok_or_else(|| SimError::invalid_mission(&mission.name, "mission has no waypoints"))?;

        Ok(Flight {
            key: key.to_string(),
            mission,
            drone,
            total_energy_capacity,
            position,
            status: FlightStatus::Flying,
        })
    }

    pub fn name(&self) -> &str {
        &self.mission.name
    }

    /// Advances the flight to `elapsed` seconds since the replay started.
    ///
    /// Once the flight reached a terminal status this always returns an empty
    /// result, so the transition is reported exactly once.
    pub fn step(&mut self, elapsed: f64) -> StepResult {
        if self.status.is_terminal() {
            return StepResult::default();
        }

        let (first, last) = match (self.mission.first_point(), self.mission.last_point()) {
            (Some(first), Some(last)) => (first.clone(), last.clone()),
            _ => return StepResult::default(),
        };

        // Waiting for takeoff.
        if elapsed < first.end_time {
            if self.exceeds_capacity(&first) {
                return self.terminate(FlightStatus::LandedHalfway, None);
            }
            return StepResult::default();
        }

        let mission_over = elapsed >= self.mission.end_time;
        if mission_over || last.end_time <= elapsed {
            let position = last.lat_lng();
            if mission_over {
                return self.terminate(FlightStatus::FlewProperly, Some(position));
            }
            // Trajectory done, mission not: hold on the last waypoint.
            self.position = position;
            return StepResult::moved(position);
        }

        let leg = self
            .mission
            .points
            .windows(2)
            .find(|pair| pair[0].end_time <= elapsed && elapsed < pair[1].end_time);

        let (prev, curr) = match leg {
            Some(pair) => (pair[0].clone(), pair[1].clone()),
            None => return StepResult::default(),
        };

        let fraction = (elapsed - prev.end_time) / (curr.end_time - prev.end_time);
        let position = interpolate(prev.lat_lng(), curr.lat_lng(), fraction);

        if self.exceeds_capacity(&curr) {
            return self.terminate(FlightStatus::LandedHalfway, Some(position));
        }

        self.position = position;
        StepResult::moved(position)
    }

    fn exceeds_capacity(&self, point: &Point) -> bool {
        point.energy + self.mission.energy_req > self.total_energy_capacity
    }

    fn terminate(&mut self, status: FlightStatus, position: Option<LatLng>) -> StepResult {
        if let Some(position) = position {
            self.position = position;
        }
        self.status = status;

        StepResult {
            new_position: position,
            terminal_transition: Some(TerminalTransition {
                status,
                mission_name: self.mission.name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::drone::EnergyConfig;

    const EPSILON: f64 = 1e-9;

    fn point(longitude: f64, end_time: f64, energy: f64) -> Point {
        Point {
            latitude: 0.0,
            longitude,
            end_time,
            energy,
        }
    }

    fn config(capacity: f64) -> DroneConfig {
        DroneConfig {
            energy: EnergyConfig {
                capacity,
                number_of_batteries: 1,
            },
            vertical_speeds: None,
            payload: None,
        }
    }

    /// Three waypoints on the equator reached at 0, 100 and 300 seconds.
    fn scenario_flight(capacity: f64) -> Flight {
        let mission = Mission {
            name: "Mission-1".to_string(),
            horizontal_speed: 10.0,
            altitude: 50,
            end_time: 300.0,
            energy_req: 0.0,
            points: vec![
                point(0.0, 0.0, 0.0),
                point(10.0, 100.0, 50.0),
                point(30.0, 300.0, 120.0),
            ],
        };
        Flight::new("1", mission, &config(capacity), Drone::default()).unwrap()
    }

    fn assert_position(actual: Option<LatLng>, expected: LatLng) {
        let actual = actual.expect("expected a position update");
        assert!(
            (actual.latitude - expected.latitude).abs() < EPSILON
                && (actual.longitude - expected.longitude).abs() < EPSILON,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_new_places_marker_on_takeoff_point() {
        let flight = scenario_flight(200.0);
        assert_eq!(flight.position, LatLng::new(0.0, 0.0));
        assert_eq!(flight.status, FlightStatus::Flying);
    }

    #[test]
    fn test_new_rejects_non_finite_capacity() {
        let mission = scenario_flight(200.0).mission;
        let result = Flight::new("1", mission, &config(f64::NAN), Drone::default());
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_battery_lands_before_takeoff() {
        let mut mission = scenario_flight(200.0).mission;
        mission.points[0].end_time = 10.0;
        mission.points[0].energy = 5.0;
        let empty = DroneConfig {
            energy: EnergyConfig {
                capacity: 100.0,
                number_of_batteries: 0,
            },
            vertical_speeds: None,
            payload: None,
        };
        let mut flight = Flight::new("1", mission, &empty, Drone::default()).unwrap();
        assert_eq!(flight.total_energy_capacity, 0.0);

        let result = flight.step(0.0);
        assert!(result.new_position.is_none());
        assert_eq!(
            result.terminal_transition.map(|t| t.status),
            Some(FlightStatus::LandedHalfway)
        );
        assert_eq!(flight.position, LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_interpolates_halfway_through_first_leg() {
        let mut flight = scenario_flight(200.0);
        let result = flight.step(50.0);

        assert_position(result.new_position, LatLng::new(0.0, 5.0));
        assert!(result.terminal_transition.is_none());
        assert_eq!(flight.status, FlightStatus::Flying);
    }

    #[test]
    fn test_completes_at_mission_end() {
        let mut flight = scenario_flight(200.0);
        flight.step(50.0);
        let result = flight.step(300.0);

        assert_position(result.new_position, LatLng::new(0.0, 30.0));
        assert_eq!(
            result.terminal_transition,
            Some(TerminalTransition {
                status: FlightStatus::FlewProperly,
                mission_name: "Mission-1".to_string(),
            })
        );
        assert_eq!(flight.position, LatLng::new(0.0, 30.0));
    }

    #[test]
    fn test_completes_when_first_tick_is_past_the_end() {
        let mut flight = scenario_flight(200.0);
        let result = flight.step(1_000.0);
        assert_eq!(result.terminal_transition.unwrap().label(), "flew properly");
    }

    #[test]
    fn test_lands_halfway_when_next_waypoint_exceeds_capacity() {
        let mut flight = scenario_flight(100.0);

        assert!(flight.step(50.0).terminal_transition.is_none());

        let result = flight.step(150.0);
        assert_position(result.new_position, LatLng::new(0.0, 15.0));
        assert_eq!(
            result.terminal_transition.map(|t| t.status),
            Some(FlightStatus::LandedHalfway)
        );

        // Frozen where it landed.
        assert!(flight.step(200.0).is_empty());
        assert!(flight.step(300.0).is_empty());
        assert!((flight.position.longitude - 15.0).abs() < EPSILON);
    }

    #[test]
    fn test_energy_req_counts_against_capacity() {
        let mut flight = scenario_flight(200.0);
        flight.mission.energy_req = 160.0;

        // 50 + 160 exceeds 200 on the first leg already.
        let result = flight.step(10.0);
        assert_eq!(
            result.terminal_transition.map(|t| t.status),
            Some(FlightStatus::LandedHalfway)
        );
    }

    #[test]
    fn test_energy_gate_before_takeoff() {
        let mission = Mission {
            name: "Overloaded".to_string(),
            horizontal_speed: 5.0,
            altitude: 30,
            end_time: 200.0,
            energy_req: 20.0,
            points: vec![point(1.0, 10.0, 90.0), point(2.0, 100.0, 95.0)],
        };
        let mut flight = Flight::new("7", mission, &config(100.0), Drone::default()).unwrap();

        let result = flight.step(0.0);
        assert!(result.new_position.is_none());
        assert_eq!(
            result.terminal_transition.map(|t| t.status),
            Some(FlightStatus::LandedHalfway)
        );
        assert_eq!(flight.position, LatLng::new(0.0, 1.0));
    }

    #[test]
    fn test_waiting_for_takeoff_is_no_update() {
        let mission = Mission {
            name: "Late start".to_string(),
            horizontal_speed: 5.0,
            altitude: 30,
            end_time: 200.0,
            energy_req: 0.0,
            points: vec![point(1.0, 10.0, 5.0), point(2.0, 100.0, 10.0)],
        };
        let mut flight = Flight::new("8", mission, &config(100.0), Drone::default()).unwrap();

        assert!(flight.step(0.0).is_empty());
        assert!(flight.step(9.9).is_empty());
        assert_position(flight.step(10.0).new_position, LatLng::new(0.0, 1.0));
    }

    #[test]
    fn test_terminal_state_is_idempotent() {
        let mut flight = scenario_flight(200.0);
        assert!(flight.step(300.0).terminal_transition.is_some());

        for elapsed in [0.0, 50.0, 150.0, 300.0, 10_000.0] {
            assert!(flight.step(elapsed).is_empty());
        }
        assert_eq!(flight.status, FlightStatus::FlewProperly);
    }

    #[test]
    fn test_boundary_matches_waypoint() {
        let mut flight = scenario_flight(200.0);
        assert_position(flight.step(100.0).new_position, LatLng::new(0.0, 10.0));
    }

    #[test]
    fn test_progress_is_monotonic_along_leg() {
        let mut flight = scenario_flight(200.0);
        let mut previous = -1.0;
        for elapsed in (100..300).step_by(10) {
            let position = flight.step(elapsed as f64).new_position.unwrap();
            assert!(position.longitude > previous);
            previous = position.longitude;
        }
    }

    #[test]
    fn test_exhausted_trajectory_holds_until_mission_end() {
        let mut flight = scenario_flight(200.0);
        flight.mission.end_time = 360.0;

        let holding = flight.step(330.0);
        assert_position(holding.new_position, LatLng::new(0.0, 30.0));
        assert!(holding.terminal_transition.is_none());
        assert_eq!(flight.status, FlightStatus::Flying);

        let done = flight.step(360.0);
        assert_eq!(
            done.terminal_transition.map(|t| t.status),
            Some(FlightStatus::FlewProperly)
        );
    }
}
