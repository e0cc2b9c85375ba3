use super::drone::{Drone, DroneConfig};
use super::geo::haversine_distance;
use super::mission::Mission;
use super::sim_error::SimError;

/// Energy a mission needs, split by flight phase.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyPlan {
    pub ascension: f64,
    pub horizontal: f64,
    pub descent: f64,
}

impl EnergyPlan {
    pub fn total(&self) -> f64 {
        self.ascension + self.horizontal + self.descent
    }

    pub fn is_feasible(&self, total_energy_capacity: f64) -> bool {
        self.total() <= total_energy_capacity
    }
}

/// Time and energy of a phase flown at `speed` under `load`.
fn phase(distance: f64, speed: f64, load: f64) -> (f64, f64) {
    let time = distance / speed;
    (time, time * load * speed.powi(2))
}

fn require_positive(value: f64, what: &str) -> Result<f64, SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidConfig(format!(
            "{} must be positive, got {}",
            what, value
        )))
    }
}

/// Fills in the timing and energy data of `mission` from its geometry.
///
/// The first waypoint is reached at the end of the climb to `altitude`,
/// each following one after flying the leg at `horizontal_speed`, and the
/// mission ends after the descent from the last waypoint. `energy_req` is
/// set to the descent energy, the reserve every waypoint must leave.
pub fn plan_mission(
    mission: &mut Mission,
    config: &DroneConfig,
    drone: &Drone,
) -> Result<EnergyPlan, SimError> {
    let speeds = config.vertical_speeds.as_ref().ok_or_else(|| {
        SimError::InvalidConfig(format!(
            "mission '{}' needs verticalSpeeds to be planned",
            mission.name
        ))
    })?;
    let load = drone.current_load_in_flight.as_ref().ok_or_else(|| {
        SimError::InvalidConfig(format!(
            "mission '{}' needs the drone's currentLoadInFlight to be planned",
            mission.name
        ))
    })?;

    let ascension_speed = require_positive(speeds.ascension, "ascension speed")?;
    let descent_speed = require_positive(speeds.descent, "descent speed")?;
    let horizontal_speed = require_positive(mission.horizontal_speed, "horizontal speed")?;
    let payload = config.payload_load();
    let altitude = mission.altitude as f64;

    if mission.points.is_empty() {
        return Err(SimError::invalid_mission(&mission.name, "mission has no waypoints"));
    }

    let (climb_time, ascension) = phase(altitude, ascension_speed, load.ascension + payload);
    mission.points[0].end_time = climb_time;
    mission.points[0].energy = ascension;

    let mut horizontal = 0.0;
    for i in 1..mission.points.len() {
        let prev = &mission.points[i - 1];
        let distance = haversine_distance(prev.lat_lng(), mission.points[i].lat_lng());
        if distance <= 0.0 {
            return Err(SimError::invalid_mission(
                &mission.name,
                format!(
                    "waypoints {} and {} are both at {:.6}, {:.6}",
                    i - 1,
                    i,
                    prev.latitude,
                    prev.longitude
                ),
            ));
        }
        let (time, energy) = phase(distance, horizontal_speed, load.translation + payload);

        let (end_time, cumulative) = (prev.end_time + time, prev.energy + energy);
        mission.points[i].end_time = end_time;
        mission.points[i].energy = cumulative;
        horizontal += energy;
    }

    let (descent_time, descent) = phase(altitude, descent_speed, load.descent + payload);
    let last_end = mission.points[mission.points.len() - 1].end_time;
    mission.end_time = last_end + descent_time;
    mission.energy_req = descent;

    Ok(EnergyPlan {
        ascension,
        horizontal,
        descent,
    })
}
