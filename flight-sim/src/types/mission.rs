use serde::Deserialize;

use super::geo::LatLng;
use super::sim_error::SimError;

/// A waypoint of a recorded mission.
///
/// `end_time` is the elapsed second at which the drone reaches the point and
/// `energy` the cumulative energy consumed up to it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
    pub end_time: f64,
    pub energy: f64,
}

impl Point {
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// A pre-recorded drone mission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub name: String,
    pub horizontal_speed: f64,
    pub altitude: i32,
    pub end_time: f64,
    pub energy_req: f64,
    pub points: Vec<Point>,
}

impl Mission {
    /// Checks the invariants the stepper relies on: at least one waypoint,
    /// finite coordinates and strictly increasing waypoint times.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.points.is_empty() {
            return Err(SimError::invalid_mission(&self.name, "mission has no waypoints"));
        }

        for (i, point) in self.points.iter().enumerate() {
            if !point.lat_lng().is_finite()
                || !point.end_time.is_finite()
                || !point.energy.is_finite()
            {
                return Err(SimError::invalid_mission(
                    &self.name,
                    format!("waypoint {} has a non-finite value", i),
                ));
            }
        }

        if let Some(i) = self
            .points
            .windows(2)
            .position(|pair| pair[1].end_time <= pair[0].end_time)
        {
            return Err(SimError::invalid_mission(
                &self.name,
                format!(
                    "waypoint {} (endTime {}) is not after waypoint {} (endTime {})",
                    i + 1,
                    self.points[i + 1].end_time,
                    i,
                    self.points[i].end_time
                ),
            ));
        }

        if !self.end_time.is_finite() || !self.energy_req.is_finite() {
            return Err(SimError::invalid_mission(
                &self.name,
                "endTime and energyReq must be finite",
            ));
        }

        Ok(())
    }

    /// Takeoff waypoint.
    pub fn first_point(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last_point(&self) -> Option<&Point> {
        self.points.last()
    }

    /// The full waypoint sequence as a polyline.
    pub fn path(&self) -> Vec<LatLng> {
        self.points.iter().map(Point::lat_lng).collect()
    }
}
