use serde::Deserialize;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// Below this the great-circle formula loses precision; interpolate degrees linearly.
const SMALL_ANGLE_SIN: f64 = 1e-6;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        LatLng {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Great-circle distance between two coordinates, in metres.
pub fn haversine_distance(from: LatLng, to: LatLng) -> f64 {
    EARTH_RADIUS_M * angle_between(from, to)
}

/// Central angle between two coordinates, in radians.
fn angle_between(from: LatLng, to: LatLng) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (to.longitude - from.longitude).to_radians();

    // Haversine formula
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * a.sqrt().min(1.0).asin()
}

/// Returns the point at `fraction` of the way along the great circle from
/// `from` to `to`. A fraction of 0 yields `from` and 1 yields `to`.
pub fn interpolate(from: LatLng, to: LatLng, fraction: f64) -> LatLng {
    let angle = angle_between(from, to);
    let sin_angle = angle.sin();

    if sin_angle < SMALL_ANGLE_SIN {
        return LatLng::new(
            from.latitude + fraction * (to.latitude - from.latitude),
            from.longitude + fraction * (to.longitude - from.longitude),
        );
    }

    let from_lat = from.latitude.to_radians();
    let from_lon = from.longitude.to_radians();
    let to_lat = to.latitude.to_radians();
    let to_lon = to.longitude.to_radians();

    let a = ((1.0 - fraction) * angle).sin() / sin_angle;
    let b = (fraction * angle).sin() / sin_angle;

    // Weighted sum of both endpoints as unit vectors, projected back to lat/lng.
    let x = a * from_lat.cos() * from_lon.cos() + b * to_lat.cos() * to_lon.cos();
    let y = a * from_lat.cos() * from_lon.sin() + b * to_lat.cos() * to_lon.sin();
    let z = a * from_lat.sin() + b * to_lat.sin();

    let latitude = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let longitude = y.atan2(x).to_degrees();

    LatLng::new(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: LatLng, expected: LatLng) {
        assert!(
            (actual.latitude - expected.latitude).abs() < EPSILON
                && (actual.longitude - expected.longitude).abs() < EPSILON,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_haversine_one_degree_on_equator() {
        let distance = haversine_distance(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        let expected = EARTH_RADIUS_M * 1f64.to_radians();
        assert!((distance - expected).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let point = LatLng::new(-34.553, -58.413);
        assert_eq!(haversine_distance(point, point), 0.0);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let from = LatLng::new(48.85, 2.35);
        let to = LatLng::new(51.5, -0.12);
        assert_close(interpolate(from, to, 0.0), from);
        assert_close(interpolate(from, to, 1.0), to);
    }

    #[test]
    fn test_interpolate_midpoint_on_equator() {
        let mid = interpolate(LatLng::new(0.0, 0.0), LatLng::new(0.0, 10.0), 0.5);
        assert_close(mid, LatLng::new(0.0, 5.0));
    }

    #[test]
    fn test_interpolate_along_meridian() {
        let point = interpolate(LatLng::new(10.0, 20.0), LatLng::new(30.0, 20.0), 0.25);
        assert_close(point, LatLng::new(15.0, 20.0));
    }

    #[test]
    fn test_interpolate_follows_great_circle_not_rhumb_line() {
        // Between two points at the same northern latitude the great circle bows poleward.
        let mid = interpolate(LatLng::new(60.0, -30.0), LatLng::new(60.0, 30.0), 0.5);
        assert!(mid.latitude > 60.0);
        assert!(mid.longitude.abs() < EPSILON);
    }

    #[test]
    fn test_interpolate_tiny_segment_falls_back_to_linear() {
        let from = LatLng::new(45.0, 7.0);
        let to = LatLng::new(45.0, 7.000_000_01);
        let mid = interpolate(from, to, 0.5);
        assert_close(mid, LatLng::new(45.0, 7.000_000_005));
    }
}
