//! Lat/lng to sphere-surface positions for the globe.
//!
//! Convention: y is the polar axis, and longitude runs mirrored
//! (theta = 360 - lng) so that positions line up with the equirectangular
//! surface texture wrapped around the sphere mesh. Do not "fix" the mirror,
//! markers and tracks drift off their cities if theta follows the usual
//! right-handed convention.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geographic position in degrees. Ranges are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }
}

/// A point on (or above) the sphere, with the polar angles that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpherePosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Polar angle from +y, radians.
    pub phi: f64,
    /// Mirrored azimuth, radians.
    pub theta: f64,
}

impl SpherePosition {
    pub fn to_vec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl From<SpherePosition> for DVec3 {
    fn from(p: SpherePosition) -> Self {
        p.to_vec3()
    }
}

/// Convert an angle in degrees to radians.
pub fn degrees_to_radians(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Position on a sphere of `radius` centered at the origin for lat/lng in degrees.
///
/// A zero radius collapses to the origin. NaN and infinite inputs flow through.
pub fn position_from_lat_lng(lat: f64, lng: f64, radius: f64) -> SpherePosition {
    let phi = (90.0 - lat) * PI / 180.0;
    let theta = (360.0 - lng) * PI / 180.0;

    SpherePosition {
        x: radius * phi.sin() * theta.cos(),
        y: radius * phi.cos(),
        z: radius * phi.sin() * theta.sin(),
        phi,
        theta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn degrees_to_radians_known_values() {
        assert!((degrees_to_radians(180.0) - PI).abs() < EPSILON);
        assert!((degrees_to_radians(90.0) - PI / 2.0).abs() < EPSILON);
        assert!((degrees_to_radians(-45.0) + PI / 4.0).abs() < EPSILON);
        assert_eq!(degrees_to_radians(0.0), 0.0);
    }

    #[test]
    fn equator_prime_meridian() {
        let p = position_from_lat_lng(0.0, 0.0, 6378.0);
        assert!((p.x - 6378.0).abs() < 1e-6, "x should be radius, got {}", p.x);
        assert!(p.y.abs() < 1e-6, "y should be ~0, got {}", p.y);
        assert!(p.z.abs() < 1e-6, "z should be ~0, got {}", p.z);
        assert!((p.phi - PI / 2.0).abs() < EPSILON);
        assert!((p.theta - 2.0 * PI).abs() < EPSILON);
    }

    #[test]
    fn north_pole_is_on_y_axis() {
        let p = position_from_lat_lng(90.0, 123.0, 10.0);
        assert!(p.x.abs() < EPSILON);
        assert!((p.y - 10.0).abs() < EPSILON);
        assert!(p.z.abs() < EPSILON);
    }

    #[test]
    fn longitude_is_mirrored() {
        // lng = 90 east lands on -z, not +z.
        let p = position_from_lat_lng(0.0, 90.0, 1.0);
        assert!(p.x.abs() < EPSILON);
        assert!((p.z + 1.0).abs() < EPSILON, "expected z = -1, got {}", p.z);
    }

    #[test]
    fn zero_radius_is_origin() {
        let p = position_from_lat_lng(37.5, -122.3, 0.0);
        assert_eq!(p.to_vec3().length(), 0.0);
    }

    #[test]
    fn points_lie_on_sphere() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let lat = rng.gen_range(-90.0..=90.0);
            let lng = rng.gen_range(-180.0..=180.0);
            let radius = rng.gen_range(0.1..10_000.0);
            let p = position_from_lat_lng(lat, lng, radius);
            let len = DVec3::from(p).length();
            assert!(
                (len - radius).abs() < radius * 1e-12 + 1e-9,
                "|p| = {} for radius {} at ({}, {})",
                len,
                radius,
                lat,
                lng
            );
        }
    }

    #[test]
    fn nan_propagates() {
        let p = position_from_lat_lng(f64::NAN, 0.0, 1.0);
        assert!(p.x.is_nan());
        assert!(p.y.is_nan());
    }
}
