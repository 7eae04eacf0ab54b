//! Great-circle interpolation between two lat/lng positions.

use super::coords::{GeoPoint, degrees_to_radians};

/// Below this angular distance (radians) the endpoints are treated as the same point.
pub const COINCIDENT_EPSILON: f64 = 1e-12;

/// Great-circle angular distance in radians, haversine form.
pub fn angular_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1 = degrees_to_radians(lat1);
    let lng1 = degrees_to_radians(lng1);
    let lat2 = degrees_to_radians(lat2);
    let lng2 = degrees_to_radians(lng2);

    let h = ((lat1 - lat2) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lng1 - lng2) / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin()
}

/// Point at fraction `offset` along the shortest path from (lat1, lng1) to (lat2, lng2).
///
/// `offset` 0 yields the start, 1 the end; values outside [0, 1] extrapolate
/// along the same great circle. Coincident endpoints return the start point
/// unchanged instead of dividing by sin(0).
pub fn interpolate(lat1: f64, lng1: f64, lat2: f64, lng2: f64, offset: f64) -> GeoPoint {
    let d = angular_distance(lat1, lng1, lat2, lng2);
    if d < COINCIDENT_EPSILON {
        return GeoPoint::new(lat1, lng1);
    }

    let lat1 = degrees_to_radians(lat1);
    let lng1 = degrees_to_radians(lng1);
    let lat2 = degrees_to_radians(lat2);
    let lng2 = degrees_to_radians(lng2);

    let a = ((1.0 - offset) * d).sin() / d.sin();
    let b = (offset * d).sin() / d.sin();

    let x = a * lat1.cos() * lng1.cos() + b * lat2.cos() * lng2.cos();
    let y = a * lat1.cos() * lng1.sin() + b * lat2.cos() * lng2.sin();
    let z = a * lat1.sin() + b * lat2.sin();

    GeoPoint {
        lat: z.atan2((x * x + y * y).sqrt()).to_degrees(),
        lng: y.atan2(x).to_degrees(),
    }
}

/// Convenience form of [`interpolate`] over [`GeoPoint`]s.
pub fn interpolate_points(from: GeoPoint, to: GeoPoint, offset: f64) -> GeoPoint {
    interpolate(from.lat, from.lng, to.lat, to.lng, offset)
}
