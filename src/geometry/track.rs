//! Elevated arc tracks between two points on the globe.
//!
//! A track is a handful of control points following the great circle between
//! its endpoints, lifted off the surface by a half-sine profile, then smoothed
//! with a Catmull-Rom spline for the rendered line.

use glam::DVec3;

use super::coords::{GeoPoint, degrees_to_radians, position_from_lat_lng};
use super::interpolate::interpolate;

/// Half-sine lift for control point `i` of `num_points`: 0 at both ends, 1 at the middle.
pub fn elevation_factor(i: u32, num_points: u32) -> f64 {
    let arc_angle = i as f64 * 180.0 / num_points as f64;
    degrees_to_radians(arc_angle).sin()
}

/// Peak altitude for a track from its relative magnitude.
pub fn track_altitude(base_altitude: f64, altitude_per_percent: f64, percent: f64) -> f64 {
    base_altitude + altitude_per_percent * percent
}

/// Control points for an arc from start to end, `num_points + 1` of them.
///
/// Point `i` sits at fraction `i / num_points` along the great circle, at
/// radius `radius + elevation_factor(i) * max_altitude`. `num_points == 0`
/// yields no points.
pub fn build_track_points(
    start_lat: f64,
    start_lng: f64,
    end_lat: f64,
    end_lng: f64,
    radius: f64,
    num_points: u32,
    max_altitude: f64,
) -> Vec<DVec3> {
    if num_points == 0 {
        return Vec::new();
    }

    (0..=num_points)
        .map(|i| {
            let arc_radius = radius + elevation_factor(i, num_points) * max_altitude;
            let t = i as f64 / num_points as f64;
            let along = interpolate(start_lat, start_lng, end_lat, end_lng, t);
            position_from_lat_lng(along.lat, along.lng, arc_radius).to_vec3()
        })
        .collect()
}

/// [`build_track_points`] over [`GeoPoint`] endpoints.
pub fn build_track_between(
    from: GeoPoint,
    to: GeoPoint,
    radius: f64,
    num_points: u32,
    max_altitude: f64,
) -> Vec<DVec3> {
    build_track_points(from.lat, from.lng, to.lat, to.lng, radius, num_points, max_altitude)
}

/// Uniform Catmull-Rom curve through a sequence of control points.
///
/// End segments reuse the first/last control point as their outer neighbour,
/// so the curve passes through every control point including both ends.
#[derive(Debug, Clone)]
pub struct TrackSpline {
    points: Vec<DVec3>,
}

impl TrackSpline {
    pub fn new(points: Vec<DVec3>) -> Self {
        TrackSpline { points }
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.points
    }

    /// Point on the curve at `t` in [0, 1]. Empty splines return the origin.
    pub fn point_at(&self, t: f64) -> DVec3 {
        let n = self.points.len();
        match n {
            0 => return DVec3::ZERO,
            1 => return self.points[0],
            _ => {}
        }

        let point = (n - 1) as f64 * t.clamp(0.0, 1.0);
        let int_point = (point.floor() as usize).min(n - 1);
        let weight = point - int_point as f64;

        let c0 = int_point.saturating_sub(1);
        let c1 = int_point;
        let c2 = (int_point + 1).min(n - 1);
        let c3 = (int_point + 2).min(n - 1);

        catmull_rom(
            self.points[c0],
            self.points[c1],
            self.points[c2],
            self.points[c3],
            weight,
        )
    }

    /// `count` points at t = i / count for i in 0..count.
    ///
    /// The curve's final endpoint (t = 1) is not included.
    pub fn resample(&self, count: u32) -> Vec<DVec3> {
        (0..count)
            .map(|i| self.point_at(i as f64 / count as f64))
            .collect()
    }
}

fn catmull_rom(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let v0 = (p2 - p0) * 0.5;
    let v1 = (p3 - p1) * 0.5;
    let t2 = t * t;
    let t3 = t * t2;
    (2.0 * p1 - 2.0 * p2 + v0 + v1) * t3
        + (-3.0 * p1 + 3.0 * p2 - 2.0 * v0 - v1) * t2
        + v0 * t
        + p1
}
