pub mod color;
pub mod coords;
pub mod interpolate;
pub mod track;

pub use color::{Color, ColorBand, LATENCY_BANDS, color_for_value};
pub use coords::{GeoPoint, SpherePosition, degrees_to_radians, position_from_lat_lng};
pub use interpolate::{angular_distance, interpolate, interpolate_points};
pub use track::{
    TrackSpline, build_track_between, build_track_points, elevation_factor, track_altitude,
};

/// Cartesian position in globe space, centered on the sphere.
pub type CartesianPoint = glam::DVec3;
