use glam::DVec3;
use rayon::prelude::*;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use uuid::Uuid;

use crate::config::GlobeConfig;
use crate::geometry::{
    Color, TrackSpline, build_track_between, color_for_value, position_from_lat_lng,
    track_altitude,
};
use crate::latency::{DailyLatencies, DataCenterDirectory, ResolvedLatency, resolve};

/// Everything a renderer needs to draw one refresh of the globe.
#[derive(Debug, Clone, Serialize)]
pub struct GlobeScene {
    pub id: Uuid,
    pub created_at: String,
    pub planet_radius: f64,
    pub cloud_scale: f64,
    pub tilt_radians: f64,
    pub planet: PlanetSpec,
    pub markers: Vec<Marker>,
    pub tracks: Vec<TrackLine>,
    pub skipped_samples: usize,
}

/// Planet mesh and material options handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetSpec {
    pub segments: u32,
    pub rings: u32,
    pub textures: PlanetTextures,
    pub use_surface_shader: bool,
    pub create_combined_mesh: bool,
    pub cloud_radius: f64,
}

/// Texture paths; unset ones are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanetTextures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clouds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specular: Option<String>,
}

fn texture(path: &str) -> Option<String> {
    (!path.is_empty()).then(|| path.to_string())
}

impl PlanetSpec {
    pub fn from_config(config: &GlobeConfig) -> Self {
        PlanetSpec {
            segments: config.geom_segments,
            rings: config.geom_rings,
            textures: PlanetTextures {
                surface: texture(&config.surface_texture),
                clouds: texture(&config.cloud_texture),
                normals: texture(&config.normals_texture),
                specular: texture(&config.specular_texture),
            },
            use_surface_shader: config.use_surface_shader,
            create_combined_mesh: config.create_combined_mesh,
            cloud_radius: config.cloud_radius(),
        }
    }
}

/// A data-center marker on the surface.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub dc_id: String,
    pub position: DVec3,
    pub radius: f64,
    pub value: f64,
}

/// An elevated, colored line between two data centers.
#[derive(Debug, Clone, Serialize)]
pub struct TrackLine {
    pub from_dc: String,
    pub to_dc: String,
    pub value: f64,
    pub percent: f64,
    pub max_altitude: f64,
    pub color: Color,
    pub opacity: f32,
    pub control_points: Vec<DVec3>,
    pub line_points: Vec<DVec3>,
}

impl TrackLine {
    /// Build the track for one resolved latency.
    pub fn from_latency(config: &GlobeConfig, latency: &ResolvedLatency) -> Self {
        let percent = config.percent_for(latency.value);
        let max_altitude = track_altitude(
            config.track_base_altitude,
            config.track_altitude_per_percent,
            percent,
        );
        let control_points = build_track_between(
            latency.from.geo_point(),
            latency.to.geo_point(),
            config.planet_radius,
            config.track_control_points,
            max_altitude,
        );
        let spline = TrackSpline::new(control_points);
        let line_points = spline.resample(config.track_line_points);

        TrackLine {
            from_dc: latency.from.dc_id.clone(),
            to_dc: latency.to.dc_id.clone(),
            value: latency.value,
            percent,
            max_altitude,
            color: color_for_value(latency.value),
            opacity: config.track_opacity,
            control_points: spline.control_points().to_vec(),
            line_points,
        }
    }
}

fn marker_for(config: &GlobeConfig, dc_id: &str, lat: f64, lng: f64, value: f64) -> Marker {
    Marker {
        dc_id: dc_id.to_string(),
        position: position_from_lat_lng(lat, lng, config.planet_radius).to_vec3(),
        radius: config.marker_radius,
        value,
    }
}

/// Build a fresh scene from a directory and the days of samples to draw.
///
/// Every sample yields one track and two markers (one per end), in input order.
pub fn build_scene(
    config: &GlobeConfig,
    directory: &DataCenterDirectory,
    days: &[DailyLatencies],
) -> GlobeScene {
    let resolution = resolve(directory, days);

    let tracks: Vec<TrackLine> = resolution
        .latencies
        .par_iter()
        .map(|latency| TrackLine::from_latency(config, latency))
        .collect();

    let markers = resolution
        .latencies
        .iter()
        .flat_map(|l| {
            [
                marker_for(config, &l.from.dc_id, l.from.lat, l.from.lng, l.value),
                marker_for(config, &l.to.dc_id, l.to.lat, l.to.lng, l.value),
            ]
        })
        .collect();

    debug!(
        tracks = tracks.len(),
        skipped = resolution.skipped,
        "Scene built"
    );

    GlobeScene {
        id: Uuid::new_v4(),
        created_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string(),
        planet_radius: config.planet_radius,
        cloud_scale: config.cloud_scale(),
        tilt_radians: config.tilt_radians(),
        planet: PlanetSpec::from_config(config),
        markers,
        tracks,
        skipped_samples: resolution.skipped,
    }
}
